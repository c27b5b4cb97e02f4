pub mod console;

pub use console::{ConsoleHost, ConsoleLine, parse_line, serve};

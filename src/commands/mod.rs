pub mod handlers;
pub mod parser;
pub mod types;

pub use handlers::handle_command;
pub use parser::parse_command;
pub use types::{AdminCommand, CommandResult};

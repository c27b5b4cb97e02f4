use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// `newlife` - asynchronous chat moderation with warning escalation.
#[derive(Parser, Debug)]
#[command(name = "newlife")]
#[command(version)]
#[command(about = "Moderate chat messages with a cached, rate-limited classifier.", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.newlife/config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Moderate `actor: message` lines read from stdin
    Run,

    /// Ask the oracle about one text and print the verdict
    Check {
        /// Text to classify
        text: String,
    },

    /// Show persisted warning counts
    Stats,

    /// Show the effective configuration
    Status,
}

//! CLI argument definitions using clap
//!
//! Commands:
//! - campushub serve --config <path>
//! - campushub token --config <path> --user-id <id>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// campushub - posts, community posts and timelines over HTTP
#[derive(Parser, Debug)]
#[command(name = "campushub")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./campushub.json")]
        config: PathBuf,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print a bearer token for a user
    Token {
        /// Path to configuration file
        #[arg(long, default_value = "./campushub.json")]
        config: PathBuf,

        /// User id the token is issued for
        #[arg(long)]
        user_id: i64,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

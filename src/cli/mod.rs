//! Command-line interface
//!
//! - serve: load config, seed the store and run the HTTP server
//! - token: issue a bearer token for local testing

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{open_store, run, run_command, serve, token};
pub use errors::{CliError, CliResult};

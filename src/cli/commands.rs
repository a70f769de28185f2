//! CLI command implementations

use std::path::Path;
use std::sync::Arc;

use crate::auth::JwtManager;
use crate::http_server::{HttpServer, ServerConfig};
use crate::observability::init_logging;
use crate::store::{Fixtures, MemoryStore, RowId, Store};

use super::args::Command;
use super::errors::{CliError, CliResult};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, port } => serve(&config, port),
        Command::Token { config, user_id } => {
            let token = token(&config, user_id)?;
            println!("{}", token);
            Ok(())
        }
    }
}

/// Build the store, seeded from the configured fixtures if any
pub fn open_store(config: &ServerConfig) -> CliResult<MemoryStore> {
    match &config.fixtures {
        Some(path) => {
            let fixtures = Fixtures::load(path)?;
            Ok(MemoryStore::from_fixtures(fixtures)?)
        }
        None => Ok(MemoryStore::new()),
    }
}

/// Load config, init logging, seed the store and serve until Ctrl-C
pub fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    let mut config = ServerConfig::load(config_path)?;
    if let Some(port) = port {
        config.port = port;
        config.validate()?;
    }

    init_logging(&config.log)?;

    let store: Arc<dyn Store> = Arc::new(open_store(&config)?);
    tracing::info!(
        config = %config_path.display(),
        fixtures = ?config.fixtures,
        "store ready"
    );

    let server = HttpServer::new(config, store);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Issue a bearer token signed with the configured secret
pub fn token(config_path: &Path, user_id: RowId) -> CliResult<String> {
    let config = ServerConfig::load(config_path)?;
    let jwt = JwtManager::new(config.jwt);
    Ok(jwt.issue(user_id)?)
}

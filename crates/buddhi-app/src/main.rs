//! Buddhimatta server binary.
//!
//! Loads configuration, opens the answer store and serves the HTTP API, or
//! imports training data with `buddhimatta train <file.json>`.

mod cli;
mod train;

use std::sync::Arc;

use clap::Parser;

use buddhi_api::{start_server, AppState};
use buddhi_core::config::BuddhiConfig;
use buddhi_store::AnswerStore;

use crate::cli::{CliArgs, Command};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config. A load failure is reported once tracing is up.
    let config_file = args.resolve_config_path();
    let (mut config, load_error) = match BuddhiConfig::load(&config_file) {
        Ok(config) => (config, None),
        Err(e) => (BuddhiConfig::default(), Some(e)),
    };
    config.server.host = args.resolve_host(&config.server.host);
    config.server.port = args.resolve_port(config.server.port);
    if let Some(path) = args.resolve_store_path() {
        config.store.path = path;
    }
    if let Some(level) = args.resolve_log_level() {
        config.general.log_level = level;
    }

    // Tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_level)),
        )
        .init();

    tracing::info!("Starting Buddhimatta v{}", env!("CARGO_PKG_VERSION"));
    match load_error {
        None => tracing::info!(path = %config_file.display(), "Configuration loaded"),
        Some(e) => tracing::warn!(
            path = %config_file.display(),
            error = %e,
            "Failed to load config, using defaults"
        ),
    }

    // Answer store.
    let store = Arc::new(AnswerStore::load(&config.store.path));
    tracing::info!(
        path = %config.store.path,
        known_answers = store.len(),
        "Answer store ready"
    );

    if let Some(Command::Train { file }) = &args.command {
        let applied = train::import_file(&store, file).await?;
        tracing::info!(
            file = %file.display(),
            applied,
            known_answers = store.len(),
            "Training data imported"
        );
        return Ok(());
    }

    tracing::info!(
        learn = config.dispatch.learn,
        errors_as_answers = config.dispatch.errors_as_answers,
        interpreter = %config.dispatch.python_interpreter,
        "Dispatch configured"
    );

    let state = AppState::new(config.clone(), store);
    start_server(&config, state).await?;

    Ok(())
}

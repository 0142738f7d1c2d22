//! CLI argument definitions for the Buddhimatta server.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Buddhimatta - answers assignment questions over HTTP.
#[derive(Parser, Debug)]
#[command(name = "buddhimatta", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Address to bind.
    #[arg(long = "host")]
    pub host: Option<String>,

    /// API server port.
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,

    /// Path of the JSON answer store.
    #[arg(short = 's', long = "store")]
    pub store: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Actions other than serving. With none given the API server starts.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Merge question/answer pairs from a JSON file into the answer store.
    Train {
        /// JSON object of question to answer, or a list of
        /// `{"question", "answer"}` records.
        file: PathBuf,
    },
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > BUDDHI_CONFIG env var > `buddhimatta.toml`.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("BUDDHI_CONFIG") {
            return PathBuf::from(p);
        }
        PathBuf::from("buddhimatta.toml")
    }

    /// Resolve the bind host.
    ///
    /// Priority: --host flag > BUDDHI_HOST env var > config file value.
    pub fn resolve_host(&self, config_host: &str) -> String {
        if let Some(ref h) = self.host {
            return h.clone();
        }
        if let Ok(h) = std::env::var("BUDDHI_HOST") {
            if !h.is_empty() {
                return h;
            }
        }
        config_host.to_string()
    }

    /// Resolve the API server port.
    ///
    /// Priority: --port flag > BUDDHI_PORT env var > config file value > 8000.
    pub fn resolve_port(&self, config_port: u16) -> u16 {
        if let Some(p) = self.port {
            return p;
        }
        if let Ok(val) = std::env::var("BUDDHI_PORT") {
            if let Ok(p) = val.parse::<u16>() {
                return p;
            }
        }
        if config_port != 0 {
            return config_port;
        }
        8000
    }

    /// Resolve the answer store path. `None` keeps the config value.
    pub fn resolve_store_path(&self) -> Option<String> {
        self.store
            .as_ref()
            .map(|p| p.to_string_lossy().to_string())
    }

    /// Resolve the log level. `None` keeps the config value.
    pub fn resolve_log_level(&self) -> Option<String> {
        self.log_level.clone()
    }
}

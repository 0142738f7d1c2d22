use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;

/// Top-level configuration for the Buddhimatta service.
///
/// Loaded from `buddhi.toml` by default. Every section falls back to its
/// defaults when omitted, so an empty file is a valid configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuddhiConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

impl BuddhiConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: BuddhiConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Largest accepted request body, uploads included.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Answer store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON file mirroring the question-to-answer map.
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: "training_data.json".to_string(),
        }
    }
}

/// Question dispatch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Write answers produced by the archive, code and file rules back into
    /// the store after responding.
    pub learn: bool,
    /// Report rule failures as a normal `{"answer": ...}` body instead of an
    /// HTTP 400 error.
    pub errors_as_answers: bool,
    /// Interpreter used for embedded-code questions.
    pub python_interpreter: String,
    /// Wall-clock limit for one embedded-code run.
    pub execution_timeout_secs: u64,
    /// Largest total uncompressed size an uploaded archive may declare.
    pub max_extracted_bytes: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            learn: true,
            errors_as_answers: false,
            python_interpreter: "python3".to_string(),
            execution_timeout_secs: 10,
            max_extracted_bytes: 256 * 1024 * 1024,
        }
    }
}

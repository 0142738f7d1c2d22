pub mod config;
pub mod error;
pub mod types;

pub use config::BuddhiConfig;
pub use error::{BuddhiError, Result};
pub use types::*;

//! Application state shared across all route handlers.

use std::sync::Arc;
use std::time::Instant;

use buddhi_core::config::BuddhiConfig;
use buddhi_dispatch::{Dispatcher, RuleSet};
use buddhi_store::AnswerStore;

/// Shared application state.
///
/// All fields use `Arc` for cheap cloning across handler tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration (read-only after startup).
    pub config: Arc<BuddhiConfig>,
    /// Persisted question-to-answer records.
    pub store: Arc<AnswerStore>,
    /// Ordered rule dispatcher.
    pub dispatcher: Arc<Dispatcher>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    /// Create state with the standard rule set over `store`.
    pub fn new(config: BuddhiConfig, store: Arc<AnswerStore>) -> Self {
        let rules = RuleSet::with_defaults(Arc::clone(&store), &config.dispatch);
        Self::with_dispatcher(config, store, Dispatcher::new(rules))
    }

    /// Create state around a caller-built dispatcher.
    pub fn with_dispatcher(
        config: BuddhiConfig,
        store: Arc<AnswerStore>,
        dispatcher: Dispatcher,
    ) -> Self {
        Self {
            config: Arc::new(config),
            store,
            dispatcher: Arc::new(dispatcher),
            start_time: Instant::now(),
        }
    }
}

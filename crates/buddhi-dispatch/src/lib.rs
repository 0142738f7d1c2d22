//! Question dispatch for Buddhimatta.
//!
//! Classifies a free-text question (plus an optional upload) against an
//! ordered list of rules and produces an answer from the first rule that
//! applies.

pub mod dispatcher;
pub mod error;
pub mod patterns;
pub mod rule;
pub mod types;

pub use dispatcher::Dispatcher;
pub use error::DispatchError;
pub use rule::{AnswerRule, RuleSet};
pub use types::{Resolution, RuleKind, RuleOutcome};

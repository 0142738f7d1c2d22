//! Answer rule trait and the ordered rule registry.
//!
//! Each rule pairs a cheap classifier (`matches`) with the work that turns a
//! question into an answer (`answer`). The registry keeps rules in priority
//! order; the dispatcher walks it front to back.

pub mod archive;
pub mod code_exec;
pub mod file_content;
pub mod known_answer;

use std::sync::Arc;

use async_trait::async_trait;

use buddhi_core::config::DispatchConfig;
use buddhi_core::types::Upload;
use buddhi_store::AnswerStore;

use crate::types::{RuleKind, RuleOutcome};

pub use archive::ArchiveValueRule;
pub use code_exec::CodeExecutionRule;
pub use file_content::FileContentRule;
pub use known_answer::KnownAnswerRule;

/// A classifier plus handler for one family of questions.
#[async_trait]
pub trait AnswerRule: Send + Sync {
    /// Which rule this is.
    fn kind(&self) -> RuleKind;

    /// Whether the question (and upload presence) selects this rule.
    fn matches(&self, question: &str, upload: Option<&Upload>) -> bool;

    /// Produce an answer for a question this rule matched.
    async fn answer(&self, question: &str, upload: Option<&Upload>) -> RuleOutcome;
}

/// Rules in the order they are tried.
#[derive(Default)]
pub struct RuleSet {
    rules: Vec<Box<dyn AnswerRule>>,
}

impl RuleSet {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Standard rule order: known answers, archive values, embedded code,
    /// raw file content.
    pub fn with_defaults(store: Arc<AnswerStore>, config: &DispatchConfig) -> Self {
        let mut set = Self::new();
        set.register(Box::new(KnownAnswerRule::new(store)));
        set.register(Box::new(ArchiveValueRule::new(config.max_extracted_bytes)));
        set.register(Box::new(CodeExecutionRule::new(
            config.python_interpreter.clone(),
            config.execution_timeout_secs,
        )));
        set.register(Box::new(FileContentRule::new()));
        set
    }

    /// Append a rule; it is tried after every rule already registered.
    pub fn register(&mut self, rule: Box<dyn AnswerRule>) {
        self.rules.push(rule);
    }

    /// Registered rule kinds in priority order.
    pub fn kinds(&self) -> Vec<RuleKind> {
        self.rules.iter().map(|r| r.kind()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn AnswerRule> {
        self.rules.iter().map(|r| r.as_ref())
    }
}

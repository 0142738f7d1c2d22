//! Exact-match lookup against the answer store.

use std::sync::Arc;

use async_trait::async_trait;

use buddhi_core::types::Upload;
use buddhi_store::AnswerStore;

use crate::rule::AnswerRule;
use crate::types::{RuleKind, RuleOutcome};

/// Returns a stored answer when the question text matches a record exactly.
pub struct KnownAnswerRule {
    store: Arc<AnswerStore>,
}

impl KnownAnswerRule {
    pub fn new(store: Arc<AnswerStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AnswerRule for KnownAnswerRule {
    fn kind(&self) -> RuleKind {
        RuleKind::KnownAnswer
    }

    fn matches(&self, question: &str, _upload: Option<&Upload>) -> bool {
        self.store.lookup(question).is_some()
    }

    async fn answer(&self, question: &str, _upload: Option<&Upload>) -> RuleOutcome {
        match self.store.lookup(question) {
            Some(answer) => RuleOutcome::Answered(answer),
            None => RuleOutcome::NotApplicable,
        }
    }
}

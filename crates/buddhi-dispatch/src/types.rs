//! Core types for question dispatch.

use serde::{Deserialize, Serialize};
use std::fmt;

use buddhi_core::types::FALLBACK_ANSWER;

/// Identifies which rule produced an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    KnownAnswer,
    ArchiveValue,
    CodeExecution,
    FileContent,
}

impl RuleKind {
    /// Whether answers from this rule are written back into the store.
    pub fn is_learnable(self) -> bool {
        !matches!(self, RuleKind::KnownAnswer)
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKind::KnownAnswer => write!(f, "known_answer"),
            RuleKind::ArchiveValue => write!(f, "archive_value"),
            RuleKind::CodeExecution => write!(f, "code_execution"),
            RuleKind::FileContent => write!(f, "file_content"),
        }
    }
}

/// What a single rule made of a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    /// The rule produced an answer; dispatch stops here.
    Answered(String),
    /// The rule does not apply; dispatch moves on to the next rule.
    NotApplicable,
    /// The rule applies but could not finish; dispatch stops with this message.
    Failed(String),
}

/// Final result of dispatching a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Answered { rule: RuleKind, answer: String },
    Failed { rule: RuleKind, message: String },
    Fallback,
}

impl Resolution {
    /// Text to show the caller: the answer, the failure message, or the
    /// fixed fallback.
    pub fn text(&self) -> &str {
        match self {
            Resolution::Answered { answer, .. } => answer,
            Resolution::Failed { message, .. } => message,
            Resolution::Fallback => FALLBACK_ANSWER,
        }
    }

    /// Rule that decided the outcome, if any.
    pub fn rule(&self) -> Option<RuleKind> {
        match self {
            Resolution::Answered { rule, .. } | Resolution::Failed { rule, .. } => Some(*rule),
            Resolution::Fallback => None,
        }
    }

    /// The answer to write back into the store, if this resolution should be
    /// learned.
    pub fn learnable_answer(&self) -> Option<&str> {
        match self {
            Resolution::Answered { rule, answer } if rule.is_learnable() => Some(answer),
            _ => None,
        }
    }
}

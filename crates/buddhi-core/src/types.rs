//! Shared value types.

use serde::{Deserialize, Serialize};

/// Question seeded into a fresh answer store.
pub const SEED_QUESTION: &str = "Install and run Visual Studio Code. In your Terminal (or Command Prompt), type code -s and press Enter. Copy and paste the entire output below. What is the output ofcode -s?";

/// Answer seeded into a fresh answer store.
pub const SEED_ANSWER: &str = "Version:          Code 1.96.3 (91fbdddc47bc9c09064bf7acf133d22631cbf083, 2025-01-09T18:14:09.060Z)\nOS Version:       Windows_NT x64 10.0.26120\nCPUs:             11th Gen Intel(R) Core(TM) i5-11260H @ 2.60GHz (12 x 2611)\n";

/// Answer returned when no rule can resolve a question.
pub const FALLBACK_ANSWER: &str = "I don't have the answer to this question yet. Please provide feedback with the correct answer to improve the system.";

/// A stored question-to-answer mapping entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaRecord {
    pub question: String,
    pub answer: String,
}

impl QaRecord {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// A file uploaded alongside a question, owned by a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    /// Client-supplied file name, if any.
    pub filename: Option<String>,
    /// Raw file bytes.
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(filename: Option<String>, bytes: Vec<u8>) -> Self {
        Self { filename, bytes }
    }

    /// File name safe to join onto a scratch directory.
    ///
    /// Strips any directory components the client sent and falls back to
    /// `fallback` when nothing usable remains.
    pub fn safe_filename(&self, fallback: &str) -> String {
        self.filename
            .as_deref()
            .and_then(|name| {
                name.rsplit(['/', '\\'])
                    .next()
                    .filter(|base| !base.is_empty() && *base != "." && *base != "..")
            })
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string())
    }
}

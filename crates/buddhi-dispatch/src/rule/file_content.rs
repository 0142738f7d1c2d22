//! Raw file content handler.

use async_trait::async_trait;

use buddhi_core::types::Upload;

use crate::error::DispatchError;
use crate::patterns;
use crate::rule::AnswerRule;
use crate::types::{RuleKind, RuleOutcome};

/// Answers "what is in this file" questions with the upload's text.
#[derive(Debug, Default)]
pub struct FileContentRule;

impl FileContentRule {
    pub fn new() -> Self {
        Self
    }
}

/// Decode an upload as UTF-8 and strip surrounding whitespace.
pub fn read_text(upload: &Upload) -> Result<String, DispatchError> {
    std::str::from_utf8(&upload.bytes)
        .map(|text| text.trim().to_string())
        .map_err(|e| DispatchError::Decode(e.to_string()))
}

#[async_trait]
impl AnswerRule for FileContentRule {
    fn kind(&self) -> RuleKind {
        RuleKind::FileContent
    }

    fn matches(&self, question: &str, upload: Option<&Upload>) -> bool {
        upload.is_some() && patterns::asks_for_file_content(question)
    }

    async fn answer(&self, _question: &str, upload: Option<&Upload>) -> RuleOutcome {
        let Some(upload) = upload else {
            return RuleOutcome::NotApplicable;
        };
        match read_text(upload) {
            Ok(text) => RuleOutcome::Answered(text),
            Err(e) => {
                tracing::warn!(error = %e, "Uploaded file could not be decoded");
                RuleOutcome::Failed(format!("Error reading file: {}", e))
            }
        }
    }
}

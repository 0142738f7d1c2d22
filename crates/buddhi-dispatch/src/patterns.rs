//! Regex and marker-phrase classifiers over question text.
//!
//! Every pattern is compiled once on first use and shared across requests.

use std::sync::OnceLock;

use regex::Regex;

/// Phrase that marks an embedded-code question.
pub const CODE_MARKER: &str = "What is the output of the following Python code?";

/// Phrases that ask for the raw content of the uploaded file.
pub const CONTENT_MARKERS: [&str; 2] = ["What is the content of", "What does the file contain"];

/// Column read when the question does not name one.
pub const DEFAULT_COLUMN: &str = "answer";

fn archive_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)Download and unzip file.*\.zip.*What is the value in the.*column")
            .expect("Invalid archive question regex")
    })
}

fn column_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"value in the ["']?([^"']*)["']? column"#).expect("Invalid column regex")
    })
}

fn code_block_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)```(?:(?:python3?|py)\b)?\s*(.*?)\s*```")
            .expect("Invalid code block regex")
    })
}

/// Whether the question asks for a value from a CSV inside a ZIP archive.
pub fn is_archive_question(question: &str) -> bool {
    archive_regex().is_match(question)
}

/// Column named by a `value in the "<column>" column` phrase.
///
/// Matching is case-sensitive and the quotes are optional. Falls back to
/// [`DEFAULT_COLUMN`] when the phrase is absent.
pub fn extract_column_name(question: &str) -> String {
    column_regex()
        .captures(question)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| DEFAULT_COLUMN.to_string())
}

/// Whether the question carries the embedded-code marker phrase.
pub fn has_code_marker(question: &str) -> bool {
    question.contains(CODE_MARKER)
}

/// Body of the first fenced code block, without surrounding whitespace.
pub fn extract_code_block(question: &str) -> Option<String> {
    code_block_regex()
        .captures(question)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Whether the question asks what an uploaded file contains.
pub fn asks_for_file_content(question: &str) -> bool {
    CONTENT_MARKERS.iter().any(|marker| question.contains(marker))
}

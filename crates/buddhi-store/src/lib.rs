//! Durable question-to-answer store.
//!
//! Keeps every known answer in memory and mirrors the full map to a single
//! JSON file after each change.

pub mod answer_store;

pub use answer_store::AnswerStore;

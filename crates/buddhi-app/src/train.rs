//! Bulk import of question/answer pairs into the answer store.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use buddhi_core::error::Result;
use buddhi_core::types::QaRecord;
use buddhi_store::AnswerStore;

/// Accepted training file layouts: the store's own question-to-answer object,
/// or a list of `{"question": .., "answer": ..}` records.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TrainingFile {
    Map(BTreeMap<String, String>),
    Records(Vec<QaRecord>),
}

/// Parse training data into records, keeping file order for record lists.
pub fn parse_training_data(content: &str) -> Result<Vec<QaRecord>> {
    let records = match serde_json::from_str::<TrainingFile>(content)? {
        TrainingFile::Map(map) => map
            .into_iter()
            .map(|(question, answer)| QaRecord::new(question, answer))
            .collect(),
        TrainingFile::Records(records) => records,
    };
    Ok(records)
}

/// Read `file` and merge its pairs into `store` in one write.
///
/// Returns the number of records applied.
pub async fn import_file(store: &AnswerStore, file: &Path) -> Result<usize> {
    let content = tokio::fs::read_to_string(file).await?;
    let records = parse_training_data(&content)?;
    Ok(store.upsert_many(records).await)
}

//! Answer store backed by a flat JSON file.
//!
//! The map lives behind a `RwLock` for cheap lookups. Mutations go through a
//! single async writer lock that is held across insert, snapshot and file
//! write, so concurrent upserts can never overwrite each other's keys on disk.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use buddhi_core::error::{BuddhiError, Result};
use buddhi_core::types::{QaRecord, SEED_ANSWER, SEED_QUESTION};

/// Process-wide question-to-answer map mirrored to disk.
pub struct AnswerStore {
    /// Backing file. `None` keeps the store purely in memory.
    path: Option<PathBuf>,
    entries: RwLock<BTreeMap<String, String>>,
    writer: Mutex<()>,
}

impl AnswerStore {
    /// Load the store from `path`.
    ///
    /// A missing file is seeded with the default record and written back.
    /// An unreadable or malformed file yields an empty store; the problem is
    /// logged and never surfaced to the caller.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let entries = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<BTreeMap<String, String>>(&content) {
                Ok(entries) => {
                    info!(path = %path.display(), count = entries.len(), "Answer store loaded");
                    entries
                }
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "Answer store is malformed, starting empty"
                    );
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let mut seeded = BTreeMap::new();
                seeded.insert(SEED_QUESTION.to_string(), SEED_ANSWER.to_string());
                if let Err(e) = write_snapshot_sync(&path, &seeded) {
                    error!(
                        path = %path.display(),
                        error = %e,
                        "Failed to persist seeded answer store"
                    );
                } else {
                    info!(path = %path.display(), "Answer store seeded with default record");
                }
                seeded
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Answer store unreadable, starting empty"
                );
                BTreeMap::new()
            }
        };

        Self {
            path: Some(path),
            entries: RwLock::new(entries),
            writer: Mutex::new(()),
        }
    }

    /// Create a store that never touches disk (for testing).
    pub fn in_memory() -> Self {
        Self {
            path: None,
            entries: RwLock::new(BTreeMap::new()),
            writer: Mutex::new(()),
        }
    }

    /// Exact-match lookup. No whitespace or case normalization is applied.
    pub fn lookup(&self, question: &str) -> Option<String> {
        self.read().get(question).cloned()
    }

    /// Insert or overwrite an answer, then rewrite the backing file.
    ///
    /// Persistence failures are logged and swallowed: the in-memory map keeps
    /// the new value for the rest of the process even if the disk copy lags.
    pub async fn upsert(&self, question: impl Into<String>, answer: impl Into<String>) {
        self.upsert_many([QaRecord::new(question, answer)]).await;
    }

    /// Insert or overwrite a batch of records under one writer lock and
    /// rewrite the backing file once. Returns the number of records applied.
    ///
    /// An empty batch leaves the backing file untouched.
    pub async fn upsert_many<I>(&self, records: I) -> usize
    where
        I: IntoIterator<Item = QaRecord>,
    {
        let _guard = self.writer.lock().await;

        let (applied, snapshot) = {
            let mut entries = self.write();
            let mut applied = 0;
            for record in records {
                entries.insert(record.question, record.answer);
                applied += 1;
            }
            debug!(applied, count = entries.len(), "Answer store updated");
            if applied == 0 || self.path.is_none() {
                return applied;
            }
            (applied, serde_json::to_string_pretty(&*entries))
        };

        let Some(path) = self.path.as_deref() else {
            return applied;
        };

        let result = match snapshot {
            Ok(content) => write_atomic(path, content).await,
            Err(e) => Err(e.into()),
        };

        if let Err(e) = result {
            error!(path = %path.display(), error = %e, "Failed to persist answer store");
        }
        applied
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, String>> {
        self.entries.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<String, String>> {
        self.entries.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Sibling path the snapshot is staged in before the rename.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

async fn write_atomic(path: &Path, content: String) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let staging = staging_path(path);
    tokio::fs::write(&staging, content).await?;
    tokio::fs::rename(&staging, path).await?;
    Ok(())
}

fn write_snapshot_sync(path: &Path, entries: &BTreeMap<String, String>) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(entries)
        .map_err(|e| BuddhiError::Storage(e.to_string()))?;
    let staging = staging_path(path);
    std::fs::write(&staging, content)?;
    std::fs::rename(&staging, path)?;
    Ok(())
}

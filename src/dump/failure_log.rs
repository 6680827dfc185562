/*!
 * Append-only record of per-entity failures.
 *
 * One `errors.txt` per storage root, one `{id}-{stage}-{detail}` line per
 * failure. All workers share a single `FailureLog`; its mutex serialises the
 * open-append-write sequence so lines never interleave.
 */

use std::fmt;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use crate::errors::EntityError;
use crate::file_utils::FileManager;

/// File name of the failure log inside a storage root
pub const FAILURE_LOG_FILE: &str = "errors.txt";

/// Pipeline phase at which an entity failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureStage {
    Translations,
    /// Primary-language detail fetch
    Language,
    Credits,
    Exception,
}

impl FailureStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Translations => "translations",
            Self::Language => "language",
            Self::Credits => "credits",
            Self::Exception => "exception",
        }
    }
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of the failure log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    pub entity_id: u64,
    pub stage: FailureStage,
    pub detail: String,
}

impl FailureRecord {
    pub fn from_error(entity_id: u64, error: &EntityError) -> Self {
        Self {
            entity_id,
            stage: error.stage(),
            detail: error.detail(),
        }
    }
}

impl fmt::Display for FailureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Details come from error text and may span lines; keep one record per line.
        let detail = self.detail.replace(['\r', '\n'], " ");
        write!(f, "{}-{}-{}", self.entity_id, self.stage, detail)
    }
}

/// Shared append-only failure log
#[derive(Debug)]
pub struct FailureLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FailureLog {
    /// Failure log living in `storage_root`
    pub fn new(storage_root: &Path) -> Self {
        Self {
            path: storage_root.join(FAILURE_LOG_FILE),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record as a single line
    pub async fn record(&self, record: &FailureRecord) -> std::io::Result<()> {
        let line = format!("{}\n", record);
        let _guard = self.lock.lock().await;
        FileManager::append_line(&self.path, &line).await
    }
}

/*!
 * Per-entity fetch, merge, assemble and write.
 */

use log::{debug, error};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::MediaKind;
use crate::errors::EntityError;
use crate::providers::{MediaApi, PRIMARY_LOCALE};

use super::document::{assemble, write_document, Document};
use super::failure_log::{FailureLog, FailureRecord, FailureStage};
use super::merge::{merge, primary_entry};

/// Result of processing one entity
#[derive(Debug, Clone, PartialEq)]
pub enum EntityOutcome {
    /// Document written to this path
    Saved(PathBuf),
    /// Failure recorded in the failure log
    Failed(FailureRecord),
}

impl EntityOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved(_))
    }
}

/// Runs the sub-resource sequence for single entities.
///
/// Cheap to clone; every clone shares the API client and the failure log.
#[derive(Debug, Clone)]
pub struct EntityFetcher {
    api: Arc<dyn MediaApi>,
    kind: MediaKind,
    storage_root: PathBuf,
    failure_log: Arc<FailureLog>,
    exception_delay: Duration,
}

impl EntityFetcher {
    pub fn new(
        api: Arc<dyn MediaApi>,
        kind: MediaKind,
        storage_root: impl Into<PathBuf>,
        exception_delay: Duration,
    ) -> Self {
        let storage_root = storage_root.into();
        Self {
            failure_log: Arc::new(FailureLog::new(&storage_root)),
            api,
            kind,
            storage_root,
            exception_delay,
        }
    }

    pub fn storage_root(&self) -> &Path {
        &self.storage_root
    }

    pub fn failure_log(&self) -> &FailureLog {
        &self.failure_log
    }

    /// Fetch translations, primary detail and credits, then build the document.
    ///
    /// Stops at the first failing stage.
    pub async fn fetch_entity(&self, id: u64) -> Result<Document, EntityError> {
        let translations = self
            .api
            .translations(self.kind, id)
            .await
            .map_err(|e| EntityError::at_stage(FailureStage::Translations, e))?;

        let detail = self
            .api
            .details(self.kind, id, PRIMARY_LOCALE)
            .await
            .map_err(|e| EntityError::at_stage(FailureStage::Language, e))?;

        let primary = primary_entry(&detail, self.kind.title_field())?;
        let language_info = merge(primary, &translations);

        let credits = self
            .api
            .credits(self.kind, id)
            .await
            .map_err(|e| EntityError::at_stage(FailureStage::Credits, e))?;

        assemble(self.kind, detail, &language_info, credits)
    }

    /// Fetch and persist one entity, recording any failure instead of returning it.
    ///
    /// Unexpected failures (anything but a non-200 status) pause this worker
    /// for the configured delay before returning.
    pub async fn process(&self, id: u64) -> EntityOutcome {
        let result = match self.fetch_entity(id).await {
            Ok(document) => write_document(&self.storage_root, id, &document).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(path) => {
                debug!("{} {} saved to {:?}", self.kind.display_name(), id, path);
                EntityOutcome::Saved(path)
            }
            Err(err) => {
                let record = FailureRecord::from_error(id, &err);
                debug!("{} {} failed: {}", self.kind.display_name(), id, err);

                if let Err(io_err) = self.failure_log.record(&record).await {
                    error!(
                        "Failed to append to {:?} ({}): {}",
                        self.failure_log.path(),
                        io_err,
                        record
                    );
                }

                if err.is_exception() && !self.exception_delay.is_zero() {
                    tokio::time::sleep(self.exception_delay).await;
                }

                EntityOutcome::Failed(record)
            }
        }
    }
}

/*!
 * Bulk download pipeline.
 *
 * - `batch`: ID range partitioning and batch-by-batch scheduling
 * - `fetcher`: per-entity sub-resource fetching
 * - `merge`: multilingual field resolution
 * - `document`: document assembly and persistence
 * - `failure_log`: append-only per-directory failure record
 */

pub mod batch;
pub mod document;
pub mod failure_log;
pub mod fetcher;
pub mod merge;

use log::info;

use crate::app_config::MediaKind;
use crate::errors::AppError;
use crate::providers::MediaApi;

// Re-export main types for easier usage
pub use batch::{partition, BatchProgress, BatchReport, BatchScheduler, NoProgress, RunSummary};
pub use document::{Credits, Document};
pub use failure_log::{FailureLog, FailureRecord, FailureStage};
pub use fetcher::{EntityFetcher, EntityOutcome};
pub use merge::{LanguageEntry, LanguageInfo, Translation};

/// Highest valid ID of a kind, used as the end of the range when none is given.
///
/// Unlike per-entity failures this one stops the run: without it the range
/// cannot be computed.
pub async fn resolve_latest_id(api: &dyn MediaApi, kind: MediaKind) -> Result<u64, AppError> {
    let id = api.latest_id(kind).await?;
    info!("Latest {} ID is {}", kind.display_name().to_lowercase(), id);
    Ok(id)
}

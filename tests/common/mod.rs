/*!
 * Common test utilities for the tmdbdump test suite
 */

use anyhow::Result;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use tmdbdump::app_config::{Config, MediaKind};
use tmdbdump::dump::EntityFetcher;
use tmdbdump::providers::mock::MockMediaApi;

/// Route library logs through the test harness; safe to call repeatedly
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Configuration writing into `dir` with no exception pause
pub fn test_config(dir: &Path) -> Config {
    Config {
        api_key: "test-key".to_string(),
        movies_path: dir.join("movies"),
        tv_path: dir.join("tv show"),
        batch_size: 10,
        workers: 4,
        exception_delay_secs: 0,
        ..Config::default()
    }
}

/// Fetcher over a mock upstream writing into `storage_root`
pub fn fetcher(api: &MockMediaApi, kind: MediaKind, storage_root: &Path) -> EntityFetcher {
    fs::create_dir_all(storage_root).expect("storage root");
    EntityFetcher::new(
        Arc::new(api.clone()),
        kind,
        storage_root.to_path_buf(),
        Duration::ZERO,
    )
}

/// Path of a persisted document
pub fn document_path(storage_root: &Path, id: u64) -> PathBuf {
    storage_root.join(format!("{}.json", id))
}

/// Parse a persisted document
pub fn read_document(storage_root: &Path, id: u64) -> Result<Value> {
    let text = fs::read_to_string(document_path(storage_root, id))?;
    Ok(serde_json::from_str(&text)?)
}

/// Lines of `errors.txt`, empty when the file does not exist
pub fn read_failure_lines(storage_root: &Path) -> Vec<String> {
    fs::read_to_string(storage_root.join("errors.txt"))
        .map(|content| content.lines().map(str::to_string).collect())
        .unwrap_or_default()
}

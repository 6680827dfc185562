/*!
 * Integration tests for batch scheduling against a scripted upstream
 */

use anyhow::Result;
use parking_lot::Mutex;
use std::ops::RangeInclusive;
use std::time::Duration;
use tmdbdump::app_config::MediaKind;
use tmdbdump::dump::{BatchProgress, BatchReport, BatchScheduler, EntityOutcome, NoProgress};
use tmdbdump::providers::mock::{Endpoint, MockMediaApi};
use crate::common;

/// Records every scheduling event
#[derive(Default)]
struct RecordingProgress {
    started: Mutex<Vec<(usize, usize, RangeInclusive<u64>)>>,
    finished_entities: Mutex<usize>,
    reports: Mutex<Vec<BatchReport>>,
}

impl BatchProgress for RecordingProgress {
    fn batch_started(&self, index: usize, total: usize, range: &RangeInclusive<u64>) {
        self.started.lock().push((index, total, range.clone()));
    }

    fn entity_finished(&self, _outcome: &EntityOutcome) {
        *self.finished_entities.lock() += 1;
    }

    fn batch_finished(&self, report: &BatchReport) {
        self.reports.lock().push(report.clone());
    }
}

fn upstream(ids: RangeInclusive<u64>) -> MockMediaApi {
    ids.fold(MockMediaApi::new(), |api, id| api.with_sample_movie(id))
}

/// Test that gaps in the ID space are recorded and do not stop the run
#[tokio::test]
async fn test_run_withMissingIds_shouldRecordFailuresAndContinue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let api = upstream(1..=10).with_status(Endpoint::Translations, 4, 404);
    let api = api.with_status(Endpoint::Credits, 9, 404);
    let fetcher = common::fetcher(&api, MediaKind::Movie, temp_dir.path());
    let scheduler = BatchScheduler::new(fetcher, 4, 3);

    // 11 and 12 do not exist upstream at all
    let summary = scheduler.run(1, 12, &NoProgress).await;

    assert_eq!(summary.batches, 3);
    assert_eq!(summary.saved, 8);
    assert_eq!(summary.failed, 4);

    let mut lines = common::read_failure_lines(temp_dir.path());
    lines.sort();
    assert_eq!(
        lines,
        vec!["11-translations-404", "12-translations-404", "4-translations-404", "9-credits-404"]
    );
    for id in [1, 2, 3, 5, 6, 7, 8, 10] {
        assert!(common::document_path(temp_dir.path(), id).exists(), "missing {}", id);
    }
    Ok(())
}

/// Test that progress events describe each batch
#[tokio::test]
async fn test_run_shouldReportEachBatch() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let api = upstream(1..=25);
    let fetcher = common::fetcher(&api, MediaKind::Movie, temp_dir.path());
    let scheduler = BatchScheduler::new(fetcher, 10, 4);
    let progress = RecordingProgress::default();

    scheduler.run(1, 25, &progress).await;

    let started = progress.started.lock().clone();
    assert_eq!(started, vec![(1, 3, 1..=10), (2, 3, 11..=20), (3, 3, 21..=25)]);
    assert_eq!(*progress.finished_entities.lock(), 25);

    let reports = progress.reports.lock().clone();
    let saved: Vec<usize> = reports.iter().map(|r| r.saved).collect();
    assert_eq!(saved, vec![10, 10, 5]);
    assert!(reports.iter().all(|r| r.failed == 0));
    Ok(())
}

/// Test that no entity of the next batch starts before the current batch is done
#[tokio::test]
async fn test_run_batches_shouldActAsBarriers() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let api = upstream(1..=9).with_latency(Duration::from_millis(5));
    let fetcher = common::fetcher(&api, MediaKind::Movie, temp_dir.path());
    let scheduler = BatchScheduler::new(fetcher, 3, 2);

    scheduler.run(1, 9, &NoProgress).await;

    let calls = api.calls();
    let position = |endpoint: Endpoint, id: u64| calls.iter().position(|c| *c == (endpoint, id)).unwrap();
    for (batch, next_batch) in [(1..=3u64, 4..=6u64), (4..=6, 7..=9)] {
        let last_credits = batch.map(|id| position(Endpoint::Credits, id)).max().unwrap();
        let first_next = next_batch.map(|id| position(Endpoint::Translations, id)).min().unwrap();
        assert!(last_credits < first_next);
    }
    Ok(())
}

/// Test that concurrency never exceeds the worker count
#[tokio::test]
async fn test_run_batch_shouldRespectWorkerLimit() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let api = upstream(1..=20).with_latency(Duration::from_millis(10));
    let fetcher = common::fetcher(&api, MediaKind::Movie, temp_dir.path());
    let scheduler = BatchScheduler::new(fetcher, 20, 3);

    let outcomes = scheduler.run_batch(1..=20, &NoProgress).await;

    assert_eq!(outcomes.len(), 20);
    assert!(outcomes.iter().all(EntityOutcome::is_saved));
    assert!(api.peak_in_flight() <= 3);
    assert!(api.peak_in_flight() >= 2);
    Ok(())
}

/// Test that an empty range performs no calls
#[tokio::test]
async fn test_run_withStartAfterEnd_shouldDoNothing() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let api = upstream(1..=3);
    let fetcher = common::fetcher(&api, MediaKind::Movie, temp_dir.path());
    let scheduler = BatchScheduler::new(fetcher, 10, 2);

    let summary = scheduler.run(5, 4, &NoProgress).await;

    assert_eq!(summary.batches, 0);
    assert_eq!(summary.saved + summary.failed, 0);
    assert!(api.calls().is_empty());
    Ok(())
}

/// Test that zero batch size and workers are clamped to one
#[test]
fn test_new_withZeroSizes_shouldClampToOne() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let fetcher = common::fetcher(&MockMediaApi::new(), MediaKind::Movie, temp_dir.path());
    let scheduler = BatchScheduler::new(fetcher, 0, 0);

    assert_eq!(scheduler.batch_size(), 1);
    assert_eq!(scheduler.workers(), 1);
    Ok(())
}

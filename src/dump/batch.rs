/*!
 * Batch scheduling.
 *
 * The ID range is cut into consecutive batches. Within a batch up to
 * `workers` entities are in flight at once; a batch must finish completely
 * (every entity saved or recorded as failed) before the next one starts.
 */

use futures::stream::{self, StreamExt};
use log::info;
use std::ops::RangeInclusive;
use std::time::{Duration, Instant};

use super::fetcher::{EntityFetcher, EntityOutcome};

/// Split `[start, end]` into consecutive ranges of at most `batch_size` IDs.
///
/// Returns no batches when `start > end`. A `batch_size` of 0 is treated as 1.
pub fn partition(start: u64, end: u64, batch_size: u64) -> Vec<RangeInclusive<u64>> {
    let batch_size = batch_size.max(1);
    let mut batches = Vec::new();
    if start > end {
        return batches;
    }

    let mut batch_start = start;
    loop {
        let batch_end = batch_start.saturating_add(batch_size - 1).min(end);
        batches.push(batch_start..=batch_end);
        if batch_end >= end {
            break;
        }
        batch_start = batch_end + 1;
    }
    batches
}

/// Outcome counts of one finished batch
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    /// 1-based batch number
    pub index: usize,
    /// Number of batches in the run
    pub total: usize,
    pub range: RangeInclusive<u64>,
    pub saved: usize,
    pub failed: usize,
    pub elapsed: Duration,
}

/// Totals of a whole run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub batches: usize,
    pub saved: usize,
    pub failed: usize,
    pub elapsed: Duration,
}

/// Receives scheduling events, e.g. to drive a progress display
pub trait BatchProgress {
    fn batch_started(&self, _index: usize, _total: usize, _range: &RangeInclusive<u64>) {}

    fn entity_finished(&self, _outcome: &EntityOutcome) {}

    fn batch_finished(&self, _report: &BatchReport) {}
}

/// Progress sink that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl BatchProgress for NoProgress {}

/// Batch-by-batch driver of an `EntityFetcher`
#[derive(Debug, Clone)]
pub struct BatchScheduler {
    fetcher: EntityFetcher,
    batch_size: u64,
    workers: usize,
}

impl BatchScheduler {
    pub fn new(fetcher: EntityFetcher, batch_size: u64, workers: usize) -> Self {
        Self {
            fetcher,
            batch_size: batch_size.max(1),
            workers: workers.max(1),
        }
    }

    pub fn batch_size(&self) -> u64 {
        self.batch_size
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Process every ID of one batch and wait for all of them
    pub async fn run_batch(
        &self,
        range: RangeInclusive<u64>,
        progress: &impl BatchProgress,
    ) -> Vec<EntityOutcome> {
        stream::iter(range)
            .map(|id| {
                let fetcher = self.fetcher.clone();
                async move { fetcher.process(id).await }
            })
            .buffer_unordered(self.workers)
            .inspect(|outcome| progress.entity_finished(outcome))
            .collect::<Vec<_>>()
            .await
    }

    /// Process `[start, end]` batch by batch
    pub async fn run(&self, start: u64, end: u64, progress: &impl BatchProgress) -> RunSummary {
        let run_start = Instant::now();
        let batches = partition(start, end, self.batch_size);
        let total = batches.len();
        let mut summary = RunSummary {
            batches: total,
            ..RunSummary::default()
        };

        for (index, range) in batches.into_iter().enumerate() {
            let index = index + 1;
            progress.batch_started(index, total, &range);

            let batch_start = Instant::now();
            let outcomes = self.run_batch(range.clone(), progress).await;
            let saved = outcomes.iter().filter(|o| o.is_saved()).count();

            let report = BatchReport {
                index,
                total,
                range,
                saved,
                failed: outcomes.len() - saved,
                elapsed: batch_start.elapsed(),
            };
            info!(
                "Range {}/{} ({}-{}): {} saved, {} failed in {:.2}s",
                report.index,
                report.total,
                report.range.start(),
                report.range.end(),
                report.saved,
                report.failed,
                report.elapsed.as_secs_f64()
            );
            progress.batch_finished(&report);

            summary.saved += report.saved;
            summary.failed += report.failed;
        }

        summary.elapsed = run_start.elapsed();
        summary
    }
}

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use parking_lot::Mutex;
use std::ops::RangeInclusive;
use std::sync::Arc;

use crate::app_config::{Config, MediaKind};
use crate::dump::{
    resolve_latest_id, BatchProgress, BatchReport, BatchScheduler, EntityFetcher, EntityOutcome, RunSummary,
};
use crate::file_utils::FileManager;
use crate::providers::tmdb::Tmdb;
use crate::providers::MediaApi;

// @module: Application controller for bulk downloads

/// Main application controller for a download run
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Upstream API shared by all workers
    api: Arc<dyn MediaApi>,
    // @field: Whether to draw per-batch progress bars
    show_progress: bool,
}

impl Controller {
    // @method: Create a controller talking to the live API
    pub fn with_config(config: Config) -> Result<Self> {
        let api = Tmdb::from_config(&config).context("Failed to create API client")?;
        Ok(Self::with_api(config, Arc::new(api)))
    }

    // @method: Create a controller with a caller-supplied API (tests, other backends)
    pub fn with_api(config: Config, api: Arc<dyn MediaApi>) -> Self {
        Self {
            config,
            api,
            show_progress: true,
        }
    }

    /// Enable or disable progress bars
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Download every entity of `kind` in `[start_id, end_id]`.
    ///
    /// Without an end ID the latest ID is asked for first; failing to get it
    /// aborts the run. Per-entity failures never do.
    pub async fn run(&self, kind: MediaKind, start_id: u64, end_id: Option<u64>) -> Result<RunSummary> {
        let end_id = match end_id {
            Some(end_id) => end_id,
            None => resolve_latest_id(self.api.as_ref(), kind)
                .await
                .context("Failed to resolve the latest ID")?,
        };

        let storage_root = self.config.output_path(kind).to_path_buf();
        FileManager::ensure_dir(&storage_root)?;

        println!("{}", self.render_config_table(kind, start_id, end_id));

        if start_id > end_id {
            warn!("Start ID {} is after end ID {}, nothing to download", start_id, end_id);
        }
        info!(
            "Downloading {} info for IDs {}-{}...",
            kind.display_name().to_lowercase(),
            start_id,
            end_id
        );

        let fetcher = EntityFetcher::new(
            Arc::clone(&self.api),
            kind,
            storage_root.clone(),
            self.config.exception_delay(),
        );
        let scheduler = BatchScheduler::new(fetcher, self.config.batch_size, self.config.workers);
        let progress = ConsoleProgress::new(self.show_progress);

        let summary = scheduler.run(start_id, end_id, &progress).await;

        info!(
            "{} documents saved, {} failures recorded in {:?} ({:.2}s)",
            summary.saved,
            summary.failed,
            storage_root.join(crate::dump::failure_log::FAILURE_LOG_FILE),
            summary.elapsed.as_secs_f64()
        );
        match FileManager::find_documents(&storage_root) {
            Ok(documents) => info!("{} documents now in {:?}", documents.len(), storage_root),
            Err(e) => warn!("Could not list {:?}: {}", storage_root, e),
        }
        info!("All ranges downloaded successfully.");

        Ok(summary)
    }

    /// Run parameters as a two-column table
    pub fn render_config_table(&self, kind: MediaKind, start_id: u64, end_id: u64) -> String {
        let rows = [
            ("Path", self.config.output_path(kind).display().to_string()),
            ("Kind", kind.display_name().to_string()),
            ("Start ID", start_id.to_string()),
            ("End ID", end_id.to_string()),
            ("Batch Size", self.config.batch_size.to_string()),
            ("Workers", self.config.workers.to_string()),
        ];

        let key_width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0).max("Argument".len());
        let value_width = rows.iter().map(|(_, v)| v.chars().count()).max().unwrap_or(0).max("Value".len());
        let rule = format!("+-{}-+-{}-+", "-".repeat(key_width), "-".repeat(value_width));

        let mut table = String::new();
        table.push_str("Program Arguments\n");
        table.push_str(&rule);
        table.push('\n');
        table.push_str(&format!("| {:>kw$} | {:<vw$} |\n", "Argument", "Value", kw = key_width, vw = value_width));
        table.push_str(&rule);
        table.push('\n');
        for (key, value) in &rows {
            table.push_str(&format!("| {:>kw$} | {:<vw$} |\n", key, value, kw = key_width, vw = value_width));
        }
        table.push_str(&rule);
        table
    }
}

/// Per-batch progress bar on the operator console
struct ConsoleProgress {
    enabled: bool,
    bar: Mutex<Option<ProgressBar>>,
}

impl ConsoleProgress {
    fn new(enabled: bool) -> Self {
        Self {
            enabled,
            bar: Mutex::new(None),
        }
    }
}

impl BatchProgress for ConsoleProgress {
    fn batch_started(&self, index: usize, total: usize, range: &RangeInclusive<u64>) {
        info!("Downloading range {}/{}...", index, total);

        let len = range.end() - range.start() + 1;
        let bar = if self.enabled {
            ProgressBar::new(len)
        } else {
            ProgressBar::hidden()
        };
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style.progress_chars("█▓▒░"));
        bar.set_message(format!("range {}/{}", index, total));

        *self.bar.lock() = Some(bar);
    }

    fn entity_finished(&self, _outcome: &EntityOutcome) {
        if let Some(bar) = self.bar.lock().as_ref() {
            bar.inc(1);
        }
    }

    fn batch_finished(&self, report: &BatchReport) {
        if let Some(bar) = self.bar.lock().take() {
            bar.finish_and_clear();
        }
        info!(
            "Range {}/{} downloaded in {:.2}s.",
            report.index,
            report.total,
            report.elapsed.as_secs_f64()
        );
    }
}

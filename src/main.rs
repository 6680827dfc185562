// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use tmdbdump::app_config::{self, Config, MediaKind};
use tmdbdump::app_controller::Controller;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Download movie metadata
    #[command(alias = "movie")]
    Movies(DumpArgs),

    /// Download TV show metadata
    #[command(alias = "tv-shows")]
    Tv(DumpArgs),

    /// Generate shell completions for tmdbdump
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct DumpArgs {
    /// API key for the media database
    #[arg(long, env = "TMDB_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Directory to save the JSON files in
    #[arg(long)]
    path: Option<PathBuf>,

    /// First ID to download
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    start_id: u64,

    /// Last ID to download (defaults to the latest ID upstream)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    end_id: Option<u64>,

    /// Number of IDs per batch
    #[arg(long)]
    batch_size: Option<u64>,

    /// Number of entities downloaded concurrently
    #[arg(long, alias = "num-processes")]
    workers: Option<usize>,

    /// Configuration file path
    #[arg(short, long, default_value = "tmdbdump.json")]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// tmdbdump - bulk metadata dumps from TMDB
///
/// Downloads one JSON document per movie or TV show across an ID range,
/// merging every available translation into the document.
#[derive(Parser, Debug)]
#[command(name = "tmdbdump")]
#[command(version)]
#[command(about = "Bulk download of TMDB movie and TV show metadata")]
#[command(long_about = "tmdbdump downloads translations, details and credits for a range of TMDB IDs
and stores one merged JSON document per entity.

EXAMPLES:
    tmdbdump movies --api-key KEY                      # All movies up to the latest ID
    tmdbdump movies --start-id 1 --end-id 5000         # A fixed range
    tmdbdump tv --path shows --batch-size 500          # TV shows into ./shows
    tmdbdump completions bash > tmdbdump.bash          # Generate bash completions

CONFIGURATION:
    Settings are read from tmdbdump.json by default. If the file doesn't exist,
    a default one is created. Command line flags override file values.
    Failures are appended to errors.txt in the output directory.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "tmdbdump", &mut std::io::stdout());
            Ok(())
        }
        Commands::Movies(args) => run_dump(MediaKind::Movie, args).await,
        Commands::Tv(args) => run_dump(MediaKind::TvShow, args).await,
    }
}

async fn run_dump(kind: MediaKind, options: DumpArgs) -> Result<()> {
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = Config::load_or_create(&options.config_path)?;

    // Override config with CLI options if provided
    if let Some(api_key) = options.api_key {
        config.api_key = api_key;
    }
    if let Some(path) = options.path {
        config.set_output_path(kind, path);
    }
    if let Some(batch_size) = options.batch_size {
        config.batch_size = batch_size;
    }
    if let Some(workers) = options.workers {
        config.workers = workers;
    }
    if let Some(log_level) = options.log_level {
        config.log_level = log_level.into();
    }

    config.validate().context("Configuration validation failed")?;
    log::set_max_level(config.log_level.to_level_filter());

    let controller = Controller::with_config(config)?;
    controller.run(kind, options.start_id, options.end_id).await?;

    Ok(())
}

use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// API key sent as the `api_key` query parameter
    #[serde(default)]
    pub api_key: String,

    /// Base URL of the media database API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Output directory for movie documents
    #[serde(default = "default_movies_path")]
    pub movies_path: PathBuf,

    /// Output directory for TV show documents
    #[serde(default = "default_tv_path")]
    pub tv_path: PathBuf,

    /// Number of entity IDs per batch
    #[serde(default = "default_batch_size")]
    pub batch_size: u64,

    /// Number of entities fetched concurrently within a batch
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Pause applied by a worker after an unexpected failure
    #[serde(default = "default_exception_delay_secs")]
    pub exception_delay_secs: u64,

    /// Per-request timeout; the HTTP client's defaults apply when absent
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Kind of entity being dumped
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Movie,
    #[serde(rename = "tv")]
    TvShow,
}

impl MediaKind {
    // @returns: Path segment used by the API
    pub fn path_segment(&self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::TvShow => "tv",
        }
    }

    // @returns: Name of the title field in detail and translation payloads
    pub fn title_field(&self) -> &'static str {
        match self {
            Self::Movie => "title",
            Self::TvShow => "name",
        }
    }

    // @returns: Key holding the detail object in a persisted document
    pub fn info_key(&self) -> &'static str {
        match self {
            Self::Movie => "movie_info",
            Self::TvShow => "tv_info",
        }
    }

    // @returns: Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Movie => "Movie",
            Self::TvShow => "TV show",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path_segment())
    }
}

impl std::str::FromStr for MediaKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "movie" | "movies" => Ok(Self::Movie),
            "tv" | "tv_show" | "tvshow" => Ok(Self::TvShow),
            _ => Err(anyhow!("Invalid media kind: {}", s)),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_api_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_movies_path() -> PathBuf {
    PathBuf::from("movies")
}

fn default_tv_path() -> PathBuf {
    PathBuf::from("tv show")
}

fn default_batch_size() -> u64 {
    1000
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn default_exception_delay_secs() -> u64 {
    4
}

impl Config {
    /// Load the configuration file, or write the defaults when it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(anyhow!("An API key is required (--api-key, TMDB_API_KEY or config file)"));
        }
        if self.batch_size == 0 {
            return Err(anyhow!("Batch size must be at least 1"));
        }
        if self.workers == 0 {
            return Err(anyhow!("Worker count must be at least 1"));
        }
        url::Url::parse(&self.api_base_url)
            .with_context(|| format!("Invalid API base URL: {}", self.api_base_url))?;
        Ok(())
    }

    /// Output directory for the given kind
    pub fn output_path(&self, kind: MediaKind) -> &Path {
        match kind {
            MediaKind::Movie => &self.movies_path,
            MediaKind::TvShow => &self.tv_path,
        }
    }

    /// Set the output directory for the given kind
    pub fn set_output_path(&mut self, kind: MediaKind, path: PathBuf) {
        match kind {
            MediaKind::Movie => self.movies_path = path,
            MediaKind::TvShow => self.tv_path = path,
        }
    }

    pub fn exception_delay(&self) -> Duration {
        Duration::from_secs(self.exception_delay_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            api_key: String::new(),
            api_base_url: default_api_base_url(),
            movies_path: default_movies_path(),
            tv_path: default_tv_path(),
            batch_size: default_batch_size(),
            workers: default_workers(),
            exception_delay_secs: default_exception_delay_secs(),
            request_timeout_secs: None,
            log_level: LogLevel::default(),
        }
    }
}

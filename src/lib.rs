/*!
 * # tmdbdump - bulk metadata dumps from TMDB
 *
 * A Rust library for downloading per-entity metadata (movies and TV shows)
 * across a contiguous ID range and storing one JSON document per entity.
 *
 * ## Features
 *
 * - Automatic end of range from the "latest" endpoint
 * - Translations, primary-language detail and credits per entity
 * - Multilingual merge with title fallback to the primary locale
 * - Batched, bounded-concurrency downloads with per-batch timing
 * - Per-entity failures recorded in `errors.txt` without stopping the run
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `dump`: The download pipeline:
 *   - `dump::batch`: Range partitioning and batch scheduling
 *   - `dump::fetcher`: Per-entity sub-resource fetching
 *   - `dump::merge`: Multilingual field resolution
 *   - `dump::document`: Document assembly and persistence
 *   - `dump::failure_log`: Failure recording
 * - `providers`: Clients for the upstream API:
 *   - `providers::tmdb`: TMDB HTTP client
 *   - `providers::mock`: Scripted client for tests
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod dump;
pub mod errors;
pub mod file_utils;
pub mod providers;

// Re-export main types for easier usage
pub use app_config::{Config, MediaKind};
pub use app_controller::Controller;
pub use dump::{BatchScheduler, Document, EntityFetcher, EntityOutcome, FailureStage, LanguageInfo};
pub use errors::{AppError, EntityError, ProviderError};
pub use providers::MediaApi;

/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use std::path::Path;
use tmdbdump::app_config::{Config, LogLevel, MediaKind};
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.api_base_url, "https://api.themoviedb.org/3");
    assert_eq!(config.movies_path, Path::new("movies"));
    assert_eq!(config.tv_path, Path::new("tv show"));
    assert_eq!(config.batch_size, 1000);
    assert!(config.workers >= 1);
    assert_eq!(config.exception_delay_secs, 4);
    assert!(config.request_timeout_secs.is_none());
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();

    // No API key
    assert!(config.validate().is_err());
    config.api_key = "key".to_string();
    assert!(config.validate().is_ok());

    config.batch_size = 0;
    assert!(config.validate().is_err());
    config.batch_size = 1;

    config.workers = 0;
    assert!(config.validate().is_err());
    config.workers = 2;

    config.api_base_url = "not a url".to_string();
    assert!(config.validate().is_err());
}

/// Test that a missing config file is created with defaults
#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("tmdbdump.json");

    let config = Config::load_or_create(&path)?;
    assert!(path.exists());
    assert_eq!(config.batch_size, 1000);

    let reloaded = Config::load_or_create(&path)?;
    assert_eq!(reloaded.api_base_url, config.api_base_url);
    Ok(())
}

/// Test that partial config files are completed with defaults
#[test]
fn test_load_or_create_withPartialFile_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");
    std::fs::write(&path, r#"{"api_key": "abc", "batch_size": 250, "log_level": "debug"}"#)?;

    let config = Config::load_or_create(&path)?;
    assert_eq!(config.api_key, "abc");
    assert_eq!(config.batch_size, 250);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.exception_delay_secs, 4);
    Ok(())
}

/// Test that an unparseable config file is an error
#[test]
fn test_load_or_create_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");
    std::fs::write(&path, "{ nope")?;

    assert!(Config::load_or_create(&path).is_err());
    Ok(())
}

/// Test per-kind output paths
#[test]
fn test_output_path_perKind_shouldBeIndependent() {
    let mut config = Config::default();
    config.set_output_path(MediaKind::TvShow, "shows".into());

    assert_eq!(config.output_path(MediaKind::TvShow), Path::new("shows"));
    assert_eq!(config.output_path(MediaKind::Movie), Path::new("movies"));
}

/// Test media kind naming
#[test]
fn test_media_kind_names_shouldMatchApi() {
    assert_eq!(MediaKind::Movie.path_segment(), "movie");
    assert_eq!(MediaKind::TvShow.path_segment(), "tv");
    assert_eq!(MediaKind::Movie.title_field(), "title");
    assert_eq!(MediaKind::TvShow.title_field(), "name");
    assert_eq!(MediaKind::TvShow.info_key(), "tv_info");
    assert_eq!("tv".parse::<MediaKind>().unwrap(), MediaKind::TvShow);
    assert!("book".parse::<MediaKind>().is_err());
}

/*!
 * Tests for application configuration
 */

use anyhow::Result;
use log::LevelFilter;
use trimsubs::app_config::{Config, LogLevel};
use trimsubs::trims::ScanDirection;
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_shouldHaveExpectedValues() {
    let config = Config::default();

    assert_eq!(
        config.timecode_suffixes,
        vec![".tc.txt", ".timecode.txt", ".timecodes.txt", "timecode", "timecodes", ".txt"]
    );
    assert_eq!(config.default_fps, "24000/1001");
    assert_eq!(config.scan_direction, ScanDirection::TopToBottom);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!((config.default_frame_rate().unwrap().fps() - 23.976).abs() < 1e-3);
}

#[test]
fn test_loadOrDefault_withoutPath_shouldReturnDefaults() -> Result<()> {
    let config = Config::load_or_default(None::<&str>)?;
    assert_eq!(config, Config::default());
    Ok(())
}

#[test]
fn test_loadOrDefault_withMissingFile_shouldReturnDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = Config::load_or_default(Some(temp_dir.path().join("conf.json")))?;
    assert_eq!(config, Config::default());
    Ok(())
}

#[test]
fn test_loadOrDefault_withFile_shouldOverrideGivenFields() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{ "default_fps": "25", "scan_direction": "bottom_to_top", "log_level": "debug" }"#,
    )?;

    let config = Config::load_or_default(Some(&path))?;

    assert_eq!(config.default_fps, "25");
    assert_eq!(config.scan_direction, ScanDirection::BottomToTop);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.timecode_suffixes.len(), 6);
    Ok(())
}

#[test]
fn test_loadOrDefault_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;

    let error = Config::load_or_default(Some(&path)).unwrap_err();

    assert!(error.to_string().contains("Failed to parse config file"));
    Ok(())
}

#[test]
fn test_validate_withEmptySuffixList_shouldFail() {
    let config = Config {
        timecode_suffixes: Vec::new(),
        ..Config::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_serialize_thenDeserialize_shouldMatch() -> Result<()> {
    let config = Config {
        default_fps: "30000/1001".to_string(),
        scan_direction: ScanDirection::BottomToTop,
        ..Config::default()
    };

    let json = serde_json::to_string_pretty(&config)?;
    let parsed: Config = serde_json::from_str(&json)?;

    assert!(json.contains("\"bottom_to_top\""));
    assert_eq!(parsed, config);
    Ok(())
}

#[test]
fn test_logLevel_toLevelFilter_shouldMapEveryLevel() {
    assert_eq!(LogLevel::Error.to_level_filter(), LevelFilter::Error);
    assert_eq!(LogLevel::Warn.to_level_filter(), LevelFilter::Warn);
    assert_eq!(LogLevel::Info.to_level_filter(), LevelFilter::Info);
    assert_eq!(LogLevel::Debug.to_level_filter(), LevelFilter::Debug);
    assert_eq!(LogLevel::Trace.to_level_filter(), LevelFilter::Trace);
}

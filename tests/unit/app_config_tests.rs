/*!
 * Tests for configuration loading and validation
 */

use std::fs;

use srtinterp::app_config::{Config, ConfigMode, LogLevel};
use srtinterp::language_utils::TargetLanguage;
use srtinterp::scheduler::PlaybackMode;

use crate::common::{create_temp_dir, create_test_file};

#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() {
    let temp_dir = create_temp_dir().unwrap();
    let path = temp_dir.path().join("conf.json");

    let config = Config::load_or_create(&path).unwrap();

    assert_eq!(config, Config::default());
    let written: Config = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written, config);
}

#[test]
fn test_loadOrCreate_withExistingFile_shouldReadValues() {
    let temp_dir = create_temp_dir().unwrap();
    let path = create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{
            "mode": "accelerated",
            "speed_factor": 2.5,
            "target_language": "japanese",
            "enable_formatting": false,
            "translation": { "batch_size": 10, "use_cache": false },
            "log_level": "debug"
        }"#,
    )
    .unwrap();

    let config = Config::load_or_create(&path).unwrap();

    assert_eq!(PlaybackMode::from(config.mode), PlaybackMode::Accelerated);
    assert_eq!(config.speed_factor, 2.5);
    assert_eq!(config.target_language, TargetLanguage::Japanese);
    assert!(!config.enable_formatting);
    assert_eq!(config.translation.batch_size, 10);
    assert_eq!(config.translation.concurrent_requests, 4);
    assert!(!config.translation.use_cache);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.log_level.to_level_filter(), log::LevelFilter::Debug);
}

#[test]
fn test_loadOrCreate_withInvalidJson_shouldFailWithPath() {
    let temp_dir = create_temp_dir().unwrap();
    let path = create_test_file(temp_dir.path(), "conf.json", "{ mode: ").unwrap();

    let err = Config::load_or_create(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to parse config file"));
}

#[test]
fn test_validate_withNonFiniteSpeed_shouldFail() {
    let config = Config {
        speed_factor: f64::NAN,
        ..Config::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_configMode_roundTrip_shouldMatchPlaybackMode() {
    for mode in [PlaybackMode::Sequential, PlaybackMode::RealTime, PlaybackMode::Accelerated] {
        assert_eq!(PlaybackMode::from(ConfigMode::from(mode)), mode);
    }
}

#[test]
fn test_resolvedCacheDir_withExplicitDir_shouldUseIt() {
    let mut config = Config::default();
    config.translation.cache_dir = Some("/tmp/srt-cache".into());
    assert_eq!(config.translation.resolved_cache_dir(), std::path::PathBuf::from("/tmp/srt-cache"));

    config.translation.cache_dir = None;
    assert!(config.translation.resolved_cache_dir().ends_with("srtinterp/translations"));
}

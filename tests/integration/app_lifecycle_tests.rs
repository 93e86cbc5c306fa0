/*!
 * Tests for full controller runs
 */

use std::fs;
use std::sync::Arc;

use srtinterp::app_config::{Config, ConfigMode};
use srtinterp::app_controller::{Controller, RunOptions};
use srtinterp::errors::{ExecutionError, LexError, ParseError};
use srtinterp::export::ExportFormat;
use srtinterp::language_utils::TargetLanguage;
use srtinterp::translation::MockProvider;

use crate::common::{create_temp_dir, create_test_file, create_test_subtitle, init_logging, parse_srt, SAMPLE_SRT};

fn dry_run_options() -> RunOptions {
    RunOptions {
        dry_run: true,
        ..RunOptions::default()
    }
}

#[tokio::test]
async fn test_run_withSampleFile_shouldPlayAndReturnEntries() {
    init_logging();
    let temp_dir = create_temp_dir().unwrap();
    let input = create_test_subtitle(temp_dir.path(), "sample.srt").unwrap();
    let config = Config {
        mode: ConfigMode::RealTime,
        ..Config::default()
    };
    let controller = Controller::with_config(config).unwrap();

    let report = controller.run(&input, &dry_run_options()).await.unwrap();

    assert_eq!(report.entries.len(), 3);
    assert!(report.stats.is_none());
}

#[tokio::test]
async fn test_run_withTranslationAndExport_shouldWriteTranslatedFile() {
    let temp_dir = create_temp_dir().unwrap();
    let input = create_test_subtitle(temp_dir.path(), "sample.srt").unwrap();
    let export_path = temp_dir.path().join("korean.srt");

    let mut config = Config {
        target_language: TargetLanguage::Korean,
        ..Config::default()
    };
    config.translation.cache_dir = Some(temp_dir.path().join("cache"));
    let provider = Arc::new(MockProvider::working());
    let controller = Controller::with_config(config).unwrap().with_provider(provider.clone());

    let options = RunOptions {
        export: Some((ExportFormat::Plain, export_path.clone())),
        show_stats: true,
        skip_playback: true,
        ..RunOptions::default()
    };
    let report = controller.run(&input, &options).await.unwrap();

    assert_eq!(report.entries[0].text(), "[ko] This is a <i>test</i> subtitle.");
    assert_eq!(report.stats.unwrap().total_entries, 3);
    let exported = fs::read_to_string(&export_path).unwrap();
    assert!(exported.starts_with("[ko] This is a <i>test</i> subtitle.\n[ko] It contains"));
    assert_eq!(fs::read_dir(temp_dir.path().join("cache")).unwrap().count(), 1);

    // Same file again comes from the cache.
    controller.run(&input, &options).await.unwrap();
    assert_eq!(provider.request_count(), 4);
}

#[tokio::test]
async fn test_run_withTranslationDisabled_shouldKeepEnglish() {
    let temp_dir = create_temp_dir().unwrap();
    let input = create_test_subtitle(temp_dir.path(), "sample.srt").unwrap();
    let mut config = Config {
        target_language: TargetLanguage::Japanese,
        ..Config::default()
    };
    config.translation.enabled = false;
    let provider = Arc::new(MockProvider::working());
    let controller = Controller::with_config(config).unwrap().with_provider(provider.clone());

    let options = RunOptions {
        skip_playback: true,
        ..RunOptions::default()
    };
    let report = controller.run(&input, &options).await.unwrap();

    assert_eq!(report.entries[2].text(), "<font color=\"#FF0000\">For testing purposes.</font>");
    assert_eq!(provider.request_count(), 0);
}

#[tokio::test]
async fn test_run_withMalformedTimestamp_shouldSurfaceLexError() {
    let temp_dir = create_temp_dir().unwrap();
    let input = create_test_file(temp_dir.path(), "bad.srt", "1\n00:00:01 --> 00:00:02,000\nText\n").unwrap();
    let controller = Controller::with_config(Config::default()).unwrap();

    let err = controller.run(&input, &dry_run_options()).await.unwrap_err();

    let lex_error = err.downcast_ref::<LexError>().expect("lex error");
    assert_eq!(lex_error.line, 2);
}

#[tokio::test]
async fn test_run_withIndexGap_shouldSurfaceParseError() {
    let temp_dir = create_temp_dir().unwrap();
    let input = create_test_file(
        temp_dir.path(),
        "gap.srt",
        "1\n00:00:01,000 --> 00:00:02,000\nA\n\n3\n00:00:03,000 --> 00:00:04,000\nB\n",
    )
    .unwrap();
    let controller = Controller::with_config(Config::default()).unwrap();

    let err = controller.run(&input, &dry_run_options()).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ParseError>(),
        Some(ParseError::IndexMismatch { expected: 2, .. })
    ));
}

#[tokio::test]
async fn test_run_withMissingFile_shouldReportPath() {
    let temp_dir = create_temp_dir().unwrap();
    let controller = Controller::with_config(Config::default()).unwrap();

    let err = controller
        .run(&temp_dir.path().join("missing.srt"), &dry_run_options())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("missing.srt"));
}

#[test]
fn test_withConfig_withInvalidSpeed_shouldFail() {
    let config = Config {
        speed_factor: -2.0,
        ..Config::default()
    };
    assert!(Controller::with_config(config).is_err());
}

#[tokio::test]
async fn test_run_dryRun_withInterruptBeforeRun_shouldReturnInterrupted() {
    let temp_dir = create_temp_dir().unwrap();
    let input = create_test_subtitle(temp_dir.path(), "sample.srt").unwrap();
    let controller = Controller::with_config(Config::default()).unwrap();

    controller.interrupt_handle().interrupt();
    let err = controller.run(&input, &dry_run_options()).await.unwrap_err();

    assert_eq!(err.downcast_ref::<ExecutionError>(), Some(&ExecutionError::Interrupted));
}

#[tokio::test]
async fn test_play_dryRun_withInterruptedHandle_shouldStopSimulatedClock() {
    let controller = Controller::with_config(Config::default()).unwrap();
    controller.interrupt_handle().interrupt();

    let err = controller.play(&parse_srt(SAMPLE_SRT), true).await.unwrap_err();

    assert_eq!(err.downcast_ref::<ExecutionError>(), Some(&ExecutionError::Interrupted));
}

#[tokio::test]
async fn test_run_withTinySpeedFactor_shouldFailWithoutPanicking() {
    let temp_dir = create_temp_dir().unwrap();
    let input = create_test_subtitle(temp_dir.path(), "sample.srt").unwrap();
    let config = Config {
        mode: ConfigMode::Accelerated,
        speed_factor: 1e-20,
        ..Config::default()
    };
    let controller = Controller::with_config(config).unwrap();

    let err = controller.run(&input, &dry_run_options()).await.unwrap_err();

    assert_eq!(err.downcast_ref::<ExecutionError>(), Some(&ExecutionError::WaitOverflow(1e-20)));
}

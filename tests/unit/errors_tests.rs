/*!
 * Tests for error types and their messages
 */

use srtinterp::errors::{AppError, EntryError, ExecutionError, LexError, LexErrorKind, ParseError, TimeStampError};
use srtinterp::lexer::TokenKind;
use srtinterp::subtitle::TimeStamp;

#[test]
fn test_lexError_display_shouldLeadWithLine() {
    let err = LexError {
        line: 7,
        kind: LexErrorKind::Arrow("->".to_string()),
    };
    assert_eq!(err.to_string(), "Line 7: Expected '-->', got '->'");
}

#[test]
fn test_parseError_display_shouldNameTokensAndSubtitle() {
    let err = ParseError::UnexpectedToken {
        subtitle: 4,
        expected: TokenKind::BlankLine,
        found: "EOF".to_string(),
        line: 19,
    };
    assert_eq!(err.to_string(), "Line 19 (subtitle 4): expected BLANK_LINE, found EOF");

    let err = ParseError::InvalidTiming {
        index: 2,
        start: TimeStamp::new(0, 0, 5, 0).unwrap(),
        end: TimeStamp::new(0, 0, 3, 0).unwrap(),
        line: 6,
    };
    assert!(err.to_string().contains("00:00:05,000"));
}

#[test]
fn test_timeStampError_display_shouldDescribeRange() {
    let err = TimeStampError::OutOfRange {
        field: "Seconds",
        max: 59,
        value: 75,
    };
    assert_eq!(err.to_string(), "Seconds must be between 0 and 59, got 75");
}

#[test]
fn test_appError_from_shouldWrapStageErrors() {
    let app_error: AppError = ExecutionError::NoEntries.into();
    assert!(matches!(app_error, AppError::Execution(ExecutionError::NoEntries)));

    let app_error: AppError = ParseError::NoSubtitles.into();
    assert_eq!(app_error.to_string(), "Parser error: No subtitles found in input");

    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.srt");
    assert!(matches!(AppError::from(io_error), AppError::File(_)));

    let app_error = AppError::from(anyhow::anyhow!("boom"));
    assert!(matches!(app_error, AppError::Unknown(message) if message == "boom"));
}

#[test]
fn test_parseError_invalidEntry_shouldExposeSource() {
    use std::error::Error;

    let err = ParseError::InvalidEntry {
        index: 3,
        source: EntryError::EmptyText(3),
    };
    assert!(err.source().is_some());
}

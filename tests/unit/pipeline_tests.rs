/*!
 * Tests for lexing and parsing complete subtitle files
 */

use srtinterp::errors::{LexErrorKind, ParseError, TimeStampError};
use srtinterp::lexer::{tokenize, TokenKind};
use srtinterp::parser::parse;
use srtinterp::subtitle::TimeStamp;

use crate::common::{generate_srt, parse_srt, SAMPLE_SRT, TWO_ENTRIES};

#[test]
fn test_pipeline_withWellFormedFile_shouldYieldSequentialIndices() {
    let entries = parse_srt(&generate_srt(25));
    assert_eq!(entries.len(), 25);
    for (position, entry) in entries.iter().enumerate() {
        assert_eq!(entry.index(), position + 1);
        assert!(entry.start() < entry.end());
    }
}

#[test]
fn test_pipeline_withSample_shouldKeepMarkupAndLines() {
    let entries = parse_srt(SAMPLE_SRT);
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].text(), "This is a <i>test</i> subtitle.");
    assert_eq!(entries[1].lines(), ["It contains", "multiple lines."]);
    assert_eq!(entries[2].start(), TimeStamp::new(0, 0, 10, 0).unwrap());
}

#[test]
fn test_pipeline_withCrlfAndLeadingBlankLines_shouldMatchLf() {
    let crlf = format!("\r\n\r\n{}", TWO_ENTRIES.replace('\n', "\r\n"));
    assert_eq!(parse_srt(&crlf), parse_srt(TWO_ENTRIES));
}

#[test]
fn test_pipeline_withIndexGap_shouldReferenceExpectedIndex() {
    let source = "1\n00:00:01,000 --> 00:00:02,000\nA\n\n3\n00:00:03,000 --> 00:00:04,000\nB\n";
    let err = parse(&tokenize(source).unwrap()).unwrap_err();
    assert_eq!(
        err,
        ParseError::IndexMismatch {
            expected: 2,
            found: "3".to_string(),
            line: 5
        }
    );
    assert!(err.to_string().contains("expected subtitle 2"));
}

#[test]
fn test_pipeline_withFirstIndexNotOne_shouldFail() {
    let source = "0\n00:00:01,000 --> 00:00:02,000\nA\n";
    assert!(matches!(
        parse(&tokenize(source).unwrap()),
        Err(ParseError::IndexMismatch { expected: 1, .. })
    ));
}

#[test]
fn test_pipeline_withEndBeforeStart_shouldFail() {
    let source = "1\n00:00:05,000 --> 00:00:03,000\nBackwards\n";
    let err = parse(&tokenize(source).unwrap()).unwrap_err();
    assert!(matches!(err, ParseError::InvalidTiming { index: 1, line: 2, .. }));
}

#[test]
fn test_pipeline_withEqualStartAndEnd_shouldFail() {
    let source = "1\n00:00:05,000 --> 00:00:05,000\nZero\n";
    assert!(matches!(
        parse(&tokenize(source).unwrap()),
        Err(ParseError::InvalidTiming { .. })
    ));
}

#[test]
fn test_pipeline_withMalformedStartTime_shouldCiteStartField() {
    let err = tokenize("1\n00:00:0,000 --> 00:00:05,000\nText\n").unwrap_err();
    assert_eq!(err.line, 2);
    assert_eq!(err.kind, LexErrorKind::StartTime("00:00:0,000".to_string()));
    assert!(err.to_string().starts_with("Line 2:"));
}

#[test]
fn test_pipeline_withBadArrowOrEnd_shouldCiteField() {
    let err = tokenize("00:00:01,000 ---> 00:00:05,000 -->").unwrap_err();
    assert_eq!(err.kind, LexErrorKind::FieldCount(4));

    let err = tokenize("00:00:01,000 ==> 00:00:05,000 -->x").unwrap_err();
    assert_eq!(err.kind, LexErrorKind::FieldCount(4));

    let err = tokenize("00:00:01,000 --> 00:00:05.000").unwrap_err();
    assert_eq!(err.kind, LexErrorKind::EndTime("00:00:05.000".to_string()));

    let err = tokenize("\n\n00:00:01,000 -->> 00:00:05,000").unwrap_err();
    assert_eq!(err.line, 3);
    assert_eq!(err.kind, LexErrorKind::Arrow("-->>".to_string()));
}

#[test]
fn test_pipeline_withOutOfRangeMinutes_shouldReportTimestamp() {
    let source = "1\n00:60:00,000 --> 01:00:00,000\nText\n";
    let err = parse(&tokenize(source).unwrap()).unwrap_err();
    match err {
        ParseError::InvalidTimestamp { index, line, source } => {
            assert_eq!((index, line), (1, 2));
            assert!(matches!(source, TimeStampError::OutOfRange { field: "Minutes", .. }));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_pipeline_withMissingFinalBlankLine_shouldFailAtEof() {
    let source = "1\n00:00:01,000 --> 00:00:02,000\nNo newline at end";
    let err = parse(&tokenize(source).unwrap()).unwrap_err();
    assert_eq!(
        err,
        ParseError::UnexpectedToken {
            subtitle: 1,
            expected: TokenKind::BlankLine,
            found: "EOF".to_string(),
            line: 3
        }
    );
}

#[test]
fn test_pipeline_withEmbeddedBlankLine_shouldFlagFollowingText() {
    let source = "1\n00:00:01,000 --> 00:00:02,000\nFirst paragraph\n\nSecond paragraph\n";
    let err = parse(&tokenize(source).unwrap()).unwrap_err();
    assert_eq!(
        err,
        ParseError::UnexpectedToken {
            subtitle: 2,
            expected: TokenKind::Index,
            found: "TEXT".to_string(),
            line: 5
        }
    );
}

#[test]
fn test_pipeline_withOnlyBlankLines_shouldReportNoSubtitles() {
    assert_eq!(parse(&tokenize("\n\n  \n").unwrap()), Err(ParseError::NoSubtitles));
    assert_eq!(parse(&tokenize("").unwrap()), Err(ParseError::NoSubtitles));
}

#[test]
fn test_pipeline_withTextBeforeFirstIndex_shouldReportLine() {
    let err = parse(&tokenize("\nstray text\n").unwrap()).unwrap_err();
    assert!(matches!(
        err,
        ParseError::UnexpectedToken {
            subtitle: 1,
            expected: TokenKind::Index,
            line: 2,
            ..
        }
    ));
}

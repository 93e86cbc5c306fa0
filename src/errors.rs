/*!
 * Error types for the srtinterp application.
 *
 * Every pipeline stage has its own error type so callers can tell a lexing
 * failure from a grammar failure from a playback failure. All of them are
 * defined with the thiserror crate and roll up into `AppError`.
 */

use std::path::PathBuf;

use thiserror::Error;

use crate::lexer::TokenKind;
use crate::subtitle::TimeStamp;

/// Errors raised when constructing a `TimeStamp`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeStampError {
    /// The text is not in `HH:MM:SS,mmm` form
    #[error("Invalid timestamp format '{0}'")]
    Malformed(String),

    /// A component is outside its allowed range
    #[error("{field} must be between 0 and {max}, got {value}")]
    OutOfRange {
        /// Name of the offending component
        field: &'static str,
        /// Largest accepted value
        max: u64,
        /// Value that was supplied
        value: u64,
    },
}

/// Errors raised when a `SubtitleEntry` fails its invariant checks
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntryError {
    #[error("Index must be positive, got {0}")]
    InvalidIndex(usize),

    #[error("Start time ({start}) must be before end time ({end})")]
    InvalidTiming { start: TimeStamp, end: TimeStamp },

    #[error("Subtitle {0} has no text content")]
    EmptyText(usize),
}

/// The specific part of a timestamp line that failed to lex
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    #[error("Bad timestamp line, expected 'start --> end' but found {0} field(s)")]
    FieldCount(usize),

    #[error("Bad start time '{0}'")]
    StartTime(String),

    #[error("Expected '-->', got '{0}'")]
    Arrow(String),

    #[error("Bad end time '{0}'")]
    EndTime(String),
}

/// Lexing failure, always addressed by its 1-based line number
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Line {line}: {kind}")]
pub struct LexError {
    /// Line on which the failure was detected
    pub line: usize,
    /// What was wrong with the line
    pub kind: LexErrorKind,
}

/// Structural and temporal grammar violations found by the parser
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A token of the wrong kind was found while parsing a block
    #[error("Line {line} (subtitle {subtitle}): expected {expected}, found {found}")]
    UnexpectedToken {
        /// Index of the block being parsed
        subtitle: usize,
        expected: TokenKind,
        /// Kind of the token found, or "end of input"
        found: String,
        line: usize,
    },

    /// The block number does not continue the 1, 2, 3, ... sequence
    #[error("Line {line}: expected subtitle {expected}, got {found}")]
    IndexMismatch {
        expected: usize,
        found: String,
        line: usize,
    },

    /// A timestamp passed the lexer's shape check but is out of range
    #[error("Line {line} (subtitle {index}): {source}")]
    InvalidTimestamp {
        index: usize,
        line: usize,
        #[source]
        source: TimeStampError,
    },

    /// The start of a block is not strictly before its end
    #[error("Line {line} (subtitle {index}): start time {start} must be before end time {end}")]
    InvalidTiming {
        index: usize,
        start: TimeStamp,
        end: TimeStamp,
        line: usize,
    },

    /// A block has no text lines
    #[error("Line {line} (subtitle {index}): subtitle needs at least one line of text")]
    MissingText { index: usize, line: usize },

    /// The assembled entry failed its own validation
    #[error("Subtitle {index} is invalid: {source}")]
    InvalidEntry {
        index: usize,
        #[source]
        source: EntryError,
    },

    /// The token stream contained no blocks at all
    #[error("No subtitles found in input")]
    NoSubtitles,
}

/// Playback failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExecutionError {
    #[error("No subtitles to display")]
    NoEntries,

    #[error("Unknown playback mode '{0}', expected one of: sequential, real_time, accelerated")]
    UnknownMode(String),

    #[error("Speed factor must be a positive number, got {0}")]
    InvalidSpeedFactor(f64),

    #[error("Speed factor {0} stretches the subtitle timeline beyond what can be waited for")]
    WaitOverflow(f64),

    #[error("Playback interrupted")]
    Interrupted,
}

/// Errors from the translation collaborator
#[derive(Error, Debug)]
pub enum TranslationError {
    /// The requested language is not in the supported table
    #[error("Unsupported language '{name}'. Supported languages: {supported}")]
    UnsupportedLanguage { name: String, supported: String },

    /// The request could not be sent or completed
    #[error("Translation request failed: {0}")]
    RequestFailed(String),

    /// The service answered with a non-success status
    #[error("Translation service responded with error: {status_code} - {message}")]
    ApiError { status_code: u16, message: String },

    /// The service throttled us
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// The response body did not have the expected shape
    #[error("Failed to parse translation response: {0}")]
    MalformedResponse(String),
}

/// Errors from the export collaborator
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Cannot export: entries list is empty")]
    NoEntries,

    #[error("Invalid format type '{0}'. Must be one of: plain, numbered, separated, srt")]
    UnknownFormat(String),

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from the statistics collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatisticsError {
    #[error("Cannot calculate statistics: entries list is empty")]
    NoEntries,
}

/// Errors from terminal formatting
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormattingError {
    #[error("Invalid hex color format: #{0}")]
    InvalidHexColor(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    #[error("Lexer error: {0}")]
    Lex(#[from] LexError),

    #[error("Parser error: {0}")]
    Parse(#[from] ParseError),

    #[error("Executor error: {0}")]
    Execution(#[from] ExecutionError),

    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Statistics error: {0}")]
    Statistics(#[from] StatisticsError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

/*!
 * Line-oriented SRT tokenizer.
 *
 * Each physical line is classified exactly once, in order, into one or more
 * tokens. Formatting markup inside text lines is left untouched; only
 * timestamp lines are checked for shape here.
 */

use std::fmt;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{LexError, LexErrorKind};

// @const: Block index line (after trimming)
static INDEX_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").unwrap());

// @const: One side of a timing line
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{2}:[0-9]{2}:[0-9]{2},[0-9]{3}$").unwrap());

/// The literal separating start and end times
pub const ARROW: &str = "-->";

/// Kind of a lexical unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Index,
    Timestamp,
    Arrow,
    Text,
    Newline,
    BlankLine,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Index => "INDEX",
            Self::Timestamp => "TIMESTAMP",
            Self::Arrow => "ARROW",
            Self::Text => "TEXT",
            Self::Newline => "NEWLINE",
            Self::BlankLine => "BLANK_LINE",
            Self::Eof => "EOF",
        };
        f.write_str(name)
    }
}

/// A classified lexical unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    text: String,
    line: usize,
}

impl Token {
    fn new(kind: TokenKind, text: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
        }
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Source text carried by the token (digits, timestamp, raw line, ...)
    pub fn text(&self) -> &str {
        &self.text
    }

    /// 1-based physical line the token came from
    pub fn line(&self) -> usize {
        self.line
    }
}

/// Tokenize SRT source text.
///
/// Lines are split on `\n`; a trailing `\r` is treated as part of the line
/// terminator. An `EOF` token always closes the stream.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut line_number = 0;

    for raw in source.split('\n') {
        line_number += 1;
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        lex_line(line, line_number, &mut tokens)?;
    }

    tokens.push(Token::new(TokenKind::Eof, "", line_number));
    debug!("Tokenized {} lines into {} tokens", line_number, tokens.len());

    Ok(tokens)
}

fn lex_line(line: &str, line_number: usize, tokens: &mut Vec<Token>) -> Result<(), LexError> {
    let stripped = line.trim();

    if stripped.is_empty() {
        tokens.push(Token::new(TokenKind::BlankLine, line, line_number));
        return Ok(());
    }

    if INDEX_REGEX.is_match(stripped) {
        tokens.push(Token::new(TokenKind::Index, stripped, line_number));
        tokens.push(Token::new(TokenKind::Newline, "\n", line_number));
        return Ok(());
    }

    if line.contains(ARROW) {
        return lex_timing_line(line, line_number, tokens);
    }

    tokens.push(Token::new(TokenKind::Text, line, line_number));
    tokens.push(Token::new(TokenKind::Newline, "\n", line_number));
    Ok(())
}

fn lex_timing_line(line: &str, line_number: usize, tokens: &mut Vec<Token>) -> Result<(), LexError> {
    let fail = |kind| LexError { line: line_number, kind };

    let fields: Vec<&str> = line.split_whitespace().collect();
    let &[start, arrow, end] = fields.as_slice() else {
        return Err(fail(LexErrorKind::FieldCount(fields.len())));
    };

    if !TIMESTAMP_REGEX.is_match(start) {
        return Err(fail(LexErrorKind::StartTime(start.to_string())));
    }
    if arrow != ARROW {
        return Err(fail(LexErrorKind::Arrow(arrow.to_string())));
    }
    if !TIMESTAMP_REGEX.is_match(end) {
        return Err(fail(LexErrorKind::EndTime(end.to_string())));
    }

    tokens.push(Token::new(TokenKind::Timestamp, start, line_number));
    tokens.push(Token::new(TokenKind::Arrow, arrow, line_number));
    tokens.push(Token::new(TokenKind::Timestamp, end, line_number));
    tokens.push(Token::new(TokenKind::Newline, "\n", line_number));
    Ok(())
}

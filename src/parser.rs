/*!
 * Grammar-driven builder for subtitle entries.
 *
 * ```text
 * file        := BLANK_LINE* block+ EOF
 * block       := INDEX NEWLINE timing NEWLINE text_lines BLANK_LINE
 * timing      := TIMESTAMP ARROW TIMESTAMP
 * text_lines  := TEXT (NEWLINE TEXT)*
 * ```
 *
 * The parser is single-pass with one token of lookahead. The first failed
 * expectation aborts the whole parse; no partial result is returned.
 */

use log::debug;

use crate::errors::ParseError;
use crate::lexer::{Token, TokenKind};
use crate::subtitle::{SubtitleEntry, TimeStamp};

/// Cursor over a token stream, scoped to a single `parse` call
pub struct Parser<'t> {
    tokens: &'t [Token],
    position: usize,
}

impl<'t> Parser<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Self { tokens, position: 0 }
    }

    /// Consume the cursor and build the ordered entry list
    pub fn parse(mut self) -> Result<Vec<SubtitleEntry>, ParseError> {
        let mut entries = Vec::new();
        let mut expected_index = 1;

        while let Some(token) = self.current() {
            match token.kind() {
                TokenKind::Eof => break,
                TokenKind::BlankLine => self.advance(),
                _ => {
                    entries.push(self.parse_block(expected_index)?);
                    expected_index += 1;
                }
            }
        }

        if entries.is_empty() {
            return Err(ParseError::NoSubtitles);
        }

        debug!("Parsed {} subtitle entries", entries.len());
        Ok(entries)
    }

    fn current(&self) -> Option<&'t Token> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    /// Line of the current token, or of the last token once past the end
    fn current_line(&self) -> usize {
        self.current()
            .or_else(|| self.tokens.last())
            .map_or(0, |t| t.line())
    }

    fn expect(&mut self, kind: TokenKind, subtitle: usize) -> Result<&'t Token, ParseError> {
        match self.current() {
            Some(token) if token.kind() == kind => {
                self.advance();
                Ok(token)
            }
            other => Err(ParseError::UnexpectedToken {
                subtitle,
                expected: kind,
                found: other.map_or_else(|| "end of input".to_string(), |t| t.kind().to_string()),
                line: self.current_line(),
            }),
        }
    }

    fn parse_block(&mut self, expected_index: usize) -> Result<SubtitleEntry, ParseError> {
        let index_token = self.expect(TokenKind::Index, expected_index)?;
        let index = index_token.text().parse::<usize>().ok();
        if index != Some(expected_index) {
            return Err(ParseError::IndexMismatch {
                expected: expected_index,
                found: index_token.text().to_string(),
                line: index_token.line(),
            });
        }

        self.expect(TokenKind::Newline, expected_index)?;
        let (start, end) = self.parse_timing(expected_index)?;
        self.expect(TokenKind::Newline, expected_index)?;
        let text = self.parse_text(expected_index)?;
        self.expect(TokenKind::BlankLine, expected_index)?;

        SubtitleEntry::new(expected_index, start, end, text).map_err(|source| ParseError::InvalidEntry {
            index: expected_index,
            source,
        })
    }

    fn parse_timing(&mut self, index: usize) -> Result<(TimeStamp, TimeStamp), ParseError> {
        let start = self.parse_timestamp(index)?;
        self.expect(TokenKind::Arrow, index)?;
        let end_line = self.current_line();
        let end = self.parse_timestamp(index)?;

        if start >= end {
            return Err(ParseError::InvalidTiming {
                index,
                start,
                end,
                line: end_line,
            });
        }

        Ok((start, end))
    }

    fn parse_timestamp(&mut self, index: usize) -> Result<TimeStamp, ParseError> {
        let token = self.expect(TokenKind::Timestamp, index)?;
        token.text().parse().map_err(|source| ParseError::InvalidTimestamp {
            index,
            line: token.line(),
            source,
        })
    }

    fn parse_text(&mut self, index: usize) -> Result<Vec<String>, ParseError> {
        let mut lines = Vec::new();

        while let Some(token) = self.current().filter(|t| t.kind() == TokenKind::Text) {
            lines.push(token.text().to_string());
            self.advance();

            match self.current() {
                Some(next) if next.kind() == TokenKind::Newline => self.advance(),
                _ => break,
            }
        }

        if lines.is_empty() {
            return Err(ParseError::MissingText {
                index,
                line: self.current_line(),
            });
        }

        Ok(lines)
    }
}

/// Parse a token stream into validated entries numbered `1..=N`
pub fn parse(tokens: &[Token]) -> Result<Vec<SubtitleEntry>, ParseError> {
    Parser::new(tokens).parse()
}

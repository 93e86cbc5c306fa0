/*!
 * # srtinterp - SRT subtitle interpreter
 *
 * Treats a SubRip (`.srt`) file as a tiny program: it is lexed into tokens,
 * parsed into validated subtitle entries, and executed as a timeline of
 * DISPLAY and CLEAR events.
 *
 * ## Features
 *
 * - Line-oriented lexer with line-numbered errors
 * - Parser enforcing sequential indices and `start < end`
 * - Sequential, real-time and accelerated playback on an injectable clock
 * - Optional translation of subtitle text with an on-disk cache
 * - Plain/numbered/separated/SRT export and statistics
 *
 * ## Architecture
 *
 * - `subtitle`: `TimeStamp` and `SubtitleEntry`
 * - `lexer`: physical lines to tokens
 * - `parser`: tokens to entries
 * - `scheduler`: playback modes, clocks and event sinks
 * - `formatting`: SRT tags to terminal styles
 * - `export`, `stats`: collaborators working on parsed entries
 * - `translation`: providers, cache and batching translator
 * - `language_utils`: supported target languages
 * - `app_config`, `app_controller`: configuration and the end-to-end pipeline
 * - `errors`: error types for every stage
 */

#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod export;
pub mod formatting;
pub mod language_utils;
pub mod lexer;
pub mod parser;
pub mod scheduler;
pub mod stats;
pub mod subtitle;
pub mod translation;

pub use app_config::Config;
pub use errors::{AppError, ExecutionError, LexError, ParseError, TranslationError};
pub use lexer::{tokenize, Token, TokenKind};
pub use parser::parse;
pub use scheduler::{execute, Clock, EventSink, PlaybackMode, Scheduler};
pub use subtitle::{SubtitleEntry, TimeStamp};

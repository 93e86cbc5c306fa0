/*!
 * Subtitle data model.
 *
 * `TimeStamp` and `SubtitleEntry` are immutable value types. Both validate
 * their invariants at construction, so any value that exists is in range.
 */

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{EntryError, TimeStampError};

const MS_PER_HOUR: u64 = 3_600_000;
const MS_PER_MINUTE: u64 = 60_000;
const MS_PER_SECOND: u64 = 1_000;

/// A point in subtitle time, `HH:MM:SS,mmm`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct TimeStamp {
    hours: u8,
    minutes: u8,
    seconds: u8,
    milliseconds: u16,
}

impl TimeStamp {
    /// Build a timestamp, rejecting any component outside its range
    pub fn new(hours: u64, minutes: u64, seconds: u64, milliseconds: u64) -> Result<Self, TimeStampError> {
        check_range("Hours", hours, 99)?;
        check_range("Minutes", minutes, 59)?;
        check_range("Seconds", seconds, 59)?;
        check_range("Milliseconds", milliseconds, 999)?;

        Ok(Self {
            hours: hours as u8,
            minutes: minutes as u8,
            seconds: seconds as u8,
            milliseconds: milliseconds as u16,
        })
    }

    /// Build a timestamp from a total millisecond count
    pub fn from_millis(total: u64) -> Result<Self, TimeStampError> {
        Self::new(
            total / MS_PER_HOUR,
            (total % MS_PER_HOUR) / MS_PER_MINUTE,
            (total % MS_PER_MINUTE) / MS_PER_SECOND,
            total % MS_PER_SECOND,
        )
    }

    /// Total milliseconds, the basis for ordering
    pub fn to_millis(&self) -> u64 {
        self.hours as u64 * MS_PER_HOUR
            + self.minutes as u64 * MS_PER_MINUTE
            + self.seconds as u64 * MS_PER_SECOND
            + self.milliseconds as u64
    }

    pub fn hours(&self) -> u8 {
        self.hours
    }

    pub fn minutes(&self) -> u8 {
        self.minutes
    }

    pub fn seconds(&self) -> u8 {
        self.seconds
    }

    pub fn milliseconds(&self) -> u16 {
        self.milliseconds
    }

    /// Terminal display form with a dot separator, `HH:MM:SS.mmm`
    pub fn display_form(&self) -> String {
        format!(
            "{:02}:{:02}:{:02}.{:03}",
            self.hours, self.minutes, self.seconds, self.milliseconds
        )
    }
}

fn check_range(field: &'static str, value: u64, max: u64) -> Result<(), TimeStampError> {
    if value > max {
        return Err(TimeStampError::OutOfRange { field, max, value });
    }
    Ok(())
}

impl Ord for TimeStamp {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_millis().cmp(&other.to_millis())
    }
}

impl PartialOrd for TimeStamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TimeStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02},{:03}",
            self.hours, self.minutes, self.seconds, self.milliseconds
        )
    }
}

impl FromStr for TimeStamp {
    type Err = TimeStampError;

    /// Parse `HH:MM:SS,mmm`. Range checks apply after the shape check.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || TimeStampError::Malformed(s.to_string());

        let (time_part, ms_part) = s.split_once(',').ok_or_else(malformed)?;
        let mut fields = time_part.split(':');
        let (Some(h), Some(m), Some(sec), None) = (fields.next(), fields.next(), fields.next(), fields.next()) else {
            return Err(malformed());
        };

        let number = |part: &str| -> Result<u64, TimeStampError> {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(malformed());
            }
            part.parse::<u64>().map_err(|_| malformed())
        };

        Self::new(number(h)?, number(m)?, number(sec)?, number(ms_part)?)
    }
}

impl From<TimeStamp> for String {
    fn from(ts: TimeStamp) -> Self {
        ts.to_string()
    }
}

impl TryFrom<String> for TimeStamp {
    type Error = TimeStampError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One validated subtitle block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawEntry")]
pub struct SubtitleEntry {
    index: usize,
    start: TimeStamp,
    end: TimeStamp,
    text: Vec<String>,
}

impl SubtitleEntry {
    /// Create an entry, enforcing `index >= 1`, `start < end` and non-blank text
    pub fn new(index: usize, start: TimeStamp, end: TimeStamp, text: Vec<String>) -> Result<Self, EntryError> {
        if index < 1 {
            return Err(EntryError::InvalidIndex(index));
        }
        if start >= end {
            return Err(EntryError::InvalidTiming { start, end });
        }
        if text.iter().all(|line| line.trim().is_empty()) {
            return Err(EntryError::EmptyText(index));
        }

        Ok(Self { index, start, end, text })
    }

    /// Same entry with replacement text lines; timing and index are kept
    pub fn with_text(&self, text: Vec<String>) -> Result<Self, EntryError> {
        Self::new(self.index, self.start, self.end, text)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn start(&self) -> TimeStamp {
        self.start
    }

    pub fn end(&self) -> TimeStamp {
        self.end
    }

    pub fn lines(&self) -> &[String] {
        &self.text
    }

    /// All text lines joined with newlines
    pub fn text(&self) -> String {
        self.text.join("\n")
    }

    /// Display window length in milliseconds
    pub fn duration_ms(&self) -> u64 {
        self.end.to_millis() - self.start.to_millis()
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(f, "{} --> {}", self.start, self.end)?;
        for line in &self.text {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

// Deserialization goes through `new` so cached entries are revalidated.
#[derive(Deserialize)]
struct RawEntry {
    index: usize,
    start: TimeStamp,
    end: TimeStamp,
    text: Vec<String>,
}

impl TryFrom<RawEntry> for SubtitleEntry {
    type Error = EntryError;

    fn try_from(raw: RawEntry) -> Result<Self, Self::Error> {
        Self::new(raw.index, raw.start, raw.end, raw.text)
    }
}

/*!
 * Aggregate statistics over a validated entry sequence.
 */

use std::fmt;

use crate::errors::StatisticsError;
use crate::subtitle::SubtitleEntry;

/// Maximum characters kept in a text preview
const PREVIEW_LEN: usize = 80;

/// One extremal entry: its index, the measured value and a text preview
#[derive(Debug, Clone, PartialEq)]
pub struct EntryFigure {
    pub index: usize,
    pub value: u64,
    pub preview: String,
}

/// Summary figures for a subtitle file
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleStats {
    pub total_entries: usize,
    /// First start to last end
    pub total_duration_ms: u64,
    pub avg_duration_ms: f64,
    pub avg_char_length: f64,
    pub avg_word_length: f64,
    pub longest_by_duration: EntryFigure,
    pub shortest_by_duration: EntryFigure,
    pub longest_by_text: EntryFigure,
    pub shortest_by_text: EntryFigure,
}

impl SubtitleStats {
    /// Compute statistics. Ties go to the earliest entry.
    pub fn calculate(entries: &[SubtitleEntry]) -> Result<Self, StatisticsError> {
        let (Some(first), Some(last)) = (entries.first(), entries.last()) else {
            return Err(StatisticsError::NoEntries);
        };

        let total = entries.len() as f64;
        let total_duration_ms = last.end().to_millis().saturating_sub(first.start().to_millis());

        let durations: Vec<(usize, u64, String)> = entries
            .iter()
            .map(|e| (e.index(), e.duration_ms(), e.text()))
            .collect();
        let char_lengths: Vec<(usize, u64, String)> = entries
            .iter()
            .map(|e| {
                let text = e.text();
                (e.index(), text.chars().count() as u64, text)
            })
            .collect();
        let word_count: usize = entries.iter().map(|e| e.text().split_whitespace().count()).sum();

        Ok(Self {
            total_entries: entries.len(),
            total_duration_ms,
            avg_duration_ms: durations.iter().map(|d| d.1).sum::<u64>() as f64 / total,
            avg_char_length: char_lengths.iter().map(|c| c.1).sum::<u64>() as f64 / total,
            avg_word_length: word_count as f64 / total,
            longest_by_duration: extremal(&durations, true),
            shortest_by_duration: extremal(&durations, false),
            longest_by_text: extremal(&char_lengths, true),
            shortest_by_text: extremal(&char_lengths, false),
        })
    }
}

// `figures` is never empty here.
fn extremal(figures: &[(usize, u64, String)], longest: bool) -> EntryFigure {
    let mut best = &figures[0];
    for figure in &figures[1..] {
        let better = if longest { figure.1 > best.1 } else { figure.1 < best.1 };
        if better {
            best = figure;
        }
    }

    EntryFigure {
        index: best.0,
        value: best.1,
        preview: truncate_text(&best.2, PREVIEW_LEN),
    }
}

fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        format!("{}...", text.chars().take(max_len).collect::<String>())
    }
}

/// Format milliseconds as `HH:MM:SS.mmm`
pub fn format_duration(ms: u64) -> String {
    format!(
        "{:02}:{:02}:{:02}.{:03}",
        ms / 3_600_000,
        (ms % 3_600_000) / 60_000,
        (ms % 60_000) / 1_000,
        ms % 1_000
    )
}

impl fmt::Display for SubtitleStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = vec![
            "Subtitle Statistics:".to_string(),
            "=".repeat(60),
            format!("Total entries: {}", self.total_entries),
            format!("Total duration: {}", format_duration(self.total_duration_ms)),
            format!("Average subtitle duration: {:.2}s", self.avg_duration_ms / 1000.0),
            format!(
                "Average text length: {:.1} characters, {:.1} words",
                self.avg_char_length, self.avg_word_length
            ),
        ];

        let sections = [
            ("Longest subtitle by duration", &self.longest_by_duration, true),
            ("Shortest subtitle by duration", &self.shortest_by_duration, true),
            ("Longest subtitle by text length", &self.longest_by_text, false),
            ("Shortest subtitle by text length", &self.shortest_by_text, false),
        ];
        for (title, figure, is_duration) in sections {
            lines.push(String::new());
            lines.push(format!("{}:", title));
            if is_duration {
                lines.push(format!("  Entry #{}: {:.2}s", figure.index, figure.value as f64 / 1000.0));
            } else {
                lines.push(format!("  Entry #{}: {} characters", figure.index, figure.value));
            }
            lines.push(format!("  Text: \"{}\"", figure.preview));
        }

        f.write_str(&lines.join("\n"))
    }
}

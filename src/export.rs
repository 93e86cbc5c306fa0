/*!
 * Export of validated entries as plain text or as a re-serialized SRT file.
 */

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use log::info;

use crate::errors::ExportError;
use crate::subtitle::SubtitleEntry;

/// Output layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Text only, one entry after another
    Plain,
    /// Text prefixed with `[N]`
    Numbered,
    /// Text with a blank line between entries
    Separated,
    /// Full SRT blocks, readable again by the lexer
    Srt,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Numbered => "numbered",
            Self::Separated => "separated",
            Self::Srt => "srt",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "plain" => Ok(Self::Plain),
            "numbered" => Ok(Self::Numbered),
            "separated" => Ok(Self::Separated),
            "srt" => Ok(Self::Srt),
            _ => Err(ExportError::UnknownFormat(s.to_string())),
        }
    }
}

/// Render entries in the requested format
pub fn render(entries: &[SubtitleEntry], format: ExportFormat) -> Result<String, ExportError> {
    if entries.is_empty() {
        return Err(ExportError::NoEntries);
    }

    let output = match format {
        ExportFormat::Plain => entries.iter().map(|e| e.text()).collect::<Vec<_>>().join("\n"),
        ExportFormat::Numbered => entries
            .iter()
            .map(|e| format!("[{}] {}", e.index(), e.text()))
            .collect::<Vec<_>>()
            .join("\n"),
        ExportFormat::Separated => entries
            .iter()
            .flat_map(|e| [e.text(), String::new()])
            .collect::<Vec<_>>()
            .join("\n"),
        ExportFormat::Srt => render_srt(entries),
    };

    Ok(output)
}

// Blocks joined by a blank line; the final newline leaves an empty last line
// that closes the last block when read back.
fn render_srt(entries: &[SubtitleEntry]) -> String {
    let blocks: Vec<String> = entries
        .iter()
        .map(|entry| {
            let mut lines = vec![
                entry.index().to_string(),
                format!("{} --> {}", entry.start(), entry.end()),
            ];
            lines.extend(entry.lines().iter().cloned());
            lines.join("\n")
        })
        .collect();

    let mut output = blocks.join("\n\n");
    output.push('\n');
    output
}

/// Render and write to `path`, creating parent directories as needed
pub fn write_to_file<P: AsRef<Path>>(entries: &[SubtitleEntry], path: P, format: ExportFormat) -> Result<(), ExportError> {
    let path = path.as_ref();
    let content = render(entries, format)?;
    let io_error = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    fs::write(path, content).map_err(io_error)?;

    info!("Exported {} subtitles as {} to {}", entries.len(), format, path.display());
    Ok(())
}

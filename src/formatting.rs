/*!
 * Terminal rendering of SRT formatting tags.
 *
 * Subtitles may carry `<i>`, `<b>`, `<u>` and `<font color="...">` markup.
 * For terminal display these become ANSI escape sequences, or are stripped
 * entirely when styling is disabled.
 */

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::errors::FormattingError;

pub const RESET: &str = "\x1B[0m";
pub const BOLD: &str = "\x1B[1m";
pub const ITALIC: &str = "\x1B[3m";
pub const UNDERLINE: &str = "\x1B[4m";

/// Simple style tags and their escape codes, applied in this order
static STYLE_TAGS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (Regex::new(r"(?s)<i>(.*?)</i>").unwrap(), ITALIC),
        (Regex::new(r"(?s)<b>(.*?)</b>").unwrap(), BOLD),
        (Regex::new(r"(?s)<u>(.*?)</u>").unwrap(), UNDERLINE),
    ]
});

static FONT_TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<font\s+([^>]*?)>(.*?)</font>").unwrap());

static COLOR_ATTR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"color\s*=\s*["']?(#?[0-9A-Fa-f]{6})["']?"#).unwrap());

static HEX_COLOR_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9A-Fa-f]{6}$").unwrap());

static ANY_TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Convert `#RRGGBB` (or `RRGGBB`) to a 24-bit foreground escape
pub fn hex_to_ansi_color(hex_color: &str) -> Result<String, FormattingError> {
    let hex = hex_color.trim_start_matches('#');
    if !HEX_COLOR_REGEX.is_match(hex) {
        return Err(FormattingError::InvalidHexColor(hex.to_string()));
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16).map_err(|_| FormattingError::InvalidHexColor(hex.to_string()))
    };
    let (r, g, b) = (channel(0..2)?, channel(2..4)?, channel(4..6)?);

    Ok(format!("\x1B[38;2;{};{};{}m", r, g, b))
}

/// Replace formatting tags with ANSI escapes. Nested tags are supported.
pub fn html_to_ansi(text: &str) -> String {
    let mut result = text.to_string();

    for (regex, code) in STYLE_TAGS.iter() {
        result = regex
            .replace_all(&result, |caps: &Captures| format!("{}{}{}", code, &caps[1], RESET))
            .into_owned();
    }

    FONT_TAG_REGEX
        .replace_all(&result, |caps: &Captures| {
            let content = &caps[2];
            let color = COLOR_ATTR_REGEX
                .captures(&caps[1])
                .and_then(|c| hex_to_ansi_color(&c[1]).ok());
            match color {
                Some(escape) => format!("{}{}{}", escape, content, RESET),
                None => content.to_string(),
            }
        })
        .into_owned()
}

/// Remove every `<...>` tag
pub fn strip_html_tags(text: &str) -> String {
    ANY_TAG_REGEX.replace_all(text, "").into_owned()
}

/// Prepare subtitle text for the terminal
pub fn format_subtitle_text(text: &str, enable_formatting: bool) -> String {
    if enable_formatting {
        html_to_ansi(text)
    } else {
        strip_html_tags(text)
    }
}

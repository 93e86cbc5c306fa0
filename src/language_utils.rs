use std::fmt;
use std::str::FromStr;

use isolang::Language;
use serde::{Deserialize, Serialize};

use crate::errors::TranslationError;

/// Language utilities for translation targets
///
/// Targets are selected by name ("filipino", "korean", ...) and map to the
/// codes the translation service expects. English is the source language,
/// so selecting it means no translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TargetLanguage {
    #[default]
    English,
    Filipino,
    Tagalog,
    Korean,
    Chinese,
    Japanese,
}

impl TargetLanguage {
    /// All supported targets, in display order
    pub const ALL: [TargetLanguage; 6] = [
        Self::English,
        Self::Filipino,
        Self::Tagalog,
        Self::Korean,
        Self::Chinese,
        Self::Japanese,
    ];

    /// Lowercase name used on the command line and in cache file names
    pub fn name(&self) -> &'static str {
        match self {
            Self::English => "english",
            Self::Filipino => "filipino",
            Self::Tagalog => "tagalog",
            Self::Korean => "korean",
            Self::Chinese => "chinese",
            Self::Japanese => "japanese",
        }
    }

    /// Code understood by the translation service
    pub fn code(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Filipino | Self::Tagalog => "tl",
            Self::Korean => "ko",
            Self::Chinese => "zh-CN",
            Self::Japanese => "ja",
        }
    }

    /// Whether text in this language needs no translation
    pub fn is_source(&self) -> bool {
        matches!(self, Self::English)
    }

    /// English name of the language from the ISO 639 tables
    pub fn display_name(&self) -> String {
        // Region suffixes such as "-CN" are not part of ISO 639-1.
        let base = self.code().split('-').next().unwrap_or_default();
        Language::from_639_1(base)
            .map(|lang| lang.to_name().to_string())
            .unwrap_or_else(|| self.name().to_string())
    }

    /// Comma-separated list of supported names
    pub fn supported_names() -> String {
        Self::ALL.iter().map(|l| l.name()).collect::<Vec<_>>().join(", ")
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TargetLanguage {
    type Err = TranslationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|lang| lang.name() == wanted)
            .ok_or_else(|| TranslationError::UnsupportedLanguage {
                name: s.to_string(),
                supported: Self::supported_names(),
            })
    }
}

use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::language_utils::TargetLanguage;
use crate::scheduler::PlaybackMode;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Playback discipline
    #[serde(default)]
    pub mode: ConfigMode,

    /// Speed factor for accelerated playback
    #[serde(default = "default_speed_factor")]
    pub speed_factor: f64,

    /// Language subtitles are translated into before playback
    #[serde(default)]
    pub target_language: TargetLanguage,

    /// Render formatting tags as terminal styles instead of stripping them
    #[serde(default = "default_true")]
    pub enable_formatting: bool,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Serializable form of the playback mode
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConfigMode {
    #[default]
    Sequential,
    RealTime,
    Accelerated,
}

impl From<ConfigMode> for PlaybackMode {
    fn from(mode: ConfigMode) -> Self {
        match mode {
            ConfigMode::Sequential => PlaybackMode::Sequential,
            ConfigMode::RealTime => PlaybackMode::RealTime,
            ConfigMode::Accelerated => PlaybackMode::Accelerated,
        }
    }
}

impl From<PlaybackMode> for ConfigMode {
    fn from(mode: PlaybackMode) -> Self {
        match mode {
            PlaybackMode::Sequential => ConfigMode::Sequential,
            PlaybackMode::RealTime => ConfigMode::RealTime,
            PlaybackMode::Accelerated => ConfigMode::Accelerated,
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TranslationConfig {
    /// Whether non-English targets are translated at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Service endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Entries per translation batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Maximum number of concurrent requests
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Keep translated files on disk keyed by source content
    #[serde(default = "default_true")]
    pub use_cache: bool,

    /// Cache directory; the user cache dir is used when unset
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_endpoint(),
            batch_size: default_batch_size(),
            concurrent_requests: default_concurrent_requests(),
            timeout_secs: default_timeout_secs(),
            use_cache: true,
            cache_dir: None,
        }
    }
}

impl TranslationConfig {
    /// Directory holding cached translations
    pub fn resolved_cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from(".cache"))
                .join("srtinterp")
                .join("translations")
        })
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_speed_factor() -> f64 {
    5.0
}

fn default_endpoint() -> String {
    "https://translate.googleapis.com/translate_a/single".to_string()
}

fn default_batch_size() -> usize {
    50
}

fn default_concurrent_requests() -> usize {
    4
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if !(self.speed_factor > 0.0) || !self.speed_factor.is_finite() {
            return Err(anyhow!("Speed factor must be a positive number, got {}", self.speed_factor));
        }
        if self.translation.batch_size == 0 {
            return Err(anyhow!("Translation batch size must be at least 1"));
        }
        if self.translation.concurrent_requests == 0 {
            return Err(anyhow!("Concurrent requests must be at least 1"));
        }
        if self.translation.enabled && self.translation.endpoint.trim().is_empty() {
            return Err(anyhow!("Translation endpoint is required when translation is enabled"));
        }
        Ok(())
    }

    /// Load the configuration, writing a default file if none exists
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let file = File::open(path).with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            return serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()));
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config).context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;

        Ok(config)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            mode: ConfigMode::default(),
            speed_factor: default_speed_factor(),
            target_language: TargetLanguage::default(),
            enable_formatting: true,
            translation: TranslationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

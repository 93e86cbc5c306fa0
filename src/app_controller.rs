use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::app_config::Config;
use crate::errors::ExecutionError;
use crate::export::{self, ExportFormat};
use crate::lexer;
use crate::parser;
use crate::scheduler::{InterruptHandle, InterruptibleClock, ManualClock, PlaybackMode, Scheduler, TerminalSink};
use crate::stats::SubtitleStats;
use crate::subtitle::SubtitleEntry;
use crate::translation::{GoogleTranslateProvider, TranslationCache, TranslationProvider, Translator};

// @module: Pipeline orchestration from SRT file to terminal playback

/// Per-run options that do not belong in the configuration file
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Write the (translated) entries to this path in this format
    pub export: Option<(ExportFormat, PathBuf)>,
    /// Print statistics before playback
    pub show_stats: bool,
    /// Play on a simulated clock, printing every event without waiting
    pub dry_run: bool,
    /// Skip playback entirely
    pub skip_playback: bool,
}

/// What a finished run produced
#[derive(Debug)]
pub struct RunReport {
    pub entries: Vec<SubtitleEntry>,
    pub stats: Option<SubtitleStats>,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Provider override, the HTTP client is built from config otherwise
    provider: Option<Arc<dyn TranslationProvider>>,
    // @field: Wall clock shared with the interrupt handle
    clock: InterruptibleClock,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;

        Ok(Self {
            config,
            provider: None,
            clock: InterruptibleClock::new(),
        })
    }

    /// Use `provider` instead of the configured HTTP service
    pub fn with_provider(mut self, provider: Arc<dyn TranslationProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Handle that aborts a running playback
    pub fn interrupt_handle(&self) -> InterruptHandle {
        self.clock.handle()
    }

    /// Read, lex and parse a subtitle file
    pub fn load_entries(&self, input_file: &Path) -> Result<(String, Vec<SubtitleEntry>)> {
        let content = fs::read_to_string(input_file)
            .with_context(|| format!("Failed to read subtitle file: {}", input_file.display()))?;

        let tokens = lexer::tokenize(&content)?;
        let entries = parser::parse(&tokens)?;
        info!("Parsed {} subtitles from {}", entries.len(), input_file.display());

        Ok((content, entries))
    }

    /// Translate entries when a non-English target is configured
    pub async fn translate(&self, entries: Vec<SubtitleEntry>, content: &str) -> Vec<SubtitleEntry> {
        let language = self.config.target_language;
        if language.is_source() {
            return entries;
        }
        if !self.config.translation.enabled {
            warn!("Translation is disabled, playing {} subtitles in English", entries.len());
            return entries;
        }

        let translation = &self.config.translation;
        let provider = self.provider.clone().unwrap_or_else(|| {
            Arc::new(GoogleTranslateProvider::new(
                translation.endpoint.clone(),
                translation.timeout_secs,
            ))
        });

        let mut translator = Translator::new(provider, language)
            .with_batch_size(translation.batch_size)
            .with_concurrency(translation.concurrent_requests)
            .with_progress(self.provider.is_none());
        if translation.use_cache {
            let cache_dir = translation.resolved_cache_dir();
            debug!("Using translation cache at {}", cache_dir.display());
            translator = translator.with_cache(TranslationCache::new(cache_dir));
        }

        translator.translate_entries(entries, Some(content)).await
    }

    /// Run the whole pipeline for one file
    pub async fn run(&self, input_file: &Path, options: &RunOptions) -> Result<RunReport> {
        let start_time = Instant::now();
        let handle = self.interrupt_handle();

        let (content, entries) = self.load_entries(input_file)?;
        let entries = self.translate(entries, &content).await;
        if handle.is_interrupted() {
            return Err(ExecutionError::Interrupted.into());
        }

        if let Some((format, path)) = &options.export {
            export::write_to_file(&entries, path, *format)?;
        }

        let stats = if options.show_stats {
            let stats = SubtitleStats::calculate(&entries)?;
            println!("{}\n", stats);
            Some(stats)
        } else {
            None
        };

        if !options.skip_playback {
            self.play(&entries, options.dry_run).await?;
        }

        info!("Finished {} in {:.2?}", input_file.display(), start_time.elapsed());
        Ok(RunReport { entries, stats })
    }

    /// Play entries to stdout on a blocking thread
    pub async fn play(&self, entries: &[SubtitleEntry], dry_run: bool) -> Result<()> {
        let mode: PlaybackMode = self.config.mode.into();
        let speed_factor = self.config.speed_factor;
        let enable_formatting = self.config.enable_formatting;
        let clock = self.clock.clone();
        let entries = entries.to_vec();

        tokio::task::spawn_blocking(move || {
            let sink = TerminalSink::stdout(enable_formatting);
            if dry_run {
                let simulated = ManualClock::new().with_interrupt(clock.handle());
                Scheduler::new(simulated, sink).execute(&entries, mode, speed_factor)
            } else {
                Scheduler::new(clock, sink).execute(&entries, mode, speed_factor)
            }
        })
        .await
        .context("Playback task failed")??;

        Ok(())
    }
}

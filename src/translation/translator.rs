/*!
 * Batch translation of subtitle entries.
 *
 * Entries are split into batches; within a batch every non-blank line is
 * sent to the provider with bounded concurrency. Blank lines are kept as
 * they are. A batch that fails in any way keeps its original English text,
 * so translation never aborts playback.
 */

use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::sync::Arc;

use crate::errors::TranslationError;
use crate::language_utils::TargetLanguage;
use crate::subtitle::SubtitleEntry;
use crate::translation::cache::TranslationCache;
use crate::translation::provider::TranslationProvider;

/// Translates entries through a provider, with optional file caching
#[derive(Debug)]
pub struct Translator {
    provider: Arc<dyn TranslationProvider>,
    language: TargetLanguage,
    batch_size: usize,
    concurrency: usize,
    cache: Option<TranslationCache>,
    show_progress: bool,
}

impl Translator {
    pub fn new(provider: Arc<dyn TranslationProvider>, language: TargetLanguage) -> Self {
        Self {
            provider,
            language,
            batch_size: 50,
            concurrency: 4,
            cache: None,
            show_progress: false,
        }
    }

    /// Entries per batch, at least 1
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Concurrent requests per batch, at least 1
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_cache(mut self, cache: TranslationCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn language(&self) -> TargetLanguage {
        self.language
    }

    pub fn cache(&self) -> Option<&TranslationCache> {
        self.cache.as_ref()
    }

    /// Translate all entries
    ///
    /// `file_content` is the raw source text; the cache is consulted only
    /// when it is given. Output keeps index, timing and line count of every
    /// entry.
    pub async fn translate_entries(&self, entries: Vec<SubtitleEntry>, file_content: Option<&str>) -> Vec<SubtitleEntry> {
        if self.language.is_source() || entries.is_empty() {
            return entries;
        }

        let cache = self.cache.as_ref().zip(file_content);
        if let Some((cache, content)) = cache {
            if let Some(cached) = cache.load(content, self.language) {
                info!("Loaded {} translation from cache", self.language.display_name());
                return cached;
            }
        }

        info!(
            "Translating {} subtitles to {} ({})",
            entries.len(),
            self.language.display_name(),
            self.language.code()
        );

        let progress_bar = self.progress_bar(entries.len() as u64);
        let mut translated = Vec::with_capacity(entries.len());

        for batch in entries.chunks(self.batch_size) {
            match self.translate_batch(batch).await {
                Ok(done) => translated.extend(done),
                Err(e) => {
                    // Chunks are never empty.
                    let first = batch[0].index();
                    let last = batch[batch.len() - 1].index();
                    warn!("Batch translation failed: {}. Keeping English for subtitles {}-{}", e, first, last);
                    translated.extend_from_slice(batch);
                }
            }
            progress_bar.inc(batch.len() as u64);
        }
        progress_bar.finish_and_clear();

        if let Some((cache, content)) = cache {
            cache.store(content, self.language, &translated);
        }

        translated
    }

    async fn translate_batch(&self, batch: &[SubtitleEntry]) -> Result<Vec<SubtitleEntry>, TranslationError> {
        let code = self.language.code();
        let texts: Vec<&str> = batch
            .iter()
            .flat_map(|entry| entry.lines().iter())
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .collect();

        let results: Vec<Result<String, TranslationError>> = stream::iter(texts.iter())
            .map(|text| self.provider.translate(text, code))
            .buffered(self.concurrency)
            .collect()
            .await;
        let mut translations = results.into_iter().collect::<Result<Vec<String>, _>>()?.into_iter();

        batch
            .iter()
            .map(|entry| {
                let lines = entry
                    .lines()
                    .iter()
                    .map(|line| {
                        if line.trim().is_empty() {
                            Ok(String::new())
                        } else {
                            translations.next().ok_or_else(|| {
                                TranslationError::MalformedResponse("fewer translations than lines".to_string())
                            })
                        }
                    })
                    .collect::<Result<Vec<String>, _>>()?;

                entry.with_text(lines).map_err(|e| {
                    TranslationError::MalformedResponse(format!("subtitle {}: {}", entry.index(), e))
                })
            })
            .collect()
    }

    fn progress_bar(&self, total: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let progress_bar = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} subtitles ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));
        progress_bar.set_message("Translating");
        progress_bar
    }
}

/*!
 * File cache for translated subtitle files.
 *
 * A translation is stored as `<sha256 of source>_<language>.json`, so
 * replaying the same file in the same language skips the network entirely.
 * Failures on either side are logged and treated as a miss.
 */

use log::{debug, warn};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::language_utils::TargetLanguage;
use crate::subtitle::SubtitleEntry;

/// On-disk layout of one cached translation
#[derive(Debug, Serialize, Deserialize)]
struct CachedTranslation {
    language: TargetLanguage,
    entries: Vec<SubtitleEntry>,
}

/// Translation cache rooted at a directory
#[derive(Debug, Clone)]
pub struct TranslationCache {
    /// Directory holding the cache files
    dir: PathBuf,

    /// Cache hit counter
    hits: Arc<RwLock<usize>>,

    /// Cache miss counter
    misses: Arc<RwLock<usize>>,
}

impl TranslationCache {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            hits: Arc::new(RwLock::new(0)),
            misses: Arc::new(RwLock::new(0)),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the cache file for this content and language
    pub fn cache_file(&self, content: &str, language: TargetLanguage) -> PathBuf {
        let digest = Sha256::digest(content.as_bytes());
        self.dir.join(format!("{:x}_{}.json", digest, language.name()))
    }

    /// Look up a stored translation
    pub fn load(&self, content: &str, language: TargetLanguage) -> Option<Vec<SubtitleEntry>> {
        let path = self.cache_file(content, language);
        let found = self.read_file(&path, language);

        if found.is_some() {
            *self.hits.write() += 1;
            debug!("Translation cache hit: {}", path.display());
        } else {
            *self.misses.write() += 1;
        }
        found
    }

    fn read_file(&self, path: &Path, language: TargetLanguage) -> Option<Vec<SubtitleEntry>> {
        if !path.exists() {
            return None;
        }

        let cached = fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|json| serde_json::from_str::<CachedTranslation>(&json).map_err(|e| e.to_string()));

        match cached {
            Ok(cached) if cached.language == language && !cached.entries.is_empty() => Some(cached.entries),
            Ok(_) => {
                warn!("Ignoring cache file with unexpected contents: {}", path.display());
                None
            }
            Err(e) => {
                warn!("Failed to load translation cache {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Save a translation. Errors are logged, never returned.
    pub fn store(&self, content: &str, language: TargetLanguage, entries: &[SubtitleEntry]) {
        let path = self.cache_file(content, language);
        let cached = CachedTranslation {
            language,
            entries: entries.to_vec(),
        };

        let result = fs::create_dir_all(&self.dir)
            .map_err(|e| e.to_string())
            .and_then(|_| serde_json::to_string_pretty(&cached).map_err(|e| e.to_string()))
            .and_then(|json| fs::write(&path, json).map_err(|e| e.to_string()));

        match result {
            Ok(()) => debug!("Stored translation cache: {}", path.display()),
            Err(e) => warn!("Failed to save translation cache {}: {}", path.display(), e),
        }
    }

    /// Get (hits, misses)
    pub fn stats(&self) -> (usize, usize) {
        (*self.hits.read(), *self.misses.read())
    }

    /// Hit rate in the range 0.0..=1.0
    pub fn hit_rate(&self) -> f64 {
        let (hits, misses) = self.stats();
        let total = hits + misses;
        if total == 0 { 0.0 } else { hits as f64 / total as f64 }
    }
}

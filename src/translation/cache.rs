/*!
 * Persistent translation cache.
 *
 * Translations are stored in a JSON object keyed `"src:dst:text"` so that
 * repeated runs only send new texts to the provider. The file is read once at
 * the start of a run and written back atomically at the end; a hand-edited
 * cache file seeds future runs.
 */

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, warn};
use parking_lot::RwLock;

use crate::errors::CacheError;
use crate::file_utils::FileManager;
use crate::formats::yaml;

/// Translation cache for storing and retrieving translations
pub struct TranslationCache {
    /// Location of the persisted cache
    path: PathBuf,

    /// Internal cache storage, sorted so the saved file is stable
    entries: Arc<RwLock<BTreeMap<String, String>>>,
}

impl TranslationCache {
    /// Create an empty cache persisted at `path`
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            entries: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Load the cache from `path`
    ///
    /// A missing file gives an empty cache. An unreadable or undecodable file
    /// is reported and also gives an empty cache.
    pub fn load<P: Into<PathBuf>>(path: P) -> Self {
        let cache = Self::new(path);

        if !cache.path.exists() {
            debug!("No cache file at {:?}, starting empty", cache.path);
            return cache;
        }

        match Self::read_entries(&cache.path) {
            Ok(entries) => {
                debug!("Loaded {} cached translations from {:?}", entries.len(), cache.path);
                *cache.entries.write() = entries;
            }
            Err(e) => warn!("{}; starting with an empty cache", e),
        }

        cache
    }

    fn read_entries(path: &Path) -> Result<BTreeMap<String, String>, CacheError> {
        let corrupt = |reason: String| CacheError::Corrupt {
            path: path.to_path_buf(),
            reason,
        };
        let content = FileManager::read_to_string(path).map_err(|e| corrupt(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| corrupt(e.to_string()))
    }

    /// Build the storage key for a language pair and text
    pub fn key(source_language: &str, target_language: &str, text: &str) -> String {
        format!("{}:{}:{}", source_language, target_language, text)
    }

    /// Get a translation from the cache
    pub fn get(&self, source_language: &str, target_language: &str, text: &str) -> Option<String> {
        let key = Self::key(source_language, target_language, text);
        let found = self.entries.read().get(&key).cloned();

        match &found {
            Some(_) => debug!("Cache hit for '{}' ({} -> {})", truncate_text(text, 30), source_language, target_language),
            None => debug!("Cache miss for '{}' ({} -> {})", truncate_text(text, 30), source_language, target_language),
        }

        found
    }

    /// Store a translation unless the key already exists
    ///
    /// Returns `false` when an entry was already present; it is kept as is.
    pub fn put(&self, source_language: &str, target_language: &str, text: &str, translation: &str) -> bool {
        let key = Self::key(source_language, target_language, text);
        let mut entries = self.entries.write();

        if entries.contains_key(&key) {
            return false;
        }
        entries.insert(key, translation.to_string());

        debug!("Cached translation for '{}' ({} -> {})", truncate_text(text, 30), source_language, target_language);
        true
    }

    /// Seed the cache with `(source, translation)` pairs
    ///
    /// Pairs whose translation is empty or equal to the source are ignored and
    /// existing entries are never overwritten. Returns the number of new entries.
    pub fn merge_pairs<I>(&self, source_language: &str, target_language: &str, pairs: I) -> usize
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut entries = self.entries.write();
        let mut seeded = 0;

        for (source, translation) in pairs {
            if translation.is_empty() || source == translation {
                continue;
            }
            let key = Self::key(source_language, target_language, &source);
            if !entries.contains_key(&key) {
                entries.insert(key, translation);
                seeded += 1;
            }
        }

        seeded
    }

    /// Seed the cache from a previously written line-oriented output file
    ///
    /// Every `key: value` line outside comments and block scalars with
    /// `key != value` is taken as `key -> value`. Returns the number of new
    /// entries; a missing or unreadable file seeds nothing.
    pub fn merge_from_existing_output<P: AsRef<Path>>(
        &self,
        path: P,
        source_language: &str,
        target_language: &str,
    ) -> usize {
        let path = path.as_ref();
        if !FileManager::file_exists(path) {
            return 0;
        }

        let content = match FileManager::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Could not read existing output {:?}: {}", path, e);
                return 0;
            }
        };

        let seeded = self.merge_pairs(source_language, target_language, yaml::parse_entries(&content));
        debug!("Seeded {} translations from existing output {:?}", seeded, path);
        seeded
    }

    /// Persist the whole cache atomically
    pub fn save(&self) -> Result<(), CacheError> {
        let write_error = |reason: String| CacheError::Write {
            path: self.path.clone(),
            reason,
        };

        let json = {
            let entries = self.entries.read();
            serde_json::to_string_pretty(&*entries).map_err(|e| write_error(e.to_string()))?
        };

        FileManager::write_atomic(&self.path, &json).map_err(|e| write_error(e.to_string()))?;
        debug!("Saved {} cached translations to {:?}", self.len(), self.path);
        Ok(())
    }

    /// Get the number of entries in the cache
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Location of the persisted cache
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Clone for TranslationCache {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            entries: self.entries.clone(),
        }
    }
}

/// Truncate text to a maximum number of characters with ellipsis
fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/*!
 * Translation caching functionality.
 *
 * Documents repeat themselves (table headers, boilerplate clauses), so
 * identical extraction units are sent to the provider once per process.
 */

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use parking_lot::RwLock;
use log::debug;

/// Cache key combining source text, source language, and target language
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    /// Source text to translate
    source_text: String,

    /// Source language code
    source_language: String,

    /// Target language code
    target_language: String,
}

impl CacheKey {
    fn new(source_text: &str, source_language: &str, target_language: &str) -> Self {
        Self {
            source_text: source_text.to_string(),
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
        }
    }
}

/// Default number of entries kept
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

/// Entries plus their insertion order, oldest first
#[derive(Default)]
struct CacheEntries {
    map: HashMap<CacheKey, String>,
    order: VecDeque<CacheKey>,
}

/// Translation cache shared by every clone
///
/// Holds at most `max_entries` translations; storing into a full cache
/// evicts the oldest entry.
#[derive(Clone)]
pub struct TranslationCache {
    /// Internal cache storage
    entries: Arc<RwLock<CacheEntries>>,

    /// Cache hit counter
    hits: Arc<AtomicUsize>,

    /// Cache miss counter
    misses: Arc<AtomicUsize>,

    /// Whether caching is enabled
    enabled: bool,

    /// Capacity
    max_entries: usize,
}

impl TranslationCache {
    /// Create a new translation cache
    pub fn new(enabled: bool, max_entries: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(CacheEntries::default())),
            hits: Arc::new(AtomicUsize::new(0)),
            misses: Arc::new(AtomicUsize::new(0)),
            enabled: enabled && max_entries > 0,
            max_entries,
        }
    }

    /// Get a translation from the cache
    pub fn get(&self, source_text: &str, source_language: &str, target_language: &str) -> Option<String> {
        if !self.enabled {
            return None;
        }

        let key = CacheKey::new(source_text, source_language, target_language);
        let cached = self.entries.read().map.get(&key).cloned();

        match &cached {
            Some(_) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!("Cache hit for '{}' ({} -> {})",
                       truncate_text(source_text, 30),
                       source_language,
                       target_language);
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
            }
        }

        cached
    }

    /// Store a translation in the cache
    pub fn store(&self, source_text: &str, source_language: &str, target_language: &str, translation: &str) {
        if !self.enabled {
            return;
        }

        let key = CacheKey::new(source_text, source_language, target_language);
        let mut entries = self.entries.write();
        if let Some(existing) = entries.map.get_mut(&key) {
            *existing = translation.to_string();
            return;
        }

        while entries.map.len() >= self.max_entries {
            let Some(oldest) = entries.order.pop_front() else {
                break;
            };
            entries.map.remove(&oldest);
        }

        entries.order.push_back(key.clone());
        entries.map.insert(key, translation.to_string());
    }

    /// Get cache statistics: hits, misses and hit rate
    pub fn stats(&self) -> (usize, usize, f64) {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;

        let hit_rate = if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        };

        (hits, misses, hit_rate)
    }

    /// Get the number of entries in the cache
    pub fn len(&self) -> usize {
        self.entries.read().map.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.read().map.is_empty()
    }

    /// Check if the cache is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Maximum number of entries kept
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }
}

impl std::fmt::Debug for TranslationCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationCache")
            .field("enabled", &self.is_enabled())
            .field("entries", &self.len())
            .field("max_entries", &self.max_entries)
            .finish()
    }
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new(true, DEFAULT_MAX_ENTRIES)
    }
}

/// Truncate text to a maximum number of characters with ellipsis
fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    }
}

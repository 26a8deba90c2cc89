//! Artifact cache shared across build cycles.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{CacheEntry, CacheError, ChangeSet, Fingerprint};

const CACHE_FILE: &str = "cache.rkyv";

/// How much of the previous cycle's output may be reused.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CacheGranularity {
    /// Reuse each unchanged file individually.
    #[default]
    PerFile,
    /// Reuse everything only when nothing in the tree changed.
    WholeTree,
}

#[derive(rkyv::Archive, rkyv::Serialize, rkyv::Deserialize)]
struct CacheFile {
    settings_hash: String,
    entries: HashMap<String, CacheEntry>,
}

/// Manages cache entries for every file of a source tree.
///
/// Entries are keyed by the file's path relative to the source root.
pub struct ArtifactCache {
    /// In-memory cache entries.
    entries: HashMap<String, CacheEntry>,
    /// Hash of the settings the entries were produced with.
    settings_hash: Option<String>,
    /// Reuse granularity.
    granularity: CacheGranularity,
    /// Directory where the cache file is stored, if persisted.
    cache_dir: Option<PathBuf>,
}

impl ArtifactCache {
    /// Creates a new in-memory cache.
    pub fn new(granularity: CacheGranularity) -> Self {
        Self {
            entries: HashMap::new(),
            settings_hash: None,
            granularity,
            cache_dir: None,
        }
    }

    /// Persists the cache in `cache_dir` on [`save`](Self::save).
    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(cache_dir.into());
        self
    }

    /// Gets a cached entry for a file.
    pub fn get(&self, path: &str) -> Option<&CacheEntry> {
        self.entries.get(path)
    }

    /// Returns true if the entries were produced with `settings_hash`.
    ///
    /// A cache that has never been committed matches nothing.
    pub fn settings_match(&self, settings_hash: &str) -> bool {
        self.settings_hash.as_deref() == Some(settings_hash)
    }

    /// Partitions the current files against the cached entries.
    ///
    /// `current` must yield each relative path once, in tree order; the
    /// returned lists keep that order. Removed files are sorted.
    pub fn diff<'a, I>(&self, current: I) -> ChangeSet
    where
        I: IntoIterator<Item = (&'a str, &'a Fingerprint)>,
    {
        let mut changes = ChangeSet::default();
        let mut seen = HashSet::with_capacity(self.entries.len());

        for (path, fingerprint) in current {
            seen.insert(path);
            match self.entries.get(path) {
                Some(entry) if entry.is_valid(fingerprint) => {
                    changes.unchanged_files.push(path.to_string())
                }
                Some(_) => changes.modified_files.push(path.to_string()),
                None => changes.new_files.push(path.to_string()),
            }
        }

        changes.removed_files = self
            .entries
            .keys()
            .filter(|path| !seen.contains(path.as_str()))
            .cloned()
            .collect();
        changes.removed_files.sort();

        debug!(
            "Cache diff: {} new, {} modified, {} removed, {} unchanged",
            changes.new_files.len(),
            changes.modified_files.len(),
            changes.removed_files.len(),
            changes.unchanged_files.len()
        );

        changes
    }

    /// Returns the files whose cached entries may be reused this cycle.
    pub fn reusable<'c>(&self, changes: &'c ChangeSet) -> &'c [String] {
        match self.granularity {
            CacheGranularity::PerFile => &changes.unchanged_files,
            CacheGranularity::WholeTree if changes.is_empty() => &changes.unchanged_files,
            CacheGranularity::WholeTree => &[],
        }
    }

    /// Replaces every entry with the state of a finished cycle and records
    /// the settings it was produced with.
    pub fn commit(&mut self, settings_hash: &str, entries: HashMap<String, CacheEntry>) {
        if !self.settings_match(settings_hash) && !self.entries.is_empty() {
            info!(
                "Settings changed, replaced {} cache entries",
                self.entries.len()
            );
        }
        self.settings_hash = Some(settings_hash.to_string());
        self.entries = entries;
    }

    /// Loads cache from disk.
    pub fn load(&mut self) -> Result<(), CacheError> {
        let Some(cache_dir) = &self.cache_dir else {
            return Ok(());
        };

        let cache_file = cache_dir.join(CACHE_FILE);
        if !cache_file.exists() {
            debug!("No cache file found at {}", cache_file.display());
            return Ok(());
        }

        let content = fs::read(&cache_file)?;
        let mut aligned = rkyv::util::AlignedVec::<16>::new();
        aligned.extend_from_slice(&content);
        let file = rkyv::from_bytes::<CacheFile, rkyv::rancor::Error>(&aligned)
            .map_err(|e| CacheError::corrupted(e.to_string()))?;

        info!("Loaded {} cache entries", file.entries.len());
        self.settings_hash = Some(file.settings_hash);
        self.entries = file.entries;

        Ok(())
    }

    /// Saves cache to disk.
    pub fn save(&self) -> Result<(), CacheError> {
        let Some(cache_dir) = &self.cache_dir else {
            return Ok(());
        };

        // Ensure cache directory exists
        fs::create_dir_all(cache_dir)?;

        let file = CacheFile {
            settings_hash: self.settings_hash.clone().unwrap_or_default(),
            entries: self.entries.clone(),
        };
        let bytes = rkyv::to_bytes::<rkyv::rancor::Error>(&file)
            .map_err(|e| CacheError::serialization(e.to_string()))?;

        let cache_file = cache_dir.join(CACHE_FILE);
        fs::write(&cache_file, bytes)?;

        info!(
            "Saved {} cache entries to {}",
            self.entries.len(),
            cache_file.display()
        );

        Ok(())
    }

    /// Returns the number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ArtifactCache {
    fn default() -> Self {
        Self::new(CacheGranularity::default())
    }
}

//! Persisted mapping from module identity to content fingerprint.
//!
//! The store is loaded once at pipeline start, mutated in memory as modules
//! are rebuilt, and rewritten wholesale by [`FingerprintStore::save`] at the
//! end of a successful run. Absence of an entry means "never built".

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ferry_common::Fingerprint;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::CacheError;

/// On-disk representation of the store.
#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    /// Ferry version that produced this cache. Invalidated on version change.
    ferry_version: String,
    /// Fingerprint per module identity.
    modules: BTreeMap<String, Fingerprint>,
}

/// In-memory fingerprint cache bound to its backing file.
#[derive(Debug, Clone)]
pub struct FingerprintStore {
    /// Backing cache file.
    path: PathBuf,
    /// Version string written on save and required on load.
    ferry_version: String,
    /// Fingerprint per module identity; at most one entry per identity.
    entries: BTreeMap<String, Fingerprint>,
}

impl FingerprintStore {
    /// Creates an empty store that will be saved to `path`.
    pub fn new(path: &Path, ferry_version: &str) -> Self {
        Self {
            path: path.to_path_buf(),
            ferry_version: ferry_version.to_string(),
            entries: BTreeMap::new(),
        }
    }

    /// Loads the store from `path`, or starts empty.
    ///
    /// This is fail-safe: a missing file, unparseable content, or a cache
    /// written by a different version all yield an empty store, which makes
    /// every module dirty on this run.
    pub fn load(path: &Path, ferry_version: &str) -> Self {
        let mut store = Self::new(path, ferry_version);
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "no fingerprint cache, starting empty");
                return store;
            }
        };
        match serde_json::from_str::<CacheFile>(&content) {
            Ok(file) if file.ferry_version == ferry_version => {
                store.entries = file.modules;
            }
            Ok(file) => {
                warn!(
                    path = %path.display(),
                    cached = %file.ferry_version,
                    current = %ferry_version,
                    "fingerprint cache written by another version, ignoring it"
                );
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "corrupt fingerprint cache, ignoring it");
            }
        }
        store
    }

    /// Writes the whole store to its backing file.
    ///
    /// The content goes to a sibling temporary file first and is then renamed
    /// over the cache, so an interrupted save never leaves a torn file.
    pub fn save(&self) -> Result<(), CacheError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| CacheError::Io {
                path: dir.to_path_buf(),
                source: e,
            })?;
        }
        let file = CacheFile {
            ferry_version: self.ferry_version.clone(),
            modules: self.entries.clone(),
        };
        let json = serde_json::to_string_pretty(&file).map_err(|e| CacheError::Serialization {
            reason: e.to_string(),
        })?;

        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json).map_err(|e| CacheError::Io {
            path: tmp.clone(),
            source: e,
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|e| CacheError::Io {
            path: self.path.clone(),
            source: e,
        })?;
        debug!(path = %self.path.display(), entries = self.entries.len(), "saved fingerprint cache");
        Ok(())
    }

    /// Returns the stored fingerprint for a module identity.
    pub fn get(&self, identity: &str) -> Option<&Fingerprint> {
        self.entries.get(identity)
    }

    /// Records the fingerprint of a successfully built module.
    pub fn insert(&mut self, identity: &str, fingerprint: Fingerprint) {
        self.entries.insert(identity.to_string(), fingerprint);
    }

    /// Returns `true` if no module has ever been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of recorded modules.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl PartialEq for FingerprintStore {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

//! Processed-content cache
//!
//! Maps a content fingerprint to the directory holding the artifacts
//! produced from that content. An entry is only a hint: `resolve` checks the
//! directory is still there and still holds artifacts before trusting it,
//! and drops the entry when it does not.

use crate::store::{KeyValueStore, Namespace};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Extensions counted as artifacts unless the caller says otherwise
pub const DEFAULT_ARTIFACT_EXTENSIONS: &[&str] = &["mp4"];

/// Cache entries live at the top level of the document
const NAMESPACE: Namespace<'static> = Namespace::Root;

/// A recorded fingerprint -> artifact location
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheEntry {
    pub fingerprint: String,
    pub artifact_path: PathBuf,
}

/// Outcome of checking whether content was already processed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheResolution {
    /// No live artifacts are known for the content
    NotProcessed,
    /// Artifacts exist at `artifact_path`
    Processed {
        artifact_path: PathBuf,
        artifact_count: usize,
    },
}

impl CacheResolution {
    /// Whether the work can be skipped
    pub fn is_processed(&self) -> bool {
        matches!(self, Self::Processed { .. })
    }

    /// The live artifact directory, if any
    pub fn artifact_path(&self) -> Option<&Path> {
        match self {
            Self::Processed { artifact_path, .. } => Some(artifact_path),
            Self::NotProcessed => None,
        }
    }
}

/// Why a recorded artifact directory can no longer be trusted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Staleness {
    Missing,
    NotDirectory,
    Empty,
    Unreadable,
}

/// Content-addressed view over a store
pub struct ContentCache<'s, S: KeyValueStore> {
    store: &'s mut S,
    extensions: Vec<String>,
}

impl<'s, S: KeyValueStore> ContentCache<'s, S> {
    /// Create a cache counting `.mp4` files as artifacts
    pub fn new(store: &'s mut S) -> Self {
        Self {
            store,
            extensions: DEFAULT_ARTIFACT_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }

    /// Replace the artifact extensions (without the leading dot)
    pub fn with_extensions<I, T>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| Into::<String>::into(e).trim_start_matches('.').to_ascii_lowercase())
            .collect();
        self
    }

    /// Whether an entry exists, without looking at the filesystem
    pub fn is_processed(&self, fingerprint: &str) -> bool {
        self.store.key_exists(NAMESPACE, fingerprint)
    }

    /// The recorded artifact path, without looking at the filesystem
    ///
    /// Use [`resolve`](Self::resolve) before skipping any work.
    pub fn artifact_path(&self, fingerprint: &str) -> Option<PathBuf> {
        self.store
            .get_str(NAMESPACE, fingerprint)
            .map(PathBuf::from)
    }

    /// Record that `fingerprint` produced artifacts under `artifact_path`
    pub fn mark_processed(&mut self, fingerprint: &str, artifact_path: &Path) {
        self.store.put(
            NAMESPACE,
            fingerprint,
            Value::String(artifact_path.to_string_lossy().into_owned()),
        );
        debug!("Marked {} processed at {}", fingerprint, artifact_path.display());
    }

    /// Decide whether the work for `fingerprint` is already done
    ///
    /// An entry whose directory is gone, is not a directory, or holds no
    /// artifacts is removed from the store and reported as not processed.
    pub fn resolve(&mut self, fingerprint: &str) -> CacheResolution {
        if !self.is_processed(fingerprint) {
            debug!("Content not yet processed (fingerprint: {})", fingerprint);
            return CacheResolution::NotProcessed;
        }

        let Some(artifact_path) = self.artifact_path(fingerprint) else {
            warn!("Cache entry {} does not hold a path", fingerprint);
            self.evict(fingerprint);
            return CacheResolution::NotProcessed;
        };

        match self.liveness(&artifact_path) {
            Ok(artifact_count) => {
                debug!(
                    "Content already processed: {} ({} artifacts)",
                    artifact_path.display(),
                    artifact_count
                );
                CacheResolution::Processed {
                    artifact_path,
                    artifact_count,
                }
            }
            Err(staleness) => {
                match staleness {
                    Staleness::Missing => {
                        info!("Artifact directory no longer exists: {}", artifact_path.display())
                    }
                    Staleness::NotDirectory => {
                        info!("Artifact path is not a directory: {}", artifact_path.display())
                    }
                    Staleness::Empty => {
                        info!("Artifact directory holds no artifacts: {}", artifact_path.display())
                    }
                    Staleness::Unreadable => {
                        warn!("Artifact directory cannot be read: {}", artifact_path.display())
                    }
                }
                self.evict(fingerprint);
                CacheResolution::NotProcessed
            }
        }
    }

    /// Drop an entry, returning whether one existed
    pub fn forget(&mut self, fingerprint: &str) -> bool {
        if self.store.delete_key(NAMESPACE, fingerprint).is_some() {
            self.store.persist();
            true
        } else {
            false
        }
    }

    /// All recorded entries, unverified
    pub fn entries(&self) -> Vec<CacheEntry> {
        self.store
            .keys(NAMESPACE)
            .into_iter()
            .filter_map(|fingerprint| {
                let artifact_path = self.artifact_path(&fingerprint)?;
                Some(CacheEntry {
                    fingerprint,
                    artifact_path,
                })
            })
            .collect()
    }

    /// Resolve every entry, returning how many stale ones were removed
    pub fn prune(&mut self) -> usize {
        let fingerprints = self.store.keys(NAMESPACE);
        let total = fingerprints.len();

        let removed = fingerprints
            .iter()
            .filter(|fp| !self.resolve(fp).is_processed())
            .count();

        info!("Pruned {} of {} cache entries", removed, total);
        removed
    }

    fn evict(&mut self, fingerprint: &str) {
        info!("Removing stale cache entry for fingerprint: {}", fingerprint);
        self.store.delete_key(NAMESPACE, fingerprint);
        self.store.persist();
    }

    fn liveness(&self, artifact_path: &Path) -> Result<usize, Staleness> {
        if !artifact_path.exists() {
            return Err(Staleness::Missing);
        }
        if !artifact_path.is_dir() {
            return Err(Staleness::NotDirectory);
        }

        match count_artifacts(artifact_path, &self.extensions) {
            Ok(0) => Err(Staleness::Empty),
            Ok(count) => Ok(count),
            Err(_) => Err(Staleness::Unreadable),
        }
    }
}

/// Directory an artifact set for `fingerprint` is written under
pub fn artifact_dir(output_root: &Path, output_dir: &str, fingerprint: &str) -> PathBuf {
    output_root.join(output_dir).join(fingerprint)
}

/// Count regular files in `dir` whose extension is in `extensions`
///
/// Extensions match case-insensitively, with or without a leading dot.
pub fn count_artifacts(dir: &Path, extensions: &[String]) -> io::Result<usize> {
    let mut count = 0;

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && has_extension(&path, extensions) {
            count += 1;
        }
    }

    Ok(count)
}

pub(crate) fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            extensions
                .iter()
                .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(ext))
        })
}

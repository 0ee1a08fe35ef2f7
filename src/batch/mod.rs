//! Incremental batch loading
//!
//! Scans a directory for media files and serves them one per call through a
//! labelled cursor, so a pipeline that runs once per item walks the whole
//! directory without tracking anything itself.

use crate::cache::processed::has_extension;
use crate::cursor::{CursorStore, ReevaluationPolicy};
use crate::error::{ReelError, ReelResult};
use crate::store::KeyValueStore;
use glob::{MatchOptions, Pattern};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Image extensions accepted by default
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "webp", "tiff", "tif"];

/// Video extensions accepted by default
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "avi", "mov", "mkv", "webm", "flv", "wmv", "m4v", "mpg", "mpeg",
];

/// Kind of media a batch walks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Extensions accepted for this kind
    pub fn default_extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Image => IMAGE_EXTENSIONS,
            Self::Video => VIDEO_EXTENSIONS,
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image => write!(f, "image"),
            Self::Video => write!(f, "video"),
        }
    }
}

/// One item served from a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchItem {
    /// Absolute path of the file
    pub path: PathBuf,
    /// File name without directory
    pub filename: String,
    /// Position of the file in the sorted batch
    pub index: usize,
    /// Number of files in the batch
    pub total: usize,
}

impl BatchItem {
    fn new(items: &[PathBuf], index: usize) -> Self {
        let path = items[index].clone();
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path,
            filename,
            index,
            total: items.len(),
        }
    }
}

/// List files under `dir` matching `pattern` with an allowed extension
///
/// The pattern is glob syntax relative to `dir` (`**` recurses). Wildcards
/// never match a leading dot. Results are absolute and sorted by path string.
pub fn scan(dir: &Path, pattern: &str, extensions: &[String]) -> ReelResult<Vec<PathBuf>> {
    if !dir.exists() {
        return Err(ReelError::PathNotFound(dir.to_path_buf()));
    }

    let base = std::path::absolute(dir)
        .map_err(|e| ReelError::io(format!("resolving {}", dir.display()), e))?;
    let search = format!(
        "{}/{}",
        Pattern::escape(&base.to_string_lossy()),
        pattern
    );

    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: true,
    };

    let entries = glob::glob_with(&search, options).map_err(|e| ReelError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })?;

    let mut items: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .filter(|path| path.is_file() && has_extension(path, extensions))
        .collect();
    // Whole-path string order, so "a-b.png" precedes "a/c.png"
    items.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));

    debug!(
        "Scanned {} with {}: {} items",
        dir.display(),
        pattern,
        items.len()
    );
    Ok(items)
}

/// Serves directory items through a labelled cursor
pub struct BatchLoader<'s, S: KeyValueStore> {
    cursor: CursorStore<'s, S>,
    extensions: Vec<String>,
}

impl<'s, S: KeyValueStore> BatchLoader<'s, S> {
    /// Every call advances a cursor
    pub const REEVALUATION: ReevaluationPolicy = ReevaluationPolicy::EveryCall;

    /// Create a loader accepting the default extensions for `kind`
    pub fn new(store: &'s mut S, kind: MediaKind) -> Self {
        Self {
            cursor: CursorStore::new(store),
            extensions: kind
                .default_extensions()
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }

    /// Replace the accepted extensions (without the leading dot)
    pub fn with_extensions(mut self, extensions: &[String]) -> Self {
        self.extensions = extensions
            .iter()
            .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
            .collect();
        self
    }

    /// Serve the next item for `label`, advancing its cursor
    pub fn next(&mut self, label: &str, dir: &Path, pattern: &str) -> ReelResult<BatchItem> {
        let items = scan(dir, pattern, &self.extensions)?;
        let index = self
            .cursor
            .next_index(label, &dir.to_string_lossy(), pattern, items.len())?;

        let item = BatchItem::new(&items, index);
        info!(
            "{} - Loaded: {} ({}/{})",
            label,
            item.filename,
            item.index + 1,
            item.total
        );
        Ok(item)
    }

    /// Serve a specific item without touching any cursor
    pub fn item_at(&self, dir: &Path, pattern: &str, index: usize) -> ReelResult<BatchItem> {
        let items = scan(dir, pattern, &self.extensions)?;
        if index >= items.len() {
            return Err(ReelError::IndexOutOfRange {
                index,
                total: items.len(),
            });
        }
        Ok(BatchItem::new(&items, index))
    }
}

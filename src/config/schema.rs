//! Configuration schema for reelstate
//!
//! Configuration is stored at `~/.config/reelstate/config.toml`

use crate::batch::{MediaKind, IMAGE_EXTENSIONS, VIDEO_EXTENSIONS};
use crate::cache::DEFAULT_ARTIFACT_EXTENSIONS;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Where state files live
    pub store: StoreConfig,

    /// Processed-content cache settings
    pub cache: CacheConfig,

    /// Batch loading settings
    pub batch: BatchConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// State file settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding the state files (default: platform state dir)
    pub state_dir: Option<PathBuf>,

    /// File name of the processed-content cache
    pub processed_file: String,

    /// File name of the image batch cursors
    pub image_batch_file: String,

    /// File name of the video batch cursors
    pub video_batch_file: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            state_dir: None,
            processed_file: "processed_videos.json".to_string(),
            image_batch_file: "image_batch_state.json".to_string(),
            video_batch_file: "video_batch_state.json".to_string(),
        }
    }
}

/// Processed-content cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Extensions counted as artifacts when checking liveness
    pub artifact_extensions: Vec<String>,

    /// Root under which artifact directories are created
    pub output_root: Option<PathBuf>,

    /// Directory under `output_root` grouping artifact sets
    pub output_dir: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            artifact_extensions: to_strings(DEFAULT_ARTIFACT_EXTENSIONS),
            output_root: None,
            output_dir: "video_chunks".to_string(),
        }
    }
}

/// Batch loading configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Glob pattern used when none is given
    pub default_pattern: String,

    /// Extensions accepted for image batches
    pub image_extensions: Vec<String>,

    /// Extensions accepted for video batches
    pub video_extensions: Vec<String>,
}

impl BatchConfig {
    /// Accepted extensions for a media kind
    pub fn extensions(&self, kind: MediaKind) -> &[String] {
        match kind {
            MediaKind::Image => &self.image_extensions,
            MediaKind::Video => &self.video_extensions,
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            default_pattern: "*".to_string(),
            image_extensions: to_strings(IMAGE_EXTENSIONS),
            video_extensions: to_strings(VIDEO_EXTENSIONS),
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

//! Configuration management for reelstate

pub mod schema;

pub use schema::Config;

use crate::batch::MediaKind;
use crate::error::{ReelError, ReelResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("reelstate")
            .join("config.toml")
    }

    /// Get the default state directory path
    pub fn default_state_dir() -> PathBuf {
        dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("reelstate")
    }

    /// Load configuration, falling back to defaults if missing
    pub fn load(&self) -> ReelResult<Config> {
        if !self.config_path.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Config::default());
        }

        self.load_from_file(&self.config_path)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(&self, path: &Path) -> ReelResult<Config> {
        let content = fs::read_to_string(path)
            .map_err(|e| ReelError::io(format!("reading config from {}", path.display()), e))?;

        toml::from_str(&content).map_err(|e| ReelError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Save configuration to file
    pub fn save(&self, config: &Config) -> ReelResult<()> {
        self.ensure_config_dir()?;

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).map_err(|e| {
            ReelError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    /// Ensure the config directory exists
    fn ensure_config_dir(&self) -> ReelResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ReelError::ConfigDirCreate {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        Ok(())
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Backing files for each store purpose
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatePaths {
    pub processed: PathBuf,
    pub image_batches: PathBuf,
    pub video_batches: PathBuf,
}

impl StatePaths {
    /// Resolve state files, preferring `state_dir` over the configured one
    pub fn resolve(config: &Config, state_dir: Option<&Path>) -> Self {
        let dir = state_dir
            .map(Path::to_path_buf)
            .or_else(|| config.store.state_dir.clone())
            .unwrap_or_else(ConfigManager::default_state_dir);

        Self {
            processed: dir.join(&config.store.processed_file),
            image_batches: dir.join(&config.store.image_batch_file),
            video_batches: dir.join(&config.store.video_batch_file),
        }
    }

    /// Cursor file for a media kind
    pub fn batches(&self, kind: MediaKind) -> &Path {
        match kind {
            MediaKind::Image => &self.image_batches,
            MediaKind::Video => &self.video_batches,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_default_when_missing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nonexistent.toml");
        let manager = ConfigManager::with_path(path);

        let config = manager.load().unwrap();
        assert_eq!(config.general.log_format, "text");
    }

    #[test]
    fn save_and_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");
        let manager = ConfigManager::with_path(path);

        let mut config = Config::default();
        config.cache.output_dir = "chunks".to_string();

        manager.save(&config).unwrap();
        let loaded = manager.load().unwrap();

        assert_eq!(loaded.cache.output_dir, "chunks");
    }

    #[test]
    fn invalid_config_is_reported() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[store\nbroken").unwrap();

        let err = ConfigManager::with_path(path).load().unwrap_err();
        assert!(matches!(err, ReelError::ConfigInvalid { .. }));
    }

    #[test]
    fn state_paths_prefer_override() {
        let mut config = Config::default();
        config.store.state_dir = Some(PathBuf::from("/configured"));

        let paths = StatePaths::resolve(&config, Some(Path::new("/override")));
        assert_eq!(paths.processed, PathBuf::from("/override/processed_videos.json"));

        let paths = StatePaths::resolve(&config, None);
        assert_eq!(
            paths.batches(MediaKind::Video),
            Path::new("/configured/video_batch_state.json")
        );
    }
}

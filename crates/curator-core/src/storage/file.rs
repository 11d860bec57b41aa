use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::StorageConfig;
use crate::state::{RunState, VideoRecord};

use super::error::StorageError;
use super::Storage;

/// File-based storage implementation.
///
/// Stores two pretty-printed JSON files in the data directory:
/// ```text
/// {data_dir}/
///   playlists_to_process.json   # Run state (playlists + track progress)
///   video_info_cache.json       # Collected video metadata, by position
/// ```
///
/// Both are meant to be readable and hand-editable.
pub struct FileStorage {
    config: StorageConfig,
}

impl FileStorage {
    /// Creates a new FileStorage with default config (current directory).
    pub fn new() -> Self {
        Self {
            config: StorageConfig::default(),
        }
    }

    /// Creates a new FileStorage rooted at the given directory.
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        Self::with_config(StorageConfig {
            data_dir: data_dir.as_ref().to_string_lossy().to_string(),
            ..StorageConfig::default()
        })
    }

    /// Creates a new FileStorage with custom configuration.
    pub fn with_config(config: StorageConfig) -> Self {
        Self { config }
    }

    /// Returns the path to the run state file.
    fn state_file(&self) -> PathBuf {
        self.config.state_path()
    }

    /// Returns the path to the video cache file.
    fn cache_file(&self) -> PathBuf {
        self.config.cache_path()
    }

    /// Ensures the data directory exists.
    fn ensure_data_dir(&self) -> Result<(), StorageError> {
        let dir = PathBuf::from(&self.config.data_dir);
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| StorageError::io(&dir, e))?;
        }
        Ok(())
    }

    /// Serializes `value` next to `path` and renames it into place, so a
    /// crash mid-write leaves the previous snapshot intact.
    fn write_json<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> Result<(), StorageError> {
        self.ensure_data_dir()?;

        let json = serde_json::to_string_pretty(value)?;
        let tmp = path.with_extension("json.tmp");

        let mut file = fs::File::create(&tmp).map_err(|e| StorageError::io(&tmp, e))?;
        file.write_all(json.as_bytes())
            .map_err(|e| StorageError::io(&tmp, e))?;
        file.sync_all().map_err(|e| StorageError::io(&tmp, e))?;
        drop(file);

        fs::rename(&tmp, path).map_err(|e| StorageError::io(path, e))?;
        debug!(path = %path.display(), bytes = json.len(), "snapshot written");

        Ok(())
    }

    fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>, StorageError> {
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(path).map_err(|e| StorageError::io(path, e))?;
        let value = serde_json::from_str(&json).map_err(|e| StorageError::corrupt(path, e))?;

        Ok(Some(value))
    }

    fn remove_if_exists(path: &Path) -> Result<(), StorageError> {
        if path.exists() {
            fs::remove_file(path).map_err(|e| StorageError::io(path, e))?;
        }
        Ok(())
    }
}

impl Default for FileStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for FileStorage {
    fn save_run_state(&self, state: &RunState) -> Result<(), StorageError> {
        self.write_json(&self.state_file(), state)
    }

    fn load_run_state(&self) -> Result<Option<RunState>, StorageError> {
        self.read_json(&self.state_file())
    }

    fn save_video_cache(&self, records: &[VideoRecord]) -> Result<(), StorageError> {
        self.write_json(&self.cache_file(), records)
    }

    fn load_video_cache(&self) -> Result<Option<Vec<VideoRecord>>, StorageError> {
        self.read_json(&self.cache_file())
    }

    fn run_state_exists(&self) -> bool {
        self.state_file().exists()
    }

    fn clear(&self) -> Result<(), StorageError> {
        Self::remove_if_exists(&self.state_file())?;
        Self::remove_if_exists(&self.cache_file())?;
        Ok(())
    }

    fn run_state_location(&self) -> PathBuf {
        self.state_file()
    }

    fn video_cache_location(&self) -> PathBuf {
        self.cache_file()
    }
}

mod error;
mod file;

pub use error::StorageError;
pub use file::FileStorage;

use std::path::PathBuf;

use crate::state::{RunState, VideoRecord};

/// Trait for snapshot storage backends.
///
/// Two snapshots are kept independently: the run state (planned playlists
/// and per-track progress) and the video metadata cache. A resumed run
/// needs both.
pub trait Storage {
    /// Replaces the stored run state.
    fn save_run_state(&self, state: &RunState) -> Result<(), StorageError>;

    /// Loads the run state, or `None` if none has been saved yet.
    fn load_run_state(&self) -> Result<Option<RunState>, StorageError>;

    /// Replaces the stored video metadata cache.
    fn save_video_cache(&self, records: &[VideoRecord]) -> Result<(), StorageError>;

    /// Loads the video metadata cache, or `None` if none has been saved yet.
    fn load_video_cache(&self) -> Result<Option<Vec<VideoRecord>>, StorageError>;

    /// Whether a run state snapshot exists.
    fn run_state_exists(&self) -> bool;

    /// Removes both snapshots.
    fn clear(&self) -> Result<(), StorageError>;

    /// Human-readable location of the run state, for messages.
    fn run_state_location(&self) -> PathBuf;

    /// Human-readable location of the video cache, for messages.
    fn video_cache_location(&self) -> PathBuf;
}

impl<S: Storage + ?Sized> Storage for &S {
    fn save_run_state(&self, state: &RunState) -> Result<(), StorageError> {
        (**self).save_run_state(state)
    }

    fn load_run_state(&self) -> Result<Option<RunState>, StorageError> {
        (**self).load_run_state()
    }

    fn save_video_cache(&self, records: &[VideoRecord]) -> Result<(), StorageError> {
        (**self).save_video_cache(records)
    }

    fn load_video_cache(&self) -> Result<Option<Vec<VideoRecord>>, StorageError> {
        (**self).load_video_cache()
    }

    fn run_state_exists(&self) -> bool {
        (**self).run_state_exists()
    }

    fn clear(&self) -> Result<(), StorageError> {
        (**self).clear()
    }

    fn run_state_location(&self) -> PathBuf {
        (**self).run_state_location()
    }

    fn video_cache_location(&self) -> PathBuf {
        (**self).video_cache_location()
    }
}

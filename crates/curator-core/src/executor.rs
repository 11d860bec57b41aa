use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::state::{RunState, TrackStatus, VideoRecord};
use crate::storage::{Storage, StorageError};
use crate::youtube::{PlatformError, VideoPlatform};

/// How an execution pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// Every grouping was visited without a quota interruption
    Finished,
    /// The platform reported quota exhaustion; progress is saved
    QuotaExceeded,
}

/// Materializes planned groupings on the video platform.
///
/// Walks the run state in stored order, creating missing playlists and
/// inserting pending tracks. The state is persisted after every mutation so
/// an interrupted pass loses at most the call in flight. Nothing is retried
/// within a pass: failed tracks stay failed and skipped tracks stay skipped.
pub struct Executor<P: VideoPlatform, S: Storage> {
    platform: P,
    storage: S,
}

impl<P: VideoPlatform, S: Storage> Executor<P, S> {
    pub fn new(platform: P, storage: S) -> Self {
        Self { platform, storage }
    }

    /// Runs one execution pass over `state`.
    ///
    /// `records` is the cached metadata; track positions index into it.
    pub async fn run(
        &self,
        state: &mut RunState,
        records: &[VideoRecord],
    ) -> Result<ExecutionOutcome, ExecutorError> {
        let total = state.playlists.len();

        for index in 0..total {
            if state.playlists[index].is_completed() {
                debug!(
                    "Skipping completed playlist '{}'",
                    state.playlists[index].title
                );
                continue;
            }

            info!(
                "Processing playlist {}/{}: '{}'",
                index + 1,
                total,
                state.playlists[index].title
            );

            if state.playlists[index].remote_id.is_none() {
                let grouping = &state.playlists[index];
                match self
                    .platform
                    .create_playlist(&grouping.title, &grouping.description)
                    .await
                {
                    Ok(remote_id) => {
                        info!("Created playlist '{}' ({})", grouping.title, remote_id);
                        state.playlists[index].remote_id = Some(remote_id);
                        state.touch();
                        self.persist(state)?;
                    }
                    Err(e) if ends_pass(&e) => return self.stop(state, e),
                    Err(e) => {
                        error!(
                            "Failed to create playlist '{}': {}",
                            state.playlists[index].title, e
                        );
                        continue;
                    }
                }
            }

            if let Some(outcome) = self.fill(state, index, records).await? {
                return Ok(outcome);
            }

            let grouping = &mut state.playlists[index];
            if grouping.refresh_status() {
                info!(
                    "Playlist '{}' completed: {} added, {} failed, {} skipped",
                    grouping.title,
                    grouping.count(TrackStatus::Completed),
                    grouping.count(TrackStatus::Failed),
                    grouping.count(TrackStatus::Skipped)
                );
                state.touch();
                self.persist(state)?;
            }
        }

        self.persist(state)?;
        Ok(ExecutionOutcome::Finished)
    }

    /// Attempts every pending track of the grouping at `index`.
    ///
    /// Returns `Some` when the pass must stop.
    async fn fill(
        &self,
        state: &mut RunState,
        index: usize,
        records: &[VideoRecord],
    ) -> Result<Option<ExecutionOutcome>, ExecutorError> {
        let Some(remote_id) = state.playlists[index].remote_id.clone() else {
            return Ok(None);
        };

        for slot in 0..state.playlists[index].tracks.len() {
            let task = state.playlists[index].tracks[slot];
            if task.status != TrackStatus::Pending {
                continue;
            }

            let resolved = usize::try_from(task.position)
                .ok()
                .and_then(|position| records.get(position));
            let Some(record) = resolved else {
                warn!(
                    "Skipping index {}: no cached video at that position",
                    task.position
                );
                state.playlists[index].tracks[slot].status = TrackStatus::Skipped;
                state.touch();
                self.persist(state)?;
                continue;
            };

            match self
                .platform
                .insert_playlist_item(&remote_id, &record.id)
                .await
            {
                Ok(()) => {
                    info!("Added '{}' ({})", record.title, record.id);
                    state.playlists[index].tracks[slot].status = TrackStatus::Completed;
                }
                Err(e) if ends_pass(&e) => return self.stop(state, e).map(Some),
                Err(e) => {
                    error!("Failed to add '{}' ({}): {}", record.title, record.id, e);
                    state.playlists[index].tracks[slot].status = TrackStatus::Failed;
                }
            }
            state.touch();
            self.persist(state)?;
        }

        Ok(None)
    }

    /// Saves progress and ends the pass on quota exhaustion or a credential
    /// failure.
    fn stop(
        &self,
        state: &RunState,
        error: PlatformError,
    ) -> Result<ExecutionOutcome, ExecutorError> {
        self.persist(state)?;

        if error.is_unauthorized() {
            error!("Credentials rejected: {}. Progress saved.", error);
            return Err(ExecutorError::Unauthorized(error));
        }
        if error.is_credential_failure() {
            error!("Could not obtain an access token: {}. Progress saved.", error);
            return Err(ExecutorError::Credentials(error));
        }

        warn!("Quota exceeded: {}. Progress saved.", error);
        Ok(ExecutionOutcome::QuotaExceeded)
    }

    fn persist(&self, state: &RunState) -> Result<(), ExecutorError> {
        self.storage.save_run_state(state)?;
        debug!(
            "Saved run state to {}",
            self.storage.run_state_location().display()
        );
        Ok(())
    }
}

fn ends_pass(error: &PlatformError) -> bool {
    error.is_quota_exceeded() || error.is_credential_failure()
}

/// Errors that abort an execution pass.
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("Failed to save progress: {0}")]
    Storage(#[from] StorageError),

    #[error("Platform rejected the credentials: {0}")]
    Unauthorized(#[source] PlatformError),

    #[error("Could not obtain credentials: {0}")]
    Credentials(#[source] PlatformError),
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata for one collected video.
///
/// Collected once per first run and cached; the position of a record in the
/// cached sequence is the index the planner and executor refer to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRecord {
    /// Platform video id
    #[serde(rename = "video_id")]
    pub id: String,
    pub title: String,
    pub description: String,
}

impl VideoRecord {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Progress of a planned playlist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlaylistStatus {
    #[default]
    Pending,
    /// Every track has left `Pending`
    Completed,
}

/// Outcome of inserting one video into one playlist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackStatus {
    /// Not attempted yet
    #[default]
    Pending,
    /// Inserted into the remote playlist
    Completed,
    /// Insertion rejected for a reason other than quota
    Failed,
    /// Position does not resolve to a cached video
    Skipped,
}

impl TrackStatus {
    /// Terminal states are never retried.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TrackStatus::Pending)
    }
}

/// One unit of insertion work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackTask {
    /// 0-based index into the cached video records, as the model gave it.
    /// Negative or out-of-range values never resolve.
    #[serde(rename = "index")]
    pub position: i64,
    pub status: TrackStatus,
}

impl TrackTask {
    pub fn pending(position: i64) -> Self {
        Self {
            position,
            status: TrackStatus::Pending,
        }
    }
}

/// A themed playlist suggested by the model, and its materialization progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grouping {
    #[serde(rename = "playlist_title")]
    pub title: String,
    #[serde(rename = "playlist_description", default)]
    pub description: String,
    #[serde(default)]
    pub status: PlaylistStatus,
    /// Set once the playlist exists on the platform
    #[serde(rename = "youtube_playlist_id", default)]
    pub remote_id: Option<String>,
    pub tracks: Vec<TrackTask>,
}

impl Grouping {
    /// Creates an unmaterialized grouping whose tracks are all pending.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        positions: impl IntoIterator<Item = i64>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            status: PlaylistStatus::Pending,
            remote_id: None,
            tracks: positions.into_iter().map(TrackTask::pending).collect(),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == PlaylistStatus::Completed
    }

    /// Number of tracks still waiting for an insertion attempt.
    pub fn pending_tracks(&self) -> usize {
        self.tracks
            .iter()
            .filter(|t| t.status == TrackStatus::Pending)
            .count()
    }

    /// Counts tracks in the given status.
    pub fn count(&self, status: TrackStatus) -> usize {
        self.tracks.iter().filter(|t| t.status == status).count()
    }

    /// Marks the grouping completed once no track is pending and the
    /// playlist exists remotely.
    ///
    /// Returns true if the status changed.
    pub fn refresh_status(&mut self) -> bool {
        let done = self.remote_id.is_some() && self.tracks.iter().all(|t| t.status.is_terminal());
        let next = if done {
            PlaylistStatus::Completed
        } else {
            PlaylistStatus::Pending
        };
        let changed = next != self.status;
        self.status = next;
        changed
    }
}

/// The persisted plan: every grouping and the status of each of its tracks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunState {
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    pub playlists: Vec<Grouping>,
}

impl RunState {
    pub fn new(playlists: Vec<Grouping>) -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
            playlists,
        }
    }

    /// Records that the state was mutated.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// True when no grouping has work left.
    pub fn is_finished(&self) -> bool {
        self.playlists.iter().all(Grouping::is_completed)
    }

    /// Aggregated counts for status reporting.
    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary {
            playlists_total: self.playlists.len(),
            ..RunSummary::default()
        };

        for playlist in &self.playlists {
            if playlist.is_completed() {
                summary.playlists_completed += 1;
            }
            if playlist.remote_id.is_some() {
                summary.playlists_created += 1;
            }
            for track in &playlist.tracks {
                match track.status {
                    TrackStatus::Pending => summary.tracks_pending += 1,
                    TrackStatus::Completed => summary.tracks_completed += 1,
                    TrackStatus::Failed => summary.tracks_failed += 1,
                    TrackStatus::Skipped => summary.tracks_skipped += 1,
                }
            }
        }

        summary
    }
}

/// Counts of playlists and tracks by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub playlists_total: usize,
    pub playlists_created: usize,
    pub playlists_completed: usize,
    pub tracks_pending: usize,
    pub tracks_completed: usize,
    pub tracks_failed: usize,
    pub tracks_skipped: usize,
}

impl RunSummary {
    pub fn tracks_total(&self) -> usize {
        self.tracks_pending + self.tracks_completed + self.tracks_failed + self.tracks_skipped
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{} playlists complete ({} created); tracks: {} completed, {} failed, {} skipped, {} pending",
            self.playlists_completed,
            self.playlists_total,
            self.playlists_created,
            self.tracks_completed,
            self.tracks_failed,
            self.tracks_skipped,
            self.tracks_pending,
        )
    }
}

use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, info};

use crate::config::DEFAULT_BATCH_SIZE;
use crate::state::VideoRecord;
use crate::youtube::{PlatformError, VideoPlatform};

/// Gathers video ids from source playlists and fetches their metadata.
pub struct Collector<P: VideoPlatform> {
    platform: P,
    batch_size: usize,
}

impl<P: VideoPlatform> Collector<P> {
    /// Creates a collector using the platform's per-request limit.
    pub fn new(platform: P) -> Self {
        Self {
            platform,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Sets how many ids go into one metadata request.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Collects the ids of every video in the given playlists.
    ///
    /// Each id appears once, in the order it was first seen across the
    /// playlists taken in the order given.
    pub async fn collect_unique_ids(
        &self,
        source_playlist_ids: &[String],
    ) -> Result<Vec<String>, CollectorError> {
        let mut seen = HashSet::new();
        let mut unique = Vec::new();
        let mut total = 0usize;

        for playlist_id in source_playlist_ids {
            info!("Collecting ids from playlist {}", playlist_id);
            let mut page_token: Option<String> = None;

            loop {
                let page = self
                    .platform
                    .list_playlist_page(playlist_id, page_token.as_deref())
                    .await
                    .map_err(|source| CollectorError::Listing {
                        playlist_id: playlist_id.clone(),
                        source,
                    })?;

                total += page.video_ids.len();
                for id in page.video_ids {
                    if seen.insert(id.clone()) {
                        unique.push(id);
                    }
                }

                match page.next_page_token {
                    Some(token) => page_token = Some(token),
                    None => break,
                }
            }
        }

        info!(
            "Collected {} unique video ids from {} entries",
            unique.len(),
            total
        );
        Ok(unique)
    }

    /// Fetches title and description for each id, in batches.
    ///
    /// Results keep batch order. Ids the platform does not know are dropped,
    /// so positions in the returned list do not line up with `ids`.
    pub async fn fetch_metadata(&self, ids: &[String]) -> Result<Vec<VideoRecord>, CollectorError> {
        info!(
            "Fetching details for {} videos in batches of {}",
            ids.len(),
            self.batch_size
        );

        let mut records = Vec::with_capacity(ids.len());

        for (batch_index, batch) in ids.chunks(self.batch_size).enumerate() {
            let found = self
                .platform
                .list_videos(batch)
                .await
                .map_err(|source| CollectorError::Metadata {
                    batch: batch_index,
                    source,
                })?;

            if found.len() < batch.len() {
                debug!(
                    "Batch {}: {} of {} ids resolved",
                    batch_index,
                    found.len(),
                    batch.len()
                );
            }
            records.extend(found);
        }

        info!("Fetched {} video records", records.len());
        Ok(records)
    }
}

/// Errors that can occur while collecting videos.
#[derive(Debug, Error)]
pub enum CollectorError {
    #[error("Failed to list playlist {playlist_id}: {source}")]
    Listing {
        playlist_id: String,
        #[source]
        source: PlatformError,
    },

    #[error("Failed to fetch metadata batch {batch}: {source}")]
    Metadata {
        batch: usize,
        #[source]
        source: PlatformError,
    },
}

mod auth;
mod client;
mod error;

pub use auth::{parse_redirect_request, Authenticator, ClientSecrets, StoredToken, TokenSource};
pub use client::YouTubeClient;
pub use error::{AuthError, PlatformError};

use async_trait::async_trait;

use crate::state::VideoRecord;

/// One page of a playlist's membership listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistPage {
    /// Video ids on this page, in playlist order.
    pub video_ids: Vec<String>,
    /// Continuation token; `None` on the last page.
    pub next_page_token: Option<String>,
}

/// The video platform's read and write surface.
///
/// Every call is a single blocking round trip from the caller's point of
/// view; implementations do not retry. Errors carry a structured kind so
/// callers can tell quota exhaustion apart from everything else via
/// [`PlatformError::is_quota_exceeded`].
#[async_trait]
pub trait VideoPlatform: Send + Sync {
    /// Fetches one page of video ids from a playlist.
    async fn list_playlist_page(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<PlaylistPage, PlatformError>;

    /// Looks up metadata for up to 50 ids. Unknown ids are simply absent
    /// from the result.
    async fn list_videos(&self, ids: &[String]) -> Result<Vec<VideoRecord>, PlatformError>;

    /// Creates a playlist and returns its id.
    async fn create_playlist(&self, title: &str, description: &str)
        -> Result<String, PlatformError>;

    /// Appends a video to a playlist.
    async fn insert_playlist_item(
        &self,
        playlist_id: &str,
        video_id: &str,
    ) -> Result<(), PlatformError>;
}

/// Blanket implementation for references, so callers can keep ownership.
#[async_trait]
impl<P: VideoPlatform + ?Sized> VideoPlatform for &P {
    async fn list_playlist_page(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<PlaylistPage, PlatformError> {
        (**self).list_playlist_page(playlist_id, page_token).await
    }

    async fn list_videos(&self, ids: &[String]) -> Result<Vec<VideoRecord>, PlatformError> {
        (**self).list_videos(ids).await
    }

    async fn create_playlist(
        &self,
        title: &str,
        description: &str,
    ) -> Result<String, PlatformError> {
        (**self).create_playlist(title, description).await
    }

    async fn insert_playlist_item(
        &self,
        playlist_id: &str,
        video_id: &str,
    ) -> Result<(), PlatformError> {
        (**self).insert_playlist_item(playlist_id, video_id).await
    }
}

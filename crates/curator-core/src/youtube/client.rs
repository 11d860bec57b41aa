use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};

use super::{PlatformError, PlaylistPage, TokenSource, VideoPlatform};
use crate::config::{
    YouTubeConfig, DEFAULT_PAGE_SIZE, DEFAULT_PRIVACY_STATUS, DEFAULT_YOUTUBE_API_URL,
};
use crate::state::VideoRecord;

/// YouTube Data API v3 client.
///
/// Quota costs per call (default allowance 10,000 units/day):
/// `playlistItems.list` and `videos.list` 1 unit, `playlists.insert` and
/// `playlistItems.insert` 50 units.
pub struct YouTubeClient {
    base_url: String,
    privacy_status: String,
    page_size: u32,
    tokens: Box<dyn TokenSource>,
    client: Client,
}

impl YouTubeClient {
    /// Creates a client authorizing requests with the given token source.
    pub fn new(tokens: impl TokenSource + 'static) -> Self {
        Self {
            base_url: DEFAULT_YOUTUBE_API_URL.to_string(),
            privacy_status: DEFAULT_PRIVACY_STATUS.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            tokens: Box::new(tokens),
            client: Client::new(),
        }
    }

    /// Creates a client from the `[youtube]` config section.
    pub fn with_config(tokens: impl TokenSource + 'static, config: &YouTubeConfig) -> Self {
        Self::new(tokens)
            .with_base_url(&config.api_base_url)
            .with_privacy_status(&config.privacy_status)
            .with_page_size(config.page_size)
    }

    /// Sets the API base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the privacy status applied to created playlists.
    pub fn with_privacy_status(mut self, status: impl Into<String>) -> Self {
        self.privacy_status = status.into();
        self
    }

    /// Sets how many entries are requested per playlist page (max 50).
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, 50);
        self
    }

    async fn get<T: DeserializeOwned>(
        &self,
        resource: &str,
        query: &[(&str, &str)],
    ) -> Result<T, PlatformError> {
        let token = self.tokens.access_token().await?;
        let response = self
            .client
            .get(format!("{}/{}", self.base_url, resource))
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        resource: &str,
        query: &[(&str, &str)],
        body: &B,
    ) -> Result<T, PlatformError> {
        let token = self.tokens.access_token().await?;
        let response = self
            .client
            .post(format!("{}/{}", self.base_url, resource))
            .bearer_auth(token)
            .query(query)
            .json(body)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T, PlatformError> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(PlatformError::from_response(status.as_u16(), &error_text));
        }

        response
            .json()
            .await
            .map_err(|e| PlatformError::Parse(e.to_string()))
    }
}

#[async_trait]
impl VideoPlatform for YouTubeClient {
    async fn list_playlist_page(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<PlaylistPage, PlatformError> {
        let max_results = self.page_size.to_string();
        let mut query = vec![
            ("part", "contentDetails"),
            ("playlistId", playlist_id),
            ("maxResults", max_results.as_str()),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        let response: PlaylistItemListResponse = self.get("playlistItems", &query).await?;

        Ok(PlaylistPage {
            video_ids: response
                .items
                .into_iter()
                .map(|item| item.content_details.video_id)
                .collect(),
            next_page_token: response.next_page_token.filter(|t| !t.is_empty()),
        })
    }

    async fn list_videos(&self, ids: &[String]) -> Result<Vec<VideoRecord>, PlatformError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let joined = ids.join(",");
        let response: VideoListResponse = self
            .get("videos", &[("part", "snippet"), ("id", joined.as_str())])
            .await?;

        Ok(response
            .items
            .into_iter()
            .map(|v| VideoRecord::new(v.id, v.snippet.title, v.snippet.description))
            .collect())
    }

    async fn create_playlist(
        &self,
        title: &str,
        description: &str,
    ) -> Result<String, PlatformError> {
        let body = PlaylistInsert {
            snippet: PlaylistSnippet {
                title: title.to_string(),
                description: description.to_string(),
            },
            status: PlaylistStatusBody {
                privacy_status: self.privacy_status.clone(),
            },
        };

        let created: PlaylistResource = self
            .post("playlists", &[("part", "snippet,status")], &body)
            .await?;

        Ok(created.id)
    }

    async fn insert_playlist_item(
        &self,
        playlist_id: &str,
        video_id: &str,
    ) -> Result<(), PlatformError> {
        let body = PlaylistItemInsert {
            snippet: PlaylistItemSnippet {
                playlist_id: playlist_id.to_string(),
                resource_id: ResourceId {
                    kind: "youtube#video".to_string(),
                    video_id: video_id.to_string(),
                },
            },
        };

        let _: IgnoredAny = self
            .post("playlistItems", &[("part", "snippet")], &body)
            .await?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemListResponse {
    #[serde(default)]
    items: Vec<PlaylistItem>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItem {
    content_details: ContentDetails,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentDetails {
    video_id: String,
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<Video>,
}

#[derive(Debug, Deserialize)]
struct Video {
    id: String,
    snippet: VideoSnippet,
}

#[derive(Debug, Deserialize)]
struct VideoSnippet {
    title: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct PlaylistResource {
    id: String,
}

#[derive(Debug, Serialize)]
struct PlaylistInsert {
    snippet: PlaylistSnippet,
    status: PlaylistStatusBody,
}

#[derive(Debug, Serialize)]
struct PlaylistSnippet {
    title: String,
    description: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistStatusBody {
    privacy_status: String,
}

#[derive(Debug, Serialize)]
struct PlaylistItemInsert {
    snippet: PlaylistItemSnippet,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemSnippet {
    playlist_id: String,
    resource_id: ResourceId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResourceId {
    kind: String,
    video_id: String,
}

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use curator_core::config::StorageConfig;
use curator_core::llm::{LLMError, LLM};
use curator_core::youtube::{AuthError, PlatformError, PlaylistPage, VideoPlatform};
use curator_core::{FileStorage, VideoRecord};
use tempfile::TempDir;

pub fn create_test_storage() -> (FileStorage, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let config = StorageConfig {
        data_dir: temp_dir.path().to_string_lossy().to_string(),
        ..StorageConfig::default()
    };
    (FileStorage::with_config(config), temp_dir)
}

pub fn video_id(n: usize) -> String {
    format!("vid{:03}", n)
}

pub fn record(n: usize) -> VideoRecord {
    VideoRecord::new(video_id(n), format!("Track {}", n), format!("Description {}", n))
}

#[derive(Debug, Default)]
struct Calls {
    list_pages: usize,
    metadata_batches: Vec<usize>,
    created: Vec<String>,
    inserted: Vec<(String, String)>,
    insert_budget: Option<usize>,
    create_budget: Option<usize>,
}

/// In-memory video platform.
///
/// Playlists are served as pre-split pages; the page token is the next
/// page's index. Writes are recorded and can be made to fail.
#[derive(Default)]
pub struct FakePlatform {
    playlists: HashMap<String, Vec<Vec<String>>>,
    videos: HashMap<String, VideoRecord>,
    rejected_videos: HashSet<String>,
    rejected_titles: HashSet<String>,
    revoked: bool,
    token_unreachable: bool,
    calls: Mutex<Calls>,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_playlist(mut self, id: &str, pages: Vec<Vec<String>>) -> Self {
        self.playlists.insert(id.to_string(), pages);
        self
    }

    pub fn with_videos(mut self, records: impl IntoIterator<Item = VideoRecord>) -> Self {
        for record in records {
            self.videos.insert(record.id.clone(), record);
        }
        self
    }

    /// Inserts succeed `n` times, then every insert reports quota exhaustion.
    pub fn quota_after_inserts(self, n: usize) -> Self {
        self.calls.lock().unwrap().insert_budget = Some(n);
        self
    }

    /// Playlist creation succeeds `n` times, then reports quota exhaustion.
    pub fn quota_after_creates(self, n: usize) -> Self {
        self.calls.lock().unwrap().create_budget = Some(n);
        self
    }

    pub fn reject_video(mut self, id: &str) -> Self {
        self.rejected_videos.insert(id.to_string());
        self
    }

    pub fn reject_create(mut self, title: &str) -> Self {
        self.rejected_titles.insert(title.to_string());
        self
    }

    pub fn revoked(mut self) -> Self {
        self.revoked = true;
        self
    }

    /// Writes fail because the token endpoint cannot be reached.
    pub fn token_unreachable(mut self) -> Self {
        self.token_unreachable = true;
        self
    }

    fn credential_error(&self) -> Option<PlatformError> {
        if self.revoked {
            return Some(PlatformError::Unauthorized("Invalid Credentials".to_string()));
        }
        if self.token_unreachable {
            return Some(PlatformError::Auth(AuthError::Network(
                "connection refused".to_string(),
            )));
        }
        None
    }

    pub fn list_page_calls(&self) -> usize {
        self.calls.lock().unwrap().list_pages
    }

    pub fn metadata_batches(&self) -> Vec<usize> {
        self.calls.lock().unwrap().metadata_batches.clone()
    }

    pub fn created(&self) -> Vec<String> {
        self.calls.lock().unwrap().created.clone()
    }

    pub fn inserted(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().inserted.clone()
    }

    /// Number of write calls attempted, successful or not.
    pub fn write_calls(&self) -> usize {
        let calls = self.calls.lock().unwrap();
        calls.created.len() + calls.inserted.len()
    }

    fn quota_error() -> PlatformError {
        PlatformError::from_response(
            403,
            r#"{"error":{"code":403,"message":"The request cannot be completed because you have exceeded your quota.","errors":[{"reason":"quotaExceeded"}]}}"#,
        )
    }
}

#[async_trait]
impl VideoPlatform for FakePlatform {
    async fn list_playlist_page(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<PlaylistPage, PlatformError> {
        self.calls.lock().unwrap().list_pages += 1;

        let pages = self.playlists.get(playlist_id).ok_or_else(|| PlatformError::Api {
            status: 404,
            reason: "playlistNotFound".to_string(),
            message: playlist_id.to_string(),
        })?;

        let index: usize = page_token.map(|t| t.parse().unwrap()).unwrap_or(0);
        let video_ids = pages.get(index).cloned().unwrap_or_default();
        let next_page_token = (index + 1 < pages.len()).then(|| (index + 1).to_string());

        Ok(PlaylistPage {
            video_ids,
            next_page_token,
        })
    }

    async fn list_videos(&self, ids: &[String]) -> Result<Vec<VideoRecord>, PlatformError> {
        self.calls.lock().unwrap().metadata_batches.push(ids.len());
        Ok(ids
            .iter()
            .filter_map(|id| self.videos.get(id).cloned())
            .collect())
    }

    async fn create_playlist(
        &self,
        title: &str,
        _description: &str,
    ) -> Result<String, PlatformError> {
        if let Some(error) = self.credential_error() {
            return Err(error);
        }

        let mut calls = self.calls.lock().unwrap();
        if let Some(budget) = calls.create_budget.as_mut() {
            if *budget == 0 {
                return Err(Self::quota_error());
            }
            *budget -= 1;
        }

        calls.created.push(title.to_string());
        if self.rejected_titles.contains(title) {
            return Err(PlatformError::Api {
                status: 400,
                reason: "invalidPlaylistSnippet".to_string(),
                message: "Invalid playlist snippet".to_string(),
            });
        }

        Ok(format!("PL{}", calls.created.len()))
    }

    async fn insert_playlist_item(
        &self,
        playlist_id: &str,
        video_id: &str,
    ) -> Result<(), PlatformError> {
        if let Some(error) = self.credential_error() {
            return Err(error);
        }

        let mut calls = self.calls.lock().unwrap();
        if let Some(budget) = calls.insert_budget.as_mut() {
            if *budget == 0 {
                return Err(Self::quota_error());
            }
            *budget -= 1;
        }

        calls
            .inserted
            .push((playlist_id.to_string(), video_id.to_string()));
        if self.rejected_videos.contains(video_id) {
            return Err(PlatformError::Api {
                status: 404,
                reason: "videoNotFound".to_string(),
                message: "Video not found".to_string(),
            });
        }

        Ok(())
    }
}

/// LLM double returning a canned answer and recording the prompts it saw.
pub struct FakeLLM {
    response: Result<String, u16>,
    prompts: Mutex<Vec<String>>,
}

impl FakeLLM {
    pub fn answering(response: impl Into<String>) -> Self {
        Self {
            response: Ok(response.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails with the given HTTP status.
    pub fn failing(status: u16) -> Self {
        Self {
            response: Err(status),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    fn answer(&self, prompt: &str) -> Result<String, LLMError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.response {
            Ok(text) => Ok(text.clone()),
            Err(status) => Err(LLMError::ApiError {
                status: *status,
                message: "upstream failure".to_string(),
            }),
        }
    }
}

#[async_trait]
impl LLM for FakeLLM {
    async fn complete_with_system(&self, _system: &str, prompt: &str) -> Result<String, LLMError> {
        self.answer(prompt)
    }

    async fn complete_structured(
        &self,
        _system: &str,
        prompt: &str,
        _schema: &serde_json::Value,
    ) -> Result<String, LLMError> {
        self.answer(prompt)
    }
}

/// Builds a planner answer from `(title, indices)` pairs.
pub fn planner_answer(playlists: &[(&str, Vec<i64>)]) -> String {
    let playlists: Vec<serde_json::Value> = playlists
        .iter()
        .map(|(title, indices)| {
            serde_json::json!({
                "playlist_title": title,
                "playlist_description": format!("All about {}", title),
                "video_indices": indices,
            })
        })
        .collect();
    serde_json::json!({ "playlists": playlists }).to_string()
}

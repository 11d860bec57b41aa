use std::collections::BTreeSet;

use thiserror::Error;
use tracing::{info, warn};

use crate::config::DEFAULT_ERROR_CONTEXT_LENGTH;
use crate::llm::{LLMError, LLM};
use crate::planner::prompts::{build_planner_prompt, response_schema, PLANNER_SYSTEM_PROMPT};
use crate::state::{Grouping, VideoRecord};

/// Asks the model to cluster collected videos into themed playlists.
pub struct Planner<L: LLM> {
    llm: L,
}

impl<L: LLM> Planner<L> {
    pub fn new(llm: L) -> Self {
        Self { llm }
    }

    /// Produces `requested_count` groupings for `records`.
    ///
    /// The model's structured output is trusted: index ranges, coverage and
    /// the playlist count are not enforced. Any transport error, empty
    /// answer or unparseable answer is a failure; there is no fallback.
    pub async fn plan(
        &self,
        records: &[VideoRecord],
        requested_count: usize,
    ) -> Result<Vec<Grouping>, PlannerError> {
        info!(
            "Sending {} video records for analysis (requesting {} playlists)",
            records.len(),
            requested_count
        );

        let prompt = build_planner_prompt(records, requested_count);
        let response = self
            .llm
            .complete_structured(PLANNER_SYSTEM_PROMPT, &prompt, &response_schema())
            .await?;

        let groupings = parse_response(&response)?;

        let uncovered = coverage(&groupings, records.len());
        if !uncovered.is_empty() {
            warn!(
                "{} video(s) were not placed in any playlist: {:?}",
                uncovered.len(),
                uncovered
            );
        }
        info!("Received {} playlist suggestions", groupings.len());

        Ok(groupings)
    }
}

/// Parses the model's answer into fresh, all-pending groupings.
pub fn parse_response(response: &str) -> Result<Vec<Grouping>, PlannerError> {
    let json_str = extract_json(response);
    if json_str.is_empty() {
        return Err(PlannerError::Empty);
    }

    let parsed: PlannerResponse = serde_json::from_str(json_str).map_err(|e| {
        let cut = floor_char_boundary(json_str, DEFAULT_ERROR_CONTEXT_LENGTH);
        PlannerError::ParseError(format!(
            "Failed to parse LLM response as JSON: {}. Response: {}",
            e,
            &json_str[..cut]
        ))
    })?;

    if parsed.playlists.is_empty() {
        return Err(PlannerError::Empty);
    }

    Ok(parsed
        .playlists
        .into_iter()
        .map(|p| Grouping::new(p.playlist_title, p.playlist_description, p.video_indices))
        .collect())
}

/// Positions in `0..record_count` that no grouping references.
pub fn coverage(groupings: &[Grouping], record_count: usize) -> Vec<usize> {
    let covered: BTreeSet<usize> = groupings
        .iter()
        .flat_map(|g| &g.tracks)
        .filter_map(|t| usize::try_from(t.position).ok())
        .collect();

    (0..record_count).filter(|i| !covered.contains(i)).collect()
}

/// Response structure from LLM.
#[derive(Debug, serde::Deserialize)]
struct PlannerResponse {
    playlists: Vec<PlaylistResponse>,
}

#[derive(Debug, serde::Deserialize)]
struct PlaylistResponse {
    playlist_title: String,
    #[serde(default)]
    playlist_description: String,
    #[serde(default)]
    video_indices: Vec<i64>,
}

/// Extracts JSON from a response that might be wrapped in markdown code blocks.
fn extract_json(response: &str) -> &str {
    let trimmed = response.trim();

    // Check for ```json ... ``` or ``` ... ```
    if trimmed.starts_with("```") {
        if let Some(start) = trimmed.find('\n') {
            let rest = &trimmed[start + 1..];
            if let Some(end) = rest.rfind("```") {
                return rest[..end].trim();
            }
        }
    }

    trimmed
}

fn floor_char_boundary(s: &str, max: usize) -> usize {
    if s.len() <= max {
        return s.len();
    }
    (0..=max).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0)
}

/// Errors that can occur during planning.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("LLM error: {0}")]
    LLM(#[from] LLMError),

    #[error("The model returned no playlists")]
    Empty,

    #[error("Parse error: {0}")]
    ParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{PlaylistStatus, TrackStatus};

    #[test]
    fn test_parse_response_builds_pending_groupings() {
        let response = r#"{"playlists":[
            {"playlist_title":"Sunrise","playlist_description":"Gentle starts","video_indices":[0,2]},
            {"playlist_title":"Drive","playlist_description":"Fast","video_indices":[1,2]}
        ]}"#;
        let groupings = parse_response(response).unwrap();

        assert_eq!(groupings.len(), 2);
        assert_eq!(groupings[0].title, "Sunrise");
        assert_eq!(groupings[0].status, PlaylistStatus::Pending);
        assert!(groupings[0].remote_id.is_none());
        assert_eq!(
            groupings[1].tracks.iter().map(|t| t.position).collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert!(groupings
            .iter()
            .flat_map(|g| &g.tracks)
            .all(|t| t.status == TrackStatus::Pending));
    }

    #[test]
    fn test_parse_response_strips_code_fence() {
        let response = "```json\n{\"playlists\":[{\"playlist_title\":\"A\",\"playlist_description\":\"B\",\"video_indices\":[0]}]}\n```";
        assert_eq!(parse_response(response).unwrap().len(), 1);
    }

    #[test]
    fn test_parse_response_empty_is_error() {
        assert!(matches!(parse_response("   "), Err(PlannerError::Empty)));
        assert!(matches!(
            parse_response(r#"{"playlists":[]}"#),
            Err(PlannerError::Empty)
        ));
    }

    #[test]
    fn test_parse_response_malformed_is_error() {
        assert!(matches!(
            parse_response("Here are your playlists!"),
            Err(PlannerError::ParseError(_))
        ));
        assert!(matches!(
            parse_response(r#"{"playlists":[{"video_indices":[0]}]}"#),
            Err(PlannerError::ParseError(_))
        ));
    }

    #[test]
    fn test_parse_response_keeps_negative_indices() {
        let response = r#"{"playlists":[
            {"playlist_title":"Odd","playlist_description":"","video_indices":[0,-1,3]}
        ]}"#;
        let groupings = parse_response(response).unwrap();

        assert_eq!(
            groupings[0].tracks.iter().map(|t| t.position).collect::<Vec<_>>(),
            vec![0, -1, 3]
        );
        assert_eq!(coverage(&groupings, 4), vec![1, 2]);
    }

    #[test]
    fn test_coverage_lists_missing_positions() {
        let groupings = vec![
            Grouping::new("A", "", [0, 1]),
            Grouping::new("B", "", [1, 4]),
        ];
        assert_eq!(coverage(&groupings, 5), vec![2, 3]);
        assert!(coverage(&groupings, 2).is_empty());
    }

    #[test]
    fn test_floor_char_boundary() {
        assert_eq!(floor_char_boundary("héllo", 2), 1);
        assert_eq!(floor_char_boundary("abc", 10), 3);
    }
}

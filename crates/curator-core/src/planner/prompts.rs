use serde_json::{json, Value};

use crate::state::VideoRecord;

/// System prompt for playlist planning.
pub const PLANNER_SYSTEM_PROMPT: &str = "You are an expert in creating diverse and accurate music playlists. \
Your task is to process the provided JSON data about YouTube videos and suggest diverse playlists. \
You can repeat indices in playlists if they fit several themes, but ensure that every index is present in at least one playlist. \
The videos are music tracks. Your response MUST be a single JSON object that strictly adheres to the provided schema.";

/// JSON schema the model's answer must follow.
///
/// `video_indices` are 0-based positions in the record list sent with the
/// prompt.
pub fn response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "playlists": {
                "type": "array",
                "description": "A list of suggested playlists based on the provided video data, strictly limited to the number requested in the prompt.",
                "items": {
                    "type": "object",
                    "properties": {
                        "playlist_title": {
                            "type": "string",
                            "description": "A compelling title for the suggested playlist."
                        },
                        "playlist_description": {
                            "type": "string",
                            "description": "A catchy description for what to expect from the contents of this playlist."
                        },
                        "video_indices": {
                            "type": "array",
                            "items": { "type": "integer" },
                            "description": "A list of 0-based integer indices corresponding to the positions of the videos in the original input list that belong to this playlist."
                        }
                    },
                    "required": ["playlist_title", "playlist_description", "video_indices"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["playlists"],
        "additionalProperties": false
    })
}

/// Builds the user prompt: the instructions plus every record as JSON.
pub fn build_planner_prompt(records: &[VideoRecord], playlist_count: usize) -> String {
    let video_data = serde_json::to_string(records).unwrap_or_else(|_| "[]".to_string());

    format!(
        r#"Analyze the following list of video data and **generate exactly {playlist_count} highly relevant playlists**.

The input list is a zero-based array. The output must reference videos by their 0-based index.

For each playlist:
1.  Create a descriptive title.
2.  Provide a description for the contents of the suggested playlist.
3.  Populate the 'video_indices' list with the 0-based integer index of every video from the input that fits the playlist theme. You MUST use indices, not video IDs.

Here is the video data in JSON format:

```json
{video_data}
```"#
    )
}

//! Default values for Curator configuration.
//!
//! All hardcoded defaults are centralized here for easy maintenance.

// ============================================================================
// Curation Defaults
// ============================================================================

/// Number of themed playlists requested from the model.
pub const DEFAULT_PLAYLIST_COUNT: usize = 5;

// ============================================================================
// YouTube Defaults
// ============================================================================

/// YouTube Data API v3 base URL.
pub const DEFAULT_YOUTUBE_API_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Maximum ids per `videos.list` call. Also the API's hard limit.
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Upper bound accepted for `batch_size`.
pub const MAX_BATCH_SIZE: usize = 50;

/// Entries requested per `playlistItems.list` page.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Visibility of newly created playlists.
pub const DEFAULT_PRIVACY_STATUS: &str = "private";

/// OAuth scope needed to read and write playlists.
pub const YOUTUBE_SCOPE: &str = "https://www.googleapis.com/auth/youtube.force-ssl";

/// Default Google OAuth endpoints, used when the client secrets omit them.
pub const DEFAULT_GOOGLE_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
pub const DEFAULT_GOOGLE_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Tokens expiring within this many seconds are refreshed before use.
pub const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

// ============================================================================
// LLM Defaults
// ============================================================================

/// Default LLM provider.
pub const DEFAULT_LLM_PROVIDER: &str = "gemini";

/// Default max tokens for LLM responses. Groupings over a few hundred
/// videos produce long index lists, so this is generous.
pub const DEFAULT_MAX_TOKENS: u32 = 16384;

// Gemini defaults
/// Default Gemini API base URL.
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Default Gemini model.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
/// Default Gemini output token limit. Gemini accepts far longer answers
/// than the other providers, and a truncated index list does not parse.
pub const DEFAULT_GEMINI_MAX_TOKENS: u32 = 65000;

// OpenAI defaults
/// Default OpenAI API URL.
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";
/// Default OpenAI model.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";

// Anthropic defaults
/// Default Anthropic API URL.
pub const DEFAULT_ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";
/// Default Anthropic model.
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-20250514";
/// Default Anthropic API version.
pub const DEFAULT_ANTHROPIC_API_VERSION: &str = "2023-06-01";

// Ollama defaults
/// Default Ollama API URL.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434/v1";
/// Default Ollama model.
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3";

// ============================================================================
// Storage Defaults
// ============================================================================

/// Default data directory (working directory).
pub const DEFAULT_DATA_DIR: &str = ".";

/// Run state file name.
pub const DEFAULT_STATE_FILE: &str = "playlists_to_process.json";

/// Video metadata cache file name.
pub const DEFAULT_CACHE_FILE: &str = "video_info_cache.json";

/// OAuth token cache file name.
pub const DEFAULT_TOKEN_FILE: &str = "youtube_token.json";

/// Project-local config file name.
pub const DEFAULT_CONFIG_FILE: &str = "curator.toml";

// ============================================================================
// Planner Defaults
// ============================================================================

/// Maximum length of a model response quoted in parse errors.
pub const DEFAULT_ERROR_CONTEXT_LENGTH: usize = 500;

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

/// Error reasons the Data API uses for exhausted allowances.
const QUOTA_REASONS: &[&str] = &[
    "quotaExceeded",
    "dailyLimitExceeded",
    "rateLimitExceeded",
    "userRateLimitExceeded",
];

/// Errors returned by the video platform.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// The caller's usage allowance is spent for the current period.
    #[error("Quota exceeded ({status}): {message}")]
    QuotaExceeded { status: u16, message: String },

    /// Credentials were rejected.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("API returned error: {status} ({reason}) - {message}")]
    Api {
        status: u16,
        reason: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Authorization failed: {0}")]
    Auth(#[from] AuthError),
}

impl PlatformError {
    /// Classifies a non-success response.
    ///
    /// Quota exhaustion is a 403 whose error reasons name a quota/limit, or
    /// whose message mentions "quota", plus any 429. This is the only place
    /// that looks at message text.
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: Option<GoogleErrorBody> = serde_json::from_str(body).ok();
        let (message, reasons) = match parsed {
            Some(body) => {
                let reasons = body
                    .error
                    .errors
                    .into_iter()
                    .filter_map(|e| e.reason)
                    .collect::<Vec<_>>();
                (body.error.message, reasons)
            }
            None => (body.trim().to_string(), Vec::new()),
        };

        let quota_reason = reasons
            .iter()
            .any(|r| QUOTA_REASONS.contains(&r.as_str()));
        let quota_text = message.to_lowercase().contains("quota");

        match status {
            429 => PlatformError::QuotaExceeded { status, message },
            403 if quota_reason || quota_text => PlatformError::QuotaExceeded { status, message },
            401 => PlatformError::Unauthorized(message),
            _ => PlatformError::Api {
                status,
                reason: reasons.into_iter().next().unwrap_or_default(),
                message,
            },
        }
    }

    /// Whether this error means "stop for today and resume later".
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, PlatformError::QuotaExceeded { .. })
    }

    /// Whether the platform or the token endpoint rejected the credentials.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            PlatformError::Unauthorized(_)
                | PlatformError::Auth(AuthError::TokenEndpoint { .. } | AuthError::Denied(_))
        )
    }

    /// Whether no usable access token could be obtained, for any reason.
    pub fn is_credential_failure(&self) -> bool {
        self.is_unauthorized() || matches!(self, PlatformError::Auth(_))
    }
}

impl From<reqwest::Error> for PlatformError {
    fn from(err: reqwest::Error) -> Self {
        PlatformError::Network(err.to_string())
    }
}

/// Errors raised while obtaining or refreshing OAuth credentials.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Failed to read client secrets {path}: {message}")]
    Secrets { path: PathBuf, message: String },

    #[error("Token store error at {path}: {source}")]
    TokenStore {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Authorization was denied: {0}")]
    Denied(String),

    #[error("Invalid authorization redirect: {0}")]
    BadRedirect(String),

    #[error("Token endpoint returned {status}: {message}")]
    TokenEndpoint { status: u16, message: String },

    #[error("Loopback listener error: {0}")]
    Listener(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        AuthError::Network(err.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    error: GoogleError,
}

#[derive(Debug, Deserialize)]
struct GoogleError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<GoogleErrorItem>,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorItem {
    reason: Option<String>,
}

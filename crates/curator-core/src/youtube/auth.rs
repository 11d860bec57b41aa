//! OAuth 2.0 credentials for the YouTube Data API.
//!
//! Uses the installed-application loopback flow: a one-shot listener on
//! `127.0.0.1` receives the authorization redirect, the code is exchanged
//! for tokens, and the result is cached on disk so later runs only need a
//! refresh.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::AuthError;
use crate::config::{
    DEFAULT_GOOGLE_AUTH_URI, DEFAULT_GOOGLE_TOKEN_URI, TOKEN_REFRESH_MARGIN_SECS, YOUTUBE_SCOPE,
};

/// Supplies bearer tokens for API requests.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Returns a currently valid access token.
    async fn access_token(&self) -> Result<String, AuthError>;
}

#[cfg(test)]
#[derive(Debug, Clone)]
pub(crate) struct StaticToken(String);

#[cfg(test)]
impl StaticToken {
    pub(crate) fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[cfg(test)]
#[async_trait]
impl TokenSource for StaticToken {
    async fn access_token(&self) -> Result<String, AuthError> {
        Ok(self.0.clone())
    }
}

/// OAuth client credentials from a Google client secrets file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientSecrets {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_auth_uri() -> String {
    DEFAULT_GOOGLE_AUTH_URI.to_string()
}

fn default_token_uri() -> String {
    DEFAULT_GOOGLE_TOKEN_URI.to_string()
}

#[derive(Debug, Deserialize)]
struct SecretsFile {
    installed: Option<ClientSecrets>,
    web: Option<ClientSecrets>,
}

impl ClientSecrets {
    /// Reads a client secrets JSON file (the `installed` or `web` section).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AuthError> {
        let path = path.as_ref();
        let secrets_error = |message: String| AuthError::Secrets {
            path: path.to_path_buf(),
            message,
        };

        let json = fs::read_to_string(path).map_err(|e| secrets_error(e.to_string()))?;
        Self::from_json(&json).map_err(secrets_error)
    }

    fn from_json(json: &str) -> Result<Self, String> {
        let file: SecretsFile = serde_json::from_str(json).map_err(|e| e.to_string())?;
        file.installed
            .or(file.web)
            .ok_or_else(|| "expected an \"installed\" or \"web\" section".to_string())
    }
}

/// A cached OAuth token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl StoredToken {
    /// True if the token expires within the refresh margin.
    pub fn is_expiring(&self, now: DateTime<Utc>) -> bool {
        self.expires_at - Duration::seconds(TOKEN_REFRESH_MARGIN_SECS) <= now
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
    refresh_token: Option<String>,
}

/// Obtains, caches and refreshes user credentials.
pub struct Authenticator {
    secrets: ClientSecrets,
    token_path: PathBuf,
    client: Client,
    token: Mutex<Option<StoredToken>>,
}

impl Authenticator {
    /// Creates an authenticator that caches tokens at `token_path`.
    pub fn new(secrets: ClientSecrets, token_path: impl Into<PathBuf>) -> Self {
        Self {
            secrets,
            token_path: token_path.into(),
            client: Client::new(),
            token: Mutex::new(None),
        }
    }

    /// Makes sure a usable token is available, running the browser consent
    /// flow if nothing is cached. Call once at startup so the interactive
    /// step happens before any work begins.
    pub async fn authorize(&self) -> Result<(), AuthError> {
        self.access_token().await.map(|_| ())
    }

    fn load_cached(&self) -> Option<StoredToken> {
        let json = fs::read_to_string(&self.token_path).ok()?;
        match serde_json::from_str(&json) {
            Ok(token) => Some(token),
            Err(e) => {
                debug!("Ignoring unreadable token cache {}: {}", self.token_path.display(), e);
                None
            }
        }
    }

    fn save(&self, token: &StoredToken) -> Result<(), AuthError> {
        let store_error = |source| AuthError::TokenStore {
            path: self.token_path.clone(),
            source,
        };

        if let Some(parent) = self.token_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(store_error)?;
            }
        }

        let json = serde_json::to_string_pretty(token)
            .map_err(|e| store_error(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
        fs::write(&self.token_path, json).map_err(store_error)
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Result<TokenResponse, AuthError> {
        let response = self
            .client
            .post(&self.secrets.token_uri)
            .form(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AuthError::TokenEndpoint {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))
    }

    async fn refresh(&self, refresh_token: &str) -> Result<StoredToken, AuthError> {
        debug!("Refreshing YouTube access token");
        let response = self
            .request_token(&[
                ("client_id", self.secrets.client_id.as_str()),
                ("client_secret", self.secrets.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .await?;

        Ok(StoredToken {
            access_token: response.access_token,
            // Google omits the refresh token on refresh; keep the one we have
            refresh_token: response
                .refresh_token
                .or_else(|| Some(refresh_token.to_string())),
            expires_at: Utc::now() + Duration::seconds(response.expires_in),
        })
    }

    async fn run_consent_flow(&self) -> Result<StoredToken, AuthError> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let redirect_uri = format!("http://127.0.0.1:{}", listener.local_addr()?.port());

        let consent_url = Url::parse_with_params(
            &self.secrets.auth_uri,
            &[
                ("client_id", self.secrets.client_id.as_str()),
                ("redirect_uri", redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", YOUTUBE_SCOPE),
                ("access_type", "offline"),
                ("prompt", "consent"),
            ],
        )
        .map_err(|e| AuthError::Secrets {
            path: PathBuf::from("auth_uri"),
            message: e.to_string(),
        })?;

        info!("Authorize YouTube access by opening this URL in a browser:\n\n    {consent_url}\n");

        let (mut stream, _) = listener.accept().await?;
        let mut buffer = vec![0u8; 8192];
        let mut read = 0;
        while read < buffer.len() {
            let n = stream.read(&mut buffer[read..]).await?;
            read += n;
            if n == 0 || buffer[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }
        let request = String::from_utf8_lossy(&buffer[..read]).to_string();
        let outcome = parse_redirect_request(&request);

        let page = match &outcome {
            Ok(_) => "Authorization received. You can close this tab.",
            Err(_) => "Authorization failed. Check the terminal for details.",
        };
        let reply = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: text/plain; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            page.len(),
            page
        );
        stream.write_all(reply.as_bytes()).await?;
        stream.shutdown().await.ok();

        let code = outcome?;
        let response = self
            .request_token(&[
                ("code", code.as_str()),
                ("client_id", self.secrets.client_id.as_str()),
                ("client_secret", self.secrets.client_secret.as_str()),
                ("redirect_uri", redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .await?;

        info!("YouTube authorization complete");

        Ok(StoredToken {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            expires_at: Utc::now() + Duration::seconds(response.expires_in),
        })
    }
}

#[async_trait]
impl TokenSource for Authenticator {
    async fn access_token(&self) -> Result<String, AuthError> {
        let mut guard = self.token.lock().await;

        if guard.is_none() {
            *guard = self.load_cached();
        }

        let now = Utc::now();
        let current = match guard.take() {
            Some(token) if !token.is_expiring(now) => token,
            Some(StoredToken {
                refresh_token: Some(refresh_token),
                ..
            }) => {
                let token = self.refresh(&refresh_token).await?;
                self.save(&token)?;
                token
            }
            _ => {
                let token = self.run_consent_flow().await?;
                self.save(&token)?;
                token
            }
        };

        let access_token = current.access_token.clone();
        *guard = Some(current);
        Ok(access_token)
    }
}

/// Extracts the authorization code from the raw redirect request
/// (`GET /?code=...&scope=... HTTP/1.1`).
pub fn parse_redirect_request(request: &str) -> Result<String, AuthError> {
    let target = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .ok_or_else(|| AuthError::BadRedirect("empty request".to_string()))?;

    let url = Url::parse(&format!("http://127.0.0.1{target}"))
        .map_err(|e| AuthError::BadRedirect(e.to_string()))?;

    let mut code = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.to_string()),
            "error" => return Err(AuthError::Denied(value.to_string())),
            _ => {}
        }
    }

    code.ok_or_else(|| AuthError::BadRedirect(format!("no code in {target}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_installed_secrets() {
        let json = r#"{"installed":{"client_id":"id.apps.googleusercontent.com","project_id":"p",
            "auth_uri":"https://accounts.google.com/o/oauth2/auth","token_uri":"https://oauth2.googleapis.com/token",
            "client_secret":"shh","redirect_uris":["http://localhost"]}}"#;
        let secrets = ClientSecrets::from_json(json).unwrap();
        assert_eq!(secrets.client_id, "id.apps.googleusercontent.com");
        assert_eq!(secrets.client_secret, "shh");
        assert_eq!(secrets.token_uri, DEFAULT_GOOGLE_TOKEN_URI);
    }

    #[test]
    fn test_parse_secrets_defaults_endpoints() {
        let secrets = ClientSecrets::from_json(r#"{"web":{"client_id":"a","client_secret":"b"}}"#).unwrap();
        assert_eq!(secrets.auth_uri, DEFAULT_GOOGLE_AUTH_URI);
    }

    #[test]
    fn test_parse_secrets_without_section() {
        assert!(ClientSecrets::from_json(r#"{"other":{}}"#).is_err());
    }

    #[test]
    fn test_missing_secrets_file() {
        let result = ClientSecrets::from_file("/nonexistent/client_secret.json");
        assert!(matches!(result, Err(AuthError::Secrets { .. })));
    }

    #[test]
    fn test_redirect_with_code() {
        let request = "GET /?code=4/0Abc-DEF&scope=https://www.googleapis.com/auth/youtube.force-ssl HTTP/1.1\r\nHost: 127.0.0.1\r\n\r\n";
        assert_eq!(parse_redirect_request(request).unwrap(), "4/0Abc-DEF");
    }

    #[test]
    fn test_redirect_with_error() {
        let request = "GET /?error=access_denied HTTP/1.1\r\n\r\n";
        assert!(matches!(
            parse_redirect_request(request),
            Err(AuthError::Denied(reason)) if reason == "access_denied"
        ));
    }

    #[test]
    fn test_redirect_without_code() {
        let request = "GET /favicon.ico HTTP/1.1\r\n\r\n";
        assert!(matches!(
            parse_redirect_request(request),
            Err(AuthError::BadRedirect(_))
        ));
    }

    #[test]
    fn test_token_expiry_margin() {
        let now = Utc::now();
        let token = StoredToken {
            access_token: "a".to_string(),
            refresh_token: None,
            expires_at: now + Duration::seconds(30),
        };
        assert!(token.is_expiring(now));

        let fresh = StoredToken {
            expires_at: now + Duration::seconds(3600),
            ..token
        };
        assert!(!fresh.is_expiring(now));
    }

    #[tokio::test]
    async fn test_uses_cached_token() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("token.json");
        let cached = StoredToken {
            access_token: "cached-access".to_string(),
            refresh_token: Some("refresh".to_string()),
            expires_at: Utc::now() + Duration::seconds(3600),
        };
        fs::write(&path, serde_json::to_string(&cached).unwrap()).unwrap();

        let secrets = ClientSecrets {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            auth_uri: DEFAULT_GOOGLE_AUTH_URI.to_string(),
            token_uri: DEFAULT_GOOGLE_TOKEN_URI.to_string(),
        };
        let auth = Authenticator::new(secrets, &path);

        assert_eq!(auth.access_token().await.unwrap(), "cached-access");
    }
}

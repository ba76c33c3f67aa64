//! Spotify accounts service: authorization-code flow and token cache
//!
//! See: https://developer.spotify.com/documentation/web-api/tutorials/code-flow
//!
//! The user opens [`OAuthConfig::authorize_url`] in a browser, approves
//! access, and pastes the URL they were redirected to. The `code` in that
//! URL is exchanged for an access token plus a refresh token. Tokens are
//! cached on disk with an absolute expiry so later runs skip the browser.

use std::path::{Path, PathBuf};

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::dto;

/// Default accounts service root
pub const ACCOUNTS_BASE_URL: &str = "https://accounts.spotify.com";

/// Scopes needed to find and modify the user's playlists
pub const SCOPES: &[&str] = &[
    "playlist-modify-public",
    "playlist-modify-private",
    "playlist-read-private",
];

/// A cached token is treated as expired this many seconds early
const EXPIRY_MARGIN_SECS: i64 = 30;

/// OAuth errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Token request rejected (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Authorization denied: {0}")]
    Denied(String),

    #[error("No authorization code in redirected URL")]
    MissingCode,

    #[error("State mismatch in redirected URL")]
    StateMismatch,

    #[error("Failed to parse token response: {0}")]
    Parse(String),

    #[error("Token cache error for {path}: {message}")]
    Cache { path: PathBuf, message: String },
}

/// Application credentials registered with the accounts service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
}

impl OAuthConfig {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            scopes: SCOPES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Consent page URL for the user to open
    pub fn authorize_url(&self, state: &str) -> String {
        self.authorize_url_at(ACCOUNTS_BASE_URL, state)
    }

    fn authorize_url_at(&self, base_url: &str, state: &str) -> String {
        format!(
            "{}/authorize?client_id={}&response_type=code&redirect_uri={}&scope={}&state={}",
            base_url.trim_end_matches('/'),
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(&self.scopes.join(" ")),
            urlencoding::encode(state),
        )
    }
}

/// Extract the authorization code from the URL the browser was redirected to.
///
/// An `error` parameter means the user declined. When `expected_state` is
/// given, the `state` parameter must match it.
pub fn extract_code(redirected_url: &str, expected_state: Option<&str>) -> Result<String, AuthError> {
    let url = redirected_url.trim();
    let query = url.split_once('?').map(|(_, q)| q).unwrap_or(url);
    let query = query.split('#').next().unwrap_or_default();

    let mut code = None;
    let mut state = None;
    for pair in query.split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        let value = urlencoding::decode(value)
            .map(|v| v.into_owned())
            .unwrap_or_else(|_| value.to_string());
        match key {
            "code" => code = Some(value),
            "state" => state = Some(value),
            "error" => return Err(AuthError::Denied(value)),
            _ => {}
        }
    }

    if let Some(expected) = expected_state
        && state.as_deref() != Some(expected)
    {
        return Err(AuthError::StateMismatch);
    }

    code.filter(|c| !c.is_empty()).ok_or(AuthError::MissingCode)
}

/// Access token with absolute expiry (unix seconds)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: i64,
    pub scope: Option<String>,
}

impl StoredToken {
    /// Build from a token response received at `now`.
    ///
    /// Refresh responses may omit the refresh token, in which case
    /// `previous_refresh` is carried over.
    pub fn from_response(
        response: dto::TokenResponse,
        now: i64,
        previous_refresh: Option<String>,
    ) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token.or(previous_refresh),
            expires_at: now + response.expires_in,
            scope: response.scope,
        }
    }

    pub fn is_expired(&self, now: i64) -> bool {
        now + EXPIRY_MARGIN_SECS >= self.expires_at
    }
}

/// Token persisted as JSON
#[derive(Debug, Clone)]
pub struct TokenCache {
    path: PathBuf,
}

impl TokenCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cached token, `None` if there isn't one.
    pub fn load(&self) -> Result<Option<StoredToken>, AuthError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path).map_err(|e| self.error(e))?;
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|e| self.error(e))
    }

    /// Write the token (temp file then rename).
    pub fn save(&self, token: &StoredToken) -> Result<(), AuthError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| self.error(e))?;
        }
        let contents = serde_json::to_string_pretty(token).map_err(|e| self.error(e))?;
        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, contents).map_err(|e| self.error(e))?;
        std::fs::rename(&temp_path, &self.path).map_err(|e| self.error(e))?;
        tracing::debug!("Saved token to {:?}", self.path);
        Ok(())
    }

    fn error(&self, e: impl std::fmt::Display) -> AuthError {
        AuthError::Cache {
            path: self.path.clone(),
            message: e.to_string(),
        }
    }
}

/// Client for the accounts service token endpoint
pub struct AuthClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl AuthClient {
    pub fn new() -> Result<Self, AuthError> {
        Self::with_base_url(ACCOUNTS_BASE_URL)
    }

    /// Create a client against a custom base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, AuthError> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| AuthError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Consent page URL on this accounts service
    pub fn authorize_url(&self, config: &OAuthConfig, state: &str) -> String {
        config.authorize_url_at(&self.base_url, state)
    }

    /// Exchange an authorization code for a token
    pub async fn exchange_code(
        &self,
        config: &OAuthConfig,
        code: &str,
    ) -> Result<StoredToken, AuthError> {
        let form = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", config.redirect_uri.as_str()),
        ];
        let response = self.request_token(config, &form).await?;
        Ok(StoredToken::from_response(response, now(), None))
    }

    /// Refresh an expired token
    pub async fn refresh(
        &self,
        config: &OAuthConfig,
        refresh_token: &str,
    ) -> Result<StoredToken, AuthError> {
        let form = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ];
        let response = self.request_token(config, &form).await?;
        Ok(StoredToken::from_response(
            response,
            now(),
            Some(refresh_token.to_string()),
        ))
    }

    async fn request_token(
        &self,
        config: &OAuthConfig,
        form: &[(&str, &str)],
    ) -> Result<dto::TokenResponse, AuthError> {
        let response = self
            .http_client
            .post(format!("{}/api/token", self.base_url))
            .basic_auth(&config.client_id, Some(&config.client_secret))
            .form(form)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                message: rejection_message(status, &body),
            });
        }

        response
            .json::<dto::TokenResponse>()
            .await
            .map_err(|e| AuthError::Parse(e.to_string()))
    }
}

fn rejection_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<dto::AuthErrorResponse>(body) {
        Ok(e) => match e.error_description {
            Some(description) => format!("{}: {}", e.error, description),
            None => e.error,
        },
        Err(_) => status.canonical_reason().unwrap_or("Unknown").to_string(),
    }
}

/// Current unix time in seconds
pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

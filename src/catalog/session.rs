//! Authenticated session: the client plus the account it acts for.
//!
//! Built once at startup and passed explicitly to the publisher and
//! enrichment. Any failure here aborts the run before files are touched.

use tracing::{debug, info, warn};

use super::domain::CurrentUser;
use super::spotify::auth::{self, AuthClient, OAuthConfig, StoredToken, TokenCache};
use super::spotify::SpotifyClient;
use crate::error::Result;

/// Client and user id for one run
pub struct Session {
    client: SpotifyClient,
    user: CurrentUser,
}

impl Session {
    /// Obtain a token (cached, refreshed or freshly authorized), then look
    /// up the current user.
    ///
    /// `prompt` is shown the consent URL and returns the redirected URL the
    /// user pastes back.
    pub async fn establish<P>(
        oauth: &OAuthConfig,
        auth_client: &AuthClient,
        cache: &TokenCache,
        prompt: P,
    ) -> Result<Self>
    where
        P: FnOnce(&str) -> std::io::Result<String>,
    {
        let token = obtain_token(oauth, auth_client, cache, prompt).await?;
        let client = SpotifyClient::new(token.access_token)?;
        let user = client.current_user().await?;

        info!(
            "Signed in as {}",
            user.display_name.as_deref().unwrap_or(&user.id)
        );
        Ok(Self { client, user })
    }

    pub fn client(&self) -> &SpotifyClient {
        &self.client
    }

    pub fn user(&self) -> &CurrentUser {
        &self.user
    }

    pub fn user_id(&self) -> &str {
        &self.user.id
    }
}

/// Reuse the cached token while valid, refresh it once expired, and fall
/// back to interactive authorization. A new token is written to the cache.
pub async fn obtain_token<P>(
    oauth: &OAuthConfig,
    auth_client: &AuthClient,
    cache: &TokenCache,
    prompt: P,
) -> Result<StoredToken>
where
    P: FnOnce(&str) -> std::io::Result<String>,
{
    let cached = cache.load().unwrap_or_else(|e| {
        warn!("Ignoring unreadable token cache: {}", e);
        None
    });

    if let Some(token) = cached {
        if !token.is_expired(auth::now()) {
            debug!("Using cached token from {:?}", cache.path());
            return Ok(token);
        }

        if let Some(refresh_token) = token.refresh_token.as_deref() {
            match auth_client.refresh(oauth, refresh_token).await {
                Ok(token) => {
                    debug!("Refreshed expired token");
                    store(cache, &token);
                    return Ok(token);
                }
                Err(e) => warn!("Token refresh failed, re-authorizing: {}", e),
            }
        }
    }

    let state = new_state();
    let redirected = prompt(&auth_client.authorize_url(oauth, &state))?;
    let code = auth::extract_code(&redirected, Some(&state))?;
    let token = auth_client.exchange_code(oauth, &code).await?;
    store(cache, &token);
    Ok(token)
}

fn store(cache: &TokenCache, token: &StoredToken) {
    if let Err(e) = cache.save(token) {
        warn!("Failed to cache token: {}", e);
    }
}

/// Opaque value tying the consent request to its redirect
fn new_state() -> String {
    let now = chrono::Utc::now();
    format!(
        "{:x}{:08x}{:x}",
        now.timestamp(),
        now.timestamp_subsec_nanos(),
        std::process::id()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::spotify::AuthError;
    use crate::error::Error;
    use tempfile::TempDir;

    fn oauth() -> OAuthConfig {
        OAuthConfig::new("client", "secret", "http://127.0.0.1:8888/callback")
    }

    fn token(expires_at: i64, refresh: Option<&str>) -> StoredToken {
        StoredToken {
            access_token: "cached-access".to_string(),
            refresh_token: refresh.map(String::from),
            expires_at,
            scope: None,
        }
    }

    #[tokio::test]
    async fn test_valid_cached_token_skips_prompt() {
        let dir = TempDir::new().unwrap();
        let cache = TokenCache::new(dir.path().join("token.json"));
        cache.save(&token(auth::now() + 3600, None)).unwrap();
        let auth_client = AuthClient::with_base_url("http://127.0.0.1:9").unwrap();

        let token = obtain_token(&oauth(), &auth_client, &cache, |_| {
            panic!("prompt must not be shown")
        })
        .await
        .unwrap();

        assert_eq!(token.access_token, "cached-access");
    }

    #[tokio::test]
    async fn test_expired_token_without_refresh_prompts() {
        let dir = TempDir::new().unwrap();
        let cache = TokenCache::new(dir.path().join("token.json"));
        cache.save(&token(0, None)).unwrap();
        let auth_client = AuthClient::with_base_url("http://127.0.0.1:9").unwrap();

        let mut shown = None;
        let result = obtain_token(&oauth(), &auth_client, &cache, |url| {
            shown = Some(url.to_string());
            Ok("http://127.0.0.1:8888/callback?error=access_denied".to_string())
        })
        .await;

        assert!(shown.unwrap().starts_with("http://127.0.0.1:9/authorize?"));
        assert!(matches!(result, Err(Error::Auth(AuthError::Denied(_)))));
    }

    #[tokio::test]
    async fn test_pasted_url_with_wrong_state_rejected() {
        let dir = TempDir::new().unwrap();
        let cache = TokenCache::new(dir.path().join("token.json"));
        let auth_client = AuthClient::with_base_url("http://127.0.0.1:9").unwrap();

        let result = obtain_token(&oauth(), &auth_client, &cache, |_| {
            Ok("http://127.0.0.1:8888/callback?code=abc&state=forged".to_string())
        })
        .await;

        assert!(matches!(result, Err(Error::Auth(AuthError::StateMismatch))));
    }

    #[tokio::test]
    async fn test_prompt_io_error_is_fatal() {
        let dir = TempDir::new().unwrap();
        let cache = TokenCache::new(dir.path().join("token.json"));
        let auth_client = AuthClient::with_base_url("http://127.0.0.1:9").unwrap();

        let result = obtain_token(&oauth(), &auth_client, &cache, |_| {
            Err(std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "stdin closed"))
        })
        .await;

        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_state_is_nonempty_hex() {
        let state = new_state();
        assert!(!state.is_empty());
        assert!(state.chars().all(|c| c.is_ascii_hexdigit()));
    }
}

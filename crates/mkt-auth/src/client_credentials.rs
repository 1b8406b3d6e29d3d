//! OAuth 2.0 client-credentials flow with in-process token caching.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use crate::credentials::MarketplaceCredentials;
use crate::error::{Error, ErrorKind, Result};

/// Safety margin subtracted from a token's lifetime before refresh.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Token provider backed by the client-credentials grant.
///
/// Tokens are cached until shortly before expiry; concurrent callers share
/// one cached token behind an async mutex.
pub struct ClientCredentialsProvider {
    credentials: MarketplaceCredentials,
    authority: String,
    http: reqwest::Client,
    cache: Mutex<Option<CachedToken>>,
}

struct CachedToken {
    token: String,
    expires_at: Instant,
}

impl std::fmt::Debug for ClientCredentialsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentialsProvider")
            .field("credentials", &self.credentials)
            .field("authority", &self.authority)
            .finish_non_exhaustive()
    }
}

impl ClientCredentialsProvider {
    /// Create a provider against the default authority.
    pub fn new(credentials: MarketplaceCredentials) -> Self {
        Self {
            credentials,
            authority: crate::DEFAULT_AUTHORITY.to_string(),
            http: reqwest::Client::new(),
            cache: Mutex::new(None),
        }
    }

    /// Override the authority base URL (e.g. a sovereign cloud or a test
    /// server).
    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = authority.into().trim_end_matches('/').to_string();
        self
    }

    /// The tenant token endpoint.
    fn token_endpoint(&self) -> String {
        format!(
            "{}/{}/oauth2/token",
            self.authority,
            self.credentials.tenant_id()
        )
    }

    /// Request a fresh token from the authority.
    ///
    /// Credential values are not logged.
    #[instrument(skip(self))]
    async fn fetch_token(&self) -> Result<TokenResponse> {
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.credentials.client_id()),
            ("client_secret", self.credentials.client_secret()),
            ("resource", self.credentials.resource()),
        ];
        let body = serde_urlencoded::to_string(params)?;

        let response = self
            .http
            .post(self.token_endpoint())
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await?;

        handle_token_response(response).await
    }
}

async fn handle_token_response(response: reqwest::Response) -> Result<TokenResponse> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        if let Ok(err) = serde_json::from_str::<OAuthErrorResponse>(&body) {
            return Err(Error::new(ErrorKind::OAuth {
                error: err.error,
                description: err.error_description.unwrap_or_default(),
            }));
        }
        return Err(Error::new(ErrorKind::Http(format!(
            "token endpoint returned status {}",
            status.as_u16()
        ))));
    }

    serde_json::from_str(&body).map_err(Into::into)
}

#[async_trait]
impl relay_mkt_client::TokenProvider for ClientCredentialsProvider {
    async fn get_token(&self) -> relay_mkt_client::Result<String> {
        let mut cache = self.cache.lock().await;

        if let Some(cached) = cache.as_ref() {
            if cached.expires_at > Instant::now() {
                return Ok(cached.token.clone());
            }
            debug!("cached token expired, refreshing");
        }

        let response = self.fetch_token().await.map_err(|e| {
            relay_mkt_client::Error::with_source(
                relay_mkt_client::ErrorKind::AuthUnavailable(e.to_string()),
                e,
            )
        })?;

        let lifetime = Duration::from_secs(response.expires_in).saturating_sub(EXPIRY_MARGIN);
        *cache = Some(CachedToken {
            token: response.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });

        Ok(response.access_token)
    }
}

/// Token endpoint success payload.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    /// The bearer token.
    pub access_token: String,
    /// Lifetime in seconds. The authority may encode this as a string.
    #[serde(deserialize_with = "seconds_from_number_or_string")]
    pub expires_in: u64,
    /// Token type, normally `Bearer`.
    #[serde(default)]
    pub token_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OAuthErrorResponse {
    error: String,
    error_description: Option<String>,
}

fn seconds_from_number_or_string<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Seconds {
        Number(u64),
        Text(String),
    }

    match Seconds::deserialize(deserializer)? {
        Seconds::Number(n) => Ok(n),
        Seconds::Text(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

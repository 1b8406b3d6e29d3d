//! Bearer-token acquisition capability.

use async_trait::async_trait;

use crate::error::Result;

/// Supplies a valid bearer token for the current identity.
///
/// The executor resolves a token per attempt, so implementations are free to
/// refresh transparently. Failures surface as `AuthUnavailable`.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Return a bearer token ready for the `Authorization` header.
    async fn get_token(&self) -> Result<String>;
}

/// Token provider returning a fixed token. Intended for tests and short-lived
/// tools that already hold a token.
#[derive(Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    /// Wrap an existing token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenProvider")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn get_token(&self) -> Result<String> {
        Ok(self.token.clone())
    }
}

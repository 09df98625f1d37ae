use async_trait::async_trait;

use crate::errors::AuthError;
use crate::token::BearerToken;

/// Produces a bearer token asserting this process's service identity,
/// scoped to the given audience (the backend's base URL). Invoked fresh for
/// every outbound call unless wrapped in [`crate::cache::CachedTokenProvider`].
#[async_trait]
pub trait IdentityTokenProvider: Send + Sync {
    async fn token(&self, audience: &str) -> Result<BearerToken, AuthError>;
}

/// Fixed token for local runs and tests, where no metadata server exists.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl IdentityTokenProvider for StaticTokenProvider {
    async fn token(&self, _audience: &str) -> Result<BearerToken, AuthError> {
        Ok(BearerToken::new(self.token.clone()))
    }
}

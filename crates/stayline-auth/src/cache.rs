use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::errors::AuthError;
use crate::provider::IdentityTokenProvider;
use crate::token::BearerToken;

const DEFAULT_REFRESH_SKEW: Duration = Duration::from_secs(30);

/// Read-through token cache keyed by audience. Purely a performance layer:
/// observable behavior matches the uncached provider. Tokens without a
/// readable expiry are never cached so a rotated credential cannot get
/// pinned.
pub struct CachedTokenProvider {
    inner: Arc<dyn IdentityTokenProvider>,
    refresh_skew: Duration,
    cache: RwLock<HashMap<String, BearerToken>>,
}

impl CachedTokenProvider {
    pub fn new(inner: Arc<dyn IdentityTokenProvider>) -> Self {
        Self::with_refresh_skew(inner, DEFAULT_REFRESH_SKEW)
    }

    pub fn with_refresh_skew(inner: Arc<dyn IdentityTokenProvider>, skew: Duration) -> Self {
        Self {
            inner,
            refresh_skew: skew,
            cache: RwLock::new(HashMap::new()),
        }
    }

    fn fresh(&self, token: &BearerToken) -> bool {
        match token.expires_at {
            Some(exp) => unix_now() + (self.refresh_skew.as_secs() as i64) < exp,
            None => false,
        }
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[async_trait]
impl IdentityTokenProvider for CachedTokenProvider {
    async fn token(&self, audience: &str) -> Result<BearerToken, AuthError> {
        {
            let guard = self.cache.read();
            if let Some(cached) = guard.get(audience) {
                if self.fresh(cached) {
                    return Ok(cached.clone());
                }
            }
        }

        let token = self.inner.token(audience).await?;
        if token.expires_at.is_some() {
            self.cache.write().insert(audience.to_string(), token.clone());
        }
        Ok(token)
    }
}

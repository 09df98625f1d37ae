use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use crate::errors::AuthError;
use crate::provider::IdentityTokenProvider;
use crate::token::BearerToken;

pub const DEFAULT_METADATA_BASE: &str = "http://metadata.google.internal";

const IDENTITY_PATH: &str = "/computeMetadata/v1/instance/service-accounts/default/identity";

/// Fetches audience-scoped identity tokens from the compute metadata server.
/// The base URL is configurable so tests can stand in a local listener.
pub struct MetadataTokenProvider {
    base_url: String,
    client: reqwest::Client,
}

impl MetadataTokenProvider {
    pub fn new(base_url: impl Into<String>) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|err| {
                AuthError::provider_unavailable(&format!("failed to build http client: {err}"))
            })?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { base_url, client })
    }
}

#[async_trait]
impl IdentityTokenProvider for MetadataTokenProvider {
    async fn token(&self, audience: &str) -> Result<BearerToken, AuthError> {
        debug!(audience, "retrieving identity token");
        let response = self
            .client
            .get(format!("{}{IDENTITY_PATH}", self.base_url))
            .query(&[("audience", audience), ("format", "full")])
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .map_err(|err| {
                AuthError::provider_unavailable(&format!("metadata fetch error: {err}"))
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::FORBIDDEN {
            return Err(AuthError::rejected(&format!(
                "metadata server refused audience {audience}: {status}"
            )));
        }
        if !status.is_success() {
            return Err(AuthError::provider_unavailable(&format!(
                "metadata fetch status: {status}"
            )));
        }

        let body = response.text().await.map_err(|err| {
            AuthError::provider_unavailable(&format!("metadata body error: {err}"))
        })?;
        let token = body.trim();
        if token.is_empty() {
            return Err(AuthError::provider_unavailable("metadata returned empty token"));
        }
        debug!(audience, "identity token retrieved");
        Ok(BearerToken::new(token))
    }
}

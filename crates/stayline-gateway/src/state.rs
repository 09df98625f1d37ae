use std::sync::Arc;

use anyhow::Context;
use stayline_auth::prelude::*;
use stayline_net::prelude::*;
use stayline_schema::prelude::FieldSchema;

use crate::config::{resolve_secret_source, GatewayConfig, IdentityProviderConfig};
use crate::errors::GatewayError;

/// Shared per-process state. Everything here is immutable after startup;
/// handlers clone the `Arc`s, never the contents.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub schema: Arc<FieldSchema>,
    pub api_key: Arc<String>,
    pub tokens: Arc<dyn IdentityTokenProvider>,
    pub invoker: Arc<dyn BackendInvoker>,
}

impl AppState {
    pub fn from_config(config: GatewayConfig) -> anyhow::Result<Self> {
        let api_key = config.auth.resolve_api_key()?;
        let schema = config.schema.build()?;
        let tokens = build_token_provider(&config)?;
        let invoker = ReqwestInvoker::new().context("failed to build backend http client")?;
        Ok(Self::with_parts(config, schema, api_key, tokens, Arc::new(invoker)))
    }

    pub fn with_parts(
        config: GatewayConfig,
        schema: FieldSchema,
        api_key: String,
        tokens: Arc<dyn IdentityTokenProvider>,
        invoker: Arc<dyn BackendInvoker>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            schema: Arc::new(schema),
            api_key: Arc::new(api_key),
            tokens,
            invoker,
        }
    }

    pub fn backend_audience(&self) -> Result<String, GatewayError> {
        self.config.backend.audience()
    }
}

fn build_token_provider(config: &GatewayConfig) -> anyhow::Result<Arc<dyn IdentityTokenProvider>> {
    let inner: Arc<dyn IdentityTokenProvider> = match &config.identity.provider {
        IdentityProviderConfig::Metadata { base_url } => Arc::new(
            MetadataTokenProvider::new(base_url.clone())
                .context("failed to build metadata token provider")?,
        ),
        IdentityProviderConfig::Static {
            token,
            token_env,
            token_file,
        } => {
            let token =
                resolve_secret_source(token, token_env, token_file, "identity.provider.token")?;
            Arc::new(StaticTokenProvider::new(token))
        }
    };
    Ok(if config.identity.cache {
        Arc::new(CachedTokenProvider::new(inner))
    } else {
        inner
    })
}

use std::{env, fs, path::Path};

use anyhow::{anyhow, Context};
use config::Config;
use serde::{Deserialize, Serialize};
use stayline_schema::prelude::{FieldSchema, FieldSpec};

use crate::errors::GatewayError;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub identity: IdentityBootstrap,
    #[serde(default)]
    pub schema: SchemaBootstrap,
}

impl GatewayConfig {
    pub fn load() -> anyhow::Result<Self> {
        let config_file = env::var("STAYLINE_CONFIG_FILE")
            .unwrap_or_else(|_| "config/stayline.local.toml".to_string());

        let mut builder = Config::builder()
            .set_default("server.address", ServerConfig::default_address())?
            .set_default("server.port", ServerConfig::default_port())?;

        if Path::new(&config_file).exists() {
            builder = builder.add_source(config::File::from(Path::new(&config_file)));
        }

        builder = builder.add_source(config::Environment::with_prefix("STAYLINE").separator("__"));

        let config: GatewayConfig = builder
            .build()
            .context("failed to build configuration")?
            .try_deserialize()
            .context("failed to deserialize configuration")?;

        Ok(config)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "ServerConfig::default_address")]
    pub address: String,
    #[serde(default = "ServerConfig::default_port")]
    pub port: u16,
}

impl ServerConfig {
    fn default_address() -> String {
        "127.0.0.1".to_string()
    }

    fn default_port() -> u16 {
        8080
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: Self::default_address(),
            port: Self::default_port(),
        }
    }
}

/// The bookings backend. The host is deliberately optional at load time:
/// requests against an unconfigured backend fail with a 500 before any
/// outbound call is attempted.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub host: Option<String>,
}

impl BackendConfig {
    /// Base URL used both as the request target and the token audience.
    pub fn audience(&self) -> Result<String, GatewayError> {
        let host = self
            .host
            .as_deref()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| GatewayError::config_missing("backend.host is not configured"))?;
        Ok(format!("https://{host}"))
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_key_env: Option<String>,
    #[serde(default)]
    pub api_key_file: Option<String>,
}

impl AuthConfig {
    pub fn resolve_api_key(&self) -> anyhow::Result<String> {
        resolve_secret_source(
            &self.api_key,
            &self.api_key_env,
            &self.api_key_file,
            "auth.api_key",
        )
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IdentityBootstrap {
    #[serde(default = "IdentityBootstrap::default_cache")]
    pub cache: bool,
    #[serde(default)]
    pub provider: IdentityProviderConfig,
}

impl IdentityBootstrap {
    fn default_cache() -> bool {
        true
    }
}

impl Default for IdentityBootstrap {
    fn default() -> Self {
        Self {
            cache: Self::default_cache(),
            provider: IdentityProviderConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IdentityProviderConfig {
    Metadata {
        #[serde(default = "default_metadata_base_url")]
        base_url: String,
    },
    Static {
        #[serde(default)]
        token: Option<String>,
        #[serde(default)]
        token_env: Option<String>,
        #[serde(default)]
        token_file: Option<String>,
    },
}

impl Default for IdentityProviderConfig {
    fn default() -> Self {
        IdentityProviderConfig::Metadata {
            base_url: default_metadata_base_url(),
        }
    }
}

fn default_metadata_base_url() -> String {
    stayline_auth::metadata::DEFAULT_METADATA_BASE.to_string()
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SchemaBootstrap {
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

impl SchemaBootstrap {
    pub fn build(&self) -> anyhow::Result<FieldSchema> {
        FieldSchema::new(self.fields.clone()).map_err(|err| anyhow!("invalid field schema: {err}"))
    }
}

pub(crate) fn resolve_secret_source(
    literal: &Option<String>,
    env_key: &Option<String>,
    file_path: &Option<String>,
    field: &str,
) -> anyhow::Result<String> {
    if let Some(env_var) = env_key.as_ref() {
        let value = env::var(env_var)
            .with_context(|| format!("environment variable {env_var} for {field} not set"))?;
        return Ok(value);
    }
    if let Some(path) = file_path.as_ref() {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("read secret file {path} for {field}"))?;
        return Ok(contents.trim().to_string());
    }
    if let Some(value) = literal.as_ref() {
        if value.is_empty() {
            return Err(anyhow!("{field} literal secret cannot be empty"));
        }
        return Ok(value.clone());
    }
    Err(anyhow!(
        "{field} secret must be provided via literal/env/file"
    ))
}

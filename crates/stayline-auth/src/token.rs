use base64::Engine;
use serde_json::Value;

/// Short-lived credential asserting this process's identity to one audience.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BearerToken {
    pub value: String,
    /// Unix seconds from the token's `exp` claim, when readable.
    pub expires_at: Option<i64>,
}

impl BearerToken {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let expires_at = peek_exp(&value);
        Self { value, expires_at }
    }
}

/// Best-effort read of the `exp` claim from a JWT payload segment. The token
/// is opaque to us (the backend verifies it); this only drives cache expiry,
/// so an unreadable token simply reports no expiry.
pub fn peek_exp(token: &str) -> Option<i64> {
    let payload = token.split('.').nth(1)?;
    let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(payload)
        .ok()?;
    let claims: Value = serde_json::from_slice(&bytes).ok()?;
    claims.get("exp")?.as_i64()
}

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use stayline_auth::errors::AuthError;
use stayline_errors::prelude::*;
use stayline_net::errors::NetError;
use stayline_schema::errors::CoercionError;
use thiserror::Error;

/// Terminal error for a request. Carries the full [`ErrorObj`]; only the
/// code name and user message reach the response body, the developer detail
/// stays in the server log.
#[derive(Debug, Error)]
#[error("{0:?}")]
pub struct GatewayError(pub Box<ErrorObj>);

impl GatewayError {
    pub fn config_missing(detail: &str) -> Self {
        GatewayError(Box::new(
            ErrorBuilder::new(codes::CONFIG_MISSING)
                .user_msg("Gateway is not fully configured.")
                .dev_msg(detail)
                .build(),
        ))
    }

    pub fn unauthenticated(detail: &str) -> Self {
        GatewayError(Box::new(
            ErrorBuilder::new(codes::AUTH_UNAUTHENTICATED)
                .user_msg("A valid API key is required.")
                .dev_msg(detail)
                .build(),
        ))
    }

    pub fn validation(msg: &str) -> Self {
        GatewayError(Box::new(
            ErrorBuilder::new(codes::SCHEMA_VALIDATION).user_msg(msg).build(),
        ))
    }

    pub fn upstream(detail: &str) -> Self {
        GatewayError(Box::new(
            ErrorBuilder::new(codes::PROVIDER_UNAVAILABLE)
                .user_msg("Backend service returned an unusable response.")
                .dev_msg(detail)
                .build(),
        ))
    }

    pub fn internal(detail: &str) -> Self {
        GatewayError(Box::new(
            ErrorBuilder::new(codes::UNKNOWN_INTERNAL)
                .user_msg("Internal error.")
                .dev_msg(detail)
                .build(),
        ))
    }
}

impl From<AuthError> for GatewayError {
    fn from(err: AuthError) -> Self {
        GatewayError(Box::new(err.into_inner()))
    }
}

impl From<NetError> for GatewayError {
    fn from(err: NetError) -> Self {
        GatewayError(Box::new(err.into_inner()))
    }
}

impl From<CoercionError> for GatewayError {
    fn from(err: CoercionError) -> Self {
        GatewayError(Box::new(err.into_inner()))
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let obj = *self.0;
        let status =
            StatusCode::from_u16(obj.http_status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let detail = obj.dev_msg.as_deref().unwrap_or("");
        if status.is_server_error() {
            tracing::error!(code = obj.code_name(), detail, "request failed");
        } else {
            tracing::warn!(code = obj.code_name(), detail, "request rejected");
        }
        (
            status,
            Json(json!({
                "error": obj.code_name(),
                "message": obj.user_msg,
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_the_error_code() {
        assert_eq!(GatewayError::unauthenticated("x").0.http_status, 401);
        assert_eq!(GatewayError::validation("x").0.http_status, 400);
        assert_eq!(GatewayError::config_missing("x").0.http_status, 500);
        assert_eq!(GatewayError::upstream("x").0.http_status, 500);
    }

    #[test]
    fn upstream_detail_never_reaches_the_user_message() {
        let err = GatewayError::upstream("503 from backend");
        assert!(!err.0.user_msg.contains("503"));
    }
}

use http::StatusCode;
use stayline_errors::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{0:?}")]
pub struct NetError(pub Box<ErrorObj>);

impl NetError {
    pub fn into_inner(self) -> ErrorObj {
        *self.0
    }

    pub fn transport(detail: &str) -> Self {
        NetError(Box::new(
            ErrorBuilder::new(codes::PROVIDER_UNAVAILABLE)
                .user_msg("Backend service is unreachable.")
                .dev_msg(detail)
                .build(),
        ))
    }

    pub fn upstream_status(status: StatusCode, detail: &str) -> Self {
        let retry = if status.is_server_error() {
            RetryClass::Transient
        } else {
            RetryClass::Permanent
        };
        NetError(Box::new(
            ErrorBuilder::new(codes::PROVIDER_UNAVAILABLE)
                .user_msg("Backend service returned an error.")
                .dev_msg(format!("upstream status {status}: {detail}"))
                .retry(retry)
                .build(),
        ))
    }

    pub fn decode(detail: &str) -> Self {
        NetError(Box::new(
            ErrorBuilder::new(codes::PROVIDER_UNAVAILABLE)
                .user_msg("Backend service returned an unreadable response.")
                .dev_msg(detail)
                .retry(RetryClass::Permanent)
                .build(),
        ))
    }
}

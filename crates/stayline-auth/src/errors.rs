use stayline_errors::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{0:?}")]
pub struct AuthError(pub Box<ErrorObj>);

impl AuthError {
    pub fn into_inner(self) -> ErrorObj {
        *self.0
    }

    pub fn provider_unavailable(detail: &str) -> Self {
        AuthError(Box::new(
            ErrorBuilder::new(codes::PROVIDER_UNAVAILABLE)
                .user_msg("Service identity is unavailable.")
                .dev_msg(detail)
                .build(),
        ))
    }

    pub fn rejected(detail: &str) -> Self {
        AuthError(Box::new(
            ErrorBuilder::new(codes::PROVIDER_UNAVAILABLE)
                .user_msg("Service identity was rejected for this audience.")
                .dev_msg(detail)
                .retry(RetryClass::Permanent)
                .build(),
        ))
    }
}

use stayline_errors::prelude::*;
use thiserror::Error;

/// Rejected schema document. Raised only at load time; duplicate display
/// names or canonical keys must fail fast instead of shadowing each other.
#[derive(Debug, Error)]
#[error("{0:?}")]
pub struct SchemaError(pub Box<ErrorObj>);

impl SchemaError {
    pub fn into_inner(self) -> ErrorObj {
        *self.0
    }

    pub fn duplicate_canonical(key: &str) -> Self {
        SchemaError(Box::new(
            ErrorBuilder::new(codes::SCHEMA_VALIDATION)
                .user_msg("Field schema is invalid.")
                .dev_msg(format!("duplicate canonical key: {key}"))
                .build(),
        ))
    }

    pub fn duplicate_display(name: &str) -> Self {
        SchemaError(Box::new(
            ErrorBuilder::new(codes::SCHEMA_VALIDATION)
                .user_msg("Field schema is invalid.")
                .dev_msg(format!("duplicate display name: {name}"))
                .build(),
        ))
    }
}

/// A recognized field carried a value that cannot be converted to its
/// declared type. Propagates to the caller as a request-validation failure.
#[derive(Debug, Error)]
#[error("{0:?}")]
pub struct CoercionError(pub Box<ErrorObj>);

impl CoercionError {
    pub fn into_inner(self) -> ErrorObj {
        *self.0
    }

    pub fn invalid(expected: &str, detail: &str) -> Self {
        CoercionError(Box::new(
            ErrorBuilder::new(codes::SCHEMA_VALIDATION)
                .user_msg(format!("Value is not a valid {expected}."))
                .dev_msg(detail.to_string())
                .build(),
        ))
    }

    /// Re-badge the error with the display name of the offending field so
    /// the caller-facing message names the problem.
    pub fn named(self, display: &str) -> Self {
        let inner = *self.0;
        CoercionError(Box::new(
            ErrorBuilder::new(codes::SCHEMA_VALIDATION)
                .user_msg(format!("Field '{display}' has an invalid value."))
                .dev_msg(format!(
                    "{display}: {}",
                    inner.dev_msg.unwrap_or_else(|| inner.user_msg.clone())
                ))
                .build(),
        ))
    }
}

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::retry::RetryClass;

/// Stable error identifier carrying its default transport mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ErrorCode {
    pub name: &'static str,
    pub http_status: u16,
    pub retry: RetryClass,
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name)
    }
}

/// The one error shape that crosses crate boundaries. `user_msg` is safe to
/// show to callers; `dev_msg` is operator-facing and must never leak into a
/// response body.
#[derive(Clone, Debug)]
pub struct ErrorObj {
    pub code: ErrorCode,
    pub http_status: u16,
    pub user_msg: String,
    pub dev_msg: Option<String>,
    pub retry: RetryClass,
}

impl ErrorObj {
    pub fn code_name(&self) -> &'static str {
        self.code.name
    }
}

impl Serialize for ErrorObj {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Public projection only: dev_msg stays server-side.
        let mut state = serializer.serialize_struct("ErrorObj", 3)?;
        state.serialize_field("error", &self.code)?;
        state.serialize_field("message", &self.user_msg)?;
        state.serialize_field("retry", &self.retry)?;
        state.end()
    }
}

pub struct ErrorBuilder {
    code: ErrorCode,
    http_status: u16,
    user_msg: Option<String>,
    dev_msg: Option<String>,
    retry: RetryClass,
}

impl ErrorBuilder {
    pub fn new(code: ErrorCode) -> Self {
        Self {
            code,
            http_status: code.http_status,
            user_msg: None,
            dev_msg: None,
            retry: code.retry,
        }
    }

    pub fn user_msg(mut self, msg: impl Into<String>) -> Self {
        self.user_msg = Some(msg.into());
        self
    }

    pub fn dev_msg(mut self, msg: impl Into<String>) -> Self {
        self.dev_msg = Some(msg.into());
        self
    }

    pub fn retry(mut self, retry: RetryClass) -> Self {
        self.retry = retry;
        self
    }

    pub fn build(self) -> ErrorObj {
        ErrorObj {
            code: self.code,
            http_status: self.http_status,
            user_msg: self
                .user_msg
                .unwrap_or_else(|| "Request failed.".to_string()),
            dev_msg: self.dev_msg,
            retry: self.retry,
        }
    }
}

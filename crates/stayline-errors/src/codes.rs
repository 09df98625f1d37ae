use crate::model::ErrorCode;
use crate::retry::RetryClass;

pub const AUTH_UNAUTHENTICATED: ErrorCode = ErrorCode {
    name: "AUTH.UNAUTHENTICATED",
    http_status: 401,
    retry: RetryClass::Permanent,
};

pub const SCHEMA_VALIDATION: ErrorCode = ErrorCode {
    name: "SCHEMA.VALIDATION",
    http_status: 400,
    retry: RetryClass::Permanent,
};

pub const CONFIG_MISSING: ErrorCode = ErrorCode {
    name: "CONFIG.MISSING",
    http_status: 500,
    retry: RetryClass::None,
};

pub const PROVIDER_UNAVAILABLE: ErrorCode = ErrorCode {
    name: "PROVIDER.UNAVAILABLE",
    http_status: 500,
    retry: RetryClass::Transient,
};

pub const UNKNOWN_INTERNAL: ErrorCode = ErrorCode {
    name: "UNKNOWN.INTERNAL",
    http_status: 500,
    retry: RetryClass::None,
};

use http::{Method, StatusCode};
use serde_json::Value;
use url::Url;

/// One outbound call: the bearer token is attached by the invoker, the
/// optional body is JSON-encoded.
#[derive(Clone, Debug)]
pub struct BackendRequest {
    pub method: Method,
    pub url: Url,
    pub bearer: String,
    pub body: Option<Value>,
}

impl BackendRequest {
    pub fn get(url: Url, bearer: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url,
            bearer: bearer.into(),
            body: None,
        }
    }

    pub fn post(url: Url, bearer: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::POST,
            url,
            bearer: bearer.into(),
            body: Some(body),
        }
    }
}

/// A 2xx response with its body parsed as JSON (`Null` when empty).
#[derive(Clone, Debug)]
pub struct BackendResponse {
    pub status: StatusCode,
    pub body: Value,
}

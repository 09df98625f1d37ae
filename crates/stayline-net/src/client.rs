use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::errors::NetError;
use crate::types::{BackendRequest, BackendResponse};

const BODY_SNIPPET_LIMIT: usize = 256;

#[async_trait]
pub trait BackendInvoker: Send + Sync {
    async fn invoke(&self, request: BackendRequest) -> Result<BackendResponse, NetError>;
}

pub struct ReqwestInvoker {
    client: reqwest::Client,
}

impl ReqwestInvoker {
    pub fn new() -> Result<Self, NetError> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .tcp_keepalive(Some(std::time::Duration::from_secs(30)))
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|err| {
                NetError::transport(&format!("failed to build reqwest client: {err}"))
            })?;
        Ok(Self { client })
    }

    pub fn with_reqwest_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BackendInvoker for ReqwestInvoker {
    async fn invoke(&self, request: BackendRequest) -> Result<BackendResponse, NetError> {
        debug!(method = %request.method, url = %request.url, "invoking backend service");

        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone())
            .bearer_auth(&request.bearer)
            .header(http::header::ACCEPT, "application/json");
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(classify_transport)?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| NetError::transport(&format!("response body error: {err}")))?;

        if !status.is_success() {
            return Err(NetError::upstream_status(status, &snippet(&bytes)));
        }

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .map_err(|err| NetError::decode(&format!("response decode error: {err}")))?
        };
        debug!(method = %request.method, url = %request.url, %status, "backend service responded");
        Ok(BackendResponse { status, body })
    }
}

fn classify_transport(err: reqwest::Error) -> NetError {
    if err.is_timeout() {
        NetError::transport(&format!("request timeout: {err}"))
    } else if err.is_connect() {
        NetError::transport(&format!("connect error: {err}"))
    } else {
        NetError::transport(&format!("request error: {err}"))
    }
}

fn snippet(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    let mut text = text.into_owned();
    if text.len() > BODY_SNIPPET_LIMIT {
        let mut end = BODY_SNIPPET_LIMIT;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        text.truncate(end);
    }
    text
}

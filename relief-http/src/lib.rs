//! `reqwest` implementation of [`relief_core::Transport`].

use std::error::Error as _;

use async_trait::async_trait;
use relief_core::{RawResponse, Transport, TransportError};
use serde_json::Value;
use tracing::{debug, trace};

/// HTTP transport backed by a shared [`reqwest::Client`].
///
/// No request timeout is configured; a stalled collaborator is bounded only
/// by the operating system's own connection limits.
///
/// ```rust,no_run
/// use relief_core::{ApiConfig, AuthMode, Credentials, authenticate};
/// use relief_http::ReqwestTransport;
///
/// # async fn run() -> anyhow::Result<()> {
/// let transport = ReqwestTransport::new()?;
/// let _session = authenticate(
///     &transport,
///     &ApiConfig::default(),
///     AuthMode::SignIn,
///     &Credentials::new("alice", "secret1"),
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Builds a transport with a fresh client.
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("relief-estimate/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(map_error)?;
        Ok(Self { client })
    }

    /// Wraps an existing client (e.g. one with custom TLS roots).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    fn name(&self) -> &'static str {
        "reqwest"
    }

    async fn post_json(
        &self,
        url: &str,
        body: &Value,
    ) -> Result<RawResponse, TransportError> {
        let resp = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(map_error)?;
        let status = resp.status().as_u16();
        debug!(url, status, "response received");

        let text = resp.text().await.map_err(map_error)?;
        trace!(url, body = %text, "response body");
        Ok(RawResponse::new(status, text))
    }
}

/// Flattens the error chain into one message and flags connection failures.
fn map_error(err: reqwest::Error) -> TransportError {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    if err.is_connect() {
        TransportError::connect(message)
    } else {
        TransportError::other(message)
    }
}

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Status and body text of a completed HTTP exchange.
///
/// Bodies are kept as text: both collaborators are classified from the
/// raw text before any JSON decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(
        status: u16,
        body: impl Into<String>,
    ) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// `true` for any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// No response was obtained for a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
    /// Set when the transport knows the peer could not be reached at all
    /// (DNS failure, refused or reset connection).
    pub connect: bool,
}

impl TransportError {
    pub fn connect(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            connect: true,
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            connect: false,
        }
    }
}

/// One implementation per HTTP stack. Both auth and prediction exchanges
/// go through this single seam, which is also where tests substitute a
/// stub.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Short identifier used in log output.
    fn name(&self) -> &'static str;

    /// POST `body` as JSON to `url` and return the response, whatever its
    /// status. Only a missing response is an error.
    async fn post_json(
        &self,
        url: &str,
        body: &Value,
    ) -> Result<RawResponse, TransportError>;
}

// ── stub transport ───────────────────────────────────────────────────────
// Replies with a fixed outcome and records every request so tests can
// assert on what was (or was not) sent.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::api::{RawResponse, Transport, TransportError};

pub(crate) struct StubTransport {
    reply: Result<RawResponse, TransportError>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl StubTransport {
    pub(crate) fn replying(
        status: u16,
        body: &str,
    ) -> Self {
        Self {
            reply: Ok(RawResponse::new(status, body)),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing(error: TransportError) -> Self {
        Self {
            reply: Err(error),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for StubTransport {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn post_json(
        &self,
        url: &str,
        body: &Value,
    ) -> Result<RawResponse, TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), body.clone()));
        self.reply.clone()
    }
}

//! JSON-RPC 2.0 transport over HTTP.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use log::debug;
use serde_json::{json, Value};

use crate::error::ChainError;

/// One JSON-RPC round trip. The seam every chain read goes through, so
/// tests can substitute canned responses for a live endpoint.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ChainError>;
}

/// JSON-RPC over HTTP(S) against a single configured endpoint URL.
pub struct HttpTransport {
    url: String,
    client: reqwest::Client,
    next_id: AtomicU64,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>) -> Self {
        HttpTransport {
            url: url.into(),
            client: reqwest::Client::new(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RpcTransport for HttpTransport {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ChainError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        debug!("rpc request {} id={}", method, id);

        let response: Value = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await?
            .json()
            .await?;

        if let Some(error) = response.get("error").filter(|e| !e.is_null()) {
            let code = error.get("code").and_then(Value::as_i64).unwrap_or(0);
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown rpc error")
                .to_string();
            return Err(ChainError::Rpc { code, message });
        }

        response
            .get("result")
            .cloned()
            .ok_or_else(|| ChainError::InvalidResponse(format!("{method}: missing result field")))
    }
}

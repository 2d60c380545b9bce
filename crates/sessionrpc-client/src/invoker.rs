//! Backend invoker
//!
//! One POST per call. Application-level errors are logged and handed back
//! as a normal response; only transport and decoding problems are `Err`.

use serde_json::Value;
use std::sync::Arc;
use url::Url;

use sessionrpc_storage::SessionStore;

use crate::envelope::{RpcRequest, RpcResponse};
use crate::Result;

#[derive(Clone)]
pub struct Invoker {
    http: reqwest::Client,
    endpoint: Url,
    store: Arc<dyn SessionStore>,
}

impl Invoker {
    pub fn new(http: reqwest::Client, endpoint: Url, store: Arc<dyn SessionStore>) -> Self {
        Self {
            http,
            endpoint,
            store,
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Send `method` with an optional payload and session identifier.
    ///
    /// A truthy `resetSession` clears the stored identifier before this
    /// returns, whatever the `error` field says.
    pub async fn invoke(
        &self,
        method: &str,
        data: Option<Value>,
        session_id: Option<&str>,
    ) -> Result<RpcResponse> {
        let mut request = RpcRequest::new(method);
        request.data = data;
        request.session_id = session_id.map(str::to_string);

        let response = self.post(&request).await.inspect_err(|e| {
            tracing::error!(method = %method, error = %e, "Network error occurred");
        })?;

        if response.has_error() {
            tracing::error!(method = %method, response = %response, "Backend reported an error");
        }

        if response.reset_session() {
            match self.store.clear() {
                Ok(()) => tracing::info!(method = %method, "Backend requested session reset"),
                Err(e) => tracing::error!(
                    method = %method,
                    error = %e,
                    "Failed to clear session after reset request"
                ),
            }
        }

        Ok(response)
    }

    async fn post(&self, request: &RpcRequest) -> Result<RpcResponse> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;

        // Error replies carry a JSON body with a 4xx/5xx status
        let status = response.status();
        let body = response.bytes().await?;

        tracing::debug!(
            method = %request.method_name,
            status = status.as_u16(),
            bytes = body.len(),
            "Backend responded"
        );

        RpcResponse::from_slice(&body)
    }
}

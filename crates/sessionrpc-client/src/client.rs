//! Sessioned RPC client
//!
//! Composes the resolver and the invoker for each call.

use serde_json::{Map, Value};
use std::sync::Arc;
use url::Url;

use sessionrpc_storage::SessionStore;

use crate::envelope::RpcResponse;
use crate::invoker::Invoker;
use crate::resolver::SessionResolver;
use crate::Result;

/// Cheap to clone; clones share the HTTP connection pool and session store.
#[derive(Clone)]
pub struct SessionedRpcClient {
    invoker: Invoker,
    resolver: SessionResolver,
}

impl SessionedRpcClient {
    pub fn new(endpoint: Url, store: Arc<dyn SessionStore>) -> Self {
        Self::with_http_client(reqwest::Client::new(), endpoint, store)
    }

    pub fn with_http_client(
        http: reqwest::Client,
        endpoint: Url,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        let invoker = Invoker::new(http, endpoint, store);
        let resolver = SessionResolver::new(invoker.clone());

        Self { invoker, resolver }
    }

    pub fn endpoint(&self) -> &Url {
        self.invoker.endpoint()
    }

    /// Current session identifier without touching the network
    pub fn session_id(&self) -> Result<Option<String>> {
        Ok(self.invoker.store().get()?)
    }

    /// Forget the current session; the next call bootstraps a new one
    pub fn reset_session(&self) -> Result<()> {
        self.invoker.store().clear()?;
        tracing::info!("Session reset by client");
        Ok(())
    }

    /// Resolve a session, then call `method` with it.
    ///
    /// No request for `method` is sent if the session cannot be obtained.
    pub async fn call(&self, method: &str, data: Value) -> Result<RpcResponse> {
        let session_id = self.resolver.resolve().await?;

        tracing::debug!(method = %method, session_id = %session_id, "Calling backend");

        self.invoker
            .invoke(method, Some(data), Some(&session_id))
            .await
    }

    /// `call` with an empty object payload
    pub async fn call_empty(&self, method: &str) -> Result<RpcResponse> {
        self.call(method, Value::Object(Map::new())).await
    }

    /// Fail-soft form of `call`: every failure is logged and becomes `None`.
    pub async fn run_on_backend(&self, method: &str, data: Value) -> Option<RpcResponse> {
        match self.call(method, data).await {
            Ok(response) => Some(response),
            Err(e) => {
                tracing::warn!(method = %method, error = %e, "Backend call did not complete");
                None
            }
        }
    }
}

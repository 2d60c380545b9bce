//! Session resolution
//!
//! Returns the stored identifier, or bootstraps one with `newSession`.
//! Concurrent callers that both find the slot empty each bootstrap; the
//! last identifier written wins.

use crate::error::RpcError;
use crate::invoker::Invoker;
use crate::Result;

pub const NEW_SESSION_METHOD: &str = "newSession";

#[derive(Clone)]
pub struct SessionResolver {
    invoker: Invoker,
}

impl SessionResolver {
    pub fn new(invoker: Invoker) -> Self {
        Self { invoker }
    }

    pub async fn resolve(&self) -> Result<String> {
        if let Some(session_id) = self.invoker.store().get()? {
            return Ok(session_id);
        }

        let response = self
            .invoker
            .invoke(NEW_SESSION_METHOD, None, None)
            .await
            .inspect_err(|_| tracing::error!("Failed to create new session"))?;

        let Some(session_id) = response.session_id() else {
            tracing::error!(response = %response, "Failed to create new session");
            let reason = response
                .error_message()
                .unwrap_or("response carried no sessionId");
            return Err(RpcError::SessionUnavailable(reason.to_string()));
        };

        self.invoker.store().set(session_id)?;
        tracing::info!(session_id = %session_id, "Created new session");

        Ok(session_id.to_string())
    }
}

//! Account commands
//!
//! Typed wrappers over the backend's `register`, `login` and `getUserName`
//! session methods. Login state lives server-side in the session, so these
//! only make sense on one client instance.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use sessionrpc_core::SessionedRpcClient;

use super::CommandResult;

pub const REGISTER_METHOD: &str = "register";
pub const LOGIN_METHOD: &str = "login";
pub const GET_USER_NAME_METHOD: &str = "getUserName";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// `register` and `login` reply with a human-readable status line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextReply {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserNameReply {
    /// Empty when nobody is logged in on this session
    pub username: String,
}

impl UserNameReply {
    pub fn logged_in(&self) -> bool {
        !self.username.is_empty()
    }
}

pub struct AccountApi {
    client: SessionedRpcClient,
}

impl AccountApi {
    pub fn new(client: SessionedRpcClient) -> Self {
        Self { client }
    }

    pub async fn register(&self, credentials: &Credentials) -> CommandResult<TextReply> {
        self.typed_call(REGISTER_METHOD, json!(credentials)).await
    }

    pub async fn login(&self, credentials: &Credentials) -> CommandResult<TextReply> {
        self.typed_call(LOGIN_METHOD, json!(credentials)).await
    }

    pub async fn user_name(&self) -> CommandResult<UserNameReply> {
        self.typed_call(GET_USER_NAME_METHOD, json!({})).await
    }

    async fn typed_call<T: DeserializeOwned>(&self, method: &str, data: Value) -> CommandResult<T> {
        let response = match self.client.call(method, data).await {
            Ok(response) => response,
            Err(e) => return CommandResult::err(e.to_string()),
        };

        if let Some(error) = response.error() {
            let message = error
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            return CommandResult::err(message);
        }

        match response.parse::<T>() {
            Ok(reply) => CommandResult::ok(reply),
            Err(e) => {
                tracing::warn!(method = %method, error = %e, "Unexpected reply shape");
                CommandResult::err(e.to_string())
            }
        }
    }
}

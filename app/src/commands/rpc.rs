//! Raw method calls

use serde::Serialize;
use serde_json::{Map, Value};

use sessionrpc_core::SessionedRpcClient;

use super::CommandResult;

#[derive(Debug, Serialize)]
pub struct RawReply {
    pub session_id: Option<String>,
    pub response: Value,
}

/// Call any backend method. `data` must be JSON; absent means `{}`.
pub async fn call_method(
    client: &SessionedRpcClient,
    method: &str,
    data: Option<&str>,
) -> CommandResult<RawReply> {
    let data = match data {
        Some(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(value) => value,
            Err(e) => return CommandResult::err(format!("Invalid JSON payload: {e}")),
        },
        None => Value::Object(Map::new()),
    };

    let Some(response) = client.run_on_backend(method, data).await else {
        return CommandResult::err(format!("{method} did not complete"));
    };

    let session_id = client.session_id().ok().flatten();
    CommandResult::ok(RawReply {
        session_id,
        response: response.into_value(),
    })
}

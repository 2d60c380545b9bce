//! Wire envelopes

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::RpcError;
use crate::Result;

/// Request body: `{ methodName, data?, sessionId? }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcRequest {
    pub method_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl RpcRequest {
    pub fn new(method_name: impl Into<String>) -> Self {
        Self {
            method_name: method_name.into(),
            data: None,
            session_id: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

/// Response body as sent by the backend.
///
/// Only `error`, `resetSession` and (for `newSession`) `sessionId` mean
/// anything to this layer; every other field is passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RpcResponse {
    fields: Map<String, Value>,
}

impl RpcResponse {
    /// Parse a raw body. Anything other than a JSON object is rejected.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        match serde_json::from_slice::<Value>(body)? {
            Value::Object(fields) => Ok(Self { fields }),
            _ => Err(RpcError::InvalidEnvelope),
        }
    }

    /// The `error` field, if it is truthy
    pub fn error(&self) -> Option<&Value> {
        self.fields.get("error").filter(|v| is_truthy(v))
    }

    pub fn has_error(&self) -> bool {
        self.error().is_some()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error().and_then(Value::as_str)
    }

    pub fn reset_session(&self) -> bool {
        self.fields.get("resetSession").is_some_and(is_truthy)
    }

    /// Non-empty `sessionId` string, present on `newSession` replies
    pub fn session_id(&self) -> Option<&str> {
        self.fields
            .get("sessionId")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }

    /// Decode the whole body into a caller-defined shape
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(Value::Object(self.fields.clone()))?)
    }
}

impl From<Map<String, Value>> for RpcResponse {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl std::fmt::Display for RpcResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string(&self.fields) {
            Ok(json) => f.write_str(&json),
            Err(_) => f.write_str("{}"),
        }
    }
}

/// JavaScript truthiness of a JSON value
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_omits_absent_fields() {
        let bootstrap = serde_json::to_value(RpcRequest::new("newSession")).unwrap();
        assert_eq!(bootstrap, json!({ "methodName": "newSession" }));

        let call = RpcRequest::new("getUser")
            .with_data(json!({ "id": 1 }))
            .with_session("abc");
        assert_eq!(
            serde_json::to_value(call).unwrap(),
            json!({ "methodName": "getUser", "data": { "id": 1 }, "sessionId": "abc" })
        );
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(2.5)));
        assert!(is_truthy(&json!("This session does not exist.")));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
    }

    #[test]
    fn test_response_flags() {
        let response =
            RpcResponse::from_slice(br#"{"error":"This session does not exist.","resetSession":true}"#)
                .unwrap();
        assert!(response.has_error());
        assert_eq!(response.error_message(), Some("This session does not exist."));
        assert!(response.reset_session());

        let response = RpcResponse::from_slice(br#"{"error":false,"resetSession":0,"text":"ok"}"#)
            .unwrap();
        assert!(!response.has_error());
        assert!(!response.reset_session());
        assert_eq!(response.get("text"), Some(&json!("ok")));
    }

    #[test]
    fn test_session_id_must_be_non_empty_string() {
        let response = RpcResponse::from_slice(br#"{"sessionId":"abc"}"#).unwrap();
        assert_eq!(response.session_id(), Some("abc"));

        let response = RpcResponse::from_slice(br#"{"sessionId":""}"#).unwrap();
        assert_eq!(response.session_id(), None);

        let response = RpcResponse::from_slice(br#"{"sessionId":42}"#).unwrap();
        assert_eq!(response.session_id(), None);
    }

    #[test]
    fn test_rejects_non_object_bodies() {
        assert!(matches!(
            RpcResponse::from_slice(b"null"),
            Err(RpcError::InvalidEnvelope)
        ));
        assert!(matches!(
            RpcResponse::from_slice(b"<html>"),
            Err(RpcError::Decode(_))
        ));
    }

    #[test]
    fn test_parse_typed() {
        #[derive(Deserialize)]
        struct UserName {
            username: String,
        }

        let response = RpcResponse::from_slice(br#"{"username":"ada"}"#).unwrap();
        let parsed: UserName = response.parse().unwrap();
        assert_eq!(parsed.username, "ada");
    }
}

//! JSON-RPC 2.0 framing for the stdio transport.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use serde::Serialize;
use serde_json::{Map, Value};

pub const JSONRPC_VERSION: &str = "2.0";

/// A decoded request line. `id` is `None` for notifications; an explicit
/// `"id": null` is kept as `Some(Value::Null)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub id: Option<Value>,
    pub method: String,
    pub params: Value,
}

impl Request {
    /// Decode one line of input. Every failure is already shaped as the
    /// response that should be written back.
    pub fn decode(line: &[u8]) -> Result<Self, Response> {
        let value: Value = serde_json::from_slice(line).map_err(|e| {
            Response::error(
                Value::Null,
                McpError::new(
                    ErrorCode::PARSE_ERROR,
                    "Parse error",
                    Some(Value::String(e.to_string())),
                ),
            )
        })?;
        Self::from_value(value)
    }

    fn from_value(value: Value) -> Result<Self, Response> {
        let Value::Object(mut object) = value else {
            return Err(Response::error(Value::Null, invalid_request()));
        };
        let id = object.remove("id");
        let method = match object.remove("method") {
            Some(Value::String(method)) => method,
            _ => {
                return Err(Response::error(
                    id.unwrap_or(Value::Null),
                    invalid_request(),
                ))
            }
        };
        let params = object.remove("params").unwrap_or(Value::Null);
        Ok(Self { id, method, params })
    }

    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }

    /// The id to echo back; null when the request carried none.
    pub fn response_id(&self) -> Value {
        self.id.clone().unwrap_or(Value::Null)
    }

    /// `params.name` for `tools/call`.
    pub fn tool_name(&self) -> Option<&str> {
        self.params.get("name").and_then(Value::as_str)
    }

    /// `params.arguments` for `tools/call`, if it is an object.
    pub fn tool_arguments(&self) -> Option<&Map<String, Value>> {
        self.params.get("arguments").and_then(Value::as_object)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Response {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Exactly one of `result` or `error` appears on the wire.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Result(Value),
    Error(McpError),
}

impl Response {
    pub fn result(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            outcome: Outcome::Result(result),
        }
    }

    pub fn error(id: Value, error: McpError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            outcome: Outcome::Error(error),
        }
    }

    pub fn error_code(&self) -> Option<i32> {
        match &self.outcome {
            Outcome::Error(e) => Some(e.code.0),
            Outcome::Result(_) => None,
        }
    }
}

pub fn method_not_found() -> McpError {
    McpError::new(ErrorCode::METHOD_NOT_FOUND, "Method not found", None)
}

fn invalid_request() -> McpError {
    McpError::new(ErrorCode::INVALID_REQUEST, "Invalid Request", None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_request() {
        let req = Request::decode(
            br#"{"jsonrpc":"2.0","id":7,"method":"tools/call","params":{"name":"get_quick_prompt","arguments":{}}}"#,
        )
        .unwrap();
        assert_eq!(req.id, Some(json!(7)));
        assert_eq!(req.method, "tools/call");
        assert_eq!(req.tool_name(), Some("get_quick_prompt"));
        assert!(req.tool_arguments().unwrap().is_empty());
    }

    #[test]
    fn test_decode_keeps_explicit_null_id() {
        let req = Request::decode(br#"{"id":null,"method":"ping"}"#).unwrap();
        assert_eq!(req.id, Some(Value::Null));
        assert!(!req.is_notification());

        let note = Request::decode(br#"{"method":"notifications/initialized"}"#).unwrap();
        assert!(note.is_notification());
        assert_eq!(note.response_id(), Value::Null);
    }

    #[test]
    fn test_parse_error_shape() {
        let response = Request::decode(b"{not json").unwrap_err();
        let wire = serde_json::to_value(&response).unwrap();
        assert_eq!(wire["jsonrpc"], "2.0");
        assert_eq!(wire["id"], Value::Null);
        assert_eq!(wire["error"]["code"], -32700);
        assert_eq!(wire["error"]["message"], "Parse error");
        assert!(wire["error"]["data"].as_str().unwrap().contains("line 1"));
        assert!(wire.get("result").is_none());
    }

    #[test]
    fn test_invalid_request_shapes() {
        let not_object = Request::decode(b"[1,2]").unwrap_err();
        assert_eq!(not_object.error_code(), Some(-32600));
        assert_eq!(not_object.id, Value::Null);

        let no_method = Request::decode(br#"{"id":"a"}"#).unwrap_err();
        assert_eq!(no_method.error_code(), Some(-32600));
        assert_eq!(no_method.id, json!("a"));
    }

    #[test]
    fn test_result_shape() {
        let response = Response::result(json!("abc"), json!({"ok": true}));
        let encoded = serde_json::to_string(&response).unwrap();
        assert_eq!(encoded, r#"{"jsonrpc":"2.0","id":"abc","result":{"ok":true}}"#);
    }
}

//! JSON-RPC 2.0 agent session over line-delimited stdio
//!
//! One JSON message per line. Supported methods: `initialize`, `ping`,
//! `tools/list`, `tools/call`, plus the `notifications/initialized`
//! notification. Messages without an `id` are notifications and never get
//! a response.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio_stream::wrappers::SplitStream;
use tokio_stream::StreamExt;
use tracing::{debug, info};

use trustgraph::tracing::prefix;
use trustgraph::Result;
use trustgraph_core::AttestationSource;

use crate::error::ToolError;
use crate::registry::{tool_specs, ToolRegistry};

pub const PROTOCOL_VERSION: &str = "2024-11-05";

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;

/// JSON-RPC 2.0 response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    pub id: Value,
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn error(id: Value, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            result: None,
            error: Some(error),
            id,
        }
    }
}

/// JSON-RPC 2.0 error object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }
}

impl From<&ToolError> for JsonRpcError {
    fn from(err: &ToolError) -> Self {
        Self {
            code: err.rpc_code(),
            message: err.to_string(),
            data: err.details(),
        }
    }
}

/// A request that passed envelope checks.
struct Request {
    /// `None` for notifications
    id: Option<Value>,
    method: String,
    params: Value,
}

/// Check the JSON-RPC envelope; failures come back as ready-made error responses.
fn parse_request(raw: &str) -> std::result::Result<Request, JsonRpcResponse> {
    let value: Value = serde_json::from_str(raw).map_err(|e| {
        JsonRpcResponse::error(Value::Null, JsonRpcError::new(PARSE_ERROR, format!("parse error: {e}")))
    })?;

    let Some(object) = value.as_object() else {
        return Err(JsonRpcResponse::error(
            Value::Null,
            JsonRpcError::new(INVALID_REQUEST, "request must be a JSON object"),
        ));
    };

    let id = object.get("id").cloned();
    let invalid = |message: &str| {
        JsonRpcResponse::error(
            id.clone().unwrap_or(Value::Null),
            JsonRpcError::new(INVALID_REQUEST, message),
        )
    };

    if object.get("jsonrpc").and_then(Value::as_str) != Some("2.0") {
        return Err(invalid("jsonrpc field must be \"2.0\""));
    }
    let Some(method) = object.get("method").and_then(Value::as_str) else {
        return Err(invalid("method must be a string"));
    };

    Ok(Request {
        id,
        method: method.to_string(),
        params: object.get("params").cloned().unwrap_or(Value::Null),
    })
}

/// Per-connection bookkeeping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionState {
    pub initialized: bool,
    pub tool_calls: u64,
}

/// A JSON-RPC session bound to a shared registry.
pub struct Session<S> {
    registry: Arc<ToolRegistry<S>>,
    state: Mutex<SessionState>,
}

impl<S: AttestationSource> Session<S> {
    pub fn new(registry: Arc<ToolRegistry<S>>) -> Self {
        Self {
            registry,
            state: Mutex::new(SessionState::default()),
        }
    }

    pub fn state(&self) -> SessionState {
        *self.state.lock()
    }

    /// Handle one line. Returns `None` for notifications.
    pub async fn handle_line(&self, raw: &str) -> Option<JsonRpcResponse> {
        let request = match parse_request(raw) {
            Ok(request) => request,
            Err(response) => return Some(response),
        };

        let Some(id) = request.id.clone() else {
            self.handle_notification(&request);
            return None;
        };

        let outcome = match request.method.as_str() {
            "initialize" => Ok(self.handle_initialize()),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": tool_specs() })),
            "tools/call" => self.handle_tool_call(&request.params).await,
            method => Err(JsonRpcError::new(
                METHOD_NOT_FOUND,
                format!("method not found: {method}"),
            )),
        };

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => JsonRpcResponse::error(id, error),
        })
    }

    fn handle_notification(&self, request: &Request) {
        if request.method == "notifications/initialized" {
            self.state.lock().initialized = true;
        }
        debug!("notification {}", request.method);
    }

    fn handle_initialize(&self) -> Value {
        self.state.lock().initialized = true;
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": { "listChanged": false }
            },
            "serverInfo": {
                "name": "trustgraph-tools",
                "version": env!("CARGO_PKG_VERSION")
            }
        })
    }

    /// `tools/call` with `{name, arguments}`.
    async fn handle_tool_call(&self, params: &Value) -> std::result::Result<Value, JsonRpcError> {
        let Some(name) = params.get("name").and_then(Value::as_str) else {
            return Err(JsonRpcError::new(INVALID_PARAMS, "tools/call requires a string 'name'"));
        };
        let arguments = match params.get("arguments") {
            Some(arguments) if !arguments.is_null() => arguments.clone(),
            _ => json!({}),
        };

        self.state.lock().tool_calls += 1;

        let data = self
            .registry
            .dispatch(name, &arguments)
            .await
            .map_err(|err| JsonRpcError::from(&err))?;

        let text = serde_json::to_string_pretty(&data)
            .map_err(|e| JsonRpcError::from(&ToolError::from(e)))?;

        Ok(json!({
            "content": [{ "type": "text", "text": text }],
            "structuredContent": data,
        }))
    }

    /// Serve line-delimited JSON-RPC until `reader` reaches end of input.
    pub async fn run<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("{} agent session started", prefix::PULSE_OPEN);

        let mut lines = SplitStream::new(reader.split(b'\n'));
        while let Some(raw) = lines.next().await {
            let raw = raw?;
            let response = match std::str::from_utf8(&raw) {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => self.handle_line(line).await,
                Err(e) => Some(JsonRpcResponse::error(
                    Value::Null,
                    JsonRpcError::new(PARSE_ERROR, format!("parse error: {e}")),
                )),
            };
            if let Some(response) = response {
                let mut out = serde_json::to_vec(&response)?;
                out.push(b'\n');
                writer.write_all(&out).await?;
                writer.flush().await?;
            }
        }

        info!(
            "{} agent session closed after {} tool calls",
            prefix::PULSE_CLOSE,
            self.state().tool_calls
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use trustgraph_core::StaticSource;

    fn session() -> Session<StaticSource> {
        Session::new(Arc::new(ToolRegistry::new(StaticSource::default())))
    }

    #[tokio::test]
    async fn test_parse_error() {
        let resp = session().handle_line("{not json").await.unwrap();
        assert_eq!(resp.id, Value::Null);
        assert_eq!(resp.error.unwrap().code, PARSE_ERROR);
    }

    #[tokio::test]
    async fn test_invalid_request() {
        let s = session();
        let resp = s.handle_line(r#"{"jsonrpc":"1.0","id":3,"method":"ping"}"#).await.unwrap();
        assert_eq!(resp.id, json!(3));
        assert_eq!(resp.error.unwrap().code, INVALID_REQUEST);

        let resp = s.handle_line(r#"{"jsonrpc":"2.0","id":4}"#).await.unwrap();
        assert_eq!(resp.error.unwrap().code, INVALID_REQUEST);

        let resp = s.handle_line("[1,2]").await.unwrap();
        assert_eq!(resp.error.unwrap().code, INVALID_REQUEST);
    }

    #[tokio::test]
    async fn test_notifications_get_no_response() {
        let s = session();
        assert_eq!(
            s.handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#).await,
            None
        );
        assert!(s.state().initialized);
        // unknown notification is still silent
        assert_eq!(s.handle_line(r#"{"jsonrpc":"2.0","method":"whatever"}"#).await, None);
    }

    #[tokio::test]
    async fn test_initialize_and_ping() {
        let s = session();
        let resp = s
            .handle_line(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#)
            .await
            .unwrap();
        let result = resp.result.unwrap();
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], "trustgraph-tools");
        assert!(s.state().initialized);

        let resp = s.handle_line(r#"{"jsonrpc":"2.0","id":"p","method":"ping"}"#).await.unwrap();
        assert_eq!(resp.id, json!("p"));
        assert_eq!(resp.result, Some(json!({})));
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let resp = session()
            .handle_line(r#"{"jsonrpc":"2.0","id":9,"method":"resources/list"}"#)
            .await
            .unwrap();
        let error = resp.error.unwrap();
        assert_eq!(error.code, METHOD_NOT_FOUND);
        assert_eq!(error.data, None);
    }

    #[tokio::test]
    async fn test_tool_call_without_name() {
        let resp = session()
            .handle_line(r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{}}"#)
            .await
            .unwrap();
        assert_eq!(resp.error.unwrap().code, INVALID_PARAMS);
    }
}

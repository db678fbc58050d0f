//! HTTP endpoint handlers for the tool service.
//!
//! Endpoints:
//! - GET /attestations           — Filtered attestation listing
//! - GET /trust-score/{address}  — Trust score for one address
//! - GET /tools                  — Tool listing (name, description, schema, example)
//! - POST /tools                 — Invoke a tool: `{tool, params}`
//! - GET /health                 — Liveness and registered tools
//! - GET /config-schema          — Service configuration fields
//!
//! Routing is transport-independent: [`HandlerContext::handle_http`] takes a
//! plain [`HttpRequest`] and the axum shim in `serve` adapts real traffic.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, error};

use trustgraph_core::AttestationSource;

use crate::error::ToolError;
use crate::registry::{tool_names, tool_specs, Operation, ToolRegistry};

/// A transport-independent HTTP request.
#[derive(Debug, Clone, Default)]
pub struct HttpRequest {
    pub method: String,
    /// Path without the query string
    pub path: String,
    /// Decoded query parameters
    pub query: HashMap<String, String>,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpHeader {
    pub name: String,
    pub values: Vec<String>,
}

/// A transport-independent HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status_code: u16,
    pub headers: Vec<HttpHeader>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Body parsed as JSON, `Null` when it is not.
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }
}

/// Handler context providing access to the shared registry.
pub struct HandlerContext<S> {
    registry: Arc<ToolRegistry<S>>,
}

impl<S: AttestationSource> HandlerContext<S> {
    pub fn new(registry: Arc<ToolRegistry<S>>) -> Self {
        Self { registry }
    }

    /// Route a request to its handler.
    pub async fn handle_http(&self, req: HttpRequest) -> HttpResponse {
        debug!("HTTP request: {} {}", req.method, req.path);

        match (req.method.as_str(), req.path.as_str()) {
            ("GET", "/attestations") => self.handle_attestations(&req.query).await,
            ("GET", p) if p.starts_with("/trust-score/") => {
                let address = &p["/trust-score/".len()..];
                self.handle_trust_score(address).await
            }
            ("GET", "/tools") => json_response(200, &json!({ "success": true, "data": tool_specs() })),
            ("POST", "/tools") => self.handle_invoke(&req.body).await,
            ("GET", "/health") => self.handle_health(),
            ("GET", "/config-schema") => json_response(
                200,
                &json!({ "success": true, "data": crate::config::build_schema() }),
            ),
            (method, path) => failure(404, format!("Unknown endpoint: {method} {path}"), None),
        }
    }

    /// GET /attestations — query parameters are the `getAttestations` params.
    async fn handle_attestations(&self, query: &HashMap<String, String>) -> HttpResponse {
        let params: Map<String, Value> = query
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();

        match self.registry.query_attestations(&Value::Object(params)).await {
            Ok((filters, attestations)) => json_response(
                200,
                &json!({
                    "success": true,
                    "count": attestations.len(),
                    "data": attestations,
                    "filters": filters,
                }),
            ),
            Err(err) => tool_failure(&err),
        }
    }

    /// GET /trust-score/{address}
    async fn handle_trust_score(&self, address: &str) -> HttpResponse {
        let params = json!({ "address": address });
        match self
            .registry
            .dispatch(Operation::GetTrustScore.name(), &params)
            .await
        {
            Ok(data) => json_response(200, &json!({ "success": true, "data": data })),
            Err(err) => tool_failure(&err),
        }
    }

    /// POST /tools — `{tool, params}`
    async fn handle_invoke(&self, body: &[u8]) -> HttpResponse {
        #[derive(Deserialize)]
        struct Invocation {
            tool: String,
            #[serde(default = "empty_params")]
            params: Value,
        }

        let invocation: Invocation = match serde_json::from_slice(body) {
            Ok(invocation) => invocation,
            Err(e) => {
                return failure(
                    400,
                    format!("request body must be {{\"tool\", \"params\"}} JSON: {e}"),
                    None,
                )
            }
        };

        match self.registry.dispatch(&invocation.tool, &invocation.params).await {
            Ok(data) => json_response(
                200,
                &json!({ "success": true, "tool": invocation.tool, "data": data }),
            ),
            Err(err) => tool_failure(&err),
        }
    }

    /// GET /health
    fn handle_health(&self) -> HttpResponse {
        json_response(
            200,
            &json!({
                "status": "ok",
                "version": env!("CARGO_PKG_VERSION"),
                "tools": tool_names(),
                "source": self.registry.source().describe(),
            }),
        )
    }
}

fn empty_params() -> Value {
    Value::Object(Map::new())
}

/// `{success:false, error, details?, validTools?}` for a tool error.
fn tool_failure(err: &ToolError) -> HttpResponse {
    if let ToolError::Internal(detail) = err {
        error!("tool execution failed: {}", detail);
    }

    let mut extra = Map::new();
    match err {
        ToolError::UnknownOperation { valid, .. } => {
            extra.insert("validTools".into(), json!(valid));
        }
        _ => {
            if let Some(details) = err.details() {
                extra.insert("details".into(), details);
            }
        }
    }
    failure(err.status_code(), err.to_string(), Some(extra))
}

fn failure(status_code: u16, message: String, extra: Option<Map<String, Value>>) -> HttpResponse {
    let mut body = Map::new();
    body.insert("success".into(), Value::Bool(false));
    body.insert("error".into(), Value::String(message));
    body.extend(extra.unwrap_or_default());
    json_response(status_code, &body)
}

fn json_response<T: Serialize>(status_code: u16, data: &T) -> HttpResponse {
    let (status_code, body) = match serde_json::to_vec(data) {
        Ok(body) => (status_code, body),
        Err(e) => {
            error!("failed to serialize response: {}", e);
            (
                500,
                br#"{"success":false,"error":"internal error while executing tool"}"#.to_vec(),
            )
        }
    };

    HttpResponse {
        status_code,
        headers: vec![HttpHeader {
            name: "Content-Type".to_string(),
            values: vec!["application/json".to_string()],
        }],
        body,
    }
}

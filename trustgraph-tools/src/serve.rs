//! axum adapter for [`HandlerContext::handle_http`]

use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::{Query, State};
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tokio::signal;
use tracing::info;

use trustgraph::tracing::prefix;
use trustgraph::{Error, Result};
use trustgraph_core::AttestationSource;

use crate::handlers::{HandlerContext, HttpRequest, HttpResponse};

/// Router sending every request through `ctx`.
pub fn router<S>(ctx: Arc<HandlerContext<S>>) -> Router
where
    S: AttestationSource + 'static,
{
    Router::new().fallback(route::<S>).with_state(ctx)
}

async fn route<S>(
    State(ctx): State<Arc<HandlerContext<S>>>,
    method: Method,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Response
where
    S: AttestationSource + 'static,
{
    let req = HttpRequest {
        method: method.as_str().to_string(),
        path: uri.path().to_string(),
        query,
        body: body.to_vec(),
    };
    into_axum(ctx.handle_http(req).await)
}

fn into_axum(resp: HttpResponse) -> Response {
    let mut builder = Response::builder().status(resp.status_code);
    for header in &resp.headers {
        for value in &header.values {
            builder = builder.header(header.name.as_str(), value.as_str());
        }
    }
    builder
        .body(Body::from(resp.body))
        .unwrap_or_else(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response())
}

/// Serve HTTP on `addr` until `shutdown` resolves.
pub async fn serve_http<S, F>(ctx: Arc<HandlerContext<S>>, addr: SocketAddr, shutdown: F) -> Result<()>
where
    S: AttestationSource + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Server(format!("failed to bind {addr}: {e}")))?;

    info!("{} listening on {}", prefix::PULSE_OPEN, addr);

    axum::serve(listener, router(ctx))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| Error::Server(e.to_string()))
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        }
    }
}

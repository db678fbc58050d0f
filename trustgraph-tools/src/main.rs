//! trustgraph tool service - Main Entry Point
//!
//! Serves the trust-scoring tools over HTTP or as a JSON-RPC agent session
//! on stdin/stdout.
//!
//! Usage:
//!     trustgraph-tools --port 9010
//!     trustgraph-tools --mode stdio --graph-endpoint https://indexer.example/v1/graphql
//!     trustgraph-tools --fixture attestations.json --policy policy.json

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use trustgraph::tracing::prefix;
use trustgraph_core::AttestationSource;
use trustgraph_graph::GraphClient;
use trustgraph_tools::config::{load_fixture, Args, Mode, ServiceConfig};
use trustgraph_tools::serve::{serve_http, shutdown_signal};
use trustgraph_tools::{HandlerContext, Session, ToolRegistry};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("PANIC: trustgraph-tools panicked");
        eprintln!(
            "  Location: {}",
            panic_info
                .location()
                .map(|l| l.to_string())
                .unwrap_or_else(|| "unknown".to_string())
        );
        eprintln!(
            "  Message: {}",
            panic_info
                .payload()
                .downcast_ref::<&str>()
                .unwrap_or(&"<no message>")
        );
    }));

    let args = Args::parse();
    trustgraph::tracing::init_with_filter(&args.log_level);

    let config = args.into_config()?;

    info!("{} Initializing trustgraph tools", prefix::PULSE_OPEN);
    info!("  Version: {}", env!("CARGO_PKG_VERSION"));

    match config.fixture.clone() {
        Some(path) => {
            let source = load_fixture(&path)?;
            info!("  Fixture: {} ({} attestations)", path.display(), source.len());
            run(config, source).await?;
        }
        None => {
            let source = GraphClient::new(config.graph.clone())?;
            info!("  Graph: {}", config.graph.endpoint);
            run(config, source).await?;
        }
    }

    info!("{} Shutdown complete", prefix::PULSE_CLOSE);
    Ok(())
}

async fn run<S>(config: ServiceConfig, source: S) -> trustgraph::Result<()>
where
    S: AttestationSource + 'static,
{
    let registry = Arc::new(ToolRegistry::with_policy(source, config.policy));

    match config.mode {
        Mode::Http => {
            let ctx = Arc::new(HandlerContext::new(registry));
            serve_http(ctx, config.listen, shutdown_signal()).await
        }
        Mode::Stdio => {
            let session = Session::new(registry);
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            tokio::select! {
                result = session.run(stdin, tokio::io::stdout()) => result,
                _ = shutdown_signal() => Ok(()),
            }
        }
    }
}

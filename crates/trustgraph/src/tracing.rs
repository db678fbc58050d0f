//! Logging utilities with trustgraph segment prefixes.
//!
//! Provides consistent logging setup across trustgraph Rust components.
//! Output always goes to stderr: stdout is reserved for the stdio agent session.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing with a custom default filter.
///
/// `RUST_LOG` takes precedence over `default_filter` when set.
pub fn init_with_filter(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // try_init: tests and embedders may already have installed a subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .try_init();
}

/// trustgraph segment prefixes for logging.
pub mod prefix {
    /// Graph retrieval prefix
    pub const GRAPH: &str = "⊔";
    /// Tool dispatch prefix
    pub const DISPATCH: &str = "꩜";
    /// Graceful startup prefix
    pub const PULSE_OPEN: &str = "✿";
    /// Graceful shutdown prefix
    pub const PULSE_CLOSE: &str = "❀";
}

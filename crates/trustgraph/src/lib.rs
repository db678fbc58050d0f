//! # trustgraph Shared Rust Library
//!
//! Shared infrastructure for the trustgraph Rust components:
//! - **error**: Common error types for configuration and process setup
//! - **tracing**: Logging setup with trustgraph segment prefixes
//!
//! ## Usage
//!
//! ```rust,ignore
//! use trustgraph::error::Error;
//!
//! trustgraph::tracing::init_with_filter("debug");
//! ```

pub mod error;
pub mod tracing;

pub use error::{Error, Result};

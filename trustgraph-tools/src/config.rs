//! Service configuration
//!
//! Command-line flags are parsed by [`Args`] and checked by
//! [`Args::into_config`], which produces a [`ServiceConfig`].

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, ValueEnum};
use serde::Serialize;

use trustgraph::{Error, Result};
use trustgraph_core::{ScoringPolicy, StaticSource, DEFAULT_CONFIDENCE};
use trustgraph_graph::{GraphClientConfig, DEFAULT_ENDPOINT};

/// Which entry point to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// One-shot HTTP request/response
    Http,
    /// JSON-RPC agent session on stdin/stdout
    Stdio,
}

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

#[derive(Parser, Debug, Clone)]
#[command(name = "trustgraph-tools")]
#[command(about = "Trust scoring tools over HTTP or a stdio agent session")]
#[command(version)]
pub struct Args {
    /// Entry point to serve
    #[arg(long, value_enum, default_value = "http")]
    pub mode: Mode,

    /// HTTP server port
    #[arg(short, long, default_value = "9010")]
    pub port: u16,

    /// HTTP server address (overrides port)
    #[arg(short, long)]
    pub address: Option<String>,

    /// GraphQL endpoint of the attestation indexer
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub graph_endpoint: String,

    /// Graph request timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout_secs: u64,

    /// Confidence assigned to every graph attestation
    #[arg(long, default_value_t = DEFAULT_CONFIDENCE)]
    pub default_confidence: f64,

    /// Scoring policy JSON file
    #[arg(long)]
    pub policy: Option<PathBuf>,

    /// Serve attestations from a JSON file instead of the graph
    #[arg(long)]
    pub fixture: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Validated service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub mode: Mode,
    pub listen: SocketAddr,
    pub graph: GraphClientConfig,
    pub policy: ScoringPolicy,
    pub fixture: Option<PathBuf>,
    pub log_level: String,
}

impl Args {
    /// Check every flag and load the policy file, if any.
    pub fn into_config(self) -> Result<ServiceConfig> {
        let listen: SocketAddr = match &self.address {
            Some(address) => address
                .parse()
                .map_err(|e| Error::Config(format!("failed to parse address '{address}': {e}")))?,
            None => SocketAddr::from(([0, 0, 0, 0], self.port)),
        };

        let endpoint = self.graph_endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(Error::Config(format!(
                "graph endpoint must be an http(s) URL, got '{endpoint}'"
            )));
        }

        if self.timeout_secs == 0 {
            return Err(Error::Config("timeout must be at least 1 second".into()));
        }

        if !(0.0..=1.0).contains(&self.default_confidence) {
            return Err(Error::Config(format!(
                "default confidence must be within [0, 1], got {}",
                self.default_confidence
            )));
        }

        let log_level = self.log_level.to_lowercase();
        if !LOG_LEVELS.contains(&log_level.as_str()) {
            return Err(Error::Config(format!("unknown log level '{}'", self.log_level)));
        }

        let policy = match &self.policy {
            Some(path) => load_policy(path)?,
            None => ScoringPolicy::default(),
        };

        Ok(ServiceConfig {
            mode: self.mode,
            listen,
            graph: GraphClientConfig::new(endpoint)
                .with_timeout(Duration::from_secs(self.timeout_secs))
                .with_default_confidence(self.default_confidence),
            policy,
            fixture: self.fixture,
            log_level,
        })
    }
}

/// Read a [`ScoringPolicy`] from a JSON file. Missing keys take defaults.
pub fn load_policy(path: &Path) -> Result<ScoringPolicy> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read policy {}: {e}", path.display())))?;
    Ok(ScoringPolicy::from_json(&text)?)
}

/// Read a JSON array of attestations into a [`StaticSource`].
pub fn load_fixture(path: &Path) -> Result<StaticSource> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read fixture {}: {e}", path.display())))?;
    Ok(StaticSource::from_json(&text)?)
}

/// One configuration field, for `/config-schema`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigFieldSchema {
    pub r#type: &'static str,
    pub description: &'static str,
    pub default_value: String,
    pub required: bool,
}

/// Build the configuration schema for the tool service.
pub fn build_schema() -> BTreeMap<&'static str, ConfigFieldSchema> {
    let field = |r#type, description, default_value: String| ConfigFieldSchema {
        r#type,
        description,
        default_value,
        required: false,
    };

    let mut fields = BTreeMap::new();
    fields.insert(
        "mode",
        field("string", "Entry point: http or stdio.", "http".to_string()),
    );
    fields.insert(
        "graph_endpoint",
        field(
            "string",
            "GraphQL endpoint of the attestation indexer.",
            DEFAULT_ENDPOINT.to_string(),
        ),
    );
    fields.insert(
        "timeout_secs",
        field("integer", "Graph request timeout in seconds.", "30".to_string()),
    );
    fields.insert(
        "default_confidence",
        field(
            "number",
            "Confidence assigned to every graph attestation; the graph supplies none.",
            DEFAULT_CONFIDENCE.to_string(),
        ),
    );
    fields.insert(
        "policy",
        field("string", "Scoring policy JSON file. Built-in lexicon if empty.", String::new()),
    );
    fields.insert(
        "fixture",
        field(
            "string",
            "Attestation JSON file served instead of the graph.",
            String::new(),
        ),
    );
    fields
}

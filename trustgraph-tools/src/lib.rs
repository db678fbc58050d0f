//! trustgraph tool service
//!
//! Exposes the trust-scoring engine as four tools (`getTrustScore`,
//! `getAttestations`, `verifyCredential`, `findTrustedExperts`) through two
//! entry points sharing one [`ToolRegistry`]:
//!
//! - HTTP request/response ([`handlers`], served by [`serve`])
//! - a line-delimited JSON-RPC agent session on stdio ([`session`])

pub mod config;
pub mod error;
pub mod handlers;
pub mod registry;
pub mod serve;
pub mod session;
pub mod validate;

pub use error::{ToolError, ToolResult};
pub use handlers::{HandlerContext, HttpRequest, HttpResponse};
pub use registry::{tool_names, tool_specs, Operation, ToolRegistry, ToolSpec};
pub use session::Session;
pub use validate::{FieldViolation, ValidationError};

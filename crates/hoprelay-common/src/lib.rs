//! Hoprelay Common - Shared constants and error codes
//!
//! This crate provides the foundational pieces used across all hoprelay components:
//! - Error codes and the wire error body
//! - HTTP paths and header names shared by the server and the hop client
//! - Default values for node identity, ports, and timeouts

pub mod error;
pub mod utils;

// Re-exports for convenience
pub use error::{ErrorBody, ErrorCode};
pub use utils::{default_node_name, non_blank};

/// Default HTTP port a node listens on
pub const DEFAULT_SERVER_PORT: u16 = 50100;

/// Default bounded wait for one outbound hop, in seconds
pub const DEFAULT_FORWARD_TIMEOUT_SECS: u64 = 5;

/// Default connect timeout for one outbound hop, in milliseconds
pub const DEFAULT_FORWARD_CONNECT_TIMEOUT_MS: u64 = 2000;

/// Node name used when neither configuration nor the host name provide one
pub const FALLBACK_NODE_NAME: &str = "node";

/// Path a node accepts pings on
pub const PING_PATH: &str = "/ping";

/// Header carrying the request id across hops
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Response status values
pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_REACHED: &str = "reached";
pub const STATUS_ERROR: &str = "error";

/// Join a node base url and an API path without doubling the slash
pub fn join_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

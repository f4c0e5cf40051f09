//! Error codes and the wire error body for hoprelay
//!
//! This module defines:
//! - `ErrorCode`: Structured error codes for API responses
//! - `ErrorBody`: The JSON body every node returns for a failed request

use serde::{Deserialize, Serialize};

use crate::STATUS_ERROR;

/// Error code structure for API responses
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ErrorCode<'a> {
    pub code: i32,
    pub error: &'a str,
    pub message: &'a str,
}

pub const DATA_ACCESS_ERROR: ErrorCode<'static> = ErrorCode {
    code: 10002,
    error: "DATA_ACCESS_ERROR",
    message: "data access error",
};

pub const PARAMETER_VALIDATE_ERROR: ErrorCode<'static> = ErrorCode {
    code: 20002,
    error: "PARAMETER_VALIDATE_ERROR",
    message: "parameter validate error",
};

// Forwarding errors
pub const NO_RULE_CONFIGURED: ErrorCode<'static> = ErrorCode {
    code: 30001,
    error: "NO_RULE_CONFIGURED",
    message: "No chain rule found on this node.",
};

pub const NO_NEXT_HOP: ErrorCode<'static> = ErrorCode {
    code: 30002,
    error: "NO_NEXT_HOP",
    message: "No next hop found and destination not reached.",
};

pub const FORWARDING_FAILED: ErrorCode<'static> = ErrorCode {
    code: 30003,
    error: "FORWARDING_FAILED",
    message: "Failed to forward ping",
};

/// Error body returned by a node for any failed request
///
/// `detail` carries the human readable message, including any message relayed
/// from a downstream node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: String,
    pub code: i32,
    pub error: String,
    pub detail: String,
    pub node: String,
}

impl ErrorBody {
    pub fn new(code: ErrorCode<'_>, detail: impl Into<String>, node: impl Into<String>) -> Self {
        ErrorBody {
            status: STATUS_ERROR.to_string(),
            code: code.code,
            error: code.error.to_string(),
            detail: detail.into(),
            node: node.into(),
        }
    }

    /// Parse a response body, returning `None` when it is not a hoprelay error body
    pub fn parse(body: &[u8]) -> Option<Self> {
        serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .filter(|b| b.status == STATUS_ERROR)
    }
}

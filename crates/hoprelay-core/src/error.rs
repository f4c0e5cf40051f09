//! Error types for ping traversal and rule application
//!
//! A caller must be able to tell the three forwarding failures apart:
//! - `NoRuleConfigured`: this node holds no rule for the chain
//! - `NoNextHop`: a rule exists but names no next node, and this node is not the destination
//! - `ForwardingFailed`: the next hop could not be reached or answered with an error
//!
//! `Storage` covers the rule store itself being unavailable.

use hoprelay_common::ErrorCode;
use hoprelay_common::error::{
    DATA_ACCESS_ERROR, FORWARDING_FAILED, NO_NEXT_HOP, NO_RULE_CONFIGURED,
};

use crate::hop_client::ForwardError;

#[derive(thiserror::Error, Debug)]
pub enum RoutingError {
    #[error("No chain rule found on node '{node}' for chain {chain_id}.")]
    NoRuleConfigured { node: String, chain_id: i64 },

    #[error(
        "No next hop found on node '{node}' for chain {chain_id} and destination '{dst_node}' not reached."
    )]
    NoNextHop {
        node: String,
        chain_id: i64,
        dst_node: String,
    },

    #[error("Failed to forward ping from '{node}' to '{next_hop_id}': {source}")]
    ForwardingFailed {
        node: String,
        next_hop_id: String,
        #[source]
        source: ForwardError,
    },

    #[error("rule storage error on node '{node}': {source}")]
    Storage {
        node: String,
        #[source]
        source: anyhow::Error,
    },
}

impl RoutingError {
    /// Structured code reported to the caller
    pub fn error_code(&self) -> ErrorCode<'static> {
        match self {
            RoutingError::NoRuleConfigured { .. } => NO_RULE_CONFIGURED,
            RoutingError::NoNextHop { .. } => NO_NEXT_HOP,
            RoutingError::ForwardingFailed { .. } => FORWARDING_FAILED,
            RoutingError::Storage { .. } => DATA_ACCESS_ERROR,
        }
    }

    /// Name of the node that raised the error
    pub fn node(&self) -> &str {
        match self {
            RoutingError::NoRuleConfigured { node, .. }
            | RoutingError::NoNextHop { node, .. }
            | RoutingError::ForwardingFailed { node, .. }
            | RoutingError::Storage { node, .. } => node,
        }
    }
}

//! Request and outcome types exchanged by relay nodes

use hoprelay_common::STATUS_REACHED;
use serde::{Deserialize, Serialize};

/// Body of an apply-rule request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyRuleRequest {
    pub chain_id: i64,
    #[serde(default)]
    pub next_hop_id: Option<String>,
    #[serde(default)]
    pub next_hop_base_url: Option<String>,
}

/// Body of a ping; relayed to every hop unchanged
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingRequest {
    pub chain_id: i64,
    pub dst_node: String,
}

impl PingRequest {
    pub fn new(chain_id: i64, dst_node: impl Into<String>) -> Self {
        PingRequest {
            chain_id,
            dst_node: dst_node.into(),
        }
    }
}

/// Response body produced by the next hop, passed back unchanged
pub type ForwardingOutcome = serde_json::Value;

/// Successful result of a ping at this node
#[derive(Clone, Debug, PartialEq)]
pub enum PingOutcome {
    /// This node is the destination
    Reached { node: String },
    /// The ping was relayed and the terminal node's body came back
    Relayed(ForwardingOutcome),
}

impl PingOutcome {
    /// The JSON body a node answers with
    pub fn into_body(self) -> serde_json::Value {
        match self {
            PingOutcome::Reached { node } => {
                serde_json::json!({"status": STATUS_REACHED, "node": node})
            }
            PingOutcome::Relayed(body) => body,
        }
    }
}

//! Request extractors and response payloads for the node API

use hoprelay_core::ApplyRuleRequest;
use hoprelay_persistence::Rule;
use serde::{Deserialize, Serialize};

/// Apply-rule payload; the request is echoed back as received
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RuleApplied {
    pub rule_applied: ApplyRuleRequest,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Hello {
    pub message: String,
}

impl Hello {
    pub fn from_node(node: &str) -> Self {
        Hello {
            message: format!("Hello from {}\n", node),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RuleView {
    pub rule: Rule,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RuleList {
    pub node: String,
    pub rules: Vec<Rule>,
}

#[derive(Debug, Deserialize)]
pub struct ChainPath {
    pub chain_id: i64,
}

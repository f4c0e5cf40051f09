//! Hoprelay Core - Ping forwarding for a single relay node
//!
//! This crate provides:
//! - `NodeContext`: the node's identity and rule store
//! - `ForwardingEngine`: rule application and the per-hop ping decision
//! - `HopClient`: the outbound relay to the next node, with an HTTP implementation
//! - `RoutingError`: the caller-visible failure kinds
//! - `DiskLoadSimulator`: optional synthetic disk I/O per request

pub mod context;
pub mod engine;
pub mod error;
pub mod hop_client;
pub mod model;
pub mod simulation;

pub use context::NodeContext;
pub use engine::{ForwardingEngine, HopDecision};
pub use error::RoutingError;
pub use hop_client::{ForwardError, HopClient, HopClientConfig, HttpHopClient, failure_detail};
pub use model::{ApplyRuleRequest, ForwardingOutcome, PingOutcome, PingRequest};
pub use simulation::DiskLoadSimulator;

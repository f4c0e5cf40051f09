//! Hoprelay Server - HTTP surface of a relay node
//!
//! This crate provides:
//! - The node API (`apply_rule`, `ping`, `hello`, rule views)
//! - Configuration, logging and graceful shutdown for the `hoprelay-server` binary
//! - Request tracing middleware that carries a request id across hops

pub mod api;
pub mod middleware;
pub mod model;
pub mod startup;

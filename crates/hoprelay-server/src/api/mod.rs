//! HTTP API of a relay node

pub mod handler;
pub mod model;
pub mod route;

pub use route::routes;

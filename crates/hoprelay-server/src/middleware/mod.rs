// HTTP middleware implementations

pub mod tracing; // Request span and x-request-id propagation

pub use self::tracing::{RequestId, RequestIdExt, RequestTracing};

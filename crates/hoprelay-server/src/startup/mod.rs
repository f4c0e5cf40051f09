//! Application startup utilities module.

mod http;
mod logging;
mod shutdown;

pub use http::{Bind, ServerOptions, configure_app, node_server};
pub use logging::{LogRotation, LoggingConfig, LoggingError, LoggingGuard, init_logging};
pub use shutdown::{ShutdownSignal, wait_for_shutdown_signal};

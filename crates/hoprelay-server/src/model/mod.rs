//! Data models module
//!
//! - `config` - Configuration management
//! - `app_state` - Application state shared across handlers
//! - `response` - HTTP success and error bodies

pub mod app_state;
pub mod config;
pub mod response;

pub use app_state::AppState;
pub use config::{Cli, Configuration};

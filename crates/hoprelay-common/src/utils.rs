//! Utility functions for hoprelay

use crate::FALLBACK_NODE_NAME;

/// Default node name: the host name, or [`FALLBACK_NODE_NAME`] when it is unavailable
///
/// # Examples
///
/// ```
/// use hoprelay_common::default_node_name;
///
/// assert!(!default_node_name().is_empty());
/// ```
pub fn default_node_name() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .and_then(non_blank)
        .unwrap_or_else(|| FALLBACK_NODE_NAME.to_string())
}

/// Treat empty or whitespace-only strings as absent
///
/// # Examples
///
/// ```
/// use hoprelay_common::non_blank;
///
/// assert_eq!(non_blank("B".to_string()), Some("B".to_string()));
/// assert_eq!(non_blank("  ".to_string()), None);
/// ```
pub fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

//! Domain model types for rule persistence

use serde::{Deserialize, Serialize};

/// Storage backend used for a node's rule table
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StorageMode {
    /// Process-local map, lost on restart
    Memory,
    /// RocksDB database on local disk
    #[default]
    Embedded,
}

impl std::fmt::Display for StorageMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageMode::Memory => write!(f, "memory"),
            StorageMode::Embedded => write!(f, "embedded"),
        }
    }
}

impl std::str::FromStr for StorageMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(StorageMode::Memory),
            "embedded" => Ok(StorageMode::Embedded),
            _ => Err(format!("Invalid storage mode: {}", s)),
        }
    }
}

/// Forwarding rule for one chain on one node
///
/// This is the persisted record layout. `chain_id` and `current_node_id` are
/// fixed at creation; only the next hop fields change on later upserts. The
/// next hop fields are stored exactly as applied.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub chain_id: i64,
    #[serde(default)]
    pub next_hop_id: Option<String>,
    #[serde(default)]
    pub next_hop_base_url: Option<String>,
    pub current_node_id: String,
}

impl Rule {
    pub fn new(
        chain_id: i64,
        next_hop_id: Option<String>,
        next_hop_base_url: Option<String>,
        current_node_id: &str,
    ) -> Self {
        Rule {
            chain_id,
            next_hop_id,
            next_hop_base_url,
            current_node_id: current_node_id.to_string(),
        }
    }

    /// Compute the record that results from upserting onto `existing`
    ///
    /// A new record is owned by `owner_node_id`; an existing one keeps its
    /// chain id and owner and only takes the new next hop fields.
    pub fn upserted(
        existing: Option<Rule>,
        chain_id: i64,
        next_hop_id: Option<String>,
        next_hop_base_url: Option<String>,
        owner_node_id: &str,
    ) -> Rule {
        match existing {
            Some(mut rule) => {
                rule.next_hop_id = next_hop_id;
                rule.next_hop_base_url = next_hop_base_url;
                rule
            }
            None => Rule::new(chain_id, next_hop_id, next_hop_base_url, owner_node_id),
        }
    }

    /// Where a ping on this chain goes next
    ///
    /// Only a missing or empty field counts as absent.
    pub fn route(&self) -> Route {
        let next_hop_id = match self.next_hop_id.as_deref().filter(|s| !s.is_empty()) {
            Some(id) => id.to_string(),
            None => return Route::Terminal,
        };
        match self.next_hop_base_url.as_deref().filter(|s| !s.is_empty()) {
            Some(url) => Route::Forward {
                next_hop_id,
                next_hop_base_url: url.to_string(),
            },
            None => Route::Unaddressed { next_hop_id },
        }
    }
}

/// Next-hop decision carried by a rule
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    /// No next hop configured
    Terminal,
    /// Relay to the named node at the given base url
    Forward {
        next_hop_id: String,
        next_hop_base_url: String,
    },
    /// A next hop is named but has no address to reach it at
    Unaddressed { next_hop_id: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_mode_display() {
        assert_eq!(StorageMode::Memory.to_string(), "memory");
        assert_eq!(StorageMode::Embedded.to_string(), "embedded");
    }

    #[test]
    fn test_storage_mode_from_str() {
        assert_eq!("memory".parse::<StorageMode>().unwrap(), StorageMode::Memory);
        assert_eq!(
            "EMBEDDED".parse::<StorageMode>().unwrap(),
            StorageMode::Embedded
        );
        assert!("external_db".parse::<StorageMode>().is_err());
    }

    #[test]
    fn test_route_terminal() {
        let rule = Rule::new(1, None, Some("http://b:50100".to_string()), "A");
        assert_eq!(rule.route(), Route::Terminal);

        let rule = Rule::new(1, Some(String::new()), None, "A");
        assert_eq!(rule.next_hop_id.as_deref(), Some(""));
        assert_eq!(rule.route(), Route::Terminal);
    }

    #[test]
    fn test_whitespace_next_hop_is_kept_and_forwards() {
        let rule = Rule::upserted(
            None,
            1,
            Some(" ".to_string()),
            Some("http://b".to_string()),
            "A",
        );
        assert_eq!(rule.next_hop_id.as_deref(), Some(" "));
        assert_eq!(
            rule.route(),
            Route::Forward {
                next_hop_id: " ".to_string(),
                next_hop_base_url: "http://b".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_base_url_is_unaddressed() {
        let rule = Rule::new(1, Some("B".to_string()), Some(String::new()), "A");
        assert_eq!(rule.next_hop_base_url.as_deref(), Some(""));
        assert_eq!(
            rule.route(),
            Route::Unaddressed {
                next_hop_id: "B".to_string()
            }
        );
    }

    #[test]
    fn test_route_forward() {
        let rule = Rule::new(
            1,
            Some("B".to_string()),
            Some("http://b:50100".to_string()),
            "A",
        );
        assert_eq!(
            rule.route(),
            Route::Forward {
                next_hop_id: "B".to_string(),
                next_hop_base_url: "http://b:50100".to_string(),
            }
        );
    }

    #[test]
    fn test_route_unaddressed() {
        let rule = Rule::new(1, Some("B".to_string()), None, "A");
        assert_eq!(
            rule.route(),
            Route::Unaddressed {
                next_hop_id: "B".to_string()
            }
        );
    }

    #[test]
    fn test_upserted_keeps_identity() {
        let first = Rule::upserted(None, 7, Some("B".to_string()), None, "A");
        assert_eq!(first.current_node_id, "A");

        let second = Rule::upserted(
            Some(first),
            7,
            Some("C".to_string()),
            Some("http://c".to_string()),
            "someone-else",
        );
        assert_eq!(second.chain_id, 7);
        assert_eq!(second.current_node_id, "A");
        assert_eq!(second.next_hop_id.as_deref(), Some("C"));
        assert_eq!(second.next_hop_base_url.as_deref(), Some("http://c"));
    }

    #[test]
    fn test_rule_deserializes_missing_optionals() {
        let rule: Rule =
            serde_json::from_str(r#"{"chain_id":3,"current_node_id":"Pi"}"#).unwrap();
        assert_eq!(rule.next_hop_id, None);
        assert_eq!(rule.next_hop_base_url, None);
        assert_eq!(rule.route(), Route::Terminal);
    }
}

//! Persistence trait for the rule store
//!
//! Defines the interface shared by the in-memory and RocksDB backends.

use async_trait::async_trait;

use crate::model::{Rule, StorageMode};

/// Rule table operations for a single node
///
/// Implementations must keep records for different chain ids independent
/// under concurrent writes. Concurrent upserts to the same chain id may
/// resolve in any order.
#[async_trait]
pub trait RulePersistence: Send + Sync {
    /// Insert a rule for `chain_id`, or replace the next hop fields of the existing one
    async fn rule_upsert(
        &self,
        chain_id: i64,
        next_hop_id: Option<String>,
        next_hop_base_url: Option<String>,
        owner_node_id: &str,
    ) -> anyhow::Result<Rule>;

    /// Get the rule for `chain_id`
    async fn rule_lookup(&self, chain_id: i64) -> anyhow::Result<Option<Rule>>;

    /// Find all rules, ordered by chain id
    async fn rule_find_all(&self) -> anyhow::Result<Vec<Rule>>;

    /// Get the storage mode of this backend
    fn storage_mode(&self) -> StorageMode;

    /// Health check for the storage backend
    async fn health_check(&self) -> anyhow::Result<()>;
}

// In-memory rule store backed by a sharded concurrent map
// Used for tests and for nodes that do not need rules to survive a restart

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use crate::model::{Rule, StorageMode};
use crate::traits::RulePersistence;

/// Process-local rule table
#[derive(Debug, Default)]
pub struct MemoryRuleStore {
    rules: DashMap<i64, Rule>,
}

impl MemoryRuleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RulePersistence for MemoryRuleStore {
    async fn rule_upsert(
        &self,
        chain_id: i64,
        next_hop_id: Option<String>,
        next_hop_base_url: Option<String>,
        owner_node_id: &str,
    ) -> anyhow::Result<Rule> {
        // The entry guard holds the shard lock for the read-modify-write
        let mut entry = self
            .rules
            .entry(chain_id)
            .or_insert_with(|| Rule::new(chain_id, None, None, owner_node_id));
        let updated = Rule::upserted(
            Some(entry.value().clone()),
            chain_id,
            next_hop_id,
            next_hop_base_url,
            owner_node_id,
        );
        *entry.value_mut() = updated.clone();
        debug!(chain_id, next_hop_id = ?updated.next_hop_id, "rule upserted in memory");
        Ok(updated)
    }

    async fn rule_lookup(&self, chain_id: i64) -> anyhow::Result<Option<Rule>> {
        Ok(self.rules.get(&chain_id).map(|r| r.value().clone()))
    }

    async fn rule_find_all(&self) -> anyhow::Result<Vec<Rule>> {
        let mut rules: Vec<Rule> = self.rules.iter().map(|r| r.value().clone()).collect();
        rules.sort_by_key(|r| r.chain_id);
        Ok(rules)
    }

    fn storage_mode(&self) -> StorageMode {
        StorageMode::Memory
    }

    async fn health_check(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

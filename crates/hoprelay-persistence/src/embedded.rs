// Embedded rule store using RocksDB
// Provides per-node rule persistence on local disk without an external database

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use rocksdb::{ColumnFamilyDescriptor, DB, IteratorMode, Options};
use tracing::{debug, info};

use crate::model::{Rule, StorageMode};
use crate::traits::RulePersistence;

/// Column family holding one JSON document per chain id
pub const CF_RULES: &str = "rules";

/// Standalone embedded rule store using RocksDB
///
/// Records are keyed by the decimal chain id and stored as JSON documents
/// with the four rule fields.
pub struct EmbeddedRuleStore {
    db: Arc<DB>,
    // Serializes read-modify-write upserts so a record is never half-applied
    write_lock: Mutex<()>,
}

impl EmbeddedRuleStore {
    /// Open (or create) a rule database at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);
        db_opts.create_missing_column_families(true);

        let cfs = vec![ColumnFamilyDescriptor::new(CF_RULES, Options::default())];

        let db = DB::open_cf_descriptors(&db_opts, path.as_ref(), cfs)
            .map_err(|e| anyhow::anyhow!("RocksDB open error: {}", e))?;

        info!(path = %path.as_ref().display(), "Embedded rule store opened");
        Ok(Self::new(Arc::new(db)))
    }

    /// Create from a raw RocksDB instance that already has the rules column family
    pub fn new(db: Arc<DB>) -> Self {
        Self {
            db,
            write_lock: Mutex::new(()),
        }
    }

    /// Get the rules column family handle
    fn cf(&self) -> anyhow::Result<&rocksdb::ColumnFamily> {
        self.db
            .cf_handle(CF_RULES)
            .ok_or_else(|| anyhow::anyhow!("Column family '{}' not found", CF_RULES))
    }

    fn rule_key(chain_id: i64) -> String {
        chain_id.to_string()
    }

    fn get_rule(&self, chain_id: i64) -> anyhow::Result<Option<Rule>> {
        let cf = self.cf()?;
        let bytes = self
            .db
            .get_cf(cf, Self::rule_key(chain_id).as_bytes())
            .map_err(|e| anyhow::anyhow!("RocksDB get error: {}", e))?;
        match bytes {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn put_rule(&self, rule: &Rule) -> anyhow::Result<()> {
        let cf = self.cf()?;
        let value = serde_json::to_vec(rule)?;
        self.db
            .put_cf(cf, Self::rule_key(rule.chain_id).as_bytes(), value)
            .map_err(|e| anyhow::anyhow!("RocksDB put error: {}", e))
    }
}

#[async_trait]
impl RulePersistence for EmbeddedRuleStore {
    async fn rule_upsert(
        &self,
        chain_id: i64,
        next_hop_id: Option<String>,
        next_hop_base_url: Option<String>,
        owner_node_id: &str,
    ) -> anyhow::Result<Rule> {
        let _guard = self.write_lock.lock();
        let existing = self.get_rule(chain_id)?;
        let created = existing.is_none();
        let rule = Rule::upserted(
            existing,
            chain_id,
            next_hop_id,
            next_hop_base_url,
            owner_node_id,
        );
        self.put_rule(&rule)?;
        debug!(
            chain_id,
            created,
            next_hop_id = ?rule.next_hop_id,
            "rule upserted in embedded store"
        );
        Ok(rule)
    }

    async fn rule_lookup(&self, chain_id: i64) -> anyhow::Result<Option<Rule>> {
        self.get_rule(chain_id)
    }

    async fn rule_find_all(&self) -> anyhow::Result<Vec<Rule>> {
        let cf = self.cf()?;
        let mut rules = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_, value) = item.map_err(|e| anyhow::anyhow!("RocksDB iterator error: {}", e))?;
            rules.push(serde_json::from_slice::<Rule>(&value)?);
        }
        rules.sort_by_key(|r| r.chain_id);
        Ok(rules)
    }

    fn storage_mode(&self) -> StorageMode {
        StorageMode::Embedded
    }

    async fn health_check(&self) -> anyhow::Result<()> {
        self.cf()?;
        Ok(())
    }
}

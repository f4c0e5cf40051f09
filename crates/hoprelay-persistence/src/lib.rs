//! Hoprelay Persistence - Rule store for a relay node
//!
//! This crate provides:
//! - The persisted `Rule` record and the `Route` it resolves to
//! - The `RulePersistence` trait abstraction over storage backends
//! - An in-memory backend and a RocksDB embedded backend

pub mod embedded;
pub mod memory;
pub mod model;
pub mod traits;

use std::path::Path;
use std::sync::Arc;

pub use embedded::EmbeddedRuleStore;
pub use memory::MemoryRuleStore;
pub use model::{Route, Rule, StorageMode};
pub use traits::RulePersistence;

/// Open the rule store for `node_name` in the given mode
///
/// Embedded stores live at `<data_dir>/db_<node_name>`, one database per node.
pub fn open_rule_store(
    mode: StorageMode,
    data_dir: &Path,
    node_name: &str,
) -> anyhow::Result<Arc<dyn RulePersistence>> {
    match mode {
        StorageMode::Memory => Ok(Arc::new(MemoryRuleStore::new())),
        StorageMode::Embedded => {
            std::fs::create_dir_all(data_dir)?;
            let path = data_dir.join(format!("db_{}", node_name));
            Ok(Arc::new(EmbeddedRuleStore::open(path)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_memory_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_rule_store(StorageMode::Memory, dir.path(), "A").unwrap();
        assert_eq!(store.storage_mode(), StorageMode::Memory);
    }

    #[test]
    fn test_open_embedded_store_per_node() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_rule_store(StorageMode::Embedded, &dir.path().join("data"), "A").unwrap();
        assert_eq!(store.storage_mode(), StorageMode::Embedded);
        assert!(dir.path().join("data").join("db_A").exists());
    }
}

//! Node identity and the per-node handles every operation runs against

use std::fmt;
use std::sync::Arc;

use hoprelay_persistence::RulePersistence;

/// This node's name plus its rule store
///
/// The name is fixed for the lifetime of the context. Several contexts can
/// live in one process, one per simulated node.
#[derive(Clone)]
pub struct NodeContext {
    node_id: Arc<str>,
    store: Arc<dyn RulePersistence>,
}

impl NodeContext {
    pub fn new(node_id: impl Into<String>, store: Arc<dyn RulePersistence>) -> Self {
        let node_id: String = node_id.into();
        Self {
            node_id: Arc::from(node_id),
            store,
        }
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn store(&self) -> &Arc<dyn RulePersistence> {
        &self.store
    }

    /// Whether a ping addressed to `dst_node` ends here
    pub fn is_destination(&self, dst_node: &str) -> bool {
        &*self.node_id == dst_node
    }
}

impl fmt::Debug for NodeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeContext")
            .field("node_id", &self.node_id)
            .field("storage_mode", &self.store.storage_mode())
            .finish()
    }
}

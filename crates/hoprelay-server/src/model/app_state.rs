//! Application state shared across handlers

use std::sync::Arc;

use hoprelay_core::{ForwardingEngine, HttpHopClient, NodeContext};
use hoprelay_persistence::open_rule_store;
use tracing::info;

use super::config::Configuration;

/// State shared by every worker of a node's HTTP server
pub struct AppState {
    node_name: Arc<str>,
    pub engine: Arc<ForwardingEngine>,
}

impl AppState {
    pub fn new(engine: ForwardingEngine) -> Self {
        Self {
            node_name: Arc::from(engine.node_id()),
            engine: Arc::new(engine),
        }
    }

    /// Open the rule store and build the forwarding engine for this node
    pub async fn from_configuration(configuration: &Configuration) -> anyhow::Result<Self> {
        let node_name = configuration.node_name();
        let storage_mode = configuration.persistence_mode();
        let data_dir = configuration.data_dir();

        let store = open_rule_store(storage_mode, &data_dir, &node_name)?;
        store.health_check().await?;
        info!(
            node = %node_name,
            storage_mode = %storage_mode,
            data_dir = %data_dir.display(),
            "Rule store opened"
        );

        let hop_client = Arc::new(HttpHopClient::new(configuration.hop_client_config())?);
        let disk_load = configuration.disk_load_simulator();
        if disk_load.is_enabled() {
            info!(
                bytes = configuration.disk_io_bytes(),
                "Disk load simulation enabled"
            );
        }

        let engine = ForwardingEngine::new(NodeContext::new(node_name, store), hop_client)
            .with_disk_load(disk_load);
        Ok(Self::new(engine))
    }

    pub fn node_name(&self) -> &str {
        &self.node_name
    }

    pub fn node_name_arc(&self) -> Arc<str> {
        self.node_name.clone()
    }
}

//! Forwarding engine
//!
//! Each ping moves through one decision per node:
//!
//! | Decision     | When                                                      |
//! |--------------|-----------------------------------------------------------|
//! | `Reached`    | `dst_node` is this node (checked before any rule lookup)  |
//! | `NoRule`     | no rule stored for the chain                              |
//! | `NoNextHop`  | rule stored without a next hop                            |
//! | `Forward`    | rule names the next hop and its base url                  |
//! | `Unaddressed`| rule names a next hop but no base url                     |
//!
//! `Forward` relays the unchanged request through the [`HopClient`];
//! `Unaddressed` fails the same way an unreachable hop does.

use std::sync::Arc;

use hoprelay_persistence::{Route, Rule};
use tracing::{info, warn};

use crate::context::NodeContext;
use crate::error::RoutingError;
use crate::hop_client::{ForwardError, HopClient};
use crate::model::{ApplyRuleRequest, PingOutcome, PingRequest};
use crate::simulation::DiskLoadSimulator;

/// Where a ping goes from this node
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HopDecision {
    Reached,
    NoRule,
    NoNextHop,
    Forward {
        next_hop_id: String,
        next_hop_base_url: String,
    },
    Unaddressed {
        next_hop_id: String,
    },
}

impl HopDecision {
    fn from_route(route: Route) -> Self {
        match route {
            Route::Terminal => HopDecision::NoNextHop,
            Route::Forward {
                next_hop_id,
                next_hop_base_url,
            } => HopDecision::Forward {
                next_hop_id,
                next_hop_base_url,
            },
            Route::Unaddressed { next_hop_id } => HopDecision::Unaddressed { next_hop_id },
        }
    }

    /// Whether a rule was found on the way to this decision
    pub fn found_rule(&self) -> bool {
        !matches!(self, HopDecision::Reached | HopDecision::NoRule)
    }
}

/// Per-node ping and rule handling
pub struct ForwardingEngine {
    context: NodeContext,
    hop_client: Arc<dyn HopClient>,
    disk_load: DiskLoadSimulator,
}

impl ForwardingEngine {
    pub fn new(context: NodeContext, hop_client: Arc<dyn HopClient>) -> Self {
        Self {
            context,
            hop_client,
            disk_load: DiskLoadSimulator::disabled(),
        }
    }

    pub fn with_disk_load(mut self, disk_load: DiskLoadSimulator) -> Self {
        self.disk_load = disk_load;
        self
    }

    pub fn node_id(&self) -> &str {
        self.context.node_id()
    }

    fn storage_error(&self, source: anyhow::Error) -> RoutingError {
        RoutingError::Storage {
            node: self.node_id().to_string(),
            source,
        }
    }

    /// Insert or update this node's rule for a chain
    pub async fn apply_rule(&self, request: ApplyRuleRequest) -> Result<Rule, RoutingError> {
        self.disk_load.run("rule").await;

        let rule = self
            .context
            .store()
            .rule_upsert(
                request.chain_id,
                request.next_hop_id,
                request.next_hop_base_url,
                self.node_id(),
            )
            .await
            .map_err(|e| self.storage_error(e))?;

        info!(
            node = %self.node_id(),
            chain_id = rule.chain_id,
            next_hop_id = ?rule.next_hop_id,
            next_hop_base_url = ?rule.next_hop_base_url,
            "Rule applied"
        );
        Ok(rule)
    }

    /// Get this node's rule for a chain
    pub async fn lookup_rule(&self, chain_id: i64) -> Result<Option<Rule>, RoutingError> {
        self.context
            .store()
            .rule_lookup(chain_id)
            .await
            .map_err(|e| self.storage_error(e))
    }

    /// All rules held by this node
    pub async fn list_rules(&self) -> Result<Vec<Rule>, RoutingError> {
        self.context
            .store()
            .rule_find_all()
            .await
            .map_err(|e| self.storage_error(e))
    }

    /// Decide what this node does with a ping, without forwarding it
    pub async fn decide(&self, request: &PingRequest) -> Result<HopDecision, RoutingError> {
        if self.context.is_destination(&request.dst_node) {
            return Ok(HopDecision::Reached);
        }

        match self.lookup_rule(request.chain_id).await? {
            Some(rule) => Ok(HopDecision::from_route(rule.route())),
            None => Ok(HopDecision::NoRule),
        }
    }

    /// Handle a ping at this node, relaying it down the chain when needed
    pub async fn ping(
        &self,
        request: &PingRequest,
        request_id: Option<&str>,
    ) -> Result<PingOutcome, RoutingError> {
        let node = self.node_id();
        let decision = self.decide(request).await?;

        if decision.found_rule() {
            self.disk_load.run("ping").await;
        }

        match decision {
            HopDecision::Reached => {
                info!(node = %node, chain_id = request.chain_id, "Destination reached");
                Ok(PingOutcome::Reached {
                    node: node.to_string(),
                })
            }
            HopDecision::NoRule => {
                warn!(node = %node, chain_id = request.chain_id, "No chain rule configured");
                Err(RoutingError::NoRuleConfigured {
                    node: node.to_string(),
                    chain_id: request.chain_id,
                })
            }
            HopDecision::NoNextHop => {
                warn!(
                    node = %node,
                    chain_id = request.chain_id,
                    dst_node = %request.dst_node,
                    "No next hop and destination not reached"
                );
                Err(RoutingError::NoNextHop {
                    node: node.to_string(),
                    chain_id: request.chain_id,
                    dst_node: request.dst_node.clone(),
                })
            }
            HopDecision::Unaddressed { next_hop_id } => {
                let source = ForwardError::MissingAddress {
                    next_hop_id: next_hop_id.clone(),
                };
                warn!(
                    node = %node,
                    chain_id = request.chain_id,
                    next_hop_id = %next_hop_id,
                    error = %source,
                    "Forward failed"
                );
                Err(RoutingError::ForwardingFailed {
                    node: node.to_string(),
                    next_hop_id,
                    source,
                })
            }
            HopDecision::Forward {
                next_hop_id,
                next_hop_base_url,
            } => {
                info!(
                    node = %node,
                    chain_id = request.chain_id,
                    dst_node = %request.dst_node,
                    next_hop_id = %next_hop_id,
                    "Hopped on node {}, forwarding to node {}",
                    node,
                    next_hop_id
                );
                match self
                    .hop_client
                    .forward(&next_hop_base_url, request, request_id)
                    .await
                {
                    Ok(body) => Ok(PingOutcome::Relayed(body)),
                    Err(source) => {
                        warn!(
                            node = %node,
                            chain_id = request.chain_id,
                            next_hop_id = %next_hop_id,
                            error = %source,
                            "Forward failed"
                        );
                        Err(RoutingError::ForwardingFailed {
                            node: node.to_string(),
                            next_hop_id,
                            source,
                        })
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use hoprelay_persistence::{MemoryRuleStore, RulePersistence};

    use super::*;
    use crate::model::ForwardingOutcome;

    /// Records every relay and answers with a fixed result
    struct StubHopClient {
        calls: Mutex<Vec<(String, PingRequest, Option<String>)>>,
        fail: bool,
    }

    impl StubHopClient {
        fn ok() -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                fail: true,
            })
        }

        fn calls(&self) -> Vec<(String, PingRequest, Option<String>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HopClient for StubHopClient {
        async fn forward(
            &self,
            base_url: &str,
            request: &PingRequest,
            request_id: Option<&str>,
        ) -> Result<ForwardingOutcome, ForwardError> {
            self.calls.lock().unwrap().push((
                base_url.to_string(),
                request.clone(),
                request_id.map(String::from),
            ));
            if self.fail {
                Err(ForwardError::Timeout {
                    url: format!("{}/ping", base_url),
                    timeout: std::time::Duration::from_secs(5),
                })
            } else {
                Ok(serde_json::json!({"status": "reached", "node": request.dst_node}))
            }
        }
    }

    fn engine(node: &str, client: Arc<StubHopClient>) -> (ForwardingEngine, Arc<MemoryRuleStore>) {
        let store = Arc::new(MemoryRuleStore::new());
        let ctx = NodeContext::new(node, store.clone());
        (ForwardingEngine::new(ctx, client), store)
    }

    #[tokio::test]
    async fn test_reached_without_rule() {
        let client = StubHopClient::ok();
        let (engine, _) = engine("A", client.clone());

        let outcome = engine.ping(&PingRequest::new(99, "A"), None).await.unwrap();
        assert_eq!(
            outcome,
            PingOutcome::Reached {
                node: "A".to_string()
            }
        );
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_destination_checked_before_rule() {
        let client = StubHopClient::ok();
        let (engine, store) = engine("B", client.clone());
        store
            .rule_upsert(1, Some("C".to_string()), Some("http://c".to_string()), "B")
            .await
            .unwrap();

        assert_eq!(
            engine.decide(&PingRequest::new(1, "B")).await.unwrap(),
            HopDecision::Reached
        );
        engine.ping(&PingRequest::new(1, "B"), None).await.unwrap();
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_no_rule_configured() {
        let (engine, _) = engine("A", StubHopClient::ok());

        let err = engine.ping(&PingRequest::new(1, "C"), None).await.unwrap_err();
        assert!(matches!(
            err,
            RoutingError::NoRuleConfigured { ref node, chain_id: 1 } if node == "A"
        ));
    }

    #[tokio::test]
    async fn test_no_next_hop() {
        let (engine, store) = engine("A", StubHopClient::ok());
        store.rule_upsert(1, None, None, "A").await.unwrap();

        let err = engine.ping(&PingRequest::new(1, "C"), None).await.unwrap_err();
        assert!(matches!(err, RoutingError::NoNextHop { chain_id: 1, .. }));
        assert!(err.to_string().contains("destination 'C' not reached"));
    }

    #[tokio::test]
    async fn test_forward_relays_unchanged_request() {
        let client = StubHopClient::ok();
        let (engine, store) = engine("A", client.clone());
        store
            .rule_upsert(
                7,
                Some("B".to_string()),
                Some("http://b:50100".to_string()),
                "A",
            )
            .await
            .unwrap();

        let request = PingRequest::new(7, "C");
        let outcome = engine.ping(&request, Some("req-1")).await.unwrap();
        assert_eq!(
            outcome,
            PingOutcome::Relayed(serde_json::json!({"status": "reached", "node": "C"}))
        );

        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "http://b:50100");
        assert_eq!(calls[0].1, request);
        assert_eq!(calls[0].2.as_deref(), Some("req-1"));
    }

    #[tokio::test]
    async fn test_forward_failure_is_wrapped() {
        let client = StubHopClient::failing();
        let (engine, store) = engine("A", client.clone());
        store
            .rule_upsert(1, Some("B".to_string()), Some("http://b".to_string()), "A")
            .await
            .unwrap();

        let err = engine.ping(&PingRequest::new(1, "C"), None).await.unwrap_err();
        match err {
            RoutingError::ForwardingFailed {
                node,
                next_hop_id,
                source,
            } => {
                assert_eq!(node, "A");
                assert_eq!(next_hop_id, "B");
                assert!(matches!(source, ForwardError::Timeout { .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(client.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_unaddressed_next_hop_fails_without_relay() {
        let client = StubHopClient::ok();
        let (engine, store) = engine("A", client.clone());
        store
            .rule_upsert(1, Some("B".to_string()), None, "A")
            .await
            .unwrap();

        let err = engine.ping(&PingRequest::new(1, "C"), None).await.unwrap_err();
        assert!(matches!(
            err,
            RoutingError::ForwardingFailed {
                source: ForwardError::MissingAddress { .. },
                ..
            }
        ));
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_apply_rule_owned_by_node() {
        let (engine, _) = engine("A", StubHopClient::ok());

        let rule = engine
            .apply_rule(ApplyRuleRequest {
                chain_id: 3,
                next_hop_id: Some("B".to_string()),
                next_hop_base_url: Some("http://b".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(rule.current_node_id, "A");

        let updated = engine
            .apply_rule(ApplyRuleRequest {
                chain_id: 3,
                next_hop_id: None,
                next_hop_base_url: None,
            })
            .await
            .unwrap();
        assert_eq!(updated.current_node_id, "A");
        assert_eq!(updated.next_hop_id, None);
        assert_eq!(engine.lookup_rule(3).await.unwrap(), Some(updated));
        assert_eq!(engine.list_rules().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_disk_load_runs_on_rule_paths() {
        let dir = tempfile::tempdir().unwrap();
        let (engine, _) = engine("A", StubHopClient::ok());
        let disk_load = DiskLoadSimulator::new(1024, dir.path());
        let engine = engine.with_disk_load(disk_load.clone());

        engine
            .apply_rule(ApplyRuleRequest {
                chain_id: 1,
                next_hop_id: None,
                next_hop_base_url: None,
            })
            .await
            .unwrap();
        assert_eq!(disk_load.bytes_written(), 1024);

        let err = engine.ping(&PingRequest::new(1, "C"), None).await.unwrap_err();
        assert!(matches!(err, RoutingError::NoNextHop { .. }));
        assert_eq!(disk_load.bytes_written(), 2048);

        // no rule and reached pings skip the load
        engine.ping(&PingRequest::new(2, "C"), None).await.unwrap_err();
        engine.ping(&PingRequest::new(2, "A"), None).await.unwrap();
        assert_eq!(disk_load.bytes_written(), 2048);

        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_found_rule() {
        assert!(!HopDecision::Reached.found_rule());
        assert!(!HopDecision::NoRule.found_rule());
        assert!(HopDecision::NoNextHop.found_rule());
        assert!(
            HopDecision::Unaddressed {
                next_hop_id: "B".to_string()
            }
            .found_rule()
        );
    }
}

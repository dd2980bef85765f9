//! Node failover dispatch.
//!
//! # Responsibilities
//! - Run one remote operation against the primary node (single-node mode)
//! - Or walk the active nodes in registry order (multi-node mode)
//! - Move to the next node only on transport failure
//!
//! # Invariants
//! - Business rejections are terminal: a transaction refused by one node is
//!   never resubmitted to another
//! - Nodes are tried strictly in sequence, never probed in parallel
//! - An empty active list contacts nobody and yields a transport error

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{GatewayError, GatewayResult};
use crate::load_balancer::NodeSource;
use crate::observability::metrics;

/// Whether dispatch consults the node registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationMode {
    /// Talk to the preconfigured primary node only.
    SingleNode,
    /// Fail over across the active nodes of the registry.
    MultiNode,
}

/// Retry-across-nodes execution strategy, generic over the remote call.
pub struct FailoverDispatcher {
    mode: OperationMode,
    primary: Url,
    secure: bool,
    nodes: Option<Arc<dyn NodeSource>>,
}

impl FailoverDispatcher {
    pub fn new(
        mode: OperationMode,
        primary: Url,
        secure: bool,
        nodes: Option<Arc<dyn NodeSource>>,
    ) -> Self {
        Self {
            mode,
            primary,
            secure,
            nodes,
        }
    }

    /// Effective mode: multi-node without a registry degrades to single-node.
    pub fn mode(&self) -> OperationMode {
        match (self.mode, &self.nodes) {
            (OperationMode::MultiNode, Some(_)) => OperationMode::MultiNode,
            _ => OperationMode::SingleNode,
        }
    }

    /// Run `call` (remote invocation followed by classification) until a node
    /// answers with anything other than a transport failure.
    pub async fn dispatch<T, F, Fut>(&self, operation: &'static str, call: F) -> GatewayResult<T>
    where
        F: Fn(Url) -> Fut,
        Fut: Future<Output = GatewayResult<T>>,
    {
        let start = Instant::now();

        let result = match (self.mode, &self.nodes) {
            (OperationMode::MultiNode, Some(source)) => {
                self.across_nodes(operation, source.as_ref(), &call).await
            }
            _ => {
                let result = call(self.primary.clone()).await;
                metrics::record_node_attempt(operation, attempt_outcome(&result));
                if let Err(e) = &result {
                    tracing::warn!(operation, node = %self.primary, error = %e, "Primary node call failed");
                }
                result
            }
        };

        let outcome = match &result {
            Ok(_) => "success",
            Err(e) => e.kind(),
        };
        metrics::record_dispatch(operation, outcome, start);
        result
    }

    async fn across_nodes<T, F, Fut>(
        &self,
        operation: &'static str,
        source: &dyn NodeSource,
        call: &F,
    ) -> GatewayResult<T>
    where
        F: Fn(Url) -> Fut,
        Fut: Future<Output = GatewayResult<T>>,
    {
        let nodes = source.active_nodes().await;
        if nodes.is_empty() {
            tracing::warn!(operation, "No active nodes to dispatch to");
            return Err(GatewayError::no_active_nodes());
        }

        let mut last_error = None;
        for (attempt, node) in nodes.iter().enumerate() {
            let url = match node.base_url(self.secure) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!(operation, attempt, address = %node.address, error = %e, "Skipping node with invalid address");
                    metrics::record_node_attempt(operation, "transport");
                    last_error = Some(GatewayError::Transport(format!(
                        "invalid node address {}:{}: {}",
                        node.address, node.port, e
                    )));
                    continue;
                }
            };

            let result = call(url.clone()).await;
            metrics::record_node_attempt(operation, attempt_outcome(&result));
            match result {
                Err(e) if e.is_retryable() => {
                    tracing::warn!(operation, attempt, node = %url, error = %e, "Node unreachable, trying next node");
                    last_error = Some(e);
                }
                Err(e) => {
                    tracing::debug!(operation, attempt, node = %url, error = %e, "Node rejected request");
                    return Err(e);
                }
                Ok(value) => {
                    tracing::debug!(operation, attempt, node = %url, "Node call succeeded");
                    return Ok(value);
                }
            }
        }

        tracing::error!(operation, nodes = nodes.len(), "All active nodes failed");
        Err(last_error.unwrap_or_else(GatewayError::no_active_nodes))
    }
}

fn attempt_outcome<T>(result: &GatewayResult<T>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(e) if e.is_retryable() => "transport",
        Err(_) => "rejected",
    }
}

impl std::fmt::Debug for FailoverDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FailoverDispatcher")
            .field("mode", &self.mode())
            .field("primary", &self.primary.as_str())
            .field("secure", &self.secure)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load_balancer::{Node, StaticNodeSource};
    use std::sync::Mutex;

    fn primary() -> Url {
        "http://primary:8841".parse().unwrap()
    }

    fn multi(nodes: Vec<Node>) -> FailoverDispatcher {
        let source: Arc<dyn NodeSource> = Arc::new(StaticNodeSource::new(nodes));
        FailoverDispatcher::new(OperationMode::MultiNode, primary(), false, Some(source))
    }

    fn nodes(n: u16) -> Vec<Node> {
        (1..=n).map(|port| Node::new("127.0.0.1", port)).collect()
    }

    /// Node at `port` fails with a transport error when `port <= failing`,
    /// otherwise answers with its port.
    async fn run(
        dispatcher: &FailoverDispatcher,
        respond: impl Fn(u16) -> GatewayResult<u16>,
    ) -> (GatewayResult<u16>, Vec<u16>) {
        let seen = Mutex::new(Vec::new());
        let result = dispatcher
            .dispatch("test", |url: Url| {
                let port = url.port().unwrap_or_default();
                seen.lock().unwrap().push(port);
                let reply = respond(port);
                async move { reply }
            })
            .await;
        (result, seen.into_inner().unwrap())
    }

    #[tokio::test]
    async fn test_fails_over_until_first_success() {
        let dispatcher = multi(nodes(5));
        for k in 0..5u16 {
            let (result, seen) = run(&dispatcher, |port| {
                if port <= k {
                    Err(GatewayError::Transport("down".into()))
                } else {
                    Ok(port)
                }
            })
            .await;
            assert_eq!(result.unwrap(), k + 1);
            assert_eq!(seen, (1..=k + 1).collect::<Vec<_>>());
        }
    }

    #[tokio::test]
    async fn test_business_error_is_terminal() {
        let dispatcher = multi(nodes(3));
        let (result, seen) = run(&dispatcher, |port| {
            if port == 1 {
                Err(GatewayError::NodeBusiness { code: 107, log: "no funds".into() })
            } else {
                Ok(port)
            }
        })
        .await;
        assert_eq!(result.unwrap_err(), GatewayError::NodeBusiness { code: 107, log: "no funds".into() });
        assert_eq!(seen, vec![1]);
    }

    #[tokio::test]
    async fn test_empty_registry_contacts_nobody() {
        let dispatcher = multi(vec![Node::new("127.0.0.1", 1).inactive()]);
        let (result, seen) = run(&dispatcher, |port| Ok(port)).await;
        let err = result.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(err, GatewayError::no_active_nodes());
        assert!(seen.is_empty());
    }

    #[tokio::test]
    async fn test_exhaustion_returns_last_transport_error() {
        let dispatcher = multi(nodes(3));
        let (result, seen) = run(&dispatcher, |port| {
            Err(GatewayError::Transport(format!("node {} down", port)))
        })
        .await;
        assert_eq!(result.unwrap_err(), GatewayError::Transport("node 3 down".into()));
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_invalid_address_is_skipped() {
        let dispatcher = multi(vec![Node::new("bad host", 1), Node::new("127.0.0.1", 2)]);
        let (result, seen) = run(&dispatcher, |port| Ok(port)).await;
        assert_eq!(result.unwrap(), 2);
        assert_eq!(seen, vec![2]);
    }

    #[tokio::test]
    async fn test_single_node_uses_primary_once() {
        let source: Arc<dyn NodeSource> = Arc::new(StaticNodeSource::new(nodes(3)));
        let dispatcher = FailoverDispatcher::new(OperationMode::SingleNode, primary(), false, Some(source));
        let (result, seen) = run(&dispatcher, |_| Err(GatewayError::Transport("down".into()))).await;
        assert!(result.is_err());
        assert_eq!(seen, vec![8841]);
    }

    #[tokio::test]
    async fn test_multi_node_without_registry_degrades() {
        let dispatcher = FailoverDispatcher::new(OperationMode::MultiNode, primary(), false, None);
        assert_eq!(dispatcher.mode(), OperationMode::SingleNode);
        let (result, seen) = run(&dispatcher, |port| Ok(port)).await;
        assert_eq!(result.unwrap(), 8841);
        assert_eq!(seen, vec![8841]);
    }
}

//! Node registry.
//!
//! # Responsibilities
//! - Supply the ordered set of currently active nodes
//! - Preserve backing-store order (no reordering, no scoring)
//! - Accept whole-list replacement on config reload

use std::sync::Arc;

use arc_swap::ArcSwap;
use async_trait::async_trait;

use crate::load_balancer::node::Node;

/// Source of nodes eligible for dispatch.
///
/// Called on every dispatch; implementations must not cache activity flags
/// across calls. An empty list is a legal answer.
#[async_trait]
pub trait NodeSource: Send + Sync {
    async fn active_nodes(&self) -> Vec<Node>;
}

/// Node registry backed by the configuration file.
#[derive(Debug)]
pub struct StaticNodeSource {
    nodes: ArcSwap<Vec<Node>>,
}

impl StaticNodeSource {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self {
            nodes: ArcSwap::from_pointee(nodes),
        }
    }

    /// Swap in a new node list; in-flight dispatches keep their snapshot.
    pub fn replace(&self, nodes: Vec<Node>) {
        let active = nodes.iter().filter(|n| n.is_active).count();
        tracing::info!(total = nodes.len(), active, "Node registry updated");
        self.nodes.store(Arc::new(nodes));
    }

    /// Every registered node, active or not.
    pub fn all_nodes(&self) -> Vec<Node> {
        self.nodes.load().as_ref().clone()
    }
}

#[async_trait]
impl NodeSource for StaticNodeSource {
    async fn active_nodes(&self) -> Vec<Node> {
        self.nodes
            .load()
            .iter()
            .filter(|n| n.is_active)
            .cloned()
            .collect()
    }
}

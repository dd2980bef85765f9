//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from the TOML config file.
//! Every section is optional and falls back to its `Default`.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::load_balancer::node::{node_url, Node};
use crate::resilience::OperationMode;

/// Root configuration for the gate.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GateConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Primary node and dispatch mode.
    pub node: NodeConfig,

    /// Node registry used in multi-node mode.
    pub nodes: Vec<Node>,

    /// Transaction confirmation settings.
    pub confirmation: ConfirmationConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl GateConfig {
    pub fn mode(&self) -> OperationMode {
        if self.node.single_node {
            OperationMode::SingleNode
        } else {
            OperationMode::MultiNode
        }
    }

    /// URL of the preconfigured primary node.
    pub fn primary_url(&self) -> Result<Url, url::ParseError> {
        node_url(&self.node.link, self.node.port, self.node.secure)
    }

    pub fn active_node_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_active).count()
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// Primary node connection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Host of the primary node.
    pub link: String,

    /// API port of the primary node.
    pub port: u16,

    /// Use https for every node.
    pub secure: bool,

    /// Talk to the primary node only and skip confirmation waits.
    pub single_node: bool,

    /// Per-call timeout for node requests in seconds.
    pub request_timeout_secs: u64,
}

impl NodeConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            link: "localhost".to_string(),
            port: 8841,
            secure: false,
            single_node: false,
            request_timeout_secs: 10,
        }
    }
}

/// Confirmation wait and explorer feed.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfirmationConfig {
    /// How long a push waits for its transaction to be observed.
    pub timeout_secs: u64,

    /// Websocket URL of the explorer transaction stream.
    pub feed_url: Option<String>,

    /// Delay before reconnecting a dropped feed.
    pub feed_reconnect_secs: u64,
}

impl ConfirmationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn feed_reconnect(&self) -> Duration {
        Duration::from_secs(self.feed_reconnect_secs)
    }
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            feed_url: None,
            feed_reconnect_secs: 5,
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 60 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

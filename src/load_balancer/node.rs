//! Full node descriptor.

use serde::{Deserialize, Serialize};
use url::Url;

/// One full node of the network, as held by the node registry.
///
/// Treated as an immutable value for the duration of a dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Node {
    /// Host name or IP of the node's API.
    pub address: String,
    /// API port.
    pub port: u16,
    /// Maintained externally; inactive nodes are never contacted.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Node {
    pub fn new(address: impl Into<String>, port: u16) -> Self {
        Self {
            address: address.into(),
            port,
            is_active: true,
        }
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Base URL `scheme://address:port` of this node.
    pub fn base_url(&self, secure: bool) -> Result<Url, url::ParseError> {
        node_url(&self.address, self.port, secure)
    }
}

/// URL scheme selected by the `secure` flag.
pub fn scheme(secure: bool) -> &'static str {
    if secure {
        "https"
    } else {
        "http"
    }
}

/// Build `scheme://host:port`.
pub fn node_url(host: &str, port: u16, secure: bool) -> Result<Url, url::ParseError> {
    Url::parse(&format!("{}://{}:{}", scheme(secure), host, port))
}

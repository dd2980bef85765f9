//! Domain errors produced by node dispatch and confirmation.
//!
//! Only the classifier and the confirmation waiter construct these; the
//! dispatcher recovers `Transport` by moving to the next node and propagates
//! everything else untouched.

use thiserror::Error;

use crate::blockchain::types::TransactionHash;

/// Code reported when no node-side code is available.
pub const UNKNOWN_ERROR_CODE: i64 = -1;

/// Code rendered for a confirmation timeout.
pub const TIMEOUT_ERROR_CODE: i64 = 1;

/// Errors surfaced by the gateway operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The node could not be reached or its response could not be decoded.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The node rejected the request on its merits.
    #[error("Node error {code}: {log}")]
    NodeBusiness { code: i64, log: String },

    /// The sender cannot cover the transaction (node code 107).
    #[error("Insufficient funds: {log}")]
    InsufficientFunds {
        log: String,
        code: i64,
        amount: String,
        coin: String,
    },

    /// A code-107 log did not carry the expected `Wanted <amount> <coin>` part.
    #[error("Malformed node log for code {code}: {log}")]
    MalformedLog { code: i64, log: String },

    /// The transaction was accepted but no confirmation arrived in time.
    #[error("Transaction {hash} not confirmed in time")]
    Timeout { hash: TransactionHash },

    /// The node answered with neither a result nor an error object.
    #[error("Unknown node error (code {code})")]
    UnknownNode { code: i64 },
}

impl GatewayError {
    /// Transport error used when multi-node mode has nothing to contact.
    pub fn no_active_nodes() -> Self {
        Self::Transport("no active nodes".to_string())
    }

    /// Only transport failures move the dispatcher on to the next node.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Numeric code rendered to clients.
    pub fn code(&self) -> i64 {
        match self {
            Self::Transport(_) => UNKNOWN_ERROR_CODE,
            Self::NodeBusiness { code, .. }
            | Self::InsufficientFunds { code, .. }
            | Self::MalformedLog { code, .. }
            | Self::UnknownNode { code } => *code,
            Self::Timeout { .. } => TIMEOUT_ERROR_CODE,
        }
    }

    /// Human-readable log rendered to clients.
    pub fn log(&self) -> String {
        match self {
            Self::Transport(msg) => msg.clone(),
            Self::NodeBusiness { log, .. }
            | Self::InsufficientFunds { log, .. }
            | Self::MalformedLog { log, .. } => log.clone(),
            Self::Timeout { .. } => "Time out for transaction".to_string(),
            Self::UnknownNode { .. } => "Unknown error".to_string(),
        }
    }

    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::NodeBusiness { .. } => "node_business",
            Self::InsufficientFunds { .. } => "insufficient_funds",
            Self::MalformedLog { .. } => "malformed_log",
            Self::Timeout { .. } => "timeout",
            Self::UnknownNode { .. } => "unknown_node",
        }
    }
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

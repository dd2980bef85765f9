//! Confirmation wait for pushed transactions.

use std::sync::Arc;
use std::time::Duration;

use crate::blockchain::types::TransactionHash;
use crate::confirmation::bus::NotificationBus;
use crate::error::{GatewayError, GatewayResult};
use crate::observability::metrics;

/// Default confirmation window.
pub const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Proof that the bus published the transaction's topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmed {
    pub hash: TransactionHash,
}

/// Blocks a request until its transaction is observed or the window closes.
#[derive(Debug, Clone)]
pub struct ConfirmationWaiter {
    bus: Arc<NotificationBus>,
}

impl ConfirmationWaiter {
    pub fn new(bus: Arc<NotificationBus>) -> Self {
        Self { bus }
    }

    /// Race the hash topic against `timeout`.
    ///
    /// Subscribes exactly once and never re-subscribes. The subscription is
    /// dropped on every exit path, including cancellation of this future.
    pub async fn await_confirmation(
        &self,
        hash: &TransactionHash,
        timeout: Duration,
    ) -> GatewayResult<Confirmed> {
        let mut subscription = self.bus.subscribe_once(hash.as_str());
        tracing::debug!(hash = %hash, timeout_secs = timeout.as_secs(), "Waiting for confirmation");

        let delivered = tokio::select! {
            delivered = subscription.recv() => delivered,
            _ = tokio::time::sleep(timeout) => false,
        };
        drop(subscription);

        if delivered {
            tracing::info!(hash = %hash, "Transaction confirmed");
            metrics::record_confirmation("confirmed");
            Ok(Confirmed { hash: hash.clone() })
        } else {
            tracing::warn!(hash = %hash, timeout_secs = timeout.as_secs(), "Confirmation timed out");
            metrics::record_confirmation("timeout");
            Err(GatewayError::Timeout { hash: hash.clone() })
        }
    }
}

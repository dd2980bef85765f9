//! Node integration subsystem.
//!
//! # Data Flow
//! ```text
//! Gateway operation
//!     → client.rs (one remote call against one node URL)
//!     → types.rs (response envelope)
//!     → classify.rs (success value or GatewayError)
//!         → amount.rs (smallest-unit conversion for insufficient funds)
//! ```
//!
//! # Constraints
//! - The client never retries; failover belongs to the dispatcher
//! - Node-level rejections are terminal, transport failures are not
//! - Amount conversion is exact base-10 arithmetic

pub mod amount;
pub mod classify;
pub mod client;
pub mod types;

#[cfg(test)]
pub mod mock;

pub use classify::classify;
pub use client::{HttpNodeClient, NodeApi};
pub use types::{CoinEstimate, NodeResponse, PushOutcome, PushStatus, TransactionHash};

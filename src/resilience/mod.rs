//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Gateway operation (remote call + classifier)
//!     → failover.rs (single-node: primary only;
//!                    multi-node: active nodes in order)
//!     → transport failure: next node
//!     → anything else: return immediately
//! ```
//!
//! # Design Decisions
//! - One generic dispatch routine serves every remote operation
//! - No backoff layer; the node loop is the only retry
//! - Each remote call is bounded by the node client's own timeout

pub mod failover;

pub use failover::{FailoverDispatcher, OperationMode};

//! Client-facing gateway operations.
//!
//! # Data Flow
//! ```text
//! HTTP handler
//!     → service.rs (operation)
//!     → resilience::failover (node selection, transport failover)
//!     → blockchain::client + classify (one call, typed result)
//!     → confirmation::waiter (push in multi-node mode only)
//! ```

pub mod service;

pub use service::Gateway;

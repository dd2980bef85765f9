//! Node selection subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatch in multi-node mode
//!     → source.rs (active nodes, registry order)
//!     → node.rs (node → base URL, scheme from the `secure` flag)
//!     → resilience::failover tries them in sequence
//! ```
//!
//! # Design Decisions
//! - Order is whatever the registry delivers; no latency or load scoring
//! - Activity is an external flag, re-read on every dispatch
//! - Registry is swapped atomically on config reload

pub mod node;
pub mod source;

pub use node::Node;
pub use source::{NodeSource, StaticNodeSource};

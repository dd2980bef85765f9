//! Explorer Gate: a stateless gateway between explorer clients and a pool
//! of blockchain full nodes.

// Node integration
pub mod blockchain;
pub mod error;

// Dispatch
pub mod load_balancer;
pub mod resilience;

// Operations
pub mod confirmation;
pub mod gateway;

// Surfaces and cross-cutting concerns
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::GateConfig;
pub use error::{GatewayError, GatewayResult};
pub use gateway::Gateway;
pub use http::HttpServer;
pub use lifecycle::Shutdown;

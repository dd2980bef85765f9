//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GateConfig (validated, immutable)
//!     → mode and node flags handed to the Gateway at construction
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → node registry swapped (ArcSwap)
//! ```
//!
//! # Design Decisions
//! - Only the node registry is hot-reloaded; mode flags need a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{ConfirmationConfig, GateConfig, ListenerConfig, NodeConfig, TlsConfig};
pub use watcher::ConfigWatcher;

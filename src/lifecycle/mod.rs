//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Ctrl+C → Shutdown::trigger
//!     → HTTP server stops accepting and drains
//!     → confirmation feed closes its socket
//!     → config watcher task exits
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;

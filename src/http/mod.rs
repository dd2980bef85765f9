//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → tls.rs (optional rustls termination)
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → handlers.rs (validate, call gateway operation)
//!     → response.rs (data envelope or error rendering)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;
pub mod tls;

pub use request::X_REQUEST_ID;
pub use server::{build_router, AppState, HttpServer};

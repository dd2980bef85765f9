//! Transaction confirmation subsystem.
//!
//! # Data Flow
//! ```text
//! Explorer websocket
//!     → feed.rs (extract hashes, normalize to Mt…)
//!     → bus.rs publish(topic = hash)
//!
//! Push request (multi-node mode)
//!     → waiter.rs subscribe_once(hash)
//!     → select! { delivered, timeout }
//!     → subscription dropped on both paths
//! ```

pub mod bus;
pub mod feed;
pub mod waiter;

pub use bus::{NotificationBus, Subscription, SubscriptionId};
pub use feed::ConfirmationFeed;
pub use waiter::{ConfirmationWaiter, Confirmed, DEFAULT_CONFIRMATION_TIMEOUT};

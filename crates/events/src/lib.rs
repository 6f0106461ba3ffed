//! Linguist event bus.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`PlatformEvent`]: the canonical domain event envelope, published
//!   after every successful project lifecycle command.

pub mod bus;

pub use bus::{EventBus, PlatformEvent};

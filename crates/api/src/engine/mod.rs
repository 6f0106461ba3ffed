//! Project lifecycle engine.
//!
//! [`ClaimService`] is the only writer of lifecycle state, [`StatsService`]
//! aggregates segment progress with retry, and [`BulkCoordinator`] drives a
//! lifecycle command across many projects.

pub mod bulk;
pub mod claims;
pub mod stats;

pub use bulk::{BulkCoordinator, BulkReport};
pub use claims::ClaimService;
pub use stats::{StatsReport, StatsService};

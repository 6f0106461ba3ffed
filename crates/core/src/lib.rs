//! Domain rules for the translation-production console.
//!
//! This crate has zero internal dependencies so it can be shared by the
//! repository layer, the API server and any future CLI tooling. Everything
//! here is pure: no I/O, no clocks beyond what callers pass in.

pub mod bulk;
pub mod display;
pub mod error;
pub mod lifecycle;
pub mod project;
pub mod roles;
pub mod stats;
pub mod status;
pub mod types;

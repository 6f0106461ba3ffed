//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` (or a `&mut PgConnection` inside a transaction) as the
//! first argument.

pub mod file_repo;
pub mod project_repo;
pub mod segment_repo;

pub use file_repo::FileRepo;
pub use project_repo::ProjectRepo;
pub use segment_repo::SegmentRepo;

pub mod bulk;
pub mod lifecycle;
pub mod project;
pub mod stats;

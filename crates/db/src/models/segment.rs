//! Segment read model.
//!
//! Segments are owned by the ingestion pipeline and the editor. This crate
//! only reads them, joined with their file's kind so the aggregator can
//! skip reference material.

use linguist_core::error::CoreError;
use linguist_core::stats::SegmentFacts;
use linguist_core::status::{FileKind, SegmentStatus};
use linguist_core::types::{DbId, StatusId};
use serde::Serialize;
use sqlx::FromRow;

/// A segment row joined with its owning file's kind.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectSegment {
    pub id: DbId,
    pub file_id: DbId,
    pub file_kind_id: StatusId,
    pub position: i32,
    pub source_text: String,
    pub target_text: String,
    pub status_id: StatusId,
}

impl ProjectSegment {
    /// Borrow the fields aggregation needs, resolving lookup ids.
    pub fn facts(&self) -> Result<SegmentFacts<'_>, CoreError> {
        Ok(SegmentFacts {
            file_kind: FileKind::try_from(self.file_kind_id)?,
            source_text: &self.source_text,
            status: SegmentStatus::try_from(self.status_id)?,
        })
    }
}

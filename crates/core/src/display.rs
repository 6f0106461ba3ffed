//! Viewer-relative project status.
//!
//! The raw lifecycle status says who owns a project; what a user sees
//! depends on whether the owner is them. This is the single place that
//! derivation happens, for both list filtering and labels.

use serde::{Deserialize, Serialize};

use crate::status::ProjectStatus;
use crate::types::DbId;

/// Status as presented to a specific viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayStatus {
    Unclaimed,
    /// Claimed by the viewer.
    InProgress,
    /// Claimed by someone other than the viewer.
    Claimed,
    Completed,
}

impl DisplayStatus {
    /// Human-readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Unclaimed => "Unclaimed",
            Self::InProgress => "In Progress",
            Self::Claimed => "Claimed",
            Self::Completed => "Completed",
        }
    }
}

/// Project a raw lifecycle status onto what `viewer_id` should see.
pub fn display_status(
    status: ProjectStatus,
    claimed_by: Option<DbId>,
    viewer_id: DbId,
) -> DisplayStatus {
    match status {
        ProjectStatus::Completed => DisplayStatus::Completed,
        ProjectStatus::Unclaimed => DisplayStatus::Unclaimed,
        ProjectStatus::Claimed if claimed_by == Some(viewer_id) => DisplayStatus::InProgress,
        ProjectStatus::Claimed => DisplayStatus::Claimed,
    }
}

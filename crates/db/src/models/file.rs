//! Project file entity model and DTOs.

use linguist_core::error::CoreError;
use linguist_core::status::FileKind;
use linguist_core::types::{DbId, StatusId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `project_files` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectFile {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub kind_id: StatusId,
    /// Zero-based order within the project.
    pub position: i32,
    pub created_at: Timestamp,
}

impl ProjectFile {
    pub fn kind(&self) -> Result<FileKind, CoreError> {
        FileKind::try_from(self.kind_id)
    }
}

/// A file supplied when creating a project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProjectFile {
    pub name: String,
    /// Defaults to `work` if omitted.
    #[serde(default = "default_kind")]
    pub kind: FileKind,
}

fn default_kind() -> FileKind {
    FileKind::Work
}

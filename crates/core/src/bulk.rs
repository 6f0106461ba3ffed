//! Bulk lifecycle operation accounting.
//!
//! A bulk operation applies one [`LifecycleCommand`] to many projects, one
//! at a time. Items that already succeeded are never rolled back when a
//! later item fails; the caller gets per-item outcomes plus aggregate counts
//! and is expected to re-run the command on the failed subset.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::CoreError;
use crate::lifecycle::LifecycleCommand;
use crate::types::DbId;

/// Upper bound on the number of projects in a single bulk request.
pub const MAX_BULK_ITEMS: usize = 500;

/// Validate and de-duplicate the requested project ids.
///
/// Order of first occurrence is preserved so outcomes line up with the
/// caller's selection. `operation` names the request in validation messages.
pub fn normalize_project_ids(ids: &[DbId], operation: &str) -> Result<Vec<DbId>, CoreError> {
    if ids.is_empty() {
        return Err(CoreError::Validation(format!(
            "{operation} requires at least one project id"
        )));
    }

    let mut seen = HashSet::with_capacity(ids.len());
    let unique: Vec<DbId> = ids.iter().copied().filter(|id| seen.insert(*id)).collect();

    if unique.len() > MAX_BULK_ITEMS {
        return Err(CoreError::Validation(format!(
            "{operation} accepts at most {MAX_BULK_ITEMS} projects, got {}",
            unique.len()
        )));
    }
    Ok(unique)
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Result of one item in a bulk run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Succeeded,
    Failed,
    /// Not attempted because the run was abandoned.
    Skipped,
}

/// Serializable view of a [`CoreError`] attached to a failed item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemError {
    pub code: &'static str,
    pub message: String,
}

impl From<&CoreError> for ItemError {
    fn from(err: &CoreError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkItemOutcome {
    pub project_id: DbId,
    pub status: ItemStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ItemError>,
}

/// Aggregate report of a bulk run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkSummary {
    pub command: LifecycleCommand,
    /// Items the command was actually run against.
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Whether the run was abandoned before every item was attempted.
    pub cancelled: bool,
    /// The first failure encountered, in execution order.
    pub first_error: Option<ItemError>,
    pub outcomes: Vec<BulkItemOutcome>,
}

/// Accumulates outcomes while a bulk run progresses.
#[derive(Debug)]
pub struct BulkTally {
    command: LifecycleCommand,
    outcomes: Vec<BulkItemOutcome>,
    first_error: Option<ItemError>,
    cancelled: bool,
}

impl BulkTally {
    pub fn new(command: LifecycleCommand, expected: usize) -> Self {
        Self {
            command,
            outcomes: Vec::with_capacity(expected),
            first_error: None,
            cancelled: false,
        }
    }

    pub fn record_success(&mut self, project_id: DbId) {
        self.outcomes.push(BulkItemOutcome {
            project_id,
            status: ItemStatus::Succeeded,
            error: None,
        });
    }

    pub fn record_failure(&mut self, project_id: DbId, err: &CoreError) {
        let item_error = ItemError::from(err);
        if self.first_error.is_none() {
            self.first_error = Some(item_error.clone());
        }
        self.outcomes.push(BulkItemOutcome {
            project_id,
            status: ItemStatus::Failed,
            error: Some(item_error),
        });
    }

    /// Mark the run abandoned and record every remaining id as skipped.
    pub fn skip_remaining(&mut self, remaining: &[DbId]) {
        self.cancelled = true;
        self.outcomes
            .extend(remaining.iter().map(|&project_id| BulkItemOutcome {
                project_id,
                status: ItemStatus::Skipped,
                error: None,
            }));
    }

    pub fn finish(self) -> BulkSummary {
        let count = |wanted: ItemStatus| {
            self.outcomes
                .iter()
                .filter(|o| o.status == wanted)
                .count()
        };
        let succeeded = count(ItemStatus::Succeeded);
        let failed = count(ItemStatus::Failed);
        let skipped = count(ItemStatus::Skipped);

        BulkSummary {
            command: self.command,
            attempted: succeeded + failed,
            succeeded,
            failed,
            skipped,
            cancelled: self.cancelled,
            first_error: self.first_error,
            outcomes: self.outcomes,
        }
    }
}

//! Bulk operation coordinator.
//!
//! Applies one lifecycle command to a de-duplicated list of projects,
//! strictly one after another. Each item goes through the same
//! [`ClaimService`] path as a single request, so failures on one item never
//! undo earlier successes. Cancelling the token stops the run before the
//! next item; every unattempted item is reported as skipped.

use std::sync::Arc;

use linguist_core::bulk::{normalize_project_ids, BulkSummary, BulkTally};
use linguist_core::error::CoreError;
use linguist_core::lifecycle::{Actor, LifecycleCommand};
use linguist_core::types::DbId;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::ClaimService;

/// Outcome of one bulk run.
#[derive(Debug, Clone, Serialize)]
pub struct BulkReport {
    /// Correlates the run's log lines with the response.
    pub operation_id: Uuid,
    #[serde(flatten)]
    pub summary: BulkSummary,
}

pub struct BulkCoordinator {
    claims: Arc<ClaimService>,
}

impl BulkCoordinator {
    pub fn new(claims: Arc<ClaimService>) -> Self {
        Self { claims }
    }

    /// Run `command` against every id in `project_ids`.
    ///
    /// Only an invalid id list fails the whole run; per-item errors are
    /// recorded in the report.
    pub async fn run(
        &self,
        command: LifecycleCommand,
        project_ids: &[DbId],
        actor: &Actor,
        cancel: &CancellationToken,
    ) -> Result<BulkReport, CoreError> {
        let ids = normalize_project_ids(project_ids, "Bulk operation")?;
        let operation_id = Uuid::now_v7();
        let mut tally = BulkTally::new(command, ids.len());

        tracing::info!(
            %operation_id,
            command = command.event_type(),
            actor_id = actor.user_id,
            items = ids.len(),
            "Bulk operation started",
        );

        for (index, &project_id) in ids.iter().enumerate() {
            if cancel.is_cancelled() {
                tracing::warn!(
                    %operation_id,
                    remaining = ids.len() - index,
                    "Bulk operation cancelled",
                );
                tally.skip_remaining(&ids[index..]);
                break;
            }

            match self.claims.execute(command, project_id, actor).await {
                Ok(_) => tally.record_success(project_id),
                Err(e) => {
                    tracing::debug!(%operation_id, project_id, error = %e, "Bulk item failed");
                    tally.record_failure(project_id, &e);
                }
            }
        }

        let summary = tally.finish();
        tracing::info!(
            %operation_id,
            succeeded = summary.succeeded,
            failed = summary.failed,
            skipped = summary.skipped,
            "Bulk operation finished",
        );
        Ok(BulkReport {
            operation_id,
            summary,
        })
    }
}

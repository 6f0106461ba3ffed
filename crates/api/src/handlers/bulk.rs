//! Handler for bulk lifecycle operations.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use linguist_core::lifecycle::LifecycleCommand;
use linguist_core::types::DbId;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::engine::BulkReport;
use crate::error::{AppError, AppResult};
use crate::middleware::identity::Identity;
use crate::state::AppState;

/// Request body for `POST /projects/bulk`.
#[derive(Debug, Deserialize)]
pub struct BulkRequest {
    pub command: LifecycleCommand,
    pub project_ids: Vec<DbId>,
}

/// POST /api/v1/projects/bulk
///
/// The run executes on its own task. If the client goes away the handler
/// future is dropped, which cancels the token and stops the run before its
/// next item.
pub async fn run(
    State(state): State<AppState>,
    Identity(actor): Identity,
    Json(input): Json<BulkRequest>,
) -> AppResult<Json<BulkReport>> {
    let cancel = CancellationToken::new();
    let _cancel_on_drop = cancel.clone().drop_guard();

    let coordinator = Arc::clone(&state.bulk);
    let task = tokio::spawn(async move {
        coordinator
            .run(input.command, &input.project_ids, &actor, &cancel)
            .await
    });

    let report = task
        .await
        .map_err(|e| AppError::InternalError(format!("Bulk task failed: {e}")))??;
    Ok(Json(report))
}

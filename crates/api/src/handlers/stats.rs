//! Handlers for project progress statistics.

use axum::extract::{Path, State};
use axum::Json;
use linguist_core::bulk::{normalize_project_ids, ItemError};
use linguist_core::types::DbId;
use serde::{Deserialize, Serialize};

use crate::engine::StatsReport;
use crate::error::AppResult;
use crate::middleware::identity::Identity;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /projects/stats`.
#[derive(Debug, Deserialize)]
pub struct BatchStatsRequest {
    pub project_ids: Vec<DbId>,
}

/// One entry of a batch stats response: either `stats` or `error` is set.
#[derive(Debug, Serialize)]
pub struct BatchStatsItem {
    pub project_id: DbId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<StatsReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ItemError>,
}

/// GET /api/v1/projects/{id}/stats
pub async fn get_stats(
    State(state): State<AppState>,
    Identity(_actor): Identity,
    Path(id): Path<DbId>,
) -> AppResult<Json<StatsReport>> {
    let report = state.stats.project_stats(id).await?;
    Ok(Json(report))
}

/// POST /api/v1/projects/stats
pub async fn batch_stats(
    State(state): State<AppState>,
    Identity(_actor): Identity,
    Json(input): Json<BatchStatsRequest>,
) -> AppResult<Json<DataResponse<Vec<BatchStatsItem>>>> {
    let ids = normalize_project_ids(&input.project_ids, "Batch stats")?;

    let items = state
        .stats
        .many(&ids)
        .await
        .into_iter()
        .map(|(project_id, result)| match result {
            Ok(report) => BatchStatsItem {
                project_id,
                stats: Some(report),
                error: None,
            },
            Err(e) => BatchStatsItem {
                project_id,
                stats: None,
                error: Some(ItemError::from(&e)),
            },
        })
        .collect();
    Ok(Json(DataResponse { data: items }))
}

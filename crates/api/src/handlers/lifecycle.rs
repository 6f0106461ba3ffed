//! Handlers for single-project lifecycle commands.
//!
//! Each returns the project as the caller now sees it.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use linguist_core::lifecycle::LifecycleCommand;
use linguist_core::types::DbId;

use crate::error::AppResult;
use crate::handlers::project::ProjectView;
use crate::middleware::identity::Identity;
use crate::state::AppState;

/// POST /api/v1/projects/{id}/claim
pub async fn claim(
    State(state): State<AppState>,
    Identity(actor): Identity,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProjectView>> {
    let project = state.claims.claim(id, &actor).await?;
    Ok(Json(ProjectView::for_viewer(project, actor.user_id)?))
}

/// POST /api/v1/projects/{id}/release
pub async fn release(
    State(state): State<AppState>,
    Identity(actor): Identity,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProjectView>> {
    let project = state.claims.release(id, &actor).await?;
    Ok(Json(ProjectView::for_viewer(project, actor.user_id)?))
}

/// POST /api/v1/projects/{id}/complete
pub async fn complete(
    State(state): State<AppState>,
    Identity(actor): Identity,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProjectView>> {
    let project = state.claims.complete(id, &actor).await?;
    Ok(Json(ProjectView::for_viewer(project, actor.user_id)?))
}

/// POST /api/v1/projects/{id}/reopen
pub async fn reopen(
    State(state): State<AppState>,
    Identity(actor): Identity,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProjectView>> {
    let project = state.claims.reopen(id, &actor).await?;
    Ok(Json(ProjectView::for_viewer(project, actor.user_id)?))
}

/// POST /api/v1/projects/{id}/archive
pub async fn archive(
    State(state): State<AppState>,
    Identity(actor): Identity,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state
        .claims
        .remove(LifecycleCommand::Archive, id, &actor)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

//! Handlers for the `/projects` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use linguist_core::display::{display_status, DisplayStatus};
use linguist_core::error::CoreError;
use linguist_core::lifecycle::LifecycleCommand;
use linguist_core::status::ProjectStatus;
use linguist_core::types::DbId;
use linguist_db::models::file::ProjectFile;
use linguist_db::models::project::{CreateProject, Project};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::identity::Identity;
use crate::response::DataResponse;
use crate::state::AppState;

/// A project as seen by one viewer.
#[derive(Debug, Serialize)]
pub struct ProjectView {
    #[serde(flatten)]
    pub project: Project,
    pub status: ProjectStatus,
    pub display_status: DisplayStatus,
    pub display_label: &'static str,
}

impl ProjectView {
    pub fn for_viewer(project: Project, viewer_id: DbId) -> Result<Self, CoreError> {
        let status = project.status()?;
        let shown = display_status(status, project.claimed_by, viewer_id);
        Ok(Self {
            project,
            status,
            display_status: shown,
            display_label: shown.label(),
        })
    }
}

/// A project with its files, as seen by one viewer.
#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub view: ProjectView,
    pub files: Vec<ProjectFile>,
}

/// Query parameters for `GET /projects`.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Keep only projects that show this status to the caller.
    pub display_status: Option<DisplayStatus>,
}

/// GET /api/v1/projects
pub async fn list(
    State(state): State<AppState>,
    Identity(actor): Identity,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Vec<ProjectView>>>> {
    let projects = state.projects.list().await?;

    let mut views = Vec::with_capacity(projects.len());
    for project in projects {
        let view = ProjectView::for_viewer(project, actor.user_id)?;
        if params.display_status.map_or(true, |wanted| wanted == view.display_status) {
            views.push(view);
        }
    }
    Ok(Json(DataResponse { data: views }))
}

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    Identity(actor): Identity,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<ProjectDetail>)> {
    let created = state.claims.create(&input, &actor).await?;
    let detail = ProjectDetail {
        view: ProjectView::for_viewer(created.project, actor.user_id)?,
        files: created.files,
    };
    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Identity(actor): Identity,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProjectDetail>> {
    let project = state
        .projects
        .find_by_id(id)
        .await?
        .ok_or(AppError::Core(CoreError::project_not_found(id)))?;
    let files = state.projects.files(id).await?;

    Ok(Json(ProjectDetail {
        view: ProjectView::for_viewer(project, actor.user_id)?,
        files,
    }))
}

/// DELETE /api/v1/projects/{id}
pub async fn delete(
    State(state): State<AppState>,
    Identity(actor): Identity,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state
        .claims
        .remove(LifecycleCommand::Delete, id, &actor)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

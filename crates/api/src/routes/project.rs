//! Route definitions for the `/projects` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{bulk, lifecycle, project, stats};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                  -> list (?display_status=)
/// POST   /                  -> create
/// POST   /stats             -> batch_stats
/// POST   /bulk              -> bulk::run
/// GET    /{id}              -> get_by_id
/// DELETE /{id}              -> delete
/// POST   /{id}/claim        -> claim
/// POST   /{id}/release      -> release
/// POST   /{id}/complete     -> complete
/// POST   /{id}/reopen       -> reopen
/// POST   /{id}/archive      -> archive
/// GET    /{id}/stats        -> get_stats
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route("/stats", post(stats::batch_stats))
        .route("/bulk", post(bulk::run))
        .route("/{id}", get(project::get_by_id).delete(project::delete))
        .route("/{id}/claim", post(lifecycle::claim))
        .route("/{id}/release", post(lifecycle::release))
        .route("/{id}/complete", post(lifecycle::complete))
        .route("/{id}/reopen", post(lifecycle::reopen))
        .route("/{id}/archive", post(lifecycle::archive))
        .route("/{id}/stats", get(stats::get_stats))
}

pub mod health;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects                              list, create
/// /projects/stats                        batch stats (POST)
/// /projects/bulk                         bulk lifecycle command (POST)
/// /projects/{id}                         get, delete
/// /projects/{id}/claim                   claim (POST)
/// /projects/{id}/release                 release (POST)
/// /projects/{id}/complete                complete (POST)
/// /projects/{id}/reopen                  reopen (POST)
/// /projects/{id}/archive                 archive (POST)
/// /projects/{id}/stats                   stats (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/projects", project::router())
}

//! Caller identity extractor for Axum handlers.
//!
//! Authentication happens upstream; the gateway forwards the resolved user
//! in the `X-User-Id` and `X-User-Role` headers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use linguist_core::error::CoreError;
use linguist_core::lifecycle::Actor;
use linguist_core::roles::ROLE_TRANSLATOR;
use linguist_core::types::DbId;

use crate::error::AppError;
use crate::state::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// The user on whose behalf the request runs.
///
/// ```ignore
/// async fn my_handler(Identity(actor): Identity) -> AppResult<Json<()>> {
///     tracing::info!(user_id = actor.user_id, role = %actor.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
///
/// A missing role header falls back to the translator role.
#[derive(Debug, Clone)]
pub struct Identity(pub Actor);

impl FromRequestParts<AppState> for Identity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw_id = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Missing X-User-Id header".into()))
            })?
            .to_str()
            .map_err(|_| {
                AppError::Core(CoreError::Unauthorized(
                    "Invalid X-User-Id header: not visible ASCII".into(),
                ))
            })?;

        let user_id: DbId = raw_id.trim().parse().map_err(|_| {
            AppError::Core(CoreError::Unauthorized(format!(
                "Invalid X-User-Id header: {raw_id}"
            )))
        })?;

        let role = parts
            .headers
            .get(USER_ROLE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(ROLE_TRANSLATOR)
            .to_ascii_lowercase();

        Ok(Identity(Actor::new(user_id, role)))
    }
}

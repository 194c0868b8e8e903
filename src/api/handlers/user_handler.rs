//! User handlers.

use axum::{extract::State, response::Json, routing::get, Extension, Router};

use crate::api::extractors::ValidatedPath;
use crate::api::middleware::{require_self_or_admin, CurrentUser};
use crate::api::AppState;
use crate::domain::UserResponse;
use crate::errors::AppResult;

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new().route("/user/:id", get(get_user))
}

/// Get a user by ID (own record, or any record for admins)
#[utoipa::path(
    get,
    path = "/user/{id}",
    tag = "Users",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Another user's record"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedPath(id): ValidatedPath<i32>,
) -> AppResult<Json<UserResponse>> {
    require_self_or_admin(&current_user, id)?;

    let user = state.user_service.get_user(id).await?;
    Ok(Json(UserResponse::from(user)))
}

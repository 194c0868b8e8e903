//! Category handlers.

use axum::{extract::State, response::Json, routing::get, Extension, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::{ValidatedJson, ValidatedPath};
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::config::MSG_CATEGORY_DELETED;
use crate::domain::Category;
use crate::errors::AppResult;
use crate::types::{Created, MessageResponse};

/// Category creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 80, message = "Name must be 1 to 80 characters"))]
    #[schema(example = "Groceries", min_length = 1, max_length = 80)]
    pub name: String,
}

/// Create category routes
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/category", get(list_categories).post(create_category))
        .route("/category/:id", get(get_category).delete(delete_category))
}

/// List all categories with the caller's expenses nested
#[utoipa::path(
    get,
    path = "/category",
    tag = "Categories",
    responses(
        (status = 200, description = "List of categories", body = Vec<Category>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_categories(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Category>>> {
    let categories = state.category_service.list(current_user.id).await?;
    Ok(Json(categories))
}

/// Create a category
#[utoipa::path(
    post,
    path = "/category",
    tag = "Categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, description = "Validation error or duplicate name"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_category(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateCategoryRequest>,
) -> AppResult<Created<Category>> {
    let category = state.category_service.create(payload.name).await?;
    Ok(Created(category))
}

/// Get a category by ID
#[utoipa::path(
    get,
    path = "/category/{id}",
    tag = "Categories",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category found", body = Category),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Category not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_category(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedPath(id): ValidatedPath<i32>,
) -> AppResult<Json<Category>> {
    let category = state.category_service.get(id, current_user.id).await?;
    Ok(Json(category))
}

/// Delete a category no expense references
#[utoipa::path(
    delete,
    path = "/category/{id}",
    tag = "Categories",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category deleted", body = MessageResponse),
        (status = 400, description = "Category still has expenses"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Category not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_category(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<i32>,
) -> AppResult<Json<MessageResponse>> {
    state.category_service.delete(id).await?;
    Ok(Json(MessageResponse::new(MSG_CATEGORY_DELETED)))
}

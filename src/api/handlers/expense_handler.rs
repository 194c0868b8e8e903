//! Expense and summary handlers.
//!
//! Every route acts on the caller's own expenses only.

use axum::{extract::State, response::Json, routing::get, Extension, Router};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::{ValidatedJson, ValidatedPath};
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::config::MSG_EXPENSE_DELETED;
use crate::domain::expense::deserialize_optional_date;
use crate::domain::{Expense, ExpensePatch, ExpenseSummary, NewExpense};
use crate::errors::AppResult;
use crate::types::{Created, MessageResponse};

/// Expense creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateExpenseRequest {
    #[validate(length(min = 1, max = 80, message = "Name must be 1 to 80 characters"))]
    #[schema(example = "Weekly shop")]
    pub name: String,
    #[validate(range(min = 0.01, message = "Amount must be at least 0.01"))]
    #[schema(example = 42.5, minimum = 0.01)]
    pub amount: f64,
    /// `YYYY-MM-DD`; today when omitted
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    #[schema(value_type = Option<String>, format = Date, example = "2024-05-01")]
    pub date: Option<NaiveDate>,
    #[schema(example = 1)]
    pub category_id: i32,
}

impl From<CreateExpenseRequest> for NewExpense {
    fn from(req: CreateExpenseRequest) -> Self {
        Self {
            name: req.name,
            amount: req.amount,
            date: req.date,
            category_id: req.category_id,
        }
    }
}

/// Partial expense update; omitted fields are left unchanged
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateExpenseRequest {
    #[validate(length(min = 1, max = 80, message = "Name must be 1 to 80 characters"))]
    pub name: Option<String>,
    #[validate(range(min = 0.01, message = "Amount must be at least 0.01"))]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    #[schema(value_type = Option<String>, format = Date)]
    pub date: Option<NaiveDate>,
    pub category_id: Option<i32>,
}

impl From<UpdateExpenseRequest> for ExpensePatch {
    fn from(req: UpdateExpenseRequest) -> Self {
        Self {
            name: req.name,
            amount: req.amount,
            date: req.date,
            category_id: req.category_id,
        }
    }
}

/// Create expense routes
pub fn expense_routes() -> Router<AppState> {
    Router::new()
        .route("/expense", get(list_expenses).post(create_expense))
        .route("/expense/summary", get(summary))
        .route("/expense/summary/:period", get(summary_for_period))
        .route(
            "/expense/:id",
            get(get_expense).put(update_expense).delete(delete_expense),
        )
}

/// List the caller's expenses
#[utoipa::path(
    get,
    path = "/expense",
    tag = "Expenses",
    responses(
        (status = 200, description = "List of expenses", body = Vec<Expense>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_expenses(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Expense>>> {
    let expenses = state.expense_service.list(current_user.id).await?;
    Ok(Json(expenses))
}

/// Record an expense
#[utoipa::path(
    post,
    path = "/expense",
    tag = "Expenses",
    request_body = CreateExpenseRequest,
    responses(
        (status = 201, description = "Expense created", body = Expense),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Category not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_expense(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateExpenseRequest>,
) -> AppResult<Created<Expense>> {
    let expense = state
        .expense_service
        .create(payload.into(), current_user.id)
        .await?;
    Ok(Created(expense))
}

/// Get one of the caller's expenses
#[utoipa::path(
    get,
    path = "/expense/{id}",
    tag = "Expenses",
    params(("id" = i32, Path, description = "Expense ID")),
    responses(
        (status = 200, description = "Expense found", body = Expense),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Expense not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_expense(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedPath(id): ValidatedPath<i32>,
) -> AppResult<Json<Expense>> {
    let expense = state.expense_service.get(id, current_user.id).await?;
    Ok(Json(expense))
}

/// Update one of the caller's expenses
#[utoipa::path(
    put,
    path = "/expense/{id}",
    tag = "Expenses",
    params(("id" = i32, Path, description = "Expense ID")),
    request_body = UpdateExpenseRequest,
    responses(
        (status = 200, description = "Expense updated", body = Expense),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Expense or category not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_expense(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedPath(id): ValidatedPath<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateExpenseRequest>,
) -> AppResult<Json<Expense>> {
    let expense = state
        .expense_service
        .update(id, payload.into(), current_user.id)
        .await?;
    Ok(Json(expense))
}

/// Delete one of the caller's expenses
#[utoipa::path(
    delete,
    path = "/expense/{id}",
    tag = "Expenses",
    params(("id" = i32, Path, description = "Expense ID")),
    responses(
        (status = 200, description = "Expense deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Expense not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_expense(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedPath(id): ValidatedPath<i32>,
) -> AppResult<Json<MessageResponse>> {
    state.expense_service.delete(id, current_user.id).await?;
    Ok(Json(MessageResponse::new(MSG_EXPENSE_DELETED)))
}

/// Summary over all of the caller's expenses
#[utoipa::path(
    get,
    path = "/expense/summary",
    tag = "Summaries",
    responses(
        (status = 200, description = "Expense summary", body = ExpenseSummary),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn summary(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<ExpenseSummary>> {
    let summary = state.summary_service.summary(current_user.id).await?;
    Ok(Json(summary))
}

/// Summary over a trailing period
#[utoipa::path(
    get,
    path = "/expense/summary/{period}",
    tag = "Summaries",
    params(("period" = String, Path, description = "One of week, month, three_months")),
    responses(
        (status = 200, description = "Expense summary", body = ExpenseSummary),
        (status = 400, description = "Unknown period"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn summary_for_period(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedPath(period): ValidatedPath<String>,
) -> AppResult<Json<ExpenseSummary>> {
    let summary = state
        .summary_service
        .summary_for_period(current_user.id, &period)
        .await?;
    Ok(Json(summary))
}

//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, category_handler, expense_handler, user_handler};
use crate::domain::{Category, CategoryRef, Expense, ExpenseSummary, PlainExpense, UserResponse};
use crate::services::TokenResponse;
use crate::types::MessageResponse;

/// OpenAPI documentation for the Expense Tracker API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Expense Tracker API",
        version = "0.1.0",
        description = "Personal expense tracking with categories and summaries"
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        auth_handler::logout,
        // User endpoints
        user_handler::get_user,
        // Category endpoints
        category_handler::list_categories,
        category_handler::create_category,
        category_handler::get_category,
        category_handler::delete_category,
        // Expense endpoints
        expense_handler::list_expenses,
        expense_handler::create_expense,
        expense_handler::get_expense,
        expense_handler::update_expense,
        expense_handler::delete_expense,
        expense_handler::summary,
        expense_handler::summary_for_period,
    ),
    components(
        schemas(
            UserResponse,
            Category,
            CategoryRef,
            Expense,
            PlainExpense,
            ExpenseSummary,
            MessageResponse,
            TokenResponse,
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            category_handler::CreateCategoryRequest,
            expense_handler::CreateExpenseRequest,
            expense_handler::UpdateExpenseRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and logout"),
        (name = "Users", description = "User lookup"),
        (name = "Categories", description = "Expense categories"),
        (name = "Expenses", description = "Expense records of the caller"),
        (name = "Summaries", description = "Aggregate statistics over the caller's expenses")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /login"))
                        .build(),
                ),
            );
        }
    }
}

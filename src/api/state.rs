//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Database, InMemoryRevocationStore};
use crate::services::{
    AuthService, CategoryService, ExpenseService, ServiceContainer, Services, SummaryService,
    UserService,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// User service
    pub user_service: Arc<dyn UserService>,
    /// Category service
    pub category_service: Arc<dyn CategoryService>,
    /// Expense service
    pub expense_service: Arc<dyn ExpenseService>,
    /// Summary service
    pub summary_service: Arc<dyn SummaryService>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state from database connection and config.
    ///
    /// Revoked tokens are kept in a process-local set that lives as long as
    /// this state.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let container = Services::from_connection(
            database.get_connection(),
            config,
            Arc::new(InMemoryRevocationStore::new()),
        );

        Self::from_container(&container, database)
    }

    /// Create application state from any service container.
    pub fn from_container(container: &dyn ServiceContainer, database: Arc<Database>) -> Self {
        Self {
            auth_service: container.auth(),
            user_service: container.users(),
            category_service: container.categories(),
            expense_service: container.expenses(),
            summary_service: container.summaries(),
            database,
        }
    }
}

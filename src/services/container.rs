//! Service Container - Centralized service access.
//!
//! Handlers depend on the service traits only; the container wires the
//! concrete implementations over one shared Unit of Work.

use std::sync::Arc;

use super::{AuthService, CategoryService, ExpenseService, SummaryService, UserService};
use crate::config::Config;
use crate::infra::{Persistence, TokenRevocationStore};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get user service
    fn users(&self) -> Arc<dyn UserService>;

    /// Get category service
    fn categories(&self) -> Arc<dyn CategoryService>;

    /// Get expense service
    fn expenses(&self) -> Arc<dyn ExpenseService>;

    /// Get summary service
    fn summaries(&self) -> Arc<dyn SummaryService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    category_service: Arc<dyn CategoryService>,
    expense_service: Arc<dyn ExpenseService>,
    summary_service: Arc<dyn SummaryService>,
}

impl Services {
    /// Create service container from database connection and config
    pub fn from_connection(
        db: sea_orm::DatabaseConnection,
        config: Config,
        revocations: Arc<dyn TokenRevocationStore>,
    ) -> Self {
        use super::{Authenticator, CategoryManager, ExpenseManager, SummaryManager, UserManager};

        let uow = Arc::new(Persistence::new(db));

        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), revocations, config)),
            user_service: Arc::new(UserManager::new(uow.clone())),
            category_service: Arc::new(CategoryManager::new(uow.clone())),
            expense_service: Arc::new(ExpenseManager::new(uow.clone())),
            summary_service: Arc::new(SummaryManager::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn categories(&self) -> Arc<dyn CategoryService> {
        self.category_service.clone()
    }

    fn expenses(&self) -> Arc<dyn ExpenseService> {
        self.expense_service.clone()
    }

    fn summaries(&self) -> Arc<dyn SummaryService> {
        self.summary_service.clone()
    }
}

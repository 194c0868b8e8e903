//! Unit of Work double for service tests.

use async_trait::async_trait;
use std::sync::Arc;

use crate::errors::{AppError, AppResult};
use crate::infra::{
    CategoryRepository, ExpenseRepository, MockCategoryRepository, MockExpenseRepository,
    MockUserRepository, TransactionContext, TxFuture, UnitOfWork, UserRepository,
};

/// Hands out mock repositories. Transactions need a real connection and
/// fail here, so transactional paths are covered by the integration tests.
pub(crate) struct TestUnitOfWork {
    user_repo: Arc<MockUserRepository>,
    category_repo: Arc<MockCategoryRepository>,
    expense_repo: Arc<MockExpenseRepository>,
}

impl TestUnitOfWork {
    pub(crate) fn builder() -> TestUnitOfWorkBuilder {
        TestUnitOfWorkBuilder::default()
    }
}

#[derive(Default)]
pub(crate) struct TestUnitOfWorkBuilder {
    users: Option<MockUserRepository>,
    categories: Option<MockCategoryRepository>,
    expenses: Option<MockExpenseRepository>,
}

impl TestUnitOfWorkBuilder {
    pub(crate) fn users(mut self, repo: MockUserRepository) -> Self {
        self.users = Some(repo);
        self
    }

    pub(crate) fn categories(mut self, repo: MockCategoryRepository) -> Self {
        self.categories = Some(repo);
        self
    }

    pub(crate) fn expenses(mut self, repo: MockExpenseRepository) -> Self {
        self.expenses = Some(repo);
        self
    }

    pub(crate) fn build(self) -> TestUnitOfWork {
        TestUnitOfWork {
            user_repo: Arc::new(self.users.unwrap_or_default()),
            category_repo: Arc::new(self.categories.unwrap_or_default()),
            expense_repo: Arc::new(self.expenses.unwrap_or_default()),
        }
    }
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn categories(&self) -> Arc<dyn CategoryRepository> {
        self.category_repo.clone()
    }

    fn expenses(&self) -> Arc<dyn ExpenseRepository> {
        self.expense_repo.clone()
    }

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        Err(AppError::internal("Transactions not supported in test mock"))
    }
}

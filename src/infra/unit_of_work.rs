//! Unit of Work pattern implementation.
//!
//! Hands out the read repositories and runs closures inside a database
//! transaction. Every mutating use case goes through `transaction` so that
//! its read-validate-write sequence commits or rolls back as a whole.

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use std::sync::Arc;

use super::repositories::entities::{category, expense, user};
use super::repositories::queries;
use super::repositories::{
    CategoryRepository, CategoryStore, ExpenseRepository, ExpenseStore, UserRepository, UserStore,
};
use crate::domain::{Expense, ExpensePatch, NewExpense, User};
use crate::errors::{AppError, AppResult, DbResultExt};

/// Boxed future returned by transaction closures
pub type TxFuture<'a, T> =
    std::pin::Pin<Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>>;

/// Unit of Work trait for dependency injection.
///
/// Not object safe because of the generic `transaction` method; services are
/// generic over it instead.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get category repository
    fn categories(&self) -> Arc<dyn CategoryRepository>;

    /// Get expense repository
    fn expenses(&self) -> Arc<dyn ExpenseRepository>;

    /// Execute a closure within a transaction.
    ///
    /// The transaction is committed when the closure returns `Ok` and rolled
    /// back otherwise.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;
}

/// Transaction context providing repository access within a transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub fn users(&self) -> TxUserRepository<'a> {
        TxUserRepository { txn: self.txn }
    }

    pub fn categories(&self) -> TxCategoryRepository<'a> {
        TxCategoryRepository { txn: self.txn }
    }

    pub fn expenses(&self) -> TxExpenseRepository<'a> {
        TxExpenseRepository { txn: self.txn }
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
    category_repo: Arc<CategoryStore>,
    expense_repo: Arc<ExpenseStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            category_repo: Arc::new(CategoryStore::new(db.clone())),
            expense_repo: Arc::new(ExpenseStore::new(db.clone())),
            db,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn categories(&self) -> Arc<dyn CategoryRepository> {
        self.category_repo.clone()
    }

    fn expenses(&self) -> Arc<dyn ExpenseRepository> {
        self.expense_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let txn = self.db.begin().await.map_err(AppError::from)?;

        match f(TransactionContext::new(&txn)).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Transaction-aware user repository.
pub struct TxUserRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxUserRepository<'a> {
    pub async fn count(&self) -> AppResult<u64> {
        Ok(queries::users::count(self.txn).await?)
    }

    /// Insert a user; a taken username surfaces as `Conflict`.
    pub async fn create(
        &self,
        username: String,
        password_hash: String,
        is_admin: bool,
    ) -> AppResult<User> {
        let model: user::Model = queries::users::insert(self.txn, username, password_hash, is_admin)
            .await
            .on_unique_violation("A user with that username already exists.")?;

        Ok(User::from(model))
    }
}

/// Transaction-aware category repository.
pub struct TxCategoryRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxCategoryRepository<'a> {
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<category::Model>> {
        Ok(queries::categories::find_by_id(self.txn, id).await?)
    }

    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        Ok(self.find_by_id(id).await?.is_some())
    }

    pub async fn count_expenses(&self, id: i32) -> AppResult<u64> {
        Ok(queries::categories::count_expenses(self.txn, id).await?)
    }

    /// Insert a category; a taken name surfaces as `Conflict`.
    pub async fn create(&self, name: String) -> AppResult<category::Model> {
        queries::categories::insert(self.txn, name)
            .await
            .on_unique_violation("A category with that name already exists.")
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        if queries::categories::delete(self.txn, id).await? == 0 {
            return Err(AppError::not_found("Category"));
        }
        Ok(())
    }
}

/// Transaction-aware expense repository. All lookups are owner-scoped.
pub struct TxExpenseRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxExpenseRepository<'a> {
    /// Load an owned expense with its category.
    pub async fn find_owned(&self, id: i32, owner_id: i32) -> AppResult<Option<Expense>> {
        queries::expenses::find_owned(self.txn, id, owner_id).await
    }

    pub async fn find_owned_model(
        &self,
        id: i32,
        owner_id: i32,
    ) -> AppResult<Option<expense::Model>> {
        Ok(queries::expenses::find_owned_model(self.txn, id, owner_id).await?)
    }

    pub async fn create(&self, new: NewExpense, owner_id: i32) -> AppResult<expense::Model> {
        Ok(queries::expenses::insert(self.txn, new, owner_id).await?)
    }

    pub async fn update(
        &self,
        model: expense::Model,
        patch: ExpensePatch,
    ) -> AppResult<expense::Model> {
        Ok(queries::expenses::apply_patch(self.txn, model, patch).await?)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        if queries::expenses::delete(self.txn, id).await? == 0 {
            return Err(AppError::not_found("Expense"));
        }
        Ok(())
    }
}

/// Run a block inside `UnitOfWork::transaction`.
///
/// ```rust,ignore
/// let category = with_transaction!(self.uow, |ctx| {
///     ctx.categories().create(name).await
/// })?;
/// ```
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| Box::pin(async move { $body })).await
    };
}

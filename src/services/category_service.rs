//! Category service - Global categories and the guarded delete.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::Category;
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::with_transaction;

/// Category service trait for dependency injection.
///
/// Categories are shared by all users. The expenses nested in a returned
/// category are those of `owner_id` only.
#[async_trait]
pub trait CategoryService: Send + Sync {
    /// List all categories
    async fn list(&self, owner_id: i32) -> AppResult<Vec<Category>>;

    /// Get a category by ID
    async fn get(&self, id: i32, owner_id: i32) -> AppResult<Category>;

    /// Create a category; names are unique
    async fn create(&self, name: String) -> AppResult<Category>;

    /// Delete a category that no expense references
    async fn delete(&self, id: i32) -> AppResult<()>;
}

/// Concrete implementation of CategoryService using Unit of Work.
pub struct CategoryManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CategoryManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> CategoryService for CategoryManager<U> {
    async fn list(&self, owner_id: i32) -> AppResult<Vec<Category>> {
        self.uow.categories().list_with_expenses(owner_id).await
    }

    async fn get(&self, id: i32, owner_id: i32) -> AppResult<Category> {
        self.uow
            .categories()
            .find_with_expenses(id, owner_id)
            .await?
            .ok_or_not_found("Category")
    }

    async fn create(&self, name: String) -> AppResult<Category> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::validation("Category name must not be empty"));
        }

        let model = with_transaction!(self.uow, |ctx| { ctx.categories().create(name).await })?;

        tracing::info!(category_id = model.id, name = %model.name, "Category created");
        Ok(Category {
            id: model.id,
            name: model.name,
            expenses: Vec::new(),
        })
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        with_transaction!(self.uow, |ctx| {
            let categories = ctx.categories();
            if !categories.exists(id).await? {
                return Err(AppError::not_found("Category"));
            }
            if categories.count_expenses(id).await? > 0 {
                return Err(AppError::invalid_state("Cannot delete category with expenses."));
            }
            categories.delete(id).await
        })?;

        tracing::info!(category_id = id, "Category deleted");
        Ok(())
    }
}

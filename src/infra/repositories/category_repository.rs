//! Category repository implementation.
//!
//! Categories are global; the expenses nested under them are always
//! restricted to one owner.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    LoaderTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use super::entities::category::{self, ActiveModel, Entity as CategoryEntity};
use super::entities::expense::{self, Entity as ExpenseEntity};
use crate::domain::{Category, PlainExpense};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Category repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// List every category, each with the expenses `owner_id` recorded in it
    async fn list_with_expenses(&self, owner_id: i32) -> AppResult<Vec<Category>>;

    /// Find one category with the expenses `owner_id` recorded in it
    async fn find_with_expenses(&self, id: i32, owner_id: i32) -> AppResult<Option<Category>>;
}

/// Concrete implementation of CategoryRepository
pub struct CategoryStore {
    db: DatabaseConnection,
}

impl CategoryStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepository for CategoryStore {
    async fn list_with_expenses(&self, owner_id: i32) -> AppResult<Vec<Category>> {
        let categories = CategoryEntity::find()
            .order_by_asc(category::Column::Id)
            .all(&self.db)
            .await?;

        Ok(attach_expenses(&self.db, categories, owner_id).await?)
    }

    async fn find_with_expenses(&self, id: i32, owner_id: i32) -> AppResult<Option<Category>> {
        let Some(model) = find_by_id(&self.db, id).await? else {
            return Ok(None);
        };

        let mut found = attach_expenses(&self.db, vec![model], owner_id).await?;
        Ok(found.pop())
    }
}

async fn attach_expenses<C: ConnectionTrait>(
    db: &C,
    categories: Vec<category::Model>,
    owner_id: i32,
) -> Result<Vec<Category>, DbErr> {
    let owned = ExpenseEntity::find()
        .filter(expense::Column::UserId.eq(owner_id))
        .order_by_asc(expense::Column::Date)
        .order_by_asc(expense::Column::Id);
    let expenses = categories.load_many(owned, db).await?;

    Ok(categories
        .into_iter()
        .zip(expenses)
        .map(|(model, expenses)| Category {
            id: model.id,
            name: model.name,
            expenses: expenses.into_iter().map(PlainExpense::from).collect(),
        })
        .collect())
}

pub(crate) async fn find_by_id<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<category::Model>, DbErr> {
    CategoryEntity::find_by_id(id).one(db).await
}

/// Number of expenses of any owner that reference the category.
pub(crate) async fn count_expenses<C: ConnectionTrait>(db: &C, id: i32) -> Result<u64, DbErr> {
    ExpenseEntity::find()
        .filter(expense::Column::CategoryId.eq(id))
        .count(db)
        .await
}

pub(crate) async fn insert<C: ConnectionTrait>(
    db: &C,
    name: String,
) -> Result<category::Model, DbErr> {
    ActiveModel {
        name: Set(name),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub(crate) async fn delete<C: ConnectionTrait>(db: &C, id: i32) -> Result<u64, DbErr> {
    let result = CategoryEntity::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected)
}

//! Expense repository implementation.
//!
//! Every lookup is filtered by owner: an expense of another user is
//! indistinguishable from a missing one.

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Select, Set,
};

use super::entities::category::{self, Entity as CategoryEntity};
use super::entities::expense::{self, ActiveModel, Entity as ExpenseEntity};
use crate::domain::{Expense, ExpensePatch, NewExpense, SummaryEntry};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Expense repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ExpenseRepository: Send + Sync {
    /// Find an expense by ID if it belongs to `owner_id`
    async fn find_owned(&self, id: i32, owner_id: i32) -> AppResult<Option<Expense>>;

    /// List all expenses of `owner_id`, oldest first
    async fn list_owned(&self, owner_id: i32) -> AppResult<Vec<Expense>>;

    /// Category name and amount of each expense of `owner_id` dated on or
    /// after `since` (all of them when `since` is `None`)
    async fn summary_entries(
        &self,
        owner_id: i32,
        since: Option<NaiveDate>,
    ) -> AppResult<Vec<SummaryEntry>>;
}

/// Concrete implementation of ExpenseRepository
pub struct ExpenseStore {
    db: DatabaseConnection,
}

impl ExpenseStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ExpenseRepository for ExpenseStore {
    async fn find_owned(&self, id: i32, owner_id: i32) -> AppResult<Option<Expense>> {
        find_owned(&self.db, id, owner_id).await
    }

    async fn list_owned(&self, owner_id: i32) -> AppResult<Vec<Expense>> {
        let rows = owned_by(owner_id)
            .order_by_asc(expense::Column::Date)
            .order_by_asc(expense::Column::Id)
            .find_also_related(CategoryEntity)
            .all(&self.db)
            .await?;

        rows.into_iter()
            .map(|(model, category)| to_domain(model, category))
            .collect()
    }

    async fn summary_entries(
        &self,
        owner_id: i32,
        since: Option<NaiveDate>,
    ) -> AppResult<Vec<SummaryEntry>> {
        let mut query = owned_by(owner_id);
        if let Some(start) = since {
            query = query.filter(expense::Column::Date.gte(start));
        }

        let rows = query.find_also_related(CategoryEntity).all(&self.db).await?;

        rows.into_iter()
            .map(|(model, category)| -> AppResult<SummaryEntry> {
                let category = category.ok_or_else(|| dangling_category(&model))?;
                Ok(SummaryEntry {
                    category: category.name,
                    amount: model.amount,
                })
            })
            .collect()
    }
}

fn owned_by(owner_id: i32) -> Select<ExpenseEntity> {
    ExpenseEntity::find().filter(expense::Column::UserId.eq(owner_id))
}

fn dangling_category(model: &expense::Model) -> AppError {
    AppError::internal(format!(
        "Expense {} references missing category {}",
        model.id, model.category_id
    ))
}

fn to_domain(model: expense::Model, category: Option<category::Model>) -> AppResult<Expense> {
    let category = category.ok_or_else(|| dangling_category(&model))?;

    Ok(Expense {
        id: model.id,
        name: model.name,
        amount: model.amount,
        date: model.date,
        user_id: model.user_id,
        category: category.into(),
    })
}

pub(crate) async fn find_owned<C: ConnectionTrait>(
    db: &C,
    id: i32,
    owner_id: i32,
) -> AppResult<Option<Expense>> {
    let row = owned_by(owner_id)
        .filter(expense::Column::Id.eq(id))
        .find_also_related(CategoryEntity)
        .one(db)
        .await?;

    row.map(|(model, category)| to_domain(model, category))
        .transpose()
}

pub(crate) async fn find_owned_model<C: ConnectionTrait>(
    db: &C,
    id: i32,
    owner_id: i32,
) -> Result<Option<expense::Model>, DbErr> {
    owned_by(owner_id)
        .filter(expense::Column::Id.eq(id))
        .one(db)
        .await
}

pub(crate) async fn insert<C: ConnectionTrait>(
    db: &C,
    new: NewExpense,
    owner_id: i32,
) -> Result<expense::Model, DbErr> {
    let date = new.effective_date();

    ActiveModel {
        name: Set(new.name),
        amount: Set(new.amount),
        date: Set(date),
        category_id: Set(new.category_id),
        user_id: Set(owner_id),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Write the fields present in `patch`; absent fields keep their value.
pub(crate) async fn apply_patch<C: ConnectionTrait>(
    db: &C,
    model: expense::Model,
    patch: ExpensePatch,
) -> Result<expense::Model, DbErr> {
    if patch.is_empty() {
        return Ok(model);
    }

    let mut active: ActiveModel = model.into();

    if let Some(name) = patch.name {
        active.name = Set(name);
    }
    if let Some(amount) = patch.amount {
        active.amount = Set(amount);
    }
    if let Some(date) = patch.date {
        active.date = Set(date);
    }
    if let Some(category_id) = patch.category_id {
        active.category_id = Set(category_id);
    }

    active.update(db).await
}

pub(crate) async fn delete<C: ConnectionTrait>(db: &C, id: i32) -> Result<u64, DbErr> {
    let result = ExpenseEntity::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected)
}

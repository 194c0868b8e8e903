//! Expense service - Owner-scoped expense use cases.
//!
//! Expenses of other users behave exactly like missing ones.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{validate_amount, Expense, ExpensePatch, NewExpense};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::with_transaction;

/// Expense service trait for dependency injection.
#[async_trait]
pub trait ExpenseService: Send + Sync {
    /// List the expenses of `owner_id`
    async fn list(&self, owner_id: i32) -> AppResult<Vec<Expense>>;

    /// Get one expense of `owner_id`
    async fn get(&self, id: i32, owner_id: i32) -> AppResult<Expense>;

    /// Record an expense for `owner_id`
    async fn create(&self, new: NewExpense, owner_id: i32) -> AppResult<Expense>;

    /// Apply a partial update to an expense of `owner_id`
    async fn update(&self, id: i32, patch: ExpensePatch, owner_id: i32) -> AppResult<Expense>;

    /// Delete an expense of `owner_id`
    async fn delete(&self, id: i32, owner_id: i32) -> AppResult<()>;
}

fn validate_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::validation("Expense name must not be empty"));
    }
    Ok(())
}

/// Concrete implementation of ExpenseService using Unit of Work.
pub struct ExpenseManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ExpenseManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> ExpenseService for ExpenseManager<U> {
    async fn list(&self, owner_id: i32) -> AppResult<Vec<Expense>> {
        self.uow.expenses().list_owned(owner_id).await
    }

    async fn get(&self, id: i32, owner_id: i32) -> AppResult<Expense> {
        self.uow
            .expenses()
            .find_owned(id, owner_id)
            .await?
            .ok_or_not_found("Expense")
    }

    async fn create(&self, new: NewExpense, owner_id: i32) -> AppResult<Expense> {
        validate_name(&new.name)?;
        validate_amount(new.amount)?;

        let expense = with_transaction!(self.uow, |ctx| {
            if !ctx.categories().exists(new.category_id).await? {
                return Err(AppError::not_found("Category"));
            }

            let expenses = ctx.expenses();
            let model = expenses.create(new, owner_id).await?;
            expenses
                .find_owned(model.id, owner_id)
                .await?
                .ok_or_not_found("Expense")
        })?;

        tracing::info!(expense_id = expense.id, user_id = owner_id, "Expense created");
        Ok(expense)
    }

    async fn update(&self, id: i32, patch: ExpensePatch, owner_id: i32) -> AppResult<Expense> {
        if let Some(name) = &patch.name {
            validate_name(name)?;
        }
        if let Some(amount) = patch.amount {
            validate_amount(amount)?;
        }

        let expense = with_transaction!(self.uow, |ctx| {
            let expenses = ctx.expenses();
            let model = expenses
                .find_owned_model(id, owner_id)
                .await?
                .ok_or_not_found("Expense")?;

            if let Some(category_id) = patch.category_id {
                if !ctx.categories().exists(category_id).await? {
                    return Err(AppError::not_found("Category"));
                }
            }

            expenses.update(model, patch).await?;
            expenses
                .find_owned(id, owner_id)
                .await?
                .ok_or_not_found("Expense")
        })?;

        tracing::info!(expense_id = id, user_id = owner_id, "Expense updated");
        Ok(expense)
    }

    async fn delete(&self, id: i32, owner_id: i32) -> AppResult<()> {
        with_transaction!(self.uow, |ctx| {
            let expenses = ctx.expenses();
            expenses
                .find_owned_model(id, owner_id)
                .await?
                .ok_or_not_found("Expense")?;
            expenses.delete(id).await
        })?;

        tracing::info!(expense_id = id, user_id = owner_id, "Expense deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CategoryRef;
    use crate::infra::MockExpenseRepository;
    use crate::services::test_support::TestUnitOfWork;
    use chrono::NaiveDate;
    use mockall::predicate::eq;

    fn service(repo: MockExpenseRepository) -> ExpenseManager<TestUnitOfWork> {
        ExpenseManager::new(Arc::new(TestUnitOfWork::builder().expenses(repo).build()))
    }

    fn expense(id: i32, owner_id: i32) -> Expense {
        Expense {
            id,
            name: "Lunch".to_string(),
            amount: 12.5,
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            user_id: owner_id,
            category: CategoryRef {
                id: 1,
                name: "Food".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_get_owned_expense() {
        let mut repo = MockExpenseRepository::new();
        repo.expect_find_owned()
            .with(eq(5), eq(2))
            .returning(|id, owner| Ok(Some(expense(id, owner))));

        let found = service(repo).get(5, 2).await.unwrap();
        assert_eq!(found.user_id, 2);
        assert_eq!(found.category.name, "Food");
    }

    #[tokio::test]
    async fn test_get_foreign_expense_is_not_found() {
        let mut repo = MockExpenseRepository::new();
        repo.expect_find_owned().returning(|_, _| Ok(None));

        let result = service(repo).get(5, 3).await;
        assert!(matches!(result, Err(AppError::NotFound(entity)) if entity == "Expense"));
    }

    #[tokio::test]
    async fn test_list_is_scoped_to_owner() {
        let mut repo = MockExpenseRepository::new();
        repo.expect_list_owned()
            .with(eq(2))
            .times(1)
            .returning(|owner| Ok(vec![expense(1, owner), expense(2, owner)]));

        let listed = service(repo).list(2).await.unwrap();
        assert!(listed.iter().all(|e| e.user_id == 2));
    }

    #[tokio::test]
    async fn test_create_rejects_bad_amount_before_storage() {
        for amount in [0.0, -3.0, 0.001, f64::NAN] {
            let new = NewExpense {
                name: "Coffee".to_string(),
                amount,
                date: None,
                category_id: 1,
            };
            let result = service(MockExpenseRepository::new()).create(new, 1).await;
            assert!(matches!(result, Err(AppError::Validation(_))), "amount {}", amount);
        }
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let new = NewExpense {
            name: " ".to_string(),
            amount: 4.0,
            date: None,
            category_id: 1,
        };
        let result = service(MockExpenseRepository::new()).create(new, 1).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_rejects_bad_amount() {
        let patch = ExpensePatch {
            amount: Some(0.0),
            ..Default::default()
        };
        let result = service(MockExpenseRepository::new()).update(1, patch, 1).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}

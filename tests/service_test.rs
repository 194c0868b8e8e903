//! Service and Unit of Work tests over an in-memory SQLite database.

use std::sync::Arc;

use chrono::NaiveDate;

use expense_tracker::config::Config;
use expense_tracker::domain::{ExpensePatch, NewExpense};
use expense_tracker::errors::AppError;
use expense_tracker::infra::{Database, InMemoryRevocationStore, Persistence, UnitOfWork};
use expense_tracker::services::{ServiceContainer, Services};
use expense_tracker::with_transaction;

const SECRET: &str = "test-secret-key-for-testing-only-32chars";

async fn database() -> Database {
    let mut config = Config::new("sqlite::memory:", SECRET);
    config.database_max_connections = 1;
    Database::connect(&config).await.unwrap()
}

async fn services() -> Services {
    let db = database().await;
    Services::from_connection(
        db.get_connection(),
        Config::new("sqlite::memory:", SECRET),
        Arc::new(InMemoryRevocationStore::new()),
    )
}

fn new_expense(category_id: i32, amount: f64, date: Option<NaiveDate>) -> NewExpense {
    NewExpense {
        name: "item".to_string(),
        amount,
        date,
        category_id,
    }
}

#[tokio::test]
async fn test_transaction_rolls_back_on_error() {
    let db = database().await;
    let uow = Persistence::new(db.get_connection());

    let result: Result<(), AppError> = with_transaction!(uow, |ctx| {
        ctx.categories().create("Food".to_string()).await?;
        Err::<(), _>(AppError::invalid_state("abort"))
    });
    assert!(matches!(result, Err(AppError::InvalidState(_))));

    let categories = uow.categories().list_with_expenses(1).await.unwrap();
    assert!(categories.is_empty());
}

#[tokio::test]
async fn test_transaction_commits_on_success() {
    let db = database().await;
    let uow = Persistence::new(db.get_connection());

    let model = with_transaction!(uow, |ctx| {
        ctx.categories().create("Food".to_string()).await
    })
    .unwrap();

    let found = uow
        .categories()
        .find_with_expenses(model.id, 1)
        .await
        .unwrap();
    assert_eq!(found.map(|c| c.name), Some("Food".to_string()));
}

#[tokio::test]
async fn test_register_bootstraps_single_admin() {
    let services = services().await;
    let auth = services.auth();

    let first = auth.register("alice".into(), "password123".into()).await.unwrap();
    let second = auth.register("bob".into(), "password123".into()).await.unwrap();
    assert!(first.is_admin);
    assert!(!second.is_admin);

    let duplicate = auth.register("alice".into(), "password123".into()).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let stored = services.users().get_user(second.id).await.unwrap();
    assert_eq!(stored.username, "bob");
    assert_ne!(stored.password_hash, "password123");
}

#[tokio::test]
async fn test_category_delete_rules() {
    let services = services().await;
    let user = services
        .auth()
        .register("alice".into(), "password123".into())
        .await
        .unwrap();
    let categories = services.categories();

    let food = categories.create("Food".into()).await.unwrap();
    services
        .expenses()
        .create(new_expense(food.id, 4.0, None), user.id)
        .await
        .unwrap();

    let blocked = categories.delete(food.id).await;
    assert!(matches!(blocked, Err(AppError::InvalidState(_))));

    let missing = categories.delete(999).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    let rent = categories.create("Rent".into()).await.unwrap();
    categories.delete(rent.id).await.unwrap();
    assert!(matches!(
        categories.get(rent.id, user.id).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_expense_lifecycle() {
    let services = services().await;
    let alice = services
        .auth()
        .register("alice".into(), "password123".into())
        .await
        .unwrap();
    let bob = services
        .auth()
        .register("bob".into(), "password123".into())
        .await
        .unwrap();
    let food = services.categories().create("Food".into()).await.unwrap();
    let expenses = services.expenses();
    let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();

    let created = expenses
        .create(new_expense(food.id, 12.0, Some(date)), alice.id)
        .await
        .unwrap();
    assert_eq!(created.user_id, alice.id);
    assert_eq!(created.date, date);
    assert_eq!(created.category.name, "Food");

    let missing_category = expenses
        .create(new_expense(999, 12.0, None), alice.id)
        .await;
    assert!(matches!(missing_category, Err(AppError::NotFound(_))));

    let patch = ExpensePatch {
        name: Some("Dinner".into()),
        ..Default::default()
    };
    let updated = expenses.update(created.id, patch, alice.id).await.unwrap();
    assert_eq!(updated.name, "Dinner");
    assert_eq!(updated.amount, 12.0);

    let foreign = expenses
        .update(created.id, ExpensePatch::default(), bob.id)
        .await;
    assert!(matches!(foreign, Err(AppError::NotFound(_))));
    assert!(matches!(
        expenses.delete(created.id, bob.id).await,
        Err(AppError::NotFound(_))
    ));

    expenses.delete(created.id, alice.id).await.unwrap();
    assert!(expenses.list(alice.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_period_summary_boundary_is_inclusive() {
    let services = services().await;
    let user = services
        .auth()
        .register("alice".into(), "password123".into())
        .await
        .unwrap();
    let food = services.categories().create("Food".into()).await.unwrap();
    let today = expense_tracker::domain::today();

    for (days, amount) in [(7, 1.0), (8, 2.0)] {
        services
            .expenses()
            .create(
                new_expense(food.id, amount, Some(today - chrono::Duration::days(days))),
                user.id,
            )
            .await
            .unwrap();
    }

    let week = services
        .summaries()
        .summary_for_period(user.id, "week")
        .await
        .unwrap();
    assert_eq!(week.count, 1);
    assert_eq!(week.total_amount, 1.0);
}

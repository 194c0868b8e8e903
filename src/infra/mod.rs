//! Infrastructure layer - External systems integration
//!
//! - Database connection and migrations
//! - Repositories over SeaORM entities
//! - Unit of Work for transaction management
//! - Token revocation store

pub mod db;
pub mod repositories;
pub mod revocation;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{
    CategoryRepository, CategoryStore, ExpenseRepository, ExpenseStore, UserRepository, UserStore,
};
pub use revocation::{InMemoryRevocationStore, TokenRevocationStore};
pub use unit_of_work::{
    Persistence, TransactionContext, TxCategoryRepository, TxExpenseRepository, TxFuture,
    TxUserRepository, UnitOfWork,
};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockCategoryRepository, MockExpenseRepository, MockUserRepository};
#[cfg(any(test, feature = "test-utils"))]
pub use revocation::MockTokenRevocationStore;

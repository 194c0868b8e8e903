//! Repository layer - Data access abstraction
//!
//! Each repository exposes a read trait (mockable) backed by a store on the
//! shared connection, plus connection-generic query functions that the
//! transactional repositories in `unit_of_work` reuse.

pub(crate) mod category_repository;
pub(crate) mod entities;
pub(crate) mod expense_repository;
pub(crate) mod user_repository;

pub use category_repository::{CategoryRepository, CategoryStore};
pub use expense_repository::{ExpenseRepository, ExpenseStore};
pub use user_repository::{UserRepository, UserStore};

pub(crate) mod queries {
    pub(crate) use super::category_repository as categories;
    pub(crate) use super::expense_repository as expenses;
    pub(crate) use super::user_repository as users;
}

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use category_repository::MockCategoryRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use expense_repository::MockExpenseRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;

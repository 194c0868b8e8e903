//! Domain layer - Core business entities and logic
//!
//! Entities and value objects for users, categories, expenses and
//! summaries, independent of the storage and HTTP layers.

pub mod category;
pub mod expense;
pub mod password;
pub mod summary;
pub mod user;

pub use category::Category;
pub use expense::{
    today, validate_amount, CategoryRef, Expense, ExpensePatch, NewExpense, PlainExpense,
};
pub use password::Password;
pub use summary::{ExpenseSummary, SummaryEntry, SummaryPeriod};
pub use user::{User, UserResponse};

//! Category domain entity.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::expense::PlainExpense;

/// Category with its nested expenses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Groceries")]
    pub name: String,
    pub expenses: Vec<PlainExpense>,
}

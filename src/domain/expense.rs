//! Expense domain entity, write models and amount/date rules.
//!
//! Dates are calendar dates (`YYYY-MM-DD`). Input additionally accepts an
//! RFC 3339 datetime, of which the UTC date is kept.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use utoipa::ToSchema;

use crate::config::MIN_EXPENSE_AMOUNT;
use crate::errors::{AppError, AppResult};

/// Category reference nested in an expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryRef {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Groceries")]
    pub name: String,
}

/// Expense domain entity, owned by exactly one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Expense {
    #[schema(example = 7)]
    pub id: i32,
    #[schema(example = "Weekly shop")]
    pub name: String,
    #[serde(serialize_with = "serialize_cents")]
    #[schema(example = 42.5)]
    pub amount: f64,
    #[schema(value_type = String, format = Date, example = "2024-05-01")]
    pub date: NaiveDate,
    #[schema(example = 1)]
    pub user_id: i32,
    pub category: CategoryRef,
}

/// Expense without owner or category, as nested under a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PlainExpense {
    pub id: i32,
    pub name: String,
    #[serde(serialize_with = "serialize_cents")]
    pub amount: f64,
    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,
}

/// Data required to record a new expense
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub name: String,
    pub amount: f64,
    /// Defaults to today when absent
    pub date: Option<NaiveDate>,
    pub category_id: i32,
}

impl NewExpense {
    /// Date to store: the supplied one, or today (UTC).
    pub fn effective_date(&self) -> NaiveDate {
        self.date.unwrap_or_else(today)
    }
}

/// Partial update of an expense. Only fields that are `Some` are applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpensePatch {
    pub name: Option<String>,
    pub amount: Option<f64>,
    pub date: Option<NaiveDate>,
    pub category_id: Option<i32>,
}

impl ExpensePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.amount.is_none()
            && self.date.is_none()
            && self.category_id.is_none()
    }
}

/// Reject amounts that are not strictly positive (at least one cent).
pub fn validate_amount(amount: f64) -> AppResult<()> {
    if amount.is_finite() && amount >= MIN_EXPENSE_AMOUNT {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "Amount must be at least {}",
            MIN_EXPENSE_AMOUNT
        )))
    }
}

/// Current calendar date in UTC.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Serialize a monetary amount rounded to two decimal places.
pub fn serialize_cents<S: Serializer>(amount: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64((amount * 100.0).round() / 100.0)
}

/// Deserialize an optional date from `YYYY-MM-DD` or an RFC 3339 datetime.
pub fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.with_timezone(&Utc).date_naive()))
        .map_err(|_| format!("Invalid date '{}', expected YYYY-MM-DD", value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct DateHolder {
        #[serde(default, deserialize_with = "deserialize_optional_date")]
        date: Option<NaiveDate>,
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_non_positive_amounts_rejected() {
        for amount in [0.0, -0.01, -10.0, 0.001, f64::NAN, f64::NEG_INFINITY] {
            assert!(
                matches!(validate_amount(amount), Err(AppError::Validation(_))),
                "amount {} should be rejected",
                amount
            );
        }
    }

    #[test]
    fn test_positive_amounts_accepted() {
        for amount in [0.01, 1.0, 1234.56] {
            assert!(validate_amount(amount).is_ok());
        }
    }

    #[test]
    fn test_date_formats() {
        let plain: DateHolder = serde_json::from_str(r#"{"date": "2024-03-15"}"#).unwrap();
        assert_eq!(plain.date, Some(date(2024, 3, 15)));

        let full: DateHolder =
            serde_json::from_str(r#"{"date": "2024-03-15T23:30:00-02:00"}"#).unwrap();
        assert_eq!(full.date, Some(date(2024, 3, 16)));

        let absent: DateHolder = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.date, None);

        assert!(serde_json::from_str::<DateHolder>(r#"{"date": "15/03/2024"}"#).is_err());
    }

    #[test]
    fn test_effective_date_defaults_to_today() {
        let mut new = NewExpense {
            name: "Coffee".to_string(),
            amount: 3.5,
            date: None,
            category_id: 1,
        };
        assert_eq!(new.effective_date(), today());

        new.date = Some(date(2023, 1, 2));
        assert_eq!(new.effective_date(), date(2023, 1, 2));
    }

    #[test]
    fn test_amount_serialized_to_cents() {
        let expense = PlainExpense {
            id: 1,
            name: "Taxi".to_string(),
            amount: 10.005_000_1,
            date: date(2024, 1, 1),
        };

        let json = serde_json::to_value(&expense).unwrap();
        assert_eq!(json["amount"], 10.01);
        assert_eq!(json["date"], "2024-01-01");
    }

    #[test]
    fn test_empty_patch() {
        assert!(ExpensePatch::default().is_empty());
        let patch = ExpensePatch {
            amount: Some(2.0),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}

//! Expense summary aggregation and the relative periods it can be windowed by.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize, Serializer};
use utoipa::ToSchema;

use super::expense::serialize_cents;
use crate::config::{PERIOD_MONTH_DAYS, PERIOD_THREE_MONTHS_DAYS, PERIOD_WEEK_DAYS};
use crate::errors::AppError;

const INVALID_PERIOD: &str = "Invalid period. Use 'week', 'month', or 'three_months'";

/// Trailing window a summary can be restricted to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryPeriod {
    Week,
    Month,
    ThreeMonths,
}

impl SummaryPeriod {
    pub fn days(self) -> i64 {
        match self {
            SummaryPeriod::Week => PERIOD_WEEK_DAYS,
            SummaryPeriod::Month => PERIOD_MONTH_DAYS,
            SummaryPeriod::ThreeMonths => PERIOD_THREE_MONTHS_DAYS,
        }
    }

    /// First date inside the window ending `today`. The start is inclusive
    /// and there is no upper bound.
    pub fn window_start(self, today: NaiveDate) -> NaiveDate {
        today - Duration::days(self.days())
    }
}

impl FromStr for SummaryPeriod {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "week" => Ok(SummaryPeriod::Week),
            "month" => Ok(SummaryPeriod::Month),
            "three_months" => Ok(SummaryPeriod::ThreeMonths),
            _ => Err(AppError::validation(INVALID_PERIOD)),
        }
    }
}

impl fmt::Display for SummaryPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SummaryPeriod::Week => "week",
            SummaryPeriod::Month => "month",
            SummaryPeriod::ThreeMonths => "three_months",
        };
        f.write_str(name)
    }
}

/// One expense as seen by the aggregation: its category name and amount
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryEntry {
    pub category: String,
    pub amount: f64,
}

/// Aggregate statistics over a set of expenses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ExpenseSummary {
    #[serde(serialize_with = "serialize_cents")]
    #[schema(example = 35.0)]
    pub total_amount: f64,
    #[schema(example = 3)]
    pub count: u64,
    #[serde(serialize_with = "serialize_cents")]
    #[schema(example = 11.67)]
    pub average: f64,
    /// Summed amount per category name
    #[serde(serialize_with = "serialize_cents_map")]
    pub categories: HashMap<String, f64>,
}

fn serialize_cents_map<S: Serializer>(
    amounts: &HashMap<String, f64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(
        amounts
            .iter()
            .map(|(name, amount)| (name, (amount * 100.0).round() / 100.0)),
    )
}

impl ExpenseSummary {
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = SummaryEntry>,
    {
        let mut summary = Self::default();

        for entry in entries {
            summary.total_amount += entry.amount;
            summary.count += 1;
            *summary.categories.entry(entry.category).or_insert(0.0) += entry.amount;
        }

        summary.average = if summary.count > 0 {
            summary.total_amount / summary.count as f64
        } else {
            0.0
        };

        summary
    }
}

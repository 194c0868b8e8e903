//! Summary service - Aggregates a user's expenses, optionally over a
//! trailing period.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{today, ExpenseSummary, SummaryPeriod};
use crate::errors::AppResult;
use crate::infra::UnitOfWork;

/// Summary service trait for dependency injection.
#[async_trait]
pub trait SummaryService: Send + Sync {
    /// Summary over every expense of `owner_id`
    async fn summary(&self, owner_id: i32) -> AppResult<ExpenseSummary>;

    /// Summary over the expenses of `owner_id` inside a named period
    /// (`week`, `month` or `three_months`)
    async fn summary_for_period(&self, owner_id: i32, period: &str) -> AppResult<ExpenseSummary>;
}

/// Concrete implementation of SummaryService using Unit of Work.
pub struct SummaryManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> SummaryManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> SummaryService for SummaryManager<U> {
    async fn summary(&self, owner_id: i32) -> AppResult<ExpenseSummary> {
        let entries = self.uow.expenses().summary_entries(owner_id, None).await?;
        Ok(ExpenseSummary::from_entries(entries))
    }

    async fn summary_for_period(&self, owner_id: i32, period: &str) -> AppResult<ExpenseSummary> {
        let period: SummaryPeriod = period.parse()?;
        let since = period.window_start(today());

        tracing::debug!(user_id = owner_id, %period, %since, "Computing period summary");

        let entries = self
            .uow
            .expenses()
            .summary_entries(owner_id, Some(since))
            .await?;
        Ok(ExpenseSummary::from_entries(entries))
    }
}

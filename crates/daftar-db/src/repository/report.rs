//! # Report Repository
//!
//! Loads the current collections and hands them to the pure aggregation
//! functions in [`daftar_core::reports`]. Nothing is cached; every call
//! reads storage and recomputes.

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::debug;

use daftar_core::reports::{self, ActivityEntry, DashboardSummary, IncomeStatement};
use daftar_core::{Expense, Invoice, Money, Product};

use super::collection::CollectionRepository;
use crate::error::DbResult;

/// Read-only financial reports over stored invoices and expenses.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    invoices: CollectionRepository<Invoice>,
    expenses: CollectionRepository<Expense>,
    products: CollectionRepository<Product>,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository {
            invoices: CollectionRepository::new(pool.clone()),
            expenses: CollectionRepository::new(pool.clone()),
            products: CollectionRepository::new(pool),
        }
    }

    async fn ledgers(&self) -> DbResult<(Vec<Invoice>, Vec<Expense>)> {
        let invoices = self.invoices.list().await?;
        let expenses = self.expenses.list().await?;
        Ok((invoices, expenses))
    }

    /// All-time revenue, expenses and net profit.
    pub async fn income_statement(&self) -> DbResult<IncomeStatement> {
        let (invoices, expenses) = self.ledgers().await?;
        let statement = reports::income_statement(&invoices, &expenses);

        debug!(
            revenue = %statement.total_revenue,
            expenses = %statement.total_expenses,
            net = %statement.net_profit,
            "Income statement computed"
        );
        Ok(statement)
    }

    /// Non-draft invoice totals dated `date`.
    pub async fn period_sales(&self, date: NaiveDate) -> DbResult<Money> {
        let invoices = self.invoices.list().await?;
        Ok(reports::period_sales(&invoices, date))
    }

    /// Expense amounts dated `date`.
    pub async fn period_expenses(&self, date: NaiveDate) -> DbResult<Money> {
        let expenses = self.expenses.list().await?;
        Ok(reports::period_expenses(&expenses, date))
    }

    /// The `limit` most recent money movements, newest first.
    pub async fn recent_activity(&self, limit: usize) -> DbResult<Vec<ActivityEntry>> {
        let (invoices, expenses) = self.ledgers().await?;
        Ok(reports::recent_activity(&invoices, &expenses, limit))
    }

    /// Sales and expenses for `date` next to all-time net profit.
    pub async fn dashboard(&self, date: NaiveDate) -> DbResult<DashboardSummary> {
        let (invoices, expenses) = self.ledgers().await?;
        Ok(reports::dashboard(&invoices, &expenses, date))
    }

    /// Products that need reordering.
    pub async fn low_stock(&self) -> DbResult<Vec<Product>> {
        self.products.low_stock().await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

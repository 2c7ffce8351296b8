//! # Financial Reports
//!
//! Pure aggregations over the invoice, expense and product collections.
//!
//! ## Revenue Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Invoice status      counts toward revenue / sales / activity?          │
//! │  ─────────────────   ───────────────────────────────────────────        │
//! │  Draft               NO (whatever its total says)                       │
//! │  Unpaid              yes                                                │
//! │  PartiallyPaid       yes                                                │
//! │  Paid                yes                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here is cached. Every call recomputes from the slices it is
//! given, so results always match the collections as they are now.
//! Sums are integer cents; order of addition does not matter.

use chrono::NaiveDate;
use serde::Serialize;
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Expense, Invoice, Product};

/// Default length of the recent-activity feed.
pub const DEFAULT_ACTIVITY_LIMIT: usize = 5;

// =============================================================================
// Income Statement
// =============================================================================

/// All-time revenue, expenses and their difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct IncomeStatement {
    pub total_revenue: Money,
    pub total_expenses: Money,
    pub net_profit: Money,
}

impl IncomeStatement {
    /// True when net profit is zero or positive (presentation only).
    pub fn is_profit(&self) -> bool {
        !self.net_profit.is_negative()
    }
}

/// Revenue from every non-draft invoice minus every expense.
///
/// ## Example
/// ```text
/// invoices: [Paid 100.00, Draft 999.00]   expenses: [40.00]
///      │
///      ▼
/// revenue 100.00, expenses 40.00, net profit 60.00
/// ```
///
/// Totals saturate at the `i64` limits rather than overflow.
pub fn income_statement(invoices: &[Invoice], expenses: &[Expense]) -> IncomeStatement {
    let total_revenue = total_revenue(invoices);
    let total_expenses: Money = expenses.iter().map(|e| e.amount).sum();

    IncomeStatement {
        total_revenue,
        total_expenses,
        net_profit: total_revenue - total_expenses,
    }
}

/// Σ total over non-draft invoices.
pub fn total_revenue(invoices: &[Invoice]) -> Money {
    invoices
        .iter()
        .filter(|inv| !inv.is_draft())
        .map(|inv| inv.total)
        .sum()
}

// =============================================================================
// Period Totals
// =============================================================================

/// Σ total over non-draft invoices dated exactly `date`.
pub fn period_sales(invoices: &[Invoice], date: NaiveDate) -> Money {
    invoices
        .iter()
        .filter(|inv| !inv.is_draft() && inv.date == date)
        .map(|inv| inv.total)
        .sum()
}

/// Σ amount over expenses dated exactly `date`.
pub fn period_expenses(expenses: &[Expense], date: NaiveDate) -> Money {
    expenses
        .iter()
        .filter(|exp| exp.date == date)
        .map(|exp| exp.amount)
        .sum()
}

/// Home-screen figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardSummary {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub sales: Money,
    pub expenses: Money,
    /// All-time, not just `date`.
    pub net_profit: Money,
}

/// The day's sales and expenses next to all-time net profit.
pub fn dashboard(invoices: &[Invoice], expenses: &[Expense], date: NaiveDate) -> DashboardSummary {
    DashboardSummary {
        date,
        sales: period_sales(invoices, date),
        expenses: period_expenses(expenses, date),
        net_profit: income_statement(invoices, expenses).net_profit,
    }
}

// =============================================================================
// Recent Activity
// =============================================================================

/// Which way the money moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Flow {
    Income,
    Expense,
}

/// One row of the activity feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ActivityEntry {
    /// Id of the invoice or expense.
    pub id: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    /// `Invoice #<serial>` or the expense description.
    pub description: String,
    /// Customer name or expense category.
    pub secondary_text: String,
    /// Always non-negative; see `flow` for the sign.
    pub amount: Money,
    pub flow: Flow,
}

impl ActivityEntry {
    /// Amount with the flow's sign applied.
    pub fn signed_amount(&self) -> Money {
        match self.flow {
            Flow::Income => self.amount,
            Flow::Expense => -self.amount,
        }
    }
}

/// The `limit` most recent money movements, newest first.
///
/// Non-draft invoices come first, then expenses, each in collection order.
/// The stable sort keeps that order among entries on the same date, since
/// no time of day is recorded.
pub fn recent_activity(
    invoices: &[Invoice],
    expenses: &[Expense],
    limit: usize,
) -> Vec<ActivityEntry> {
    let incoming = invoices
        .iter()
        .filter(|inv| !inv.is_draft())
        .map(|inv| ActivityEntry {
            id: inv.id.clone(),
            date: inv.date,
            description: format!("Invoice #{}", inv.serial_number),
            secondary_text: inv.customer_name.clone(),
            amount: inv.total,
            flow: Flow::Income,
        });

    let outgoing = expenses.iter().map(|exp| ActivityEntry {
        id: exp.id.clone(),
        date: exp.date,
        description: exp.description.clone(),
        secondary_text: exp.category.clone(),
        amount: exp.amount,
        flow: Flow::Expense,
    });

    let mut entries: Vec<ActivityEntry> = incoming.chain(outgoing).collect();
    entries.sort_by(|a, b| b.date.cmp(&a.date));
    entries.truncate(limit);
    entries
}

// =============================================================================
// Inventory
// =============================================================================

/// Products at or below their reorder point, in collection order.
pub fn low_stock(products: &[Product]) -> Vec<&Product> {
    products.iter().filter(|p| p.is_low_stock()).collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InvoiceStatus;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn invoice(id: &str, status: InvoiceStatus, total_major: i64, date: NaiveDate) -> Invoice {
        Invoice {
            id: id.to_string(),
            serial_number: format!("INV-{}", id),
            customer_id: "c-1".to_string(),
            customer_name: "Acme".to_string(),
            date,
            items: vec![],
            subtotal: Money::from_major(total_major),
            tax: Money::zero(),
            total: Money::from_major(total_major),
            status,
        }
    }

    fn expense(id: &str, amount_major: i64, date: NaiveDate) -> Expense {
        Expense {
            id: id.to_string(),
            date,
            description: format!("expense {}", id),
            amount: Money::from_major(amount_major),
            category: "general".to_string(),
        }
    }

    #[test]
    fn test_income_statement_scenario() {
        let invoices = vec![invoice("1", InvoiceStatus::Paid, 100, day(1))];
        let expenses = vec![expense("e1", 40, day(1))];

        let statement = income_statement(&invoices, &expenses);
        assert_eq!(statement.total_revenue, Money::from_major(100));
        assert_eq!(statement.total_expenses, Money::from_major(40));
        assert_eq!(statement.net_profit, Money::from_major(60));
        assert!(statement.is_profit());

        assert_eq!(period_sales(&invoices, day(1)), Money::from_major(100));
        assert_eq!(period_sales(&invoices, day(2)), Money::zero());
    }

    #[test]
    fn test_net_profit_identity_for_all_signs() {
        let cases = [(0, 0), (100, 0), (0, 100), (100, 40), (40, 100), (75, 75)];
        for (revenue, spent) in cases {
            let invoices = vec![invoice("1", InvoiceStatus::Unpaid, revenue, day(1))];
            let expenses = vec![expense("e1", spent, day(1))];
            let statement = income_statement(&invoices, &expenses);

            assert_eq!(
                statement.net_profit,
                Money::from_major(revenue) - Money::from_major(spent)
            );
            assert_eq!(statement.is_profit(), revenue >= spent);
        }
    }

    #[test]
    fn test_extreme_totals_saturate() {
        let invoices: Vec<Invoice> = (0..3)
            .map(|i| invoice(&i.to_string(), InvoiceStatus::Paid, i64::MAX / 100, day(1)))
            .collect();
        let expenses: Vec<Expense> = (0..3)
            .map(|i| expense(&format!("e{}", i), i64::MAX / 100, day(1)))
            .collect();

        let statement = income_statement(&invoices, &expenses);
        assert_eq!(statement.total_revenue, Money::from_cents(i64::MAX));
        assert_eq!(statement.total_expenses, Money::from_cents(i64::MAX));
        assert_eq!(statement.net_profit, Money::zero());
        assert_eq!(period_sales(&invoices, day(1)), Money::from_cents(i64::MAX));
        assert_eq!(period_expenses(&expenses, day(1)), Money::from_cents(i64::MAX));
    }

    #[test]
    fn test_drafts_excluded_everywhere() {
        let invoices = vec![
            invoice("draft", InvoiceStatus::Draft, 999, day(1)),
            invoice("paid", InvoiceStatus::Paid, 10, day(1)),
            invoice("partial", InvoiceStatus::PartiallyPaid, 5, day(1)),
        ];

        assert_eq!(total_revenue(&invoices), Money::from_major(15));
        assert_eq!(period_sales(&invoices, day(1)), Money::from_major(15));

        let feed = recent_activity(&invoices, &[], 10);
        assert_eq!(feed.len(), 2);
        assert!(feed.iter().all(|entry| entry.id != "draft"));
    }

    #[test]
    fn test_period_expenses_exact_date() {
        let expenses = vec![
            expense("e1", 10, day(1)),
            expense("e2", 15, day(1)),
            expense("e3", 99, day(2)),
        ];
        assert_eq!(period_expenses(&expenses, day(1)), Money::from_major(25));
        assert_eq!(period_expenses(&expenses, day(3)), Money::zero());
    }

    #[test]
    fn test_recent_activity_order_and_limit() {
        let invoices = vec![
            invoice("i1", InvoiceStatus::Paid, 10, day(1)),
            invoice("i2", InvoiceStatus::Paid, 20, day(3)),
            invoice("i3", InvoiceStatus::Unpaid, 30, day(2)),
        ];
        let expenses = vec![
            expense("e1", 5, day(3)),
            expense("e2", 6, day(4)),
            expense("e3", 7, day(1)),
        ];

        let feed = recent_activity(&invoices, &expenses, DEFAULT_ACTIVITY_LIMIT);
        let ids: Vec<&str> = feed.iter().map(|e| e.id.as_str()).collect();

        // Same-date ties keep invoices ahead of expenses.
        assert_eq!(ids, ["e2", "i2", "e1", "i3", "i1"]);
        assert_eq!(feed[0].flow, Flow::Expense);
        assert_eq!(feed[0].signed_amount(), -Money::from_major(6));
        assert_eq!(feed[1].description, "Invoice #INV-i2");
        assert_eq!(feed[1].secondary_text, "Acme");
    }

    #[test]
    fn test_dashboard() {
        let invoices = vec![
            invoice("i1", InvoiceStatus::Paid, 100, day(1)),
            invoice("i2", InvoiceStatus::Paid, 50, day(2)),
        ];
        let expenses = vec![expense("e1", 30, day(2))];

        let summary = dashboard(&invoices, &expenses, day(2));
        assert_eq!(summary.sales, Money::from_major(50));
        assert_eq!(summary.expenses, Money::from_major(30));
        assert_eq!(summary.net_profit, Money::from_major(120));
    }

    #[test]
    fn test_low_stock_filter() {
        let mut pen = Product::new("Pen", "P1", Money::from_major(2));
        pen.quantity = 2;
        pen.reorder_point = 3;
        let mut pad = Product::new("Pad", "P2", Money::from_major(5));
        pad.quantity = 20;
        pad.reorder_point = 3;

        let products = vec![pen, pad];
        let low = low_stock(&products);
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].sku, "P1");
    }

    #[test]
    fn test_large_dataset_stays_exact() {
        let expenses: Vec<Expense> = (0..10_000)
            .map(|i| Expense {
                amount: Money::from_cents(10),
                ..expense(&i.to_string(), 0, day(1))
            })
            .collect();
        assert_eq!(income_statement(&[], &expenses).total_expenses, Money::from_major(1000));
    }
}

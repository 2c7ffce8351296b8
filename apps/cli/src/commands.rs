//! # Commands
//!
//! One function per subcommand. Each returns the text to print so the
//! binary stays a thin dispatcher and the output is testable.
//!
//! ## Command Map
//! ```text
//! ┌──────────────┬──────────────────────────────────────────────────────────┐
//! │ report       │ db.reports().income_statement() + dashboard(date)        │
//! │ activity     │ db.reports().recent_activity(limit)                      │
//! │ products     │ db.products().search(term)                               │
//! │ low-stock    │ db.reports().low_stock()                                 │
//! │ backup       │ db.backups().backup_json() ──► backup-<name>-<date>.json │
//! │ restore      │ file ──► db.backups().restore_json()    (needs --yes)    │
//! │ settings     │ db.settings().get()                                      │
//! └──────────────┴──────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::info;

use daftar_core::reports::Flow;
use daftar_core::{today, Money};
use daftar_db::{backup_file_name, Database, SlotIssue};

use crate::error::{CliError, CliResult};

/// Income statement plus one day's figures.
pub async fn report(db: &Database, date: Option<NaiveDate>, as_json: bool) -> CliResult<String> {
    let date = date.unwrap_or_else(today);
    let settings = db.settings().get().await?;
    let reports = db.reports();

    let statement = reports.income_statement().await?;
    let summary = reports.dashboard(date).await?;

    if as_json {
        let value = serde_json::json!({
            "incomeStatement": statement,
            "day": summary,
        });
        return Ok(serde_json::to_string_pretty(&value)?);
    }

    let fmt = |m: Money| m.format_with(&settings.currency);
    let net_label = if statement.is_profit() { "profit" } else { "loss  " };

    let lines = [
        settings.business_name.clone(),
        String::new(),
        "Income statement (all time)".to_string(),
        format!("  Revenue:     {:>16}", fmt(statement.total_revenue)),
        format!("  Expenses:    {:>16}", fmt(statement.total_expenses)),
        format!("  Net {}:  {:>16}", net_label, fmt(statement.net_profit.abs())),
        String::new(),
        summary.date.format("%Y-%m-%d").to_string(),
        format!("  Sales:       {:>16}", fmt(summary.sales)),
        format!("  Expenses:    {:>16}", fmt(summary.expenses)),
    ];
    Ok(lines.join("\n"))
}

/// The most recent money movements.
pub async fn activity(db: &Database, limit: usize) -> CliResult<String> {
    let settings = db.settings().get().await?;
    let entries = db.reports().recent_activity(limit).await?;

    if entries.is_empty() {
        return Ok("No activity yet.".to_string());
    }

    let lines: Vec<String> = entries
        .iter()
        .map(|entry| {
            let sign = match entry.flow {
                Flow::Income => '+',
                Flow::Expense => '-',
            };
            format!(
                "{}  {}{:>14}  {}  ({})",
                entry.date.format("%Y-%m-%d"),
                sign,
                entry.amount.format_with(&settings.currency),
                entry.description,
                entry.secondary_text
            )
        })
        .collect();

    Ok(lines.join("\n"))
}

/// Products matching `search` (all when absent).
pub async fn products(db: &Database, search: Option<&str>) -> CliResult<String> {
    let settings = db.settings().get().await?;
    let found = db.products().search(search.unwrap_or("")).await?;

    if found.is_empty() {
        return Ok("No products found.".to_string());
    }

    let lines: Vec<String> = found
        .iter()
        .map(|p| {
            format!(
                "{:<12} {:<28} qty {:>5}  {:>14}{}",
                p.sku,
                p.name,
                p.quantity,
                p.sale_price.format_with(&settings.currency),
                if p.is_low_stock() { "  LOW" } else { "" }
            )
        })
        .collect();

    Ok(lines.join("\n"))
}

/// Products that need reordering.
pub async fn low_stock(db: &Database) -> CliResult<String> {
    let low = db.reports().low_stock().await?;

    if low.is_empty() {
        return Ok("All products are above their reorder point.".to_string());
    }

    let lines: Vec<String> = low
        .iter()
        .map(|p| {
            format!(
                "{:<12} {:<28} qty {:>5}  reorder at {}",
                p.sku, p.name, p.quantity, p.reorder_point
            )
        })
        .collect();

    Ok(lines.join("\n"))
}

/// Writes a snapshot into `out_dir` and returns the file path.
pub async fn backup(db: &Database, out_dir: &Path) -> CliResult<PathBuf> {
    let settings = db.settings().get().await?;
    let contents = db.backups().backup_json().await?;

    std::fs::create_dir_all(out_dir).map_err(|e| CliError::io(out_dir, e))?;
    let path = out_dir.join(backup_file_name(&settings.business_name, today()));
    std::fs::write(&path, contents).map_err(|e| CliError::io(&path, e))?;

    info!(path = %path.display(), "Backup written");
    Ok(path)
}

/// Restores from a snapshot file. Refuses to run without `confirmed`.
pub async fn restore(db: &Database, file: &Path, confirmed: bool) -> CliResult<String> {
    if !confirmed {
        return Err(CliError::ConfirmationRequired("restore"));
    }

    let text = std::fs::read_to_string(file).map_err(|e| CliError::io(file, e))?;
    let outcome = db.backups().restore_json(&text).await?;

    let restored: Vec<&str> = outcome.restored.iter().map(|key| key.as_str()).collect();
    let dataset = &outcome.dataset;

    let mut lines = vec![
        format!(
            "Restored: {}",
            if restored.is_empty() { "nothing".to_string() } else { restored.join(", ") }
        ),
        format!(
            "Now holding {} products, {} invoices, {} expenses, {} customers, {} suppliers",
            dataset.products.len(),
            dataset.invoices.len(),
            dataset.expenses.len(),
            dataset.customers.len(),
            dataset.suppliers.len()
        ),
    ];

    lines.extend(outcome.issues.iter().map(|issue| match issue {
        SlotIssue::Unreadable { key, reason } => {
            format!("Warning: {} could not be read ({}); it reads as empty", key, reason)
        }
        SlotIssue::SkippedRecords { key, count } => format!(
            "Warning: {} {} record(s) could not be read; they are kept but hidden",
            count, key
        ),
    }));

    Ok(lines.join("\n"))
}

/// Business settings.
pub async fn settings(db: &Database, as_json: bool) -> CliResult<String> {
    let settings = db.settings().get().await?;

    if as_json {
        return Ok(serde_json::to_string_pretty(&settings)?);
    }

    let tax = if settings.is_tax_enabled {
        format!("{}%", settings.tax_rate.percentage())
    } else {
        "disabled".to_string()
    };

    Ok(format!(
        "Business:  {}\nAddress:   {}\nCurrency:  {}\nTax:       {}",
        settings.business_name, settings.business_address, settings.currency, tax
    ))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use daftar_core::{Customer, Expense, InvoiceStatus, Product};
    use daftar_db::{DbConfig, InvoiceLine};

    async fn shop() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let mut pen = Product::new("Pen", "P1", Money::from_major(2));
        pen.quantity = 2;
        pen.reorder_point = 3;
        let pen = db.products().upsert(pen).await.unwrap();

        let mut pad = Product::new("Pad", "P2", Money::from_major(5));
        pad.quantity = 30;
        db.products().upsert(pad).await.unwrap();

        let acme = db.customers().upsert(Customer::new("Acme")).await.unwrap();
        db.create_invoice(&acme.id, &[InvoiceLine::new(&pen.id, 50)], InvoiceStatus::Paid)
            .await
            .unwrap();
        db.expenses()
            .upsert(Expense::new("Rent", Money::from_major(40)))
            .await
            .unwrap();

        db
    }

    #[tokio::test]
    async fn test_report_text() {
        let db = shop().await;
        let out = report(&db, None, false).await.unwrap();

        assert!(out.contains("115.00 ر.س"));
        assert!(out.contains("40.00 ر.س"));
        assert!(out.contains("75.00 ر.س"));
        assert!(out.contains("Net profit"));
    }

    #[tokio::test]
    async fn test_report_json() {
        let db = shop().await;
        let out = report(&db, None, true).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value["incomeStatement"]["totalRevenue"], 115);
        assert_eq!(value["incomeStatement"]["netProfit"], 75);
    }

    #[tokio::test]
    async fn test_activity_lists_both_flows() {
        let db = shop().await;
        let out = activity(&db, 5).await.unwrap();

        assert_eq!(out.lines().count(), 2);
        assert!(out.contains("Invoice #INV-"));
        assert!(out.contains("Rent"));
    }

    #[tokio::test]
    async fn test_products_and_low_stock() {
        let db = shop().await;

        let all = products(&db, None).await.unwrap();
        assert_eq!(all.lines().count(), 2);
        assert!(all.contains("LOW"));

        let pads = products(&db, Some("pad")).await.unwrap();
        assert_eq!(pads.lines().count(), 1);

        let low = low_stock(&db).await.unwrap();
        assert!(low.contains("P1"));
        assert!(!low.contains("P2"));
    }

    #[tokio::test]
    async fn test_backup_then_restore_elsewhere() {
        let source = shop().await;
        let dir = tempfile::tempdir().unwrap();

        let path = backup(&source, dir.path()).await.unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("backup-نشاطي_التجاري-"));
        assert!(name.ends_with(".json"));

        let target = Database::new(DbConfig::in_memory()).await.unwrap();
        let out = restore(&target, &path, true).await.unwrap();

        assert!(out.contains("settings, products, invoices, expenses, customers, suppliers"));
        assert_eq!(target.products().len().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_restore_requires_confirmation() {
        let db = shop().await;
        let err = restore(&db, Path::new("missing.json"), false).await.unwrap_err();

        assert!(matches!(err, CliError::ConfirmationRequired(_)));
        assert_eq!(db.products().len().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_restore_rejects_non_object() {
        let db = shop().await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "[]").unwrap();

        let err = restore(&db, &path, true).await.unwrap_err();
        assert_eq!(err.exit_code(), 65);
        assert_eq!(db.products().len().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_restore_warns_about_unreadable_records() {
        let db = shop().await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.json");
        std::fs::write(
            &path,
            r#"{ "products": [
                {"id": "p-1", "name": "Pen", "sku": "P1", "purchasePrice": 1,
                 "salePrice": 2, "quantity": 10, "reorderPoint": 3},
                {"id": "p-2", "name": "Pad", "sku": "P2", "purchasePrice": 1,
                 "salePrice": 5, "quantity": 2.5, "reorderPoint": 0}
            ] }"#,
        )
        .unwrap();

        let out = restore(&db, &path, true).await.unwrap();
        assert!(out.contains("Now holding 1 products"));
        assert!(out.contains("Warning: 1 products record(s) could not be read"));
    }

    #[tokio::test]
    async fn test_settings_text() {
        let db = shop().await;
        let out = settings(&db, false).await.unwrap();

        assert!(out.contains("Tax:       15%"));
        assert!(out.contains("ر.س"));
    }
}

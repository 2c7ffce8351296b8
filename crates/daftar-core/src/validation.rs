//! # Validation Module
//!
//! Record-level validation for Daftar.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Presentation (collaborator)                                  │
//! │  └── Immediate feedback on forms                                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Store upsert (Rust)                                          │
//! │  ├── THIS MODULE: per-record invariants (Entity::validate)             │
//! │  └── Collection checks (SKU uniqueness) in daftar-db                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Restore                                                      │
//! │  └── NOT validated: snapshot content is written as-is                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use daftar_core::validation::{validate_quantity, validate_required};
//!
//! assert!(validate_required("name", "Pen").is_ok());
//! assert!(validate_required("name", "   ").is_err());
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::{ValidationError, ValidationResult};
use crate::money::{Money, MAX_MAJOR};
use crate::types::{AppSettings, Expense, Invoice, Party, Product, TaxRate};

/// Highest accepted tax rate (100%).
pub const MAX_TAX_RATE_BPS: u32 = 10_000;

// =============================================================================
// Field Validators
// =============================================================================

/// Fails when `value` is empty after trimming.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(())
}

/// Fails unless `0 < amount <= Money::MAX`.
pub fn validate_positive_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::must_be_positive(field));
    }
    validate_amount_limit(field, Some(amount)).map(|_| ())
}

/// Fails unless `0 <= amount <= Money::MAX`.
pub fn validate_non_negative_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(amount_out_of_range(field));
    }
    validate_amount_limit(field, Some(amount)).map(|_| ())
}

/// Unwraps the result of a checked money operation.
///
/// `None` (overflow) and amounts beyond [`Money::MAX`] both fail with
/// `OutOfRange`.
///
/// ## Example
/// ```rust
/// use daftar_core::money::Money;
/// use daftar_core::validation::validate_amount_limit;
///
/// let price = Money::from_major(2);
/// assert!(validate_amount_limit("total", price.multiply_quantity(3)).is_ok());
/// assert!(validate_amount_limit("total", price.multiply_quantity(i64::MAX / 10)).is_err());
/// ```
pub fn validate_amount_limit(field: &str, amount: Option<Money>) -> ValidationResult<Money> {
    amount
        .filter(Money::is_within_limit)
        .ok_or_else(|| amount_out_of_range(field))
}

fn amount_out_of_range(field: &str) -> ValidationError {
    ValidationError::OutOfRange {
        field: field.to_string(),
        min: 0,
        max: MAX_MAJOR,
    }
}

/// Fails when a count is below zero.
pub fn validate_non_negative_count(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

/// Validates an invoice line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::must_be_positive("quantity"));
    }
    Ok(())
}

/// Validates a tax rate.
///
/// ## Rules
/// - Must be between 0% and 100%
pub fn validate_tax_rate(rate: TaxRate) -> ValidationResult<()> {
    if rate.bps() > MAX_TAX_RATE_BPS {
        return Err(ValidationError::OutOfRange {
            field: "taxRate".to_string(),
            min: 0,
            max: 100,
        });
    }
    Ok(())
}

// =============================================================================
// Record Validators
// =============================================================================

/// Validates a product.
///
/// ## Rules
/// - name and sku are required
/// - sale price > 0, purchase price >= 0
/// - quantity and reorder point >= 0
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    validate_required("id", &product.id)?;
    validate_required("name", &product.name)?;
    validate_required("sku", &product.sku)?;
    validate_positive_amount("salePrice", product.sale_price)?;
    validate_non_negative_amount("purchasePrice", product.purchase_price)?;
    validate_non_negative_count("quantity", product.quantity)?;
    validate_non_negative_count("reorderPoint", product.reorder_point)?;
    Ok(())
}

/// Validates a customer or supplier. Only the name is required.
pub fn validate_party(party: &Party) -> ValidationResult<()> {
    validate_required("id", &party.id)?;
    validate_required("name", &party.name)
}

/// Validates an expense.
///
/// ## Rules
/// - description is required
/// - amount > 0
pub fn validate_expense(expense: &Expense) -> ValidationResult<()> {
    validate_required("id", &expense.id)?;
    validate_required("description", &expense.description)?;
    validate_positive_amount("amount", expense.amount)
}

/// Validates an invoice's arithmetic.
///
/// ## Rules
/// - every line: quantity > 0, unit price > 0 and total = quantity × unit price
/// - no amount, product or sum exceeds [`Money::MAX`]
/// - when lines are present, their totals sum to the subtotal
/// - total = subtotal + tax
///
/// An invoice without lines may carry any subtotal; only the
/// total = subtotal + tax identity applies.
pub fn validate_invoice(invoice: &Invoice) -> ValidationResult<()> {
    validate_required("id", &invoice.id)?;
    validate_required("customerId", &invoice.customer_id)?;

    for item in &invoice.items {
        validate_quantity(item.quantity)?;
        validate_positive_amount("unitPrice", item.unit_price)?;
        let expected =
            validate_amount_limit("item total", item.unit_price.multiply_quantity(item.quantity))?;
        if item.total != expected {
            return Err(inconsistent("item total", expected, item.total));
        }
    }

    if !invoice.items.is_empty() {
        let expected = validate_amount_limit(
            "subtotal",
            Money::checked_sum(invoice.items.iter().map(|item| item.total)),
        )?;
        if invoice.subtotal != expected {
            return Err(inconsistent("subtotal", expected, invoice.subtotal));
        }
    }

    validate_amount_limit("subtotal", Some(invoice.subtotal))?;
    validate_amount_limit("tax", Some(invoice.tax))?;
    let expected = validate_amount_limit("total", invoice.subtotal.checked_add(invoice.tax))?;
    if invoice.total != expected {
        return Err(inconsistent("total", expected, invoice.total));
    }

    Ok(())
}

/// Validates settings before they replace the stored singleton.
pub fn validate_settings(settings: &AppSettings) -> ValidationResult<()> {
    validate_tax_rate(settings.tax_rate)
}

fn inconsistent(field: &str, expected: Money, found: Money) -> ValidationError {
    ValidationError::Inconsistent {
        field: field.to_string(),
        expected: expected.to_string(),
        found: found.to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Invoice Construction
//!
//! Builds invoices and invoice lines from resolved customer/product records.
//!
//! ## Snapshot Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  build_invoice_item(Some(&pen), 3, None)                                │
//! │       │                                                                 │
//! │       ├── product unresolved?  → ValidationError::Unresolved            │
//! │       ├── quantity <= 0?       → ValidationError::MustBePositive        │
//! │       ├── unit price <= 0?     → ValidationError::MustBePositive        │
//! │       ├── total overflows?     → ValidationError::OutOfRange            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  InvoiceItem { product_id: pen.id, product_name: "Pen" (frozen),       │
//! │                unit_price: pen.sale_price, total: 3 × unit_price }     │
//! │                                                                         │
//! │  Later: pen renamed or deleted → the line still reads "Pen"            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! References are only checked here, when the invoice is built. Nothing
//! re-checks them afterwards, and a dangling id on a stored invoice is
//! normal.

use chrono::{DateTime, Utc};

use crate::error::{ValidationError, ValidationResult};
use crate::money::Money;
use crate::types::{
    new_id, today, Customer, Invoice, InvoiceItem, InvoiceStatus, Product, TaxRate,
};
use crate::validation::{validate_amount_limit, validate_positive_amount, validate_quantity};

/// Serial number for an invoice created at `at`.
///
/// `INV-` followed by the last six digits of the epoch milliseconds.
/// Two invoices created in the same millisecond (or restored from an old
/// backup) can share a serial.
pub fn serial_number_at(at: DateTime<Utc>) -> String {
    let millis = at.timestamp_millis().rem_euclid(1_000_000);
    format!("INV-{:06}", millis)
}

/// Builds one invoice line.
///
/// ## Arguments
/// * `product` - The resolved product, `None` when the id did not resolve
/// * `quantity` - Units sold, must be positive
/// * `unit_price` - Overrides the product's sale price when given; must be
///   positive
///
/// ## Example
/// ```rust
/// use daftar_core::money::Money;
/// use daftar_core::references::build_invoice_item;
/// use daftar_core::types::Product;
///
/// let pen = Product::new("Pen", "P1", Money::from_major(2));
/// let line = build_invoice_item(Some(&pen), 3, None).unwrap();
/// assert_eq!(line.total, Money::from_major(6));
///
/// assert!(build_invoice_item(None, 3, None).is_err());
/// assert!(build_invoice_item(Some(&pen), 0, None).is_err());
/// assert!(build_invoice_item(Some(&pen), 3, Some(Money::zero())).is_err());
/// ```
pub fn build_invoice_item(
    product: Option<&Product>,
    quantity: i64,
    unit_price: Option<Money>,
) -> ValidationResult<InvoiceItem> {
    let product = product.ok_or_else(|| ValidationError::required("product"))?;
    validate_quantity(quantity)?;

    let unit_price = unit_price.unwrap_or(product.sale_price);
    validate_positive_amount("unitPrice", unit_price)?;
    let total = validate_amount_limit("total", unit_price.multiply_quantity(quantity))?;

    Ok(InvoiceItem {
        product_id: product.id.clone(),
        product_name: product.name.clone(),
        quantity,
        unit_price,
        total,
    })
}

/// Builds a draft invoice dated today.
///
/// ## Totals
/// - subtotal = Σ line totals
/// - tax = subtotal × `tax_rate` when `tax_enabled`, else zero
/// - total = subtotal + tax
///
/// Any of the three beyond [`Money::MAX`] fails with `OutOfRange`.
///
/// Use [`Invoice::with_status`] / [`Invoice::with_date`] to adjust the
/// result before saving.
pub fn build_invoice(
    customer: Option<&Customer>,
    items: Vec<InvoiceItem>,
    tax_rate: TaxRate,
    tax_enabled: bool,
) -> ValidationResult<Invoice> {
    let customer = customer.ok_or_else(|| ValidationError::required("customer"))?;

    let subtotal = validate_amount_limit(
        "subtotal",
        Money::checked_sum(items.iter().map(|item| item.total)),
    )?;
    let tax = if tax_enabled {
        validate_amount_limit("tax", subtotal.checked_tax(tax_rate))?
    } else {
        Money::zero()
    };
    let total = validate_amount_limit("total", subtotal.checked_add(tax))?;

    Ok(Invoice {
        id: new_id(),
        serial_number: serial_number_at(Utc::now()),
        customer_id: customer.id.clone(),
        customer_name: customer.name.clone(),
        date: today(),
        items,
        subtotal,
        tax,
        total,
        status: InvoiceStatus::Draft,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Entity;
    use chrono::TimeZone;

    fn pen() -> Product {
        Product::new("Pen", "P1", Money::from_major(2))
    }

    #[test]
    fn test_item_copies_product_snapshot() {
        let product = pen();
        let item = build_invoice_item(Some(&product), 3, None).unwrap();

        assert_eq!(item.product_id, product.id);
        assert_eq!(item.product_name, "Pen");
        assert_eq!(item.unit_price, Money::from_major(2));
        assert_eq!(item.total, Money::from_major(6));
    }

    #[test]
    fn test_item_price_override() {
        let item = build_invoice_item(Some(&pen()), 2, Some(Money::from_cents(150))).unwrap();
        assert_eq!(item.total, Money::from_cents(300));
    }

    #[test]
    fn test_item_rejects_unresolved_product_and_bad_quantity() {
        assert_eq!(
            build_invoice_item(None, 1, None),
            Err(ValidationError::required("product"))
        );
        assert!(build_invoice_item(Some(&pen()), 0, None).is_err());
        assert!(build_invoice_item(Some(&pen()), -2, None).is_err());
    }

    #[test]
    fn test_item_rejects_non_positive_price_override() {
        assert_eq!(
            build_invoice_item(Some(&pen()), 2, Some(Money::zero())),
            Err(ValidationError::must_be_positive("unitPrice"))
        );
        assert!(build_invoice_item(Some(&pen()), 2, Some(Money::from_cents(-150))).is_err());
    }

    #[test]
    fn test_item_rejects_overflowing_total() {
        let result = build_invoice_item(Some(&pen()), i64::MAX / 10, None);
        assert!(matches!(result, Err(ValidationError::OutOfRange { .. })));

        // Fits in i64 but beyond the storable limit
        let result = build_invoice_item(Some(&pen()), 50_000_000_000_000, None);
        assert!(matches!(result, Err(ValidationError::OutOfRange { .. })));
    }

    #[test]
    fn test_invoice_rejects_overflowing_subtotal() {
        let customer = Customer::new("Acme");
        let line = build_invoice_item(Some(&pen()), 40_000_000_000_000, None).unwrap();
        let items = vec![line.clone(), line.clone(), line];

        let result = build_invoice(Some(&customer), items, TaxRate::zero(), false);
        assert!(matches!(result, Err(ValidationError::OutOfRange { .. })));
    }

    #[test]
    fn test_invoice_totals_with_tax() {
        let customer = Customer::new("Acme");
        let items = vec![
            build_invoice_item(Some(&pen()), 5, None).unwrap(),
            build_invoice_item(Some(&pen()), 1, Some(Money::from_major(90))).unwrap(),
        ];

        let invoice = build_invoice(Some(&customer), items, TaxRate::from_bps(1500), true).unwrap();

        assert_eq!(invoice.subtotal, Money::from_major(100));
        assert_eq!(invoice.tax, Money::from_major(15));
        assert_eq!(invoice.total, Money::from_major(115));
        assert_eq!(invoice.customer_name, "Acme");
        assert!(invoice.is_draft());
        assert!(invoice.serial_number.starts_with("INV-"));
        assert!(invoice.validate().is_ok());
    }

    #[test]
    fn test_invoice_tax_disabled() {
        let customer = Customer::new("Acme");
        let items = vec![build_invoice_item(Some(&pen()), 5, None).unwrap()];

        let invoice =
            build_invoice(Some(&customer), items, TaxRate::from_bps(1500), false).unwrap();

        assert!(invoice.tax.is_zero());
        assert_eq!(invoice.total, invoice.subtotal);
    }

    #[test]
    fn test_invoice_requires_customer() {
        let result = build_invoice(None, vec![], TaxRate::zero(), false);
        assert_eq!(result, Err(ValidationError::required("customer")));
    }

    #[test]
    fn test_serial_number_uses_last_six_millis_digits() {
        let at = Utc.timestamp_millis_opt(1_704_067_200_123).unwrap();
        assert_eq!(serial_number_at(at), "INV-200123");

        let at = Utc.timestamp_millis_opt(1_000_000_000_042).unwrap();
        assert_eq!(serial_number_at(at), "INV-000042");
    }
}

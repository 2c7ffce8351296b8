//! # Invoice Repository
//!
//! Building invoices from stored customers and products.
//!
//! ## Reference Resolution
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create(customer_id, lines, status)                                    │
//! │       │                                                                 │
//! │       ├─► customer_id  ──lookup──► Customer   (missing ─► Unresolved)  │
//! │       ├─► line.product_id ─lookup─► Product   (missing ─► Unresolved)  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  build_invoice_item / build_invoice   (names copied, totals computed)  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  upsert                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Resolution happens only here. Once saved, an invoice keeps its copied
//! names and its ids may dangle.

use tracing::info;

use daftar_core::references::{build_invoice, build_invoice_item};
use daftar_core::{
    AppSettings, Customer, Invoice, InvoiceItem, InvoiceStatus, Money, Product, ValidationError,
};

use super::collection::CollectionRepository;
use crate::error::DbResult;

pub type InvoiceRepository = CollectionRepository<Invoice>;

/// One requested invoice line, by product id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceLine {
    pub product_id: String,
    pub quantity: i64,
    /// Overrides the product's sale price when set.
    pub unit_price: Option<Money>,
}

impl InvoiceLine {
    /// A line at the product's current sale price.
    pub fn new(product_id: impl Into<String>, quantity: i64) -> Self {
        InvoiceLine {
            product_id: product_id.into(),
            quantity,
            unit_price: None,
        }
    }

    /// Sets an explicit unit price (builder style).
    pub fn with_unit_price(mut self, unit_price: Money) -> Self {
        self.unit_price = Some(unit_price);
        self
    }
}

impl CollectionRepository<Invoice> {
    /// Resolves references, builds the invoice, and saves it.
    ///
    /// `customers`, `products` and `settings` are the current state the
    /// caller loaded; see `Database::create_invoice` for the one-call form.
    pub async fn create(
        &self,
        customers: &[Customer],
        products: &[Product],
        settings: &AppSettings,
        customer_id: &str,
        lines: &[InvoiceLine],
        status: InvoiceStatus,
    ) -> DbResult<Invoice> {
        let customer = customers
            .iter()
            .find(|c| c.id == customer_id)
            .ok_or_else(|| ValidationError::unresolved("Customer", customer_id))?;

        let items = lines
            .iter()
            .map(|line| resolve_line(products, line))
            .collect::<Result<Vec<InvoiceItem>, ValidationError>>()?;

        let invoice = build_invoice(
            Some(customer),
            items,
            settings.tax_rate,
            settings.is_tax_enabled,
        )?
        .with_status(status);

        let invoice = self.upsert(invoice).await?;

        info!(
            serial = %invoice.serial_number,
            customer = %invoice.customer_name,
            total = %invoice.total,
            status = %invoice.status,
            "Invoice created"
        );
        Ok(invoice)
    }
}

fn resolve_line(products: &[Product], line: &InvoiceLine) -> Result<InvoiceItem, ValidationError> {
    let product = products
        .iter()
        .find(|p| p.id == line.product_id)
        .ok_or_else(|| ValidationError::unresolved("Product", &line.product_id))?;

    build_invoice_item(Some(product), line.quantity, line.unit_price)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};

    fn catalog() -> (Vec<Customer>, Vec<Product>) {
        let customers = vec![Customer::new("Acme")];
        let products = vec![
            Product::new("Pen", "P1", Money::from_major(2)),
            Product::new("Pad", "P2", Money::from_cents(350)),
        ];
        (customers, products)
    }

    #[tokio::test]
    async fn test_create_without_tax() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (customers, products) = catalog();
        let settings = AppSettings {
            is_tax_enabled: false,
            ..AppSettings::default()
        };

        let lines = [
            InvoiceLine::new(&products[0].id, 3),
            InvoiceLine::new(&products[1].id, 2).with_unit_price(Money::from_major(3)),
        ];

        let invoice = db
            .invoices()
            .create(&customers, &products, &settings, &customers[0].id, &lines, InvoiceStatus::Unpaid)
            .await
            .unwrap();

        assert_eq!(invoice.items.len(), 2);
        assert_eq!(invoice.items[1].total, Money::from_major(6));
        assert_eq!(invoice.subtotal, Money::from_major(12));
        assert!(invoice.tax.is_zero());
        assert_eq!(invoice.total, Money::from_major(12));
        assert_eq!(invoice.status, InvoiceStatus::Unpaid);
    }

    #[tokio::test]
    async fn test_unknown_product_writes_nothing() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (customers, products) = catalog();

        let err = db
            .invoices()
            .create(
                &customers,
                &products,
                &AppSettings::default(),
                &customers[0].id,
                &[InvoiceLine::new("gone", 1)],
                InvoiceStatus::Paid,
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DbError::Validation(ValidationError::Unresolved { .. })
        ));
        assert!(db.invoices().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invoice_survives_product_removal() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let acme = db.customers().upsert(Customer::new("Acme")).await.unwrap();
        let pen = db
            .products()
            .upsert(Product::new("Pen", "P1", Money::from_major(2)))
            .await
            .unwrap();

        let invoice = db
            .create_invoice(&acme.id, &[InvoiceLine::new(&pen.id, 1)], InvoiceStatus::Paid)
            .await
            .unwrap();

        db.products().remove(&pen.id).await.unwrap();
        db.customers().remove(&acme.id).await.unwrap();

        let stored = db.invoices().get(&invoice.id).await.unwrap().unwrap();
        assert_eq!(stored.items[0].product_display_name(&[]), "Pen");
        assert_eq!(stored.customer_display_name(&[]), "Acme");
    }

    #[tokio::test]
    async fn test_oversized_quantity_rejected_without_writing() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let acme = db.customers().upsert(Customer::new("Acme")).await.unwrap();
        let pen = db
            .products()
            .upsert(Product::new("Pen", "P1", Money::from_major(2)))
            .await
            .unwrap();

        let err = db
            .create_invoice(
                &acme.id,
                &[InvoiceLine::new(&pen.id, i64::MAX / 10)],
                InvoiceStatus::Paid,
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DbError::Validation(ValidationError::OutOfRange { .. })
        ));
        assert!(db.invoices().is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn test_zero_price_override_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (customers, products) = catalog();

        let err = db
            .invoices()
            .create(
                &customers,
                &products,
                &AppSettings::default(),
                &customers[0].id,
                &[InvoiceLine::new(&products[0].id, 2).with_unit_price(Money::zero())],
                InvoiceStatus::Paid,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::Validation(_)));
        assert!(db.invoices().is_empty().await.unwrap());
    }
}

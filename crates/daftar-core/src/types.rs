//! # Domain Types
//!
//! Core domain types used throughout Daftar.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │     Invoice     │   │    Expense      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  sku (business) │   │  serial_number  │   │  date           │       │
//! │  │  sale_price     │   │  customer_id ───┼──►│  amount         │       │
//! │  │  quantity       │   │  items[] ───────┼──► product_id      │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ Customer        │   │  InvoiceStatus  │   │  AppSettings    │       │
//! │  │ Supplier        │   │  Draft / Unpaid │   │  (singleton)    │       │
//! │  │ (both Party)    │   │  Partially/Paid │   │  tax_rate       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Weak References
//! Invoices point at customers and products by id and carry a copy of the
//! referenced name taken when the invoice was built. Deleting a customer or
//! product never touches invoices; a dangling id is expected, and display
//! code falls back to the copied name.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::ops::{Deref, DerefMut};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::ValidationResult;
use crate::money::Money;
use crate::validation;

/// Generates a fresh record identifier (UUID v4).
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// The device's local calendar date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

// =============================================================================
// Slot Keys
// =============================================================================

/// Names of the six durable slots.
///
/// The string form is both the storage key and the snapshot field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotKey {
    Settings,
    Products,
    Invoices,
    Expenses,
    Customers,
    Suppliers,
}

impl SlotKey {
    /// Every slot, in snapshot field order.
    pub const ALL: [SlotKey; 6] = [
        SlotKey::Settings,
        SlotKey::Products,
        SlotKey::Invoices,
        SlotKey::Expenses,
        SlotKey::Customers,
        SlotKey::Suppliers,
    ];

    /// Storage key for this slot.
    pub const fn as_str(&self) -> &'static str {
        match self {
            SlotKey::Settings => "settings",
            SlotKey::Products => "products",
            SlotKey::Invoices => "invoices",
            SlotKey::Expenses => "expenses",
            SlotKey::Customers => "customers",
            SlotKey::Suppliers => "suppliers",
        }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Entity
// =============================================================================

/// A record that lives in one of the typed collections.
///
/// ## Contract
/// - `id()` is unique within the collection and never changes
/// - `validate()` checks the record's own invariants; checks that need the
///   rest of the collection (e.g. SKU uniqueness) live in the store
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// The slot holding this entity's collection.
    const COLLECTION: SlotKey;

    /// Human-readable entity name for errors and logs.
    const NAME: &'static str;

    /// The record's identifier.
    fn id(&self) -> &str;

    /// Checks the record's invariants.
    fn validate(&self) -> ValidationResult<()>;

    /// A business key that must be unique within the collection, as
    /// `(field, value)`. Most entities have none.
    fn unique_key(&self) -> Option<(&'static str, &str)> {
        None
    }
}

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01%, so 1500 bps = 15%. Integer bps keep tax math in
/// integers. On the wire the rate is a percentage number (`15`, `8.25`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, TS)]
#[ts(export)]
pub struct TaxRate(#[ts(type = "number")] u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage.
    ///
    /// Negative and non-finite inputs yield `None`.
    pub fn from_percentage(pct: f64) -> Option<Self> {
        if !pct.is_finite() || pct < 0.0 || pct > u32::MAX as f64 / 100.0 {
            return None;
        }
        Some(TaxRate((pct * 100.0).round() as u32))
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

impl Serialize for TaxRate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % 100 == 0 {
            serializer.serialize_u32(self.0 / 100)
        } else {
            serializer.serialize_f64(self.percentage())
        }
    }
}

impl<'de> Deserialize<'de> for TaxRate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pct = f64::deserialize(deserializer)?;
        TaxRate::from_percentage(pct)
            .ok_or_else(|| de::Error::custom(format!("invalid tax rate: {}", pct)))
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product kept in inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Unique identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Stock Keeping Unit - business identifier, unique per collection.
    pub sku: String,

    /// Barcode (EAN-13, UPC-A, etc.).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub barcode: Option<String>,

    /// What the business pays per unit.
    pub purchase_price: Money,

    /// What the customer pays per unit. Always positive.
    pub sale_price: Money,

    /// Units on hand.
    pub quantity: i64,

    /// Stock level at or below which the product needs reordering.
    pub reorder_point: i64,
}

impl Product {
    /// Creates a product with a fresh id and zero stock.
    pub fn new(name: impl Into<String>, sku: impl Into<String>, sale_price: Money) -> Self {
        Product {
            id: new_id(),
            name: name.into(),
            sku: sku.into(),
            barcode: None,
            purchase_price: Money::zero(),
            sale_price,
            quantity: 0,
            reorder_point: 0,
        }
    }

    /// Low stock: `quantity <= reorder_point`.
    ///
    /// Exposed for collaborators; nothing in the store raises alerts.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.reorder_point
    }
}

impl Entity for Product {
    const COLLECTION: SlotKey = SlotKey::Products;
    const NAME: &'static str = "Product";

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> ValidationResult<()> {
        validation::validate_product(self)
    }

    fn unique_key(&self) -> Option<(&'static str, &str)> {
        Some(("sku", &self.sku))
    }
}

// =============================================================================
// Parties (Customer / Supplier)
// =============================================================================

/// Contact record shared by customers and suppliers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Party {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub tax_number: Option<String>,
}

impl Party {
    /// Creates a party with a fresh id and no contact details.
    pub fn new(name: impl Into<String>) -> Self {
        Party {
            id: new_id(),
            name: name.into(),
            phone: None,
            address: None,
            email: None,
            tax_number: None,
        }
    }
}

/// Generates a collection-specific wrapper around [`Party`].
///
/// Customers and suppliers share a shape but not an identity space.
macro_rules! party_entity {
    ($(#[$meta:meta])* $name:ident, $slot:expr, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
        #[serde(transparent)]
        #[ts(export)]
        pub struct $name(pub Party);

        impl $name {
            /// Creates a record with a fresh id.
            pub fn new(name: impl Into<String>) -> Self {
                $name(Party::new(name))
            }
        }

        impl From<Party> for $name {
            fn from(party: Party) -> Self {
                $name(party)
            }
        }

        impl Deref for $name {
            type Target = Party;

            fn deref(&self) -> &Party {
                &self.0
            }
        }

        impl DerefMut for $name {
            fn deref_mut(&mut self) -> &mut Party {
                &mut self.0
            }
        }

        impl AsRef<Party> for $name {
            fn as_ref(&self) -> &Party {
                &self.0
            }
        }

        impl Entity for $name {
            const COLLECTION: SlotKey = $slot;
            const NAME: &'static str = $label;

            fn id(&self) -> &str {
                &self.0.id
            }

            fn validate(&self) -> ValidationResult<()> {
                validation::validate_party(&self.0)
            }
        }
    };
}

party_entity!(
    /// Someone the business invoices.
    Customer,
    SlotKey::Customers,
    "Customer"
);

party_entity!(
    /// Someone the business buys from.
    Supplier,
    SlotKey::Suppliers,
    "Supplier"
);

// =============================================================================
// Invoice Status
// =============================================================================

/// Payment state of an invoice.
///
/// Legacy backups spell the states in Arabic; those labels decode too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Not yet counted toward revenue.
    #[default]
    #[serde(alias = "مسودة")]
    Draft,
    #[serde(alias = "غير مدفوعة")]
    Unpaid,
    #[serde(alias = "مدفوعة جزئياً")]
    PartiallyPaid,
    #[serde(alias = "مدفوعة بالكامل")]
    Paid,
}

impl InvoiceStatus {
    /// Storage spelling.
    pub const fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Unpaid => "unpaid",
            InvoiceStatus::PartiallyPaid => "partially_paid",
            InvoiceStatus::Paid => "paid",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Invoice Item
// =============================================================================

/// A line on an invoice.
/// Uses snapshot pattern to freeze the product name at build time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InvoiceItem {
    /// Weak reference; may dangle after the product is deleted.
    pub product_id: String,
    /// Product name when the line was built (frozen).
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Money,
    /// quantity × unit_price.
    pub total: Money,
}

impl InvoiceItem {
    /// Name to show for this line.
    ///
    /// Prefers the live product when it still exists, otherwise the frozen
    /// name. A missing product is not an error.
    pub fn product_display_name<'a>(&'a self, products: &'a [Product]) -> &'a str {
        products
            .iter()
            .find(|p| p.id == self.product_id)
            .map(|p| p.name.as_str())
            .unwrap_or(&self.product_name)
    }
}

// =============================================================================
// Invoice
// =============================================================================

/// A sales invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Invoice {
    pub id: String,
    /// Human-readable number, e.g. `INV-482913`. Not guaranteed unique.
    pub serial_number: String,
    /// Weak reference; may dangle after the customer is deleted.
    pub customer_id: String,
    /// Customer name when the invoice was built (frozen).
    pub customer_name: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    #[serde(default)]
    pub items: Vec<InvoiceItem>,
    pub subtotal: Money,
    pub tax: Money,
    /// subtotal + tax.
    pub total: Money,
    pub status: InvoiceStatus,
}

impl Invoice {
    /// Draft invoices never count toward revenue.
    #[inline]
    pub fn is_draft(&self) -> bool {
        self.status == InvoiceStatus::Draft
    }

    /// Sets the status (builder style).
    pub fn with_status(mut self, status: InvoiceStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the invoice date (builder style).
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// Customer name to show, falling back to the frozen name.
    pub fn customer_display_name<'a>(&'a self, customers: &'a [Customer]) -> &'a str {
        customers
            .iter()
            .find(|c| c.id == self.customer_id)
            .map(|c| c.name.as_str())
            .unwrap_or(&self.customer_name)
    }
}

impl Entity for Invoice {
    const COLLECTION: SlotKey = SlotKey::Invoices;
    const NAME: &'static str = "Invoice";

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> ValidationResult<()> {
        validation::validate_invoice(self)
    }
}

// =============================================================================
// Expense
// =============================================================================

/// Default category for new expenses ("general expenses").
pub const DEFAULT_EXPENSE_CATEGORY: &str = "مصاريف عامة";

/// Money going out of the business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Expense {
    pub id: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub description: String,
    /// Always positive.
    pub amount: Money,
    /// Free text.
    pub category: String,
}

impl Expense {
    /// Creates an expense dated today in the default category.
    pub fn new(description: impl Into<String>, amount: Money) -> Self {
        Expense {
            id: new_id(),
            date: today(),
            description: description.into(),
            amount,
            category: DEFAULT_EXPENSE_CATEGORY.to_string(),
        }
    }
}

impl Entity for Expense {
    const COLLECTION: SlotKey = SlotKey::Expenses;
    const NAME: &'static str = "Expense";

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> ValidationResult<()> {
        validation::validate_expense(self)
    }
}

// =============================================================================
// Settings
// =============================================================================

/// Business-wide settings (singleton, edited in place).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AppSettings {
    pub business_name: String,
    pub business_address: String,
    /// Currency symbol used for display.
    pub currency: String,
    pub tax_rate: TaxRate,
    /// Gate for applying and showing `tax_rate`.
    pub is_tax_enabled: bool,
}

impl AppSettings {
    /// The rate to apply to new invoices (zero when tax is disabled).
    pub fn effective_tax_rate(&self) -> TaxRate {
        if self.is_tax_enabled {
            self.tax_rate
        } else {
            TaxRate::zero()
        }
    }
}

impl Default for AppSettings {
    /// First-run settings: a Saudi business with 15% VAT enabled.
    fn default() -> Self {
        AppSettings {
            business_name: "نشاطي التجاري".to_string(),
            business_address: "العنوان".to_string(),
            currency: "ر.س".to_string(),
            tax_rate: TaxRate::from_bps(1500),
            is_tax_enabled: true,
        }
    }
}

// =============================================================================
// Dataset & Snapshot
// =============================================================================

/// Everything the store holds, loaded into memory.
///
/// This is the view a collaborator rebuilds after a restore.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub settings: AppSettings,
    pub products: Vec<Product>,
    pub invoices: Vec<Invoice>,
    pub expenses: Vec<Expense>,
    pub customers: Vec<Customer>,
    pub suppliers: Vec<Supplier>,
}

/// Portable backup document.
///
/// ```json
/// { "settings": {..}, "products": [..], "invoices": [..], "expenses": [..],
///   "customers": [..], "suppliers": [..], "backupDate": "2024-01-01T09:30:00Z" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Snapshot {
    pub settings: AppSettings,
    pub products: Vec<Product>,
    pub invoices: Vec<Invoice>,
    pub expenses: Vec<Expense>,
    pub customers: Vec<Customer>,
    pub suppliers: Vec<Supplier>,
    #[ts(as = "String")]
    pub backup_date: DateTime<Utc>,
}

impl Snapshot {
    /// Stamps a dataset with its creation time.
    pub fn new(dataset: Dataset, backup_date: DateTime<Utc>) -> Self {
        Snapshot {
            settings: dataset.settings,
            products: dataset.products,
            invoices: dataset.invoices,
            expenses: dataset.expenses,
            customers: dataset.customers,
            suppliers: dataset.suppliers,
            backup_date,
        }
    }

    /// Drops the timestamp.
    pub fn into_dataset(self) -> Dataset {
        Dataset {
            settings: self.settings,
            products: self.products,
            invoices: self.invoices,
            expenses: self.expenses,
            customers: self.customers,
            suppliers: self.suppliers,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

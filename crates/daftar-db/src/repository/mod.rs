//! # Repository Module
//!
//! Typed access to the durable slots.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Caller                                                                │
//! │       │                                                                 │
//! │       │  db.products().upsert(pen)                                     │
//! │       ▼                                                                 │
//! │  CollectionRepository<Product>                                         │
//! │  ├── list / get / len                                                  │
//! │  ├── upsert / remove                                                   │
//! │  └── find_by_sku / search / low_stock   (product.rs)                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PersistentSlot<Vec<Product>>  ──►  slots table, key "products"        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CollectionRepository`] - Generic list/upsert/remove for every collection
//! - [`ProductRepository`] - SKU lookup, search, low stock
//! - [`CustomerRepository`] / [`SupplierRepository`] - Search
//! - [`InvoiceRepository`] - Invoice construction from stored references
//! - [`SettingsRepository`] - Business settings singleton
//! - [`ReportRepository`] - Financial reports

pub mod collection;
pub mod invoice;
pub mod party;
pub mod product;
pub mod report;
pub mod settings;

pub use collection::CollectionRepository;
pub use invoice::{InvoiceLine, InvoiceRepository};
pub use party::{CustomerRepository, SupplierRepository};
pub use product::ProductRepository;
pub use report::ReportRepository;
pub use settings::SettingsRepository;

//! # daftar-core: Pure Business Logic for Daftar
//!
//! This crate holds the bookkeeping rules of Daftar as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Daftar Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Presentation (collaborator, e.g. CLI)              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ daftar-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ references │  │ reports   │  │   │
//! │  │   │  Product  │  │   Money   │  │ build_     │  │ income    │  │   │
//! │  │   │  Invoice  │  │  TaxRate  │  │  invoice   │  │ statement │  │   │
//! │  │   └───────────┘  └───────────┘  └────────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  daftar-db (Storage Layer)                      │   │
//! │  │         persistent slots, collections, backup / restore         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Invoice, Expense, AppSettings, Snapshot)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Validation error type
//! - [`validation`] - Record invariants
//! - [`references`] - Invoice construction with name snapshots
//! - [`reports`] - Income statement, period totals, activity feed
//! - [`search`] - List filters
//!
//! ## Example Usage
//!
//! ```rust
//! use daftar_core::money::Money;
//! use daftar_core::references::{build_invoice, build_invoice_item};
//! use daftar_core::reports::income_statement;
//! use daftar_core::types::{Customer, InvoiceStatus, Product, TaxRate};
//!
//! let pen = Product::new("Pen", "P1", Money::from_major(2));
//! let acme = Customer::new("Acme");
//!
//! let line = build_invoice_item(Some(&pen), 50, None).unwrap();
//! let invoice = build_invoice(Some(&acme), vec![line], TaxRate::from_bps(1500), true)
//!     .unwrap()
//!     .with_status(InvoiceStatus::Paid);
//!
//! let statement = income_statement(&[invoice], &[]);
//! assert_eq!(statement.total_revenue, Money::from_major(115));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod references;
pub mod reports;
pub mod search;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{ValidationError, ValidationResult};
pub use money::Money;
pub use types::*;

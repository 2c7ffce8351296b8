//! # Product Repository
//!
//! Product-specific queries on top of [`CollectionRepository`].
//!
//! ## Key Operations
//! - Lookup by SKU (the business identifier)
//! - Case-insensitive search over name and SKU
//! - Low-stock listing

use tracing::debug;

use daftar_core::reports;
use daftar_core::search::filter_products;
use daftar_core::Product;

use super::collection::CollectionRepository;
use crate::error::DbResult;

/// Products live in a [`CollectionRepository`]; this is its name at call sites.
pub type ProductRepository = CollectionRepository<Product>;

impl CollectionRepository<Product> {
    /// Finds a product by exact SKU.
    pub async fn find_by_sku(&self, sku: &str) -> DbResult<Option<Product>> {
        let products = self.list().await?;
        Ok(products.into_iter().find(|p| p.sku == sku))
    }

    /// Products whose name or SKU contains `term`, ignoring case.
    ///
    /// An empty term lists everything.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let pens = db.products().search("pen").await?;
    /// ```
    pub async fn search(&self, term: &str) -> DbResult<Vec<Product>> {
        let term = term.trim();
        let products = self.list().await?;

        let found: Vec<Product> = filter_products(&products, term)
            .into_iter()
            .cloned()
            .collect();

        debug!(term = %term, count = found.len(), "Product search");
        Ok(found)
    }

    /// Products at or below their reorder point, in storage order.
    pub async fn low_stock(&self) -> DbResult<Vec<Product>> {
        let products = self.list().await?;
        Ok(reports::low_stock(&products).into_iter().cloned().collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};
    use daftar_core::{Money, Product};

    async fn seeded() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let mut cola = Product::new("Cola 330ml", "COLA-330", Money::from_cents(250));
        cola.quantity = 40;
        cola.reorder_point = 10;
        repo.upsert(cola).await.unwrap();

        let mut pen = Product::new("Blue Pen", "PEN-01", Money::from_major(2));
        pen.quantity = 2;
        pen.reorder_point = 5;
        repo.upsert(pen).await.unwrap();

        db
    }

    #[tokio::test]
    async fn test_find_by_sku() {
        let db = seeded().await;

        let pen = db.products().find_by_sku("PEN-01").await.unwrap();
        assert_eq!(pen.map(|p| p.name), Some("Blue Pen".to_string()));
        assert!(db.products().find_by_sku("NOPE").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_ignores_case() {
        let db = seeded().await;

        let found = db.products().search("cola").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].sku, "COLA-330");

        let found = db.products().search("pen-").await.unwrap();
        assert_eq!(found.len(), 1);

        assert_eq!(db.products().search("").await.unwrap().len(), 2);
        assert!(db.products().search("tea").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_low_stock() {
        let db = seeded().await;

        let low = db.products().low_stock().await.unwrap();
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].sku, "PEN-01");
    }
}

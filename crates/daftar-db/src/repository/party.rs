//! # Customer and Supplier Repositories
//!
//! Both collections hold [`Party`](daftar_core::Party) records and share
//! one search: case-insensitive over name and phone.

use daftar_core::search::filter_parties;
use daftar_core::{Customer, Supplier};

use super::collection::CollectionRepository;
use crate::error::DbResult;

pub type CustomerRepository = CollectionRepository<Customer>;
pub type SupplierRepository = CollectionRepository<Supplier>;

impl CollectionRepository<Customer> {
    /// Customers whose name or phone contains `term`. Empty lists all.
    pub async fn search(&self, term: &str) -> DbResult<Vec<Customer>> {
        let customers = self.list().await?;
        Ok(filter_parties(&customers, term.trim())
            .into_iter()
            .cloned()
            .collect())
    }
}

impl CollectionRepository<Supplier> {
    /// Suppliers whose name or phone contains `term`. Empty lists all.
    pub async fn search(&self, term: &str) -> DbResult<Vec<Supplier>> {
        let suppliers = self.list().await?;
        Ok(filter_parties(&suppliers, term.trim())
            .into_iter()
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};
    use daftar_core::{Customer, Supplier};

    #[tokio::test]
    async fn test_search_by_name_and_phone() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let mut acme = Customer::new("Acme Trading");
        acme.phone = Some("0501234567".to_string());
        db.customers().upsert(acme).await.unwrap();
        db.customers().upsert(Customer::new("Globex")).await.unwrap();

        assert_eq!(db.customers().search("acme").await.unwrap().len(), 1);
        assert_eq!(db.customers().search("0501").await.unwrap().len(), 1);
        assert_eq!(db.customers().search("").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_suppliers_are_a_separate_collection() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        db.suppliers()
            .upsert(Supplier::new("Paper Mill"))
            .await
            .unwrap();

        assert_eq!(db.suppliers().search("paper").await.unwrap().len(), 1);
        assert!(db.customers().list().await.unwrap().is_empty());
    }
}

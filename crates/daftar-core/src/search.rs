//! Case-insensitive list filters used by the product and party screens.

use crate::types::{Party, Product};

/// Products whose name or SKU contains `term` (case-insensitive).
///
/// An empty or blank term matches everything.
pub fn filter_products<'a>(products: &'a [Product], term: &str) -> Vec<&'a Product> {
    let needle = term.trim().to_lowercase();
    products
        .iter()
        .filter(|p| {
            needle.is_empty()
                || p.name.to_lowercase().contains(&needle)
                || p.sku.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Parties whose name or phone contains `term` (case-insensitive).
pub fn filter_parties<'a, P>(parties: &'a [P], term: &str) -> Vec<&'a P>
where
    P: AsRef<Party>,
{
    let needle = term.trim().to_lowercase();
    parties
        .iter()
        .filter(|p| {
            let party = p.as_ref();
            needle.is_empty()
                || party.name.to_lowercase().contains(&needle)
                || party
                    .phone
                    .as_deref()
                    .is_some_and(|phone| phone.contains(&needle))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::Customer;

    #[test]
    fn test_filter_products_by_name_or_sku() {
        let products = vec![
            Product::new("Blue Pen", "PEN-1", Money::from_major(2)),
            Product::new("Notebook", "NB-7", Money::from_major(5)),
        ];

        assert_eq!(filter_products(&products, "pen").len(), 1);
        assert_eq!(filter_products(&products, "nb-").len(), 1);
        assert_eq!(filter_products(&products, "  ").len(), 2);
        assert!(filter_products(&products, "stapler").is_empty());
    }

    #[test]
    fn test_filter_parties() {
        let mut acme = Customer::new("Acme Trading");
        acme.phone = Some("0551234567".to_string());
        let customers = vec![acme, Customer::new("Zed")];

        assert_eq!(filter_parties(&customers, "acme").len(), 1);
        assert_eq!(filter_parties(&customers, "0551").len(), 1);
        assert_eq!(filter_parties(&customers, "").len(), 2);
    }
}

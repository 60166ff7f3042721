//! Catalog
//!
//! Products live in a single arena and are referenced everywhere else by [`ProductKey`],
//! so cart lines never alias the stock they reserve from.

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use slotmap::SlotMap;
use thiserror::Error;

use crate::products::{Product, ProductKey};

/// Errors related to catalog construction and lookups.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// A product is priced in a different currency from the catalog (product, product currency, catalog currency).
    #[error("Product {0} has currency {1}, but catalog has currency {2}")]
    CurrencyMismatch(String, &'static str, &'static str),

    /// A product's price or shipping fee is below zero.
    #[error("Product {0} has a negative price or shipping fee")]
    NegativePrice(String),

    /// A product with the same name is already in the catalog.
    #[error("Product {0} already exists")]
    DuplicateProduct(String),

    /// A key that does not belong to this catalog.
    #[error("Missing product")]
    MissingProduct(ProductKey),
}

/// Product catalog
#[derive(Debug)]
pub struct Catalog {
    products: SlotMap<ProductKey, Product>,
    keys: FxHashMap<String, ProductKey>,
    currency: &'static Currency,
}

impl Catalog {
    /// Create an empty catalog priced in the given currency.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            products: SlotMap::with_key(),
            keys: FxHashMap::default(),
            currency,
        }
    }

    /// Add a product to the catalog.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::CurrencyMismatch`]: the price or shipping fee is in another currency.
    /// - [`CatalogError::NegativePrice`]: the price or shipping fee is below zero.
    /// - [`CatalogError::DuplicateProduct`]: a product with the same name already exists.
    pub fn insert(&mut self, product: Product) -> Result<ProductKey, CatalogError> {
        for money in [product.price, product.shipping_fee] {
            let currency = money.currency();

            if currency != self.currency {
                return Err(CatalogError::CurrencyMismatch(
                    product.name,
                    currency.iso_alpha_code,
                    self.currency.iso_alpha_code,
                ));
            }

            if money.to_minor_units() < 0 {
                return Err(CatalogError::NegativePrice(product.name));
            }
        }

        if self.keys.contains_key(&product.name) {
            return Err(CatalogError::DuplicateProduct(product.name));
        }

        let name = product.name.clone();
        let key = self.products.insert(product);

        self.keys.insert(name, key);

        Ok(key)
    }

    /// Get a product by key.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::MissingProduct`] if the key is not in this catalog.
    pub fn get(&self, key: ProductKey) -> Result<&Product, CatalogError> {
        self.products
            .get(key)
            .ok_or(CatalogError::MissingProduct(key))
    }

    /// Get a product by key, mutably.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::MissingProduct`] if the key is not in this catalog.
    pub fn get_mut(&mut self, key: ProductKey) -> Result<&mut Product, CatalogError> {
        self.products
            .get_mut(key)
            .ok_or(CatalogError::MissingProduct(key))
    }

    /// Look up a product key by product name.
    pub fn key_of(&self, name: &str) -> Option<ProductKey> {
        self.keys.get(name).copied()
    }

    /// Iterate over all products.
    pub fn iter(&self) -> impl Iterator<Item = (ProductKey, &Product)> {
        self.products.iter()
    }

    /// Number of products in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Currency every product in the catalog is priced in.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// A zero amount in the catalog currency.
    #[must_use]
    pub fn zero(&self) -> Money<'static, Currency> {
        Money::from_minor(0, self.currency)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, USD};
    use testresult::TestResult;

    use crate::weight::Weight;

    use super::*;

    #[test]
    fn insert_and_lookup_by_key_and_name() -> TestResult {
        let mut catalog = Catalog::new(GBP);

        let key = catalog.insert(Product::new("Book", 10, Money::from_minor(5000, GBP)))?;

        assert_eq!(catalog.get(key)?.name, "Book");
        assert_eq!(catalog.key_of("Book"), Some(key));
        assert_eq!(catalog.key_of("Milk"), None);
        assert_eq!(catalog.len(), 1);

        Ok(())
    }

    #[test]
    fn insert_rejects_other_currencies() {
        let mut catalog = Catalog::new(GBP);

        let result = catalog.insert(Product::new("Book", 10, Money::from_minor(5000, USD)));

        assert_eq!(
            result,
            Err(CatalogError::CurrencyMismatch(
                "Book".to_string(),
                USD.iso_alpha_code,
                GBP.iso_alpha_code,
            ))
        );
        assert!(catalog.is_empty());
    }

    #[test]
    fn insert_rejects_negative_amounts() {
        let mut catalog = Catalog::new(GBP);

        let refund = catalog.insert(Product::new("Refund", 10, Money::from_minor(-5000, GBP)));
        let rebate = catalog.insert(
            Product::new("Rebate", 10, Money::from_minor(5000, GBP))
                .shipped(Weight::grams(100), Money::from_minor(-100, GBP)),
        );

        assert_eq!(refund, Err(CatalogError::NegativePrice("Refund".to_string())));
        assert_eq!(rebate, Err(CatalogError::NegativePrice("Rebate".to_string())));
        assert!(catalog.is_empty());
    }

    #[test]
    fn insert_rejects_duplicate_names() -> TestResult {
        let mut catalog = Catalog::new(GBP);

        catalog.insert(Product::new("Book", 10, Money::from_minor(5000, GBP)))?;
        let result = catalog.insert(Product::new("Book", 1, Money::from_minor(100, GBP)));

        assert_eq!(result, Err(CatalogError::DuplicateProduct("Book".to_string())));

        Ok(())
    }

    #[test]
    fn get_mut_changes_stock() -> TestResult {
        let mut catalog = Catalog::new(GBP);
        let key = catalog.insert(Product::new("Book", 10, Money::from_minor(5000, GBP)))?;

        catalog.get_mut(key)?.adjust_quantity(-3)?;

        assert_eq!(catalog.get(key)?.quantity, 7);

        Ok(())
    }

    #[test]
    fn missing_key_errors() {
        let catalog = Catalog::new(GBP);

        let result = catalog.get(ProductKey::default());

        assert!(matches!(result, Err(CatalogError::MissingProduct(_))));
    }
}

//! Fixtures

use std::{fs, path::PathBuf};

use jiff::Timestamp;
use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    catalog::{Catalog, CatalogError},
    customers::Customer,
    fixtures::{customers::CustomersFixture, products::ProductsFixture},
    products::{Product, ProductKey},
};

pub mod customers;
pub mod products;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Invalid expiry duration or timestamp
    #[error("Invalid expiry: {0}")]
    InvalidExpiry(String),

    /// Currency mismatch between fixtures
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Customer not found
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    /// No products loaded yet
    #[error("No products loaded; catalog unavailable")]
    NoProducts,

    /// Catalog rejected a product
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Catalog built from the loaded products
    catalog: Option<Catalog>,

    /// Fixture key -> catalog key mappings for lookups
    product_keys: FxHashMap<String, ProductKey>,

    /// Customers by fixture key
    customers: FxHashMap<String, Customer>,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            catalog: None,
            product_keys: FxHashMap::default(),
            customers: FxHashMap::default(),
            currency: None,
        }
    }

    /// Load products from a YAML fixture file, resolving relative expiries against the
    /// current time.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, a product is invalid, or the
    /// currencies don't match.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        self.load_products_at(name, Timestamp::now())
    }

    /// Load products from a YAML fixture file, resolving relative expiries against `now`.
    ///
    /// # Errors
    ///
    /// See [`Fixture::load_products`].
    pub fn load_products_at(
        &mut self,
        name: &str,
        now: Timestamp,
    ) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("products").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: ProductsFixture = serde_norway::from_str(&contents)?;

        for (key, product_fixture) in fixture.products {
            let product = product_fixture.into_product(now)?;
            let currency = self.check_currency(product.price.currency())?;

            let catalog = self
                .catalog
                .get_or_insert_with(|| Catalog::new(currency));

            let product_key = catalog.insert(product)?;

            self.product_keys.insert(key, product_key);
        }

        Ok(self)
    }

    /// Load customers from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, a balance is invalid, or the
    /// currencies don't match.
    pub fn load_customers(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("customers").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: CustomersFixture = serde_norway::from_str(&contents)?;

        for (key, customer_fixture) in fixture.customers {
            let customer = Customer::try_from(customer_fixture)?;

            self.check_currency(customer.balance().currency())?;
            self.customers.insert(key, customer);
        }

        Ok(self)
    }

    /// Load a complete fixture set (products and customers with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_products(name)?.load_customers(name)?;

        Ok(fixture)
    }

    /// Get the catalog built from the loaded products
    ///
    /// # Errors
    ///
    /// Returns an error if no products have been loaded.
    pub fn catalog(&self) -> Result<&Catalog, FixtureError> {
        self.catalog.as_ref().ok_or(FixtureError::NoProducts)
    }

    /// Get a product by its fixture key
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product(&self, key: &str) -> Result<&Product, FixtureError> {
        let product_key = self.product_key(key)?;

        self.catalog()?
            .get(product_key)
            .map_err(|_err| FixtureError::ProductNotFound(key.to_string()))
    }

    /// Get a product key by its fixture key
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product_key(&self, key: &str) -> Result<ProductKey, FixtureError> {
        self.product_keys
            .get(key)
            .copied()
            .ok_or_else(|| FixtureError::ProductNotFound(key.to_string()))
    }

    /// Get a customer by their fixture key
    ///
    /// # Errors
    ///
    /// Returns an error if the customer is not found.
    pub fn customer(&self, key: &str) -> Result<&Customer, FixtureError> {
        self.customers
            .get(key)
            .ok_or_else(|| FixtureError::CustomerNotFound(key.to_string()))
    }

    /// Remove a customer from the fixture and hand over ownership
    ///
    /// # Errors
    ///
    /// Returns an error if the customer is not found.
    pub fn take_customer(&mut self, key: &str) -> Result<Customer, FixtureError> {
        self.customers
            .remove(key)
            .ok_or_else(|| FixtureError::CustomerNotFound(key.to_string()))
    }

    /// Consume the fixture, keeping only the catalog
    ///
    /// # Errors
    ///
    /// Returns an error if no products have been loaded.
    pub fn into_catalog(self) -> Result<Catalog, FixtureError> {
        self.catalog.ok_or(FixtureError::NoProducts)
    }

    fn check_currency(
        &mut self,
        currency: &'static Currency,
    ) -> Result<&'static Currency, FixtureError> {
        match self.currency {
            Some(existing) if existing != currency => Err(FixtureError::CurrencyMismatch(
                existing.iso_alpha_code.to_string(),
                currency.iso_alpha_code.to_string(),
            )),
            Some(existing) => Ok(existing),
            None => {
                self.currency = Some(currency);

                Ok(currency)
            }
        }
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

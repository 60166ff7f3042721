//! Customer Fixtures

use rustc_hash::FxHashMap;
use rusty_money::Money;
use serde::Deserialize;

use crate::{
    customers::Customer,
    fixtures::{FixtureError, products::parse_price},
};

/// Wrapper for customers in YAML
#[derive(Debug, Deserialize)]
pub struct CustomersFixture {
    /// Map of customer key -> customer fixture
    pub customers: FxHashMap<String, CustomerFixture>,
}

/// Customer Fixture
#[derive(Debug, Deserialize)]
pub struct CustomerFixture {
    /// Customer name
    pub name: String,

    /// Starting balance (e.g., "300.00 GBP")
    pub balance: String,
}

impl TryFrom<CustomerFixture> for Customer {
    type Error = FixtureError;

    fn try_from(fixture: CustomerFixture) -> Result<Self, Self::Error> {
        let (minor_units, currency) = parse_price(&fixture.balance)?;

        Ok(Customer::new(fixture.name, Money::from_minor(minor_units, currency)))
    }
}

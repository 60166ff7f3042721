//! Product Fixtures

use jiff::{SignedDuration, Timestamp};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use serde::Deserialize;

use crate::{fixtures::FixtureError, products::Product, weight::Weight};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Map of product key -> product fixture
    pub products: FxHashMap<String, ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product name
    pub name: String,

    /// Units in stock
    pub quantity: u32,

    /// Unit price (e.g., "50.00 GBP")
    pub price: String,

    /// Whether the product can be shipped
    #[serde(default)]
    pub shippable: bool,

    /// Unit weight in grams
    #[serde(default)]
    pub weight: u32,

    /// Flat shipping fee (e.g., "10.00 GBP"), zero when omitted
    #[serde(default)]
    pub shipping_fee: Option<String>,

    /// Expiry relative to load time (e.g., "24h", "-24h")
    #[serde(default)]
    pub expires_in: Option<String>,

    /// Absolute expiry (e.g., "2026-01-01T00:00:00Z")
    #[serde(default)]
    pub expires_at: Option<String>,
}

impl ProductFixture {
    /// Build the product, resolving relative expiries against `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if a price or expiry can't be parsed.
    pub fn into_product(self, now: Timestamp) -> Result<Product, FixtureError> {
        let (minor_units, currency) = parse_price(&self.price)?;
        let expires_at = parse_expiry(self.expires_in.as_deref(), self.expires_at.as_deref(), now)?;

        let price = Money::from_minor(minor_units, currency);
        let mut product = Product::new(self.name, self.quantity, price);

        if self.shippable {
            let fee = match self.shipping_fee {
                Some(fee) => {
                    let (minor_units, currency) = parse_price(&fee)?;

                    Money::from_minor(minor_units, currency)
                }
                None => Money::from_minor(0, currency),
            };

            product = product.shipped(Weight::grams(self.weight), fee);
        }

        if let Some(expires_at) = expires_at {
            product = product.expiring_at(expires_at);
        }

        Ok(product)
    }
}

/// Parse price string (e.g., "2.99 GBP") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal or is negative, or if the
/// currency code is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let minor_units = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    if minor_units < 0 {
        return Err(FixtureError::InvalidPrice(format!("Amount must not be negative, got: {s}")));
    }

    let currency = match *currency_code {
        "GBP" => GBP,
        "USD" => USD,
        "EUR" => EUR,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    Ok((minor_units, currency))
}

/// Resolve an expiry from either a duration relative to `now` or an absolute timestamp.
///
/// # Errors
///
/// Returns [`FixtureError::InvalidExpiry`] if both are given or either fails to parse.
pub fn parse_expiry(
    expires_in: Option<&str>,
    expires_at: Option<&str>,
    now: Timestamp,
) -> Result<Option<Timestamp>, FixtureError> {
    match (expires_in, expires_at) {
        (None, None) => Ok(None),
        (Some(_), Some(_)) => Err(FixtureError::InvalidExpiry(
            "set either expires_in or expires_at, not both".to_string(),
        )),
        (Some(duration), None) => {
            let duration = duration
                .parse::<SignedDuration>()
                .map_err(|err| FixtureError::InvalidExpiry(format!("{duration}: {err}")))?;

            now.checked_add(duration)
                .map(Some)
                .map_err(|err| FixtureError::InvalidExpiry(err.to_string()))
        }
        (None, Some(timestamp)) => timestamp
            .parse::<Timestamp>()
            .map(Some)
            .map_err(|err| FixtureError::InvalidExpiry(format!("{timestamp}: {err}"))),
    }
}

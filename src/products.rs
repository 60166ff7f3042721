//! Products

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use slotmap::new_key_type;
use thiserror::Error;

use crate::weight::Weight;

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// Errors raised when adjusting product stock.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProductError {
    /// A reservation asked for more units than are in stock.
    #[error("cannot take {requested} units of {product}, only {available} in stock")]
    StockUnderflow {
        /// Product name
        product: String,
        /// Units currently in stock
        available: u32,
        /// Units the adjustment tried to take
        requested: u64,
    },

    /// A restock would push the stock count past `u32::MAX`.
    #[error("restocking {product} by {delta} units overflows the stock counter")]
    StockOverflow {
        /// Product name
        product: String,
        /// Units the adjustment tried to add
        delta: i64,
    },
}

/// Product
#[derive(Debug, Clone)]
pub struct Product {
    /// Product name
    pub name: String,

    /// Units in stock
    pub quantity: u32,

    /// Unit price
    pub price: Money<'static, Currency>,

    /// When set, the product can no longer be sold from this instant on
    pub expires_at: Option<Timestamp>,

    /// Whether the product can be shipped
    pub shippable: bool,

    /// Weight of a single unit
    pub weight: Weight,

    /// Flat shipping fee charged per cart line of this product
    pub shipping_fee: Money<'static, Currency>,
}

impl Product {
    /// Create a non-expiring, non-shippable product with no weight.
    #[must_use]
    pub fn new(name: impl Into<String>, quantity: u32, price: Money<'static, Currency>) -> Self {
        Self {
            name: name.into(),
            quantity,
            price,
            expires_at: None,
            shippable: false,
            weight: Weight::ZERO,
            shipping_fee: Money::from_minor(0, price.currency()),
        }
    }

    /// Mark the product as expiring at the given instant.
    #[must_use]
    pub fn expiring_at(mut self, expires_at: Timestamp) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Mark the product as shippable with the given unit weight and shipping fee.
    #[must_use]
    pub fn shipped(mut self, weight: Weight, shipping_fee: Money<'static, Currency>) -> Self {
        self.shippable = true;
        self.weight = weight;
        self.shipping_fee = shipping_fee;
        self
    }

    /// Returns true if `requested` units can be taken without running out of stock.
    pub fn is_available(&self, requested: u32) -> bool {
        requested <= self.quantity
    }

    /// Returns true if the product has no expiry or has not reached it yet.
    pub fn is_not_expired(&self) -> bool {
        self.is_not_expired_at(Timestamp::now())
    }

    /// Expiry check against a caller-provided clock.
    pub fn is_not_expired_at(&self, now: Timestamp) -> bool {
        self.expires_at.is_none_or(|expires_at| now < expires_at)
    }

    /// Returns true if the product can be shipped.
    pub fn is_shippable(&self) -> bool {
        self.shippable
    }

    /// Apply a signed stock delta: positive restocks, negative reserves.
    ///
    /// Returns the new stock level.
    ///
    /// # Errors
    ///
    /// - [`ProductError::StockUnderflow`]: the delta would take more units than are in stock.
    /// - [`ProductError::StockOverflow`]: the delta would exceed the stock counter.
    pub fn adjust_quantity(&mut self, delta: i64) -> Result<u32, ProductError> {
        let adjusted = i64::from(self.quantity)
            .checked_add(delta)
            .ok_or_else(|| self.overflow(delta))?;

        if adjusted < 0 {
            return Err(ProductError::StockUnderflow {
                product: self.name.clone(),
                available: self.quantity,
                requested: delta.unsigned_abs(),
            });
        }

        self.quantity = u32::try_from(adjusted).map_err(|_err| self.overflow(delta))?;

        Ok(self.quantity)
    }

    fn overflow(&self, delta: i64) -> ProductError {
        ProductError::StockOverflow {
            product: self.name.clone(),
            delta,
        }
    }
}

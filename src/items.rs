//! Items
//!
//! A cart line: how many units of which product, and what they cost at the current unit price.

use std::cmp::Ordering;

use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    catalog::{Catalog, CatalogError},
    pricing::{PricingError, line_price},
    products::{Product, ProductError, ProductKey},
};

/// Errors raised while creating or updating an item.
#[derive(Debug, Error, PartialEq)]
pub enum ItemError {
    /// Items must have at least one unit.
    #[error("item quantity must be greater than zero")]
    ZeroQuantity,

    /// Not enough units in stock to increase the quantity.
    #[error("requested quantity of {product} isn't sufficient, available quantity is {available}")]
    InsufficientStock {
        /// Product name
        product: String,
        /// Units currently in stock
        available: u32,
        /// Additional units that were requested
        requested: u32,
    },

    /// Stock adjustment failed.
    #[error(transparent)]
    Product(#[from] ProductError),

    /// Line price could not be calculated.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Outcome of a successful quantity update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityUpdate {
    /// Extra units were reserved from stock.
    Increased {
        /// Units taken from stock
        reserved: u32,
    },

    /// Surplus units were returned to stock.
    Decreased {
        /// Units given back to stock
        returned: u32,
    },

    /// The requested quantity matched the current one.
    Unchanged,
}

/// A cart line item.
#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    product: ProductKey,
    quantity: u32,
    price: Money<'static, Currency>,
}

impl Item {
    /// Creates a line for `quantity` units of `product`.
    ///
    /// # Errors
    ///
    /// - [`ItemError::ZeroQuantity`]: the quantity is zero.
    /// - [`ItemError::Pricing`]: the line price overflows.
    pub fn new(key: ProductKey, product: &Product, quantity: u32) -> Result<Self, ItemError> {
        if quantity == 0 {
            return Err(ItemError::ZeroQuantity);
        }

        Ok(Self {
            product: key,
            quantity,
            price: line_price(product.price, quantity)?,
        })
    }

    /// Returns the product of the item
    pub fn product(&self) -> ProductKey {
        self.product
    }

    /// Returns the requested quantity
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns the line price (quantity x unit price at the last update)
    pub fn price(&self) -> Money<'static, Currency> {
        self.price
    }

    /// Shipping fee charged for this line.
    ///
    /// This is the product's flat per-unit fee regardless of quantity, or zero when the
    /// product can't be shipped.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::MissingProduct`] if the line's product isn't in `catalog`.
    pub fn shipping_fee(
        &self,
        catalog: &Catalog,
    ) -> Result<Money<'static, Currency>, CatalogError> {
        let product = catalog.get(self.product)?;

        if product.is_shippable() {
            Ok(product.shipping_fee)
        } else {
            Ok(Money::from_minor(0, product.shipping_fee.currency()))
        }
    }

    /// Change the requested quantity, reserving from or returning to `product`'s stock.
    ///
    /// `product` must be the product this item's key refers to.
    ///
    /// # Errors
    ///
    /// - [`ItemError::ZeroQuantity`]: the new quantity is zero.
    /// - [`ItemError::InsufficientStock`]: not enough stock for an increase; nothing changes.
    /// - [`ItemError::Product`] / [`ItemError::Pricing`]: stock or price arithmetic failed.
    pub fn update_quantity(
        &mut self,
        product: &mut Product,
        new_quantity: u32,
    ) -> Result<QuantityUpdate, ItemError> {
        if new_quantity == 0 {
            return Err(ItemError::ZeroQuantity);
        }

        let update = match new_quantity.cmp(&self.quantity) {
            Ordering::Greater => {
                let extra = new_quantity - self.quantity;

                if !product.is_available(extra) {
                    warn!(
                        product = %product.name,
                        available = product.quantity,
                        requested = extra,
                        "insufficient stock for quantity update"
                    );

                    return Err(ItemError::InsufficientStock {
                        product: product.name.clone(),
                        available: product.quantity,
                        requested: extra,
                    });
                }

                let price = self
                    .price
                    .add(line_price(product.price, extra)?)
                    .map_err(PricingError::from)?;

                product.adjust_quantity(-i64::from(extra))?;
                self.quantity = new_quantity;
                self.price = price;

                QuantityUpdate::Increased { reserved: extra }
            }
            Ordering::Less => {
                let surplus = self.quantity - new_quantity;
                let price = line_price(product.price, new_quantity)?;

                product.adjust_quantity(i64::from(surplus))?;
                self.quantity = new_quantity;
                self.price = price;

                QuantityUpdate::Decreased { returned: surplus }
            }
            Ordering::Equal => QuantityUpdate::Unchanged,
        };

        info!(product = %product.name, quantity = new_quantity, ?update, "item quantity updated");

        Ok(update)
    }
}

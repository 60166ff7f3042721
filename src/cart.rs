//! Cart
//!
//! The cart registry holds every customer's pending lines. Adding an item only validates it
//! against the catalog: stock is reserved by quantity updates, never by adds, so two
//! customers can both add the last unit of a product.

use std::io;

use jiff::Timestamp;
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    bill::{Bill, BillError},
    catalog::{Catalog, CatalogError},
    customers::{Customer, PaymentError},
    items::{Item, ItemError, QuantityUpdate},
    shipping::{ShippingError, ShippingService},
};

/// Errors related to cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The requested quantity is more than the quantity in stock.
    #[error("requested {requested} x {product}, but only {available} in stock")]
    InsufficientStock {
        /// Product name
        product: String,
        /// Units in stock
        available: u32,
        /// Units requested
        requested: u32,
    },

    /// The product is past its expiry.
    #[error("{0} is expired")]
    Expired(String),

    /// The customer's balance doesn't cover the bill; the cart is kept for a retry.
    #[error("balance isn't enough, remove some items from the cart and try again: {0}")]
    InsufficientBalance(PaymentError),

    /// No line at this position in the customer's cart.
    #[error("Item {0} not found")]
    ItemNotFound(usize),

    /// Error looking up a product.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Error updating an item.
    #[error(transparent)]
    Item(#[from] ItemError),

    /// Error pricing the shipment.
    #[error(transparent)]
    Shipping(#[from] ShippingError),

    /// Payment failed for a reason other than the balance.
    #[error(transparent)]
    Payment(PaymentError),

    /// Error totalling or writing the receipt.
    #[error(transparent)]
    Bill(#[from] BillError),
}

impl From<PaymentError> for CartError {
    fn from(error: PaymentError) -> Self {
        match error {
            PaymentError::InsufficientBalance { .. } => CartError::InsufficientBalance(error),
            other => CartError::Payment(other),
        }
    }
}

impl CartError {
    /// Returns true for business-rule rejections that leave the cart usable, as opposed to
    /// lookup, arithmetic or IO failures.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            CartError::InsufficientStock { .. }
                | CartError::Expired(_)
                | CartError::InsufficientBalance(_)
                | CartError::Item(ItemError::InsufficientStock { .. } | ItemError::ZeroQuantity)
        )
    }
}

/// One customer's pending lines.
#[derive(Debug, Default, Clone)]
pub struct CartEntry {
    /// Every line, in the order it was added
    items: Vec<Item>,

    /// Indexes into `items` of the lines that can be shipped
    shippable: SmallVec<[usize; 8]>,
}

impl CartEntry {
    /// Lines in the cart.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Lines in the cart that can be shipped.
    pub fn shippable_items(&self) -> impl Iterator<Item = &Item> + Clone {
        self.shippable.iter().filter_map(|&idx| self.items.get(idx))
    }

    fn push(&mut self, item: Item, shippable: bool) {
        if shippable {
            self.shippable.push(self.items.len());
        }

        self.items.push(item);
    }

    fn remove(&mut self, idx: usize) -> Option<Item> {
        if idx >= self.items.len() {
            return None;
        }

        let item = self.items.remove(idx);

        self.shippable.retain(|shipped| *shipped != idx);

        for shipped in &mut self.shippable {
            if *shipped > idx {
                *shipped -= 1;
            }
        }

        Some(item)
    }
}

/// Registry of every customer's cart.
#[derive(Debug, Default)]
pub struct Cart {
    entries: FxHashMap<String, CartEntry>,
}

impl Cart {
    /// Create an empty cart registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The customer's cart, if they have one.
    pub fn entry(&self, customer: &Customer) -> Option<&CartEntry> {
        self.entries.get(customer.name())
    }

    /// Lines in the customer's cart.
    pub fn items(&self, customer: &Customer) -> &[Item] {
        self.entry(customer)
            .map(CartEntry::items)
            .unwrap_or_default()
    }

    /// Shippable lines in the customer's cart.
    pub fn shippable_items(&self, customer: &Customer) -> impl Iterator<Item = &Item> + Clone {
        self.entry(customer)
            .into_iter()
            .flat_map(CartEntry::shippable_items)
    }

    /// Add an item to the customer's cart, checking expiry against the current time.
    ///
    /// # Errors
    ///
    /// See [`Cart::add_item_at`].
    pub fn add_item(
        &mut self,
        catalog: &Catalog,
        item: Item,
        customer: &Customer,
    ) -> Result<(), CartError> {
        self.add_item_at(catalog, item, customer, Timestamp::now())
    }

    /// Add an item to the customer's cart, checking expiry against `now`.
    ///
    /// Stock is checked but not reserved. The customer's cart is created on first use, even
    /// when the item is then rejected.
    ///
    /// # Errors
    ///
    /// - [`CartError::Catalog`]: the item's product isn't in the catalog.
    /// - [`CartError::InsufficientStock`]: more units requested than in stock.
    /// - [`CartError::Expired`]: the product is expired.
    pub fn add_item_at(
        &mut self,
        catalog: &Catalog,
        item: Item,
        customer: &Customer,
        now: Timestamp,
    ) -> Result<(), CartError> {
        let entry = self.entries.entry(customer.name().to_string()).or_default();
        let product = catalog.get(item.product())?;

        if !product.is_available(item.quantity()) {
            warn!(
                customer = customer.name(),
                product = %product.name,
                available = product.quantity,
                requested = item.quantity(),
                "requested quantity is more than quantity in stock"
            );

            return Err(CartError::InsufficientStock {
                product: product.name.clone(),
                available: product.quantity,
                requested: item.quantity(),
            });
        }

        if !product.is_not_expired_at(now) {
            warn!(customer = customer.name(), product = %product.name, "product is expired");

            return Err(CartError::Expired(product.name.clone()));
        }

        entry.push(item, product.is_shippable());

        info!(customer = customer.name(), product = %product.name, "added to cart");

        Ok(())
    }

    /// Change the quantity of a line in the customer's cart, reserving or returning stock.
    ///
    /// # Errors
    ///
    /// - [`CartError::ItemNotFound`]: no line at `idx`.
    /// - [`CartError::Catalog`]: the line's product isn't in the catalog.
    /// - [`CartError::Item`]: the update was rejected, e.g. for insufficient stock.
    pub fn update_item_quantity(
        &mut self,
        catalog: &mut Catalog,
        customer: &Customer,
        idx: usize,
        quantity: u32,
    ) -> Result<QuantityUpdate, CartError> {
        let item = self
            .entries
            .get_mut(customer.name())
            .and_then(|entry| entry.items.get_mut(idx))
            .ok_or(CartError::ItemNotFound(idx))?;

        let product = catalog.get_mut(item.product())?;

        Ok(item.update_quantity(product, quantity)?)
    }

    /// Remove a line from the customer's cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if there's no line at `idx`.
    pub fn remove_item(&mut self, customer: &Customer, idx: usize) -> Result<Item, CartError> {
        let item = self
            .entries
            .get_mut(customer.name())
            .and_then(|entry| entry.remove(idx))
            .ok_or(CartError::ItemNotFound(idx))?;

        info!(customer = customer.name(), idx, "removed from cart");

        Ok(item)
    }

    /// Bill the customer for everything in their cart and write the receipt to `out`.
    ///
    /// On success the customer's cart is emptied. A customer with no cart gets an empty bill.
    /// The receipt is rendered before the customer is charged; once the charge goes through
    /// a failure to write it is logged rather than returned, and the bill stays available
    /// through [`Customer::last_bill`] for a reprint.
    ///
    /// Returns the amount charged.
    ///
    /// # Errors
    ///
    /// Any error means nothing was charged and the cart is untouched.
    ///
    /// - [`CartError::InsufficientBalance`]: the customer can't afford the bill.
    /// - [`CartError::Shipping`] / [`CartError::Bill`]: the bill couldn't be priced or rendered.
    /// - [`CartError::Payment`]: the bill total is negative or in another currency.
    pub fn checkout(
        &mut self,
        catalog: &Catalog,
        customer: &mut Customer,
        mut out: impl io::Write,
    ) -> Result<Money<'static, Currency>, CartError> {
        let bill = self.bill(catalog, customer)?;

        let mut receipt = Vec::new();
        bill.write_to(&mut receipt, catalog)?;

        let charged = customer.checkout(bill).inspect_err(|error| {
            warn!(customer = customer.name(), %error, "checkout failed");
        })?;

        self.entries.remove(customer.name());

        info!(customer = customer.name(), %charged, "checkout complete");

        if let Err(error) = out.write_all(&receipt) {
            warn!(customer = customer.name(), %error, "failed to write receipt");
        }

        Ok(charged)
    }

    /// Build the bill the customer would pay right now, without charging them.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Shipping`] if the shipment can't be priced.
    pub fn bill(&self, catalog: &Catalog, customer: &Customer) -> Result<Bill, CartError> {
        let Some(entry) = self.entry(customer) else {
            return Ok(Bill::empty(catalog.currency()));
        };

        let shipping_fee = ShippingService::new(catalog, entry.shippable_items()).total_fees()?;

        Ok(Bill::new(
            entry.items.clone(),
            entry.shippable.clone(),
            shipping_fee,
            catalog.currency(),
        ))
    }
}

//! Scripted checkout walk-through.
//!
//! Exercises every cart path against a loaded fixture set: accepted and rejected adds,
//! successful and declined checkouts, and the quantity update rules.

use std::io::{self, Write};

use storefront::prelude::*;
use thiserror::Error;
use tracing::info;

/// Errors that abort the walk-through. Business-rule rejections are expected and never end up here.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// Fixture data is missing a product or customer.
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    /// Catalog lookup failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A line could not be created or updated.
    #[error(transparent)]
    Item(#[from] ItemError),

    /// A cart operation failed for a reason other than a rejection.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Writing to the output failed.
    #[error("Failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// Run the walk-through, writing banners and receipts to `out`.
///
/// # Errors
///
/// Returns an error if the fixture lacks a product or customer the walk-through uses, or if a
/// cart operation fails for a reason other than a business-rule rejection.
pub fn run(mut fixture: Fixture, out: &mut impl Write) -> Result<(), ScenarioError> {
    let book = fixture.product_key("book")?;
    let milk = fixture.product_key("milk")?;
    let laptop = fixture.product_key("laptop")?;
    let toy = fixture.product_key("toy")?;
    let toy_car = fixture.product_key("toy_car")?;
    let chocolate = fixture.product_key("chocolate")?;
    let coffee = fixture.product_key("coffee")?;

    let mut ali = fixture.take_customer("ali")?;
    let mut sara = fixture.take_customer("sara")?;
    let mut bob = fixture.take_customer("bob")?;
    let mut lina = fixture.take_customer("lina")?;

    let mut catalog = fixture.into_catalog()?;
    let mut cart = Cart::new();

    // valid, expired, over stock, not shippable
    for (product, quantity) in [(book, 2), (milk, 1), (toy, 10), (laptop, 1)] {
        add(&mut cart, &catalog, &ali, product, quantity)?;
    }

    checkout(&mut cart, &catalog, &mut ali, out)?;

    add(&mut cart, &catalog, &sara, toy, 2)?;
    checkout(&mut cart, &catalog, &mut sara, out)?;

    add(&mut cart, &catalog, &bob, laptop, 1)?;
    checkout(&mut cart, &catalog, &mut bob, out)?;

    // increase, insufficient stock, decrease, unchanged
    let mut toy_car_line = Item::new(toy_car, catalog.get(toy_car)?, 2)?;

    for quantity in [4, 10, 1, 1] {
        match toy_car_line.update_quantity(catalog.get_mut(toy_car)?, quantity) {
            Ok(_) | Err(ItemError::InsufficientStock { .. }) => {}
            Err(error) => return Err(error.into()),
        }
    }

    // Sara's declined cart is still there, so this retries rather than billing nothing
    checkout(&mut cart, &catalog, &mut sara, out)?;

    add(&mut cart, &catalog, &lina, chocolate, 3)?;
    add(&mut cart, &catalog, &lina, coffee, 2)?;
    checkout(&mut cart, &catalog, &mut lina, out)?;

    info!("all scenarios executed");

    Ok(())
}

fn add(
    cart: &mut Cart,
    catalog: &Catalog,
    customer: &Customer,
    product: ProductKey,
    quantity: u32,
) -> Result<(), ScenarioError> {
    let item = Item::new(product, catalog.get(product)?, quantity)?;

    allow_rejection(cart.add_item(catalog, item, customer))?;

    Ok(())
}

fn checkout(
    cart: &mut Cart,
    catalog: &Catalog,
    customer: &mut Customer,
    out: &mut impl Write,
) -> Result<(), ScenarioError> {
    writeln!(out, "\n=== {} ===\n", customer.name())?;

    allow_rejection(cart.checkout(catalog, customer, &mut *out))?;

    Ok(())
}

/// Rejections are logged by the cart itself; only failures propagate.
fn allow_rejection<T>(result: Result<T, CartError>) -> Result<Option<T>, CartError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(error) if error.is_rejection() => Ok(None),
        Err(error) => Err(error),
    }
}

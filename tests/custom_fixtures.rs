//! Integration tests driving the cart from fixture sets written on the fly.

use std::{fs, path::Path};

use rusty_money::{Money, iso::EUR};
use testresult::TestResult;

use storefront::prelude::*;

fn write_set(base: &Path, products: &str, customers: &str) -> std::io::Result<()> {
    fs::create_dir_all(base.join("products"))?;
    fs::create_dir_all(base.join("customers"))?;
    fs::write(base.join("products").join("shop.yml"), products)?;
    fs::write(base.join("customers").join("shop.yml"), customers)
}

const PRODUCTS: &str = "products:
  lamp:
    name: Lamp
    quantity: 1
    price: 40.00 EUR
    shippable: true
    weight: 1200
    shipping_fee: 7.50 EUR
  voucher:
    name: Voucher
    quantity: 100
    price: 25.00 EUR
    expires_at: 2000-01-01T00:00:00Z
";

const CUSTOMERS: &str = "customers:
  ana:
    name: Ana
    balance: 100.00 EUR
  ben:
    name: Ben
    balance: 100.00 EUR
";

fn load() -> Result<(tempfile::TempDir, Fixture), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;

    write_set(dir.path(), PRODUCTS, CUSTOMERS)?;

    let mut fixture = Fixture::with_base_path(dir.path());

    fixture.load_products("shop")?.load_customers("shop")?;

    Ok((dir, fixture))
}

#[test]
fn two_customers_can_both_add_the_last_unit() -> TestResult {
    let (_dir, mut fixture) = load()?;

    let lamp = fixture.product_key("lamp")?;
    let mut ana = fixture.take_customer("ana")?;
    let mut ben = fixture.take_customer("ben")?;
    let catalog = fixture.into_catalog()?;

    let mut cart = Cart::new();

    cart.add_item(&catalog, Item::new(lamp, catalog.get(lamp)?, 1)?, &ana)?;
    cart.add_item(&catalog, Item::new(lamp, catalog.get(lamp)?, 1)?, &ben)?;

    let mut receipts = Vec::new();

    cart.checkout(&catalog, &mut ana, &mut receipts)?;
    cart.checkout(&catalog, &mut ben, &mut receipts)?;

    assert_eq!(ana.balance(), Money::from_minor(5250, EUR));
    assert_eq!(ben.balance(), Money::from_minor(5250, EUR));
    assert_eq!(catalog.get(lamp)?.quantity, 1);

    let receipts = String::from_utf8(receipts)?;

    assert_eq!(receipts.matches("Total package weight 1.2kg").count(), 2);

    Ok(())
}

#[test]
fn absolute_expiry_in_the_past_rejects_adds() -> TestResult {
    let (_dir, mut fixture) = load()?;

    let voucher = fixture.product_key("voucher")?;
    let ana = fixture.take_customer("ana")?;
    let catalog = fixture.into_catalog()?;

    let mut cart = Cart::new();
    let result = cart.add_item(&catalog, Item::new(voucher, catalog.get(voucher)?, 1)?, &ana);

    assert!(matches!(result, Err(CartError::Expired(name)) if name == "Voucher"));
    assert!(cart.items(&ana).is_empty());
    assert!(cart.entry(&ana).is_some());

    Ok(())
}

#[test]
fn removing_the_shipped_line_drops_shipping() -> TestResult {
    let (_dir, mut fixture) = load()?;

    let lamp = fixture.product_key("lamp")?;
    let ana = fixture.take_customer("ana")?;
    let mut catalog = fixture.into_catalog()?;

    catalog.get_mut(lamp)?.quantity = 5;

    let mut cart = Cart::new();

    cart.add_item(&catalog, Item::new(lamp, catalog.get(lamp)?, 2)?, &ana)?;

    assert_eq!(cart.bill(&catalog, &ana)?.shipping_fee(), Money::from_minor(750, EUR));

    let removed = cart.remove_item(&ana, 0)?;

    assert_eq!(removed.quantity(), 2);
    assert_eq!(cart.bill(&catalog, &ana)?.total()?, Money::from_minor(0, EUR));

    Ok(())
}

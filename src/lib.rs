//! Storefront
//!
//! An in-memory storefront: a product catalog with stock and expiry, per-customer carts,
//! shipping for physical goods, and checkout against a customer balance with a printed
//! receipt.

pub mod bill;
pub mod cart;
pub mod catalog;
pub mod customers;
pub mod fixtures;
pub mod items;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod shipping;
pub mod weight;

//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    bill::{Bill, BillError},
    cart::{Cart, CartEntry, CartError},
    catalog::{Catalog, CatalogError},
    customers::{Customer, PaymentError},
    fixtures::{Fixture, FixtureError},
    items::{Item, ItemError, QuantityUpdate},
    pricing::PricingError,
    products::{Product, ProductError, ProductKey},
    shipping::{ShippingError, ShippingService},
    weight::Weight,
};

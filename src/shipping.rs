//! Shipping

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    catalog::{Catalog, CatalogError},
    items::Item,
    pricing::{PricingError, total_price},
    weight::Weight,
};

/// Errors raised while pricing a shipment.
#[derive(Debug, Error, PartialEq)]
pub enum ShippingError {
    /// A shipped item refers to a product missing from the catalog.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Fee arithmetic failed.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Computes weights and fees for the shippable lines of a cart.
#[derive(Debug)]
pub struct ShippingService<'a, I> {
    catalog: &'a Catalog,
    items: I,
}

impl<'a, I> ShippingService<'a, I>
where
    I: Iterator<Item = &'a Item> + Clone,
{
    /// Create a shipping service over the given shippable items.
    pub fn new(catalog: &'a Catalog, items: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            catalog,
            items: items.into_iter(),
        }
    }

    /// Total weight of the shipment: unit weight x quantity, summed over every line.
    ///
    /// # Errors
    ///
    /// Returns [`ShippingError::Catalog`] if an item's product is missing.
    pub fn total_weight(&self) -> Result<Weight, ShippingError> {
        self.items
            .clone()
            .map(|item| -> Result<Weight, ShippingError> {
                let product = self.catalog.get(item.product())?;

                Ok(product.weight.times(item.quantity()))
            })
            .sum()
    }

    /// Total shipping fee: the flat fee of every line, summed.
    ///
    /// # Errors
    ///
    /// - [`ShippingError::Catalog`]: an item's product is missing.
    /// - [`ShippingError::Pricing`]: a fee is in a different currency from the catalog.
    pub fn total_fees(&self) -> Result<Money<'static, Currency>, ShippingError> {
        let fees = self
            .items
            .clone()
            .map(|item| item.shipping_fee(self.catalog))
            .collect::<Result<Vec<_>, CatalogError>>()?;

        Ok(total_price(fees, self.catalog.currency())?)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;
    use testresult::TestResult;

    use crate::products::{Product, ProductKey};

    use super::*;

    fn shipped(
        catalog: &mut Catalog,
        name: &str,
        grams: u32,
        fee: i64,
    ) -> Result<ProductKey, CatalogError> {
        let product = Product::new(name, 10, Money::from_minor(5000, GBP))
            .shipped(Weight::grams(grams), Money::from_minor(fee, GBP));

        catalog.insert(product)
    }

    #[test]
    fn totals_over_shipped_items() -> TestResult {
        let mut catalog = Catalog::new(GBP);
        let chocolate = shipped(&mut catalog, "Chocolate", 100, 1000)?;
        let coffee = shipped(&mut catalog, "Coffee", 200, 500)?;

        let items = [
            Item::new(chocolate, catalog.get(chocolate)?, 3)?,
            Item::new(coffee, catalog.get(coffee)?, 2)?,
        ];

        let service = ShippingService::new(&catalog, &items);

        assert_eq!(service.total_weight()?, Weight::grams(700));
        assert_eq!(service.total_fees()?, Money::from_minor(1500, GBP));

        Ok(())
    }

    #[test]
    fn fees_do_not_scale_with_quantity() -> TestResult {
        let mut catalog = Catalog::new(GBP);
        let book = shipped(&mut catalog, "Book", 500, 1000)?;

        let items = [Item::new(book, catalog.get(book)?, 2)?];

        let service = ShippingService::new(&catalog, &items);

        assert_eq!(service.total_weight()?, Weight::grams(1000));
        assert_eq!(service.total_fees()?, Money::from_minor(1000, GBP));

        Ok(())
    }

    #[test]
    fn empty_shipment_is_free_and_weightless() -> TestResult {
        let catalog = Catalog::new(GBP);
        let items: [Item; 0] = [];

        let service = ShippingService::new(&catalog, &items);

        assert_eq!(service.total_weight()?, Weight::ZERO);
        assert_eq!(service.total_fees()?, Money::from_minor(0, GBP));

        Ok(())
    }

    #[test]
    fn missing_product_errors() -> TestResult {
        let mut catalog = Catalog::new(GBP);
        let book = shipped(&mut catalog, "Book", 500, 1000)?;
        let item = Item::new(book, catalog.get(book)?, 1)?;

        let other_catalog = Catalog::new(GBP);
        let items = [item];
        let service = ShippingService::new(&other_catalog, &items);

        assert!(matches!(
            service.total_weight(),
            Err(ShippingError::Catalog(CatalogError::MissingProduct(_)))
        ));

        Ok(())
    }
}

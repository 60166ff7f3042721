//! Bill
//!
//! An immutable snapshot of a customer's cart taken at checkout, with the receipt renderer.

use std::io;

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{Alignment, Style, Theme, object::Columns},
};
use thiserror::Error;

use crate::{
    catalog::{Catalog, CatalogError},
    items::Item,
    pricing::{PricingError, total_price},
    shipping::{ShippingError, ShippingService},
    weight::Weight,
};

/// Errors that can occur when totalling or rendering a bill.
#[derive(Debug, Error)]
pub enum BillError {
    /// Error summing line prices.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Error totalling the shipment.
    #[error(transparent)]
    Shipping(#[from] ShippingError),

    /// Error finding a product in the catalog.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// IO error
    #[error("Failed to write receipt: {0}")]
    Io(#[from] io::Error),
}

/// A customer's bill.
#[derive(Debug, Clone)]
pub struct Bill {
    /// Every line on the bill
    items: Vec<Item>,

    /// Indexes into `items` of the lines that get shipped
    shipped: SmallVec<[usize; 8]>,

    /// Shipping fee for the shipped lines
    shipping_fee: Money<'static, Currency>,

    /// Currency used for all monetary values
    currency: &'static Currency,
}

impl Bill {
    /// Create a new bill with the given details.
    ///
    /// Shipped indexes that don't point at a line are dropped.
    #[must_use]
    pub fn new(
        items: Vec<Item>,
        shipped: SmallVec<[usize; 8]>,
        shipping_fee: Money<'static, Currency>,
        currency: &'static Currency,
    ) -> Self {
        let shipped = shipped
            .into_iter()
            .filter(|&idx| idx < items.len())
            .collect();

        Self {
            items,
            shipped,
            shipping_fee,
            currency,
        }
    }

    /// An empty bill: no lines, no shipping.
    #[must_use]
    pub fn empty(currency: &'static Currency) -> Self {
        Self::new(
            Vec::new(),
            SmallVec::new(),
            Money::from_minor(0, currency),
            currency,
        )
    }

    /// Lines on the bill, in the order they were added.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Lines that get shipped.
    pub fn shipped_items(&self) -> impl Iterator<Item = &Item> + Clone {
        self.shipped.iter().filter_map(|&idx| self.items.get(idx))
    }

    /// Shipping fee for the shipped lines.
    #[must_use]
    pub fn shipping_fee(&self) -> Money<'static, Currency> {
        self.shipping_fee
    }

    /// Currency used for all monetary values.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Sum of every line price.
    ///
    /// # Errors
    ///
    /// Returns a [`BillError::Pricing`] if a line is priced in another currency.
    pub fn subtotal(&self) -> Result<Money<'static, Currency>, BillError> {
        Ok(total_price(
            self.items.iter().map(Item::price),
            self.currency,
        )?)
    }

    /// Subtotal plus shipping.
    ///
    /// # Errors
    ///
    /// Returns a [`BillError::Pricing`] if the amounts are in different currencies.
    pub fn total(&self) -> Result<Money<'static, Currency>, BillError> {
        Ok(total_price(
            [self.subtotal()?, self.shipping_fee],
            self.currency,
        )?)
    }

    /// Total weight of the shipped lines.
    ///
    /// # Errors
    ///
    /// Returns a [`BillError::Shipping`] if a shipped product is missing from the catalog.
    pub fn shipped_weight(&self, catalog: &Catalog) -> Result<Weight, BillError> {
        Ok(ShippingService::new(catalog, self.shipped_items()).total_weight()?)
    }

    /// Writes the receipt: shipment notice (if anything ships), line items, then totals.
    ///
    /// # Errors
    ///
    /// Returns an error if a product is missing from the catalog, the totals cannot be
    /// calculated, or the receipt cannot be written.
    pub fn write_to(&self, mut out: impl io::Write, catalog: &Catalog) -> Result<(), BillError> {
        if self.shipped.is_empty() {
            writeln!(out, "** Checkout receipt **")?;
        } else {
            write_shipment_notice(&mut out, self, catalog)?;
            writeln!(out, "\n** Checkout receipt **")?;
        }

        let mut builder = Builder::default();
        builder.push_record(["Qty", "Item", "Price"]);

        for item in &self.items {
            let product = catalog.get(item.product())?;

            builder.push_record([
                format!("{}x", item.quantity()),
                product.name.clone(),
                item.price().to_string(),
            ]);
        }

        writeln!(out, "{}", render_table(builder))?;

        write_summary(&mut out, self)
    }
}

fn write_shipment_notice(
    out: &mut impl io::Write,
    bill: &Bill,
    catalog: &Catalog,
) -> Result<(), BillError> {
    writeln!(out, "** Shipment notice **")?;

    let mut builder = Builder::default();
    builder.push_record(["Qty", "Item", "Weight"]);

    for item in bill.shipped_items() {
        let product = catalog.get(item.product())?;
        let grams = product.weight.times(item.quantity()).as_grams().normalize();

        builder.push_record([
            format!("{}x", item.quantity()),
            product.name.clone(),
            format!("{grams}g"),
        ]);
    }

    writeln!(out, "{}", render_table(builder))?;
    writeln!(out, "Total package weight {}", bill.shipped_weight(catalog)?)?;

    Ok(())
}

fn render_table(builder: Builder) -> String {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    table.with(theme);
    table.modify(Columns::new(2..3), Alignment::right());

    table.to_string()
}

fn write_summary(out: &mut impl io::Write, bill: &Bill) -> Result<(), BillError> {
    let lines = [
        ("Subtotal", bill.subtotal()?.to_string()),
        ("Shipping", bill.shipping_fee.to_string()),
        ("Amount", bill.total()?.to_string()),
    ];

    let value_width = lines
        .iter()
        .map(|(_, value)| value.chars().count())
        .max()
        .unwrap_or_default();

    for (label, value) in lines {
        writeln!(out, "{label:>9}  {value:>value_width$}")?;
    }

    Ok(())
}

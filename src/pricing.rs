//! Pricing

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

/// Errors that can occur while calculating prices.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// The price does not fit in the minor unit counter.
    #[error("price of {quantity} x {unit_price} overflows")]
    Overflow {
        /// Unit price being multiplied
        unit_price: String,
        /// Quantity the unit price was multiplied by
        quantity: u32,
    },

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Calculates the price of `quantity` units at `unit_price`.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the result does not fit in minor units.
pub fn line_price(
    unit_price: Money<'static, Currency>,
    quantity: u32,
) -> Result<Money<'static, Currency>, PricingError> {
    unit_price
        .to_minor_units()
        .checked_mul(i64::from(quantity))
        .map(|minor| Money::from_minor(minor, unit_price.currency()))
        .ok_or_else(|| PricingError::Overflow {
            unit_price: unit_price.to_string(),
            quantity,
        })
}

/// Sums a sequence of amounts, starting from zero in `currency`.
///
/// # Errors
///
/// Returns [`PricingError::Money`] if any amount is in a different currency.
pub fn total_price(
    amounts: impl IntoIterator<Item = Money<'static, Currency>>,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PricingError> {
    let total = amounts
        .into_iter()
        .try_fold(Money::from_minor(0, currency), |acc, amount| acc.add(amount))?;

    Ok(total)
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, USD};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn line_price_multiplies_unit_price() -> TestResult {
        let price = line_price(Money::from_minor(5000, GBP), 2)?;

        assert_eq!(price, Money::from_minor(10_000, GBP));

        Ok(())
    }

    #[test]
    fn line_price_reports_overflow() {
        let result = line_price(Money::from_minor(i64::MAX, GBP), 2);

        assert!(matches!(result, Err(PricingError::Overflow { quantity: 2, .. })));
    }

    #[test]
    fn test_total_price() -> TestResult {
        let amounts = [Money::from_minor(100, GBP), Money::from_minor(200, GBP)];

        assert_eq!(total_price(amounts, GBP)?, Money::from_minor(300, GBP));

        Ok(())
    }

    #[test]
    fn test_total_price_empty() -> TestResult {
        assert_eq!(total_price([], GBP)?, Money::from_minor(0, GBP));

        Ok(())
    }

    #[test]
    fn test_total_price_currency_mismatch() {
        let amounts = [Money::from_minor(100, GBP), Money::from_minor(200, USD)];

        assert!(matches!(
            total_price(amounts, GBP),
            Err(PricingError::Money(MoneyError::CurrencyMismatch { .. }))
        ));
    }
}

//! Customers

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::bill::{Bill, BillError};

/// Errors raised when a customer pays.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// The balance doesn't cover the amount due.
    #[error("balance of {balance} isn't enough to pay {amount}")]
    InsufficientBalance {
        /// Balance at the time of payment
        balance: String,
        /// Amount that was due
        amount: String,
    },

    /// Payments can't be negative.
    #[error("cannot pay a negative amount of {0}")]
    NegativeAmount(String),

    /// The amount is in a different currency from the balance.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// The bill total could not be calculated.
    #[error(transparent)]
    Bill(#[from] BillError),
}

/// A customer with a cash balance and a history of paid bills.
#[derive(Debug, Clone)]
pub struct Customer {
    name: String,
    balance: Money<'static, Currency>,
    bills: Vec<Bill>,
}

impl Customer {
    /// Create a customer with the given starting balance.
    #[must_use]
    pub fn new(name: impl Into<String>, balance: Money<'static, Currency>) -> Self {
        Self {
            name: name.into(),
            balance,
            bills: Vec::new(),
        }
    }

    /// Customer name, which also identifies their cart.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current balance.
    #[must_use]
    pub fn balance(&self) -> Money<'static, Currency> {
        self.balance
    }

    /// Bills paid so far, oldest first.
    #[must_use]
    pub fn bills(&self) -> &[Bill] {
        &self.bills
    }

    /// Deduct `amount` from the balance if it covers it.
    ///
    /// # Errors
    ///
    /// - [`PaymentError::NegativeAmount`]: the amount is below zero; nothing changes.
    /// - [`PaymentError::InsufficientBalance`]: the amount exceeds the balance; nothing changes.
    /// - [`PaymentError::Money`]: the amount is in another currency.
    pub fn pay(&mut self, amount: Money<'static, Currency>) -> Result<(), PaymentError> {
        if amount.to_minor_units() < 0 {
            return Err(PaymentError::NegativeAmount(amount.to_string()));
        }

        let remaining = self.balance.sub(amount)?;

        if remaining.to_minor_units() < 0 {
            return Err(PaymentError::InsufficientBalance {
                balance: self.balance.to_string(),
                amount: amount.to_string(),
            });
        }

        self.balance = remaining;

        Ok(())
    }

    /// Most recently paid bill.
    #[must_use]
    pub fn last_bill(&self) -> Option<&Bill> {
        self.bills.last()
    }

    /// Pay the bill total and keep the bill on record.
    ///
    /// Returns the amount charged.
    ///
    /// # Errors
    ///
    /// Returns a [`PaymentError`] if the bill can't be totalled or paid; the bill is not recorded.
    pub fn checkout(&mut self, bill: Bill) -> Result<Money<'static, Currency>, PaymentError> {
        let total = bill.total()?;

        self.pay(total)?;
        self.bills.push(bill);

        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, USD};
    use smallvec::smallvec;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn pay_deducts_when_affordable() -> TestResult {
        let mut customer = Customer::new("Ali", Money::from_minor(30_000, GBP));

        customer.pay(Money::from_minor(6000, GBP))?;

        assert_eq!(customer.balance(), Money::from_minor(24_000, GBP));

        Ok(())
    }

    #[test]
    fn pay_exact_balance_succeeds() -> TestResult {
        let mut customer = Customer::new("Ali", Money::from_minor(6000, GBP));

        customer.pay(Money::from_minor(6000, GBP))?;

        assert_eq!(customer.balance(), Money::from_minor(0, GBP));

        Ok(())
    }

    #[test]
    fn pay_rejects_when_short() {
        let mut customer = Customer::new("Sara", Money::from_minor(5000, GBP));

        let result = customer.pay(Money::from_minor(6000, GBP));

        assert!(matches!(
            result,
            Err(PaymentError::InsufficientBalance { .. })
        ));
        assert_eq!(customer.balance(), Money::from_minor(5000, GBP));
    }

    #[test]
    fn pay_rejects_negative_amounts() {
        let mut customer = Customer::new("Ali", Money::from_minor(1000, GBP));

        let result = customer.pay(Money::from_minor(-10_000, GBP));

        assert!(matches!(result, Err(PaymentError::NegativeAmount(_))));
        assert_eq!(customer.balance(), Money::from_minor(1000, GBP));
    }

    #[test]
    fn checkout_rejects_negative_bill() {
        let mut customer = Customer::new("Ali", Money::from_minor(1000, GBP));
        let bill = Bill::new(Vec::new(), smallvec![], Money::from_minor(-10_000, GBP), GBP);

        let result = customer.checkout(bill);

        assert!(matches!(result, Err(PaymentError::NegativeAmount(_))));
        assert!(customer.bills().is_empty());
        assert_eq!(customer.balance(), Money::from_minor(1000, GBP));
    }

    #[test]
    fn pay_rejects_other_currencies() {
        let mut customer = Customer::new("Bob", Money::from_minor(5000, GBP));

        let result = customer.pay(Money::from_minor(100, USD));

        assert!(matches!(result, Err(PaymentError::Money(_))));
        assert_eq!(customer.balance(), Money::from_minor(5000, GBP));
    }

    #[test]
    fn checkout_records_paid_bill() -> TestResult {
        let mut customer = Customer::new("Lina", Money::from_minor(100_000, GBP));
        let bill = Bill::new(Vec::new(), smallvec![], Money::from_minor(1500, GBP), GBP);

        let charged = customer.checkout(bill)?;

        assert_eq!(charged, Money::from_minor(1500, GBP));
        assert_eq!(customer.bills().len(), 1);
        assert!(customer.last_bill().is_some());
        assert_eq!(customer.balance(), Money::from_minor(98_500, GBP));

        Ok(())
    }

    #[test]
    fn failed_checkout_leaves_no_trace() {
        let mut customer = Customer::new("Sara", Money::from_minor(1000, GBP));
        let bill = Bill::new(Vec::new(), smallvec![], Money::from_minor(1500, GBP), GBP);

        let result = customer.checkout(bill);

        assert!(matches!(
            result,
            Err(PaymentError::InsufficientBalance { .. })
        ));
        assert!(customer.bills().is_empty());
        assert_eq!(customer.balance(), Money::from_minor(1000, GBP));
    }
}

//! Customer records and the balance rules applied to them at the counter.
use serde::Serialize;
use thiserror::Error;

use crate::bank::types::{AccountNumber, CustomerName, Money, format_money};

fn serialize_money<S>(money: &Money, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&format_money(*money))
}

fn display_money(money: &Money) -> String {
    format_money(*money)
}

/// A customer waiting in, or being served from, the queue.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct Customer {
    /// The customer's name, truncated to the maximum name length.
    name: CustomerName,

    /// The account the customer transacts against.
    #[serde(rename = "account")]
    account_number: AccountNumber,

    /// The current balance. Always equal to `deposited - withdrawn`.
    #[serde(serialize_with = "serialize_money")]
    balance: Money,

    /// Everything deposited during this visit.
    #[serde(rename = "deposit", serialize_with = "serialize_money")]
    deposited: Money,

    /// Everything withdrawn during this visit.
    #[serde(rename = "withdraw", serialize_with = "serialize_money")]
    withdrawn: Money,
}

impl Customer {
    /// Creates a customer with all monetary fields zeroed.
    pub fn new(name: impl Into<CustomerName>, account_number: AccountNumber) -> Self {
        Customer {
            name: name.into(),
            account_number,
            ..Default::default()
        }
    }

    /// Gets the customer's name.
    pub fn get_name(&self) -> &CustomerName {
        &self.name
    }

    /// Gets the account number.
    pub fn get_account_number(&self) -> AccountNumber {
        self.account_number
    }

    /// Gets the current balance.
    pub fn get_balance(&self) -> Money {
        self.balance
    }

    /// Gets the total deposited during this visit.
    pub fn get_deposited(&self) -> Money {
        self.deposited
    }

    /// Gets the total withdrawn during this visit.
    pub fn get_withdrawn(&self) -> Money {
        self.withdrawn
    }

    /// Deposits the specified amount. Returns an error if the amount is not positive.
    pub fn deposit(&mut self, amount: Money) -> Result<(), TransactionError> {
        if amount <= 0 {
            return Err(TransactionError::InvalidAmount);
        }
        let balance = self
            .balance
            .checked_add(amount)
            .ok_or(TransactionError::BalanceOverflow)?;
        let deposited = self
            .deposited
            .checked_add(amount)
            .ok_or(TransactionError::BalanceOverflow)?;
        self.balance = balance;
        self.deposited = deposited;
        Ok(())
    }

    /// Withdraws the specified amount. Returns an error if the amount is not positive
    /// or exceeds the balance.
    pub fn withdraw(&mut self, amount: Money) -> Result<(), TransactionError> {
        if amount <= 0 {
            return Err(TransactionError::InvalidAmount);
        }
        if amount > self.balance {
            return Err(TransactionError::InsufficientFunds);
        }
        self.balance -= amount;
        self.withdrawn += amount;
        Ok(())
    }
}

/// Errors that can occur while transacting for a customer.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TransactionError {
    #[error("Amount must be positive")]
    InvalidAmount,
    #[error("Amount must be at least {}", display_money(.minimum))]
    BelowMinimum { minimum: Money },
    #[error("Insufficient balance")]
    InsufficientFunds,
    #[error("Amount exceeds the largest supported balance")]
    BalanceOverflow,
}

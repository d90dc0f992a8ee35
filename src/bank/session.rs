//! A teller session: one customer taken off the queue, served, then finalized.
use log::{debug, warn};

use crate::bank::{
    Customer, CustomerQueue, Ledger, LedgerEntry, LedgerError, Money, QueueError,
    TransactionError,
};

/// The customer currently at the counter.
///
/// The session owns the record outright, so a dequeued customer can only ever be served
/// by one session, and nothing can put them back in line.
#[derive(Debug)]
pub struct TellerSession {
    customer: Customer,
}

/// Outcome of [`TellerSession::finish`].
///
/// The record is returned whether or not it reached the ledger.
#[derive(Debug)]
pub struct Finished {
    pub customer: Customer,
    pub persisted: Result<(), LedgerError>,
}

impl TellerSession {
    /// Starts serving the customer at the front of the queue.
    pub fn begin(queue: &mut CustomerQueue) -> Result<Self, QueueError> {
        let customer = queue.dequeue()?;
        debug!(
            "Serving {} (account {})",
            customer.get_name(),
            customer.get_account_number()
        );
        Ok(TellerSession { customer })
    }

    /// Read-only view of the customer being served.
    pub fn customer(&self) -> &Customer {
        &self.customer
    }

    /// Deposits `amount` and returns the new balance.
    pub fn deposit(&mut self, amount: Money) -> Result<Money, TransactionError> {
        self.customer.deposit(amount).inspect_err(|e| {
            warn!(
                "Deposit of {amount} rejected for account {}: {e}",
                self.customer.get_account_number()
            )
        })?;
        Ok(self.customer.get_balance())
    }

    /// Withdraws `amount` and returns the new balance.
    pub fn withdraw(&mut self, amount: Money) -> Result<Money, TransactionError> {
        self.customer.withdraw(amount).inspect_err(|e| {
            warn!(
                "Withdrawal of {amount} rejected for account {}: {e}",
                self.customer.get_account_number()
            )
        })?;
        Ok(self.customer.get_balance())
    }

    pub fn view_balance(&self) -> Money {
        self.customer.get_balance()
    }

    /// Ends the session and hands the record to the ledger.
    pub fn finish<L: Ledger + ?Sized>(self, ledger: &mut L) -> Finished {
        let persisted = ledger.append(&LedgerEntry::from(&self.customer));
        if let Err(e) = &persisted {
            warn!(
                "Could not persist account {}: {e}",
                self.customer.get_account_number()
            );
        }
        Finished {
            customer: self.customer,
            persisted,
        }
    }
}

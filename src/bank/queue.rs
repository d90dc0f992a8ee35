//! The bounded first-in-first-out line of customers waiting for the teller.
use std::num::NonZeroUsize;

use log::debug;
use thiserror::Error;

use crate::bank::Customer;

/// A fixed-capacity FIFO of waiting customers backed by a ring buffer.
///
/// The capacity bounds how many customers wait at the same time. Slots freed by
/// [`CustomerQueue::dequeue`] are reused, so any number of customers can pass through
/// over the queue's lifetime.
pub struct CustomerQueue {
    /// Ring storage. Occupied slots are `head..head + len`, wrapping at the end.
    slots: Vec<Option<Customer>>,
    /// Index of the customer at the front of the line.
    head: usize,
    /// Number of customers currently waiting.
    len: usize,
}

impl CustomerQueue {
    /// Creates an empty queue that holds at most `capacity` waiting customers.
    pub fn new(capacity: NonZeroUsize) -> Self {
        CustomerQueue {
            slots: (0..capacity.get()).map(|_| None).collect(),
            head: 0,
            len: 0,
        }
    }

    /// Gets the most customers that can wait at once.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Gets the number of customers waiting.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if nobody is waiting.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true if the queue holds as many customers as its capacity.
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Adds a customer to the back of the line.
    /// Returns an error, leaving the queue untouched, if the queue is full.
    pub fn enqueue(&mut self, customer: Customer) -> Result<(), QueueError> {
        if self.is_full() {
            return Err(QueueError::QueueFull);
        }
        let tail = (self.head + self.len) % self.capacity();
        debug!(
            "Enqueued account {} at slot {tail} ({} waiting)",
            customer.get_account_number(),
            self.len + 1
        );
        self.slots[tail] = Some(customer);
        self.len += 1;
        Ok(())
    }

    /// Removes and returns the customer at the front of the line.
    /// Returns an error if nobody is waiting.
    pub fn dequeue(&mut self) -> Result<Customer, QueueError> {
        if self.is_empty() {
            return Err(QueueError::QueueEmpty);
        }
        let customer = self.slots[self.head]
            .take()
            .ok_or(QueueError::QueueEmpty)?;
        self.head = (self.head + 1) % self.capacity();
        self.len -= 1;
        if self.is_empty() {
            self.head = 0;
        }
        debug!(
            "Dequeued account {} ({} waiting)",
            customer.get_account_number(),
            self.len
        );
        Ok(customer)
    }

    /// Returns the customer at the front of the line without removing them.
    pub fn peek(&self) -> Option<&Customer> {
        if self.is_empty() {
            return None;
        }
        self.slots[self.head].as_ref()
    }

    /// Iterates over waiting customers in the order they will be served.
    pub fn iter(&self) -> impl Iterator<Item = &Customer> {
        (0..self.len).filter_map(move |offset| {
            self.slots[(self.head + offset) % self.capacity()].as_ref()
        })
    }
}

/// Errors raised at the queue boundary.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum QueueError {
    #[error("Queue is full. Cannot add more customers")]
    QueueFull,
    #[error("No customers in queue")]
    QueueEmpty,
}

//! Teller module for the customer queue, the per-customer session, and the ledger.
mod customer;
mod ledger;
mod queue;
mod session;
mod types;

pub use customer::*;
pub use ledger::*;
pub use queue::*;
pub use session::*;
pub use types::*;

//! Summaries of served customers: a CSV report of the current run, and a readout of
//! the ledger written by earlier runs.
use std::{io, path::Path};

use crate::bank::{Customer, LedgerEntry, Money, format_money};

/// Writes one CSV row per customer, with a header row.
pub fn write_report<W: io::Write>(writer: W, customers: &[Customer]) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(writer);
    for customer in customers {
        writer.serialize(customer)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_report_to_path(path: &Path, customers: &[Customer]) -> Result<(), csv::Error> {
    let file = std::fs::File::create(path)?;
    write_report(file, customers)
}

/// Prints every ledger entry followed by the number of customers and the money moved.
pub fn write_ledger_summary<W: io::Write>(mut writer: W, entries: &[LedgerEntry]) -> io::Result<()> {
    for entry in entries {
        writeln!(writer, "{entry}")?;
    }
    let deposited: Money = entries.iter().map(|e| e.deposited).sum();
    let withdrawn: Money = entries.iter().map(|e| e.withdrawn).sum();
    writeln!(
        writer,
        "Customers: {}, Total Deposit: {}, Total Withdraw: {}",
        entries.len(),
        format_money(deposited),
        format_money(withdrawn)
    )?;
    writer.flush()
}

//! The append-only log of finalized customers.
//!
//! Each line reads
//! `Name: <string>, Account Number: <int>, Balance: <float>, Deposit: <float>, Withdraw: <float>`
//! with money rendered to two decimals.
use std::{
    fmt,
    fs::OpenOptions,
    io::{self, Write},
    path::{Path, PathBuf},
    str::FromStr,
};

use log::info;
use thiserror::Error;

use crate::bank::{
    Customer,
    types::{AccountNumber, Money, format_money, money_from_f64},
};

/// Default location of the customer details log.
pub const DEFAULT_LEDGER_PATH: &str = "customer_details.txt";

/// Destination for customers once their session has finished.
pub trait Ledger {
    /// Appends one record. Failure must leave the caller's in-memory record untouched.
    fn append(&mut self, entry: &LedgerEntry) -> Result<(), LedgerError>;

    /// Human readable location, shown after a successful save.
    fn location(&self) -> String;
}

impl<L: Ledger + ?Sized> Ledger for &mut L {
    fn append(&mut self, entry: &LedgerEntry) -> Result<(), LedgerError> {
        (**self).append(entry)
    }

    fn location(&self) -> String {
        (**self).location()
    }
}

/// A ledger backed by a flat text file opened in append mode for every write.
pub struct FileLedger {
    path: PathBuf,
}

impl FileLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileLedger { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Ledger for FileLedger {
    fn append(&mut self, entry: &LedgerEntry) -> Result<(), LedgerError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| LedgerError::Open {
                path: self.path.clone(),
                source,
            })?;
        writeln!(file, "{entry}").map_err(|source| LedgerError::Write {
            path: self.path.clone(),
            source,
        })?;
        info!(
            "Appended account {} to {}",
            entry.account_number,
            self.path.display()
        );
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// One line of the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub name: String,
    pub account_number: AccountNumber,
    pub balance: Money,
    pub deposited: Money,
    pub withdrawn: Money,
}

impl From<&Customer> for LedgerEntry {
    fn from(customer: &Customer) -> Self {
        LedgerEntry {
            name: customer.get_name().as_str().to_owned(),
            account_number: customer.get_account_number(),
            balance: customer.get_balance(),
            deposited: customer.get_deposited(),
            withdrawn: customer.get_withdrawn(),
        }
    }
}

impl fmt::Display for LedgerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Name: {}, Account Number: {}, Balance: {}, Deposit: {}, Withdraw: {}",
            self.name,
            self.account_number,
            format_money(self.balance),
            format_money(self.deposited),
            format_money(self.withdrawn),
        )
    }
}

fn parse_field<'a>(part: Option<&'a str>, label: &'static str) -> Result<&'a str, LedgerError> {
    part.and_then(|p| p.strip_prefix(label))
        .map(str::trim)
        .ok_or(LedgerError::MissingField(label))
}

fn parse_money(value: &str, label: &'static str) -> Result<Money, LedgerError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(money_from_f64)
        .ok_or(LedgerError::InvalidValue(label))
}

impl FromStr for LedgerEntry {
    type Err = LedgerError;

    /// Parses a ledger line. The name may itself contain commas, so the numeric tail is
    /// located from the right.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_end_matches(['\r', '\n']);
        let rest = line
            .strip_prefix("Name: ")
            .ok_or(LedgerError::MissingField("Name: "))?;
        let split = rest
            .rfind(", Account Number: ")
            .ok_or(LedgerError::MissingField("Account Number: "))?;
        let name = &rest[..split];
        let mut parts = rest[split + 2..].split(", ");

        let account_number = parse_field(parts.next(), "Account Number: ")?
            .parse::<AccountNumber>()
            .map_err(|_| LedgerError::InvalidValue("Account Number: "))?;
        let balance = parse_money(parse_field(parts.next(), "Balance: ")?, "Balance: ")?;
        let deposited = parse_money(parse_field(parts.next(), "Deposit: ")?, "Deposit: ")?;
        let withdrawn = parse_money(parse_field(parts.next(), "Withdraw: ")?, "Withdraw: ")?;
        if parts.next().is_some() {
            return Err(LedgerError::TrailingData);
        }

        Ok(LedgerEntry {
            name: name.to_string(),
            account_number,
            balance,
            deposited,
            withdrawn,
        })
    }
}

/// Reads every entry of a ledger file, skipping blank lines.
pub fn read_entries(path: impl AsRef<Path>) -> Result<Vec<LedgerEntry>, LedgerError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| LedgerError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::parse)
        .collect()
}

/// Errors that can occur while writing or reading the ledger.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Error opening file {}: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },
    #[error("Error writing to file {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("Ledger line is missing field `{0}`")]
    MissingField(&'static str),
    #[error("Ledger line has an invalid value for `{0}`")]
    InvalidValue(&'static str),
    #[error("Ledger line has unexpected trailing data")]
    TrailingData,
}

#[cfg(test)]
impl Ledger for Vec<LedgerEntry> {
    fn append(&mut self, entry: &LedgerEntry) -> Result<(), LedgerError> {
        self.push(entry.clone());
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

//! Types used throughout the teller system.
use std::fmt;

use serde::Serialize;

/// Decimal precision for monetary values.
/// This is used to convert floating-point values to fixed-point representation.
pub const DECIMAL_PRECISION: f64 = 10000.0;

/// Longest customer name kept, in characters. Anything past it is dropped.
pub const MAX_NAME_LENGTH: usize = 49;

/// Default number of customers that may wait in the queue at once.
pub const DEFAULT_CAPACITY: usize = 100;

/// Default smallest deposit the teller accepts at the counter.
pub const DEFAULT_MIN_DEPOSIT: f64 = 500.0;

/// Account number type. Not checked for uniqueness.
pub type AccountNumber = i32;

/// Money type, representing a fixed-point monetary value.
pub type Money = i64;

/// Converts a decimal amount into fixed-point money, rounding to the nearest unit.
pub fn money_from_f64(value: f64) -> Money {
    (value * DECIMAL_PRECISION).round() as Money
}

/// Converts fixed-point money back to a decimal amount.
pub fn money_to_f64(money: Money) -> f64 {
    money as f64 / DECIMAL_PRECISION
}

/// Renders money with two decimals, the way it appears in the ledger and on screen.
pub fn format_money(money: Money) -> String {
    format!("{:.2}", money_to_f64(money))
}

/// A customer name bounded to [`MAX_NAME_LENGTH`] characters.
///
/// Construction is lossy: longer input is truncated on a character boundary.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct CustomerName(String);

impl CustomerName {
    pub fn new(name: &str) -> Self {
        CustomerName(name.chars().take(MAX_NAME_LENGTH).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CustomerName {
    fn from(name: &str) -> Self {
        CustomerName::new(name)
    }
}

impl fmt::Display for CustomerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_name_is_kept() {
        assert_eq!(CustomerName::new("Alice").as_str(), "Alice");
    }

    #[test]
    fn test_long_name_is_truncated() {
        let long = "x".repeat(80);
        assert_eq!(CustomerName::new(&long).as_str().len(), MAX_NAME_LENGTH);
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let long = "é".repeat(60);
        let name = CustomerName::new(&long);
        assert_eq!(name.as_str().chars().count(), MAX_NAME_LENGTH);
    }

    #[test]
    fn test_money_conversion() {
        assert_eq!(money_from_f64(800.0), 8_000_000);
        assert_eq!(money_from_f64(0.1), 1_000);
        assert_eq!(format_money(money_from_f64(1000.0)), "1000.00");
        assert_eq!(format_money(money_from_f64(12.5)), "12.50");
    }
}

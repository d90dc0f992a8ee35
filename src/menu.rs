//! Text menu driving the queue and the teller session.
//!
//! The loop has two states. `Idle` offers queue management, and `Serving` offers the
//! transactions for the customer at the counter. Input is read a whole line at a time,
//! so a malformed entry never leaves stray characters behind for the next prompt.
//! Rejections go to a separate error writer, normally stderr.
use std::{
    io::{self, BufRead, Write},
    str::FromStr,
};

use log::{debug, info};
use thiserror::Error;

use crate::bank::{
    AccountNumber, Customer, CustomerQueue, Ledger, Money, QueueError, TellerSession,
    DECIMAL_PRECISION, TransactionError, format_money, money_from_f64,
};

/// Input that could not be understood.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MalformedInput {
    #[error("Invalid input. Please enter a number")]
    Choice,
    #[error("Invalid account number format")]
    AccountNumber,
    #[error("Invalid amount format")]
    Amount,
    #[error("Amount has more than four decimal places")]
    AmountPrecision,
}

/// Where the interaction loop currently is.
enum MenuState {
    Idle,
    Serving(TellerSession),
    Exit,
}

/// Drives the teller's counter from a line-oriented reader and writer.
pub struct Teller<R, W, E, L> {
    input: R,
    output: W,
    errors: E,
    queue: CustomerQueue,
    ledger: L,
    min_deposit: Money,
    finalized: Vec<Customer>,
}

fn parse_number<T: FromStr>(line: &str, error: MalformedInput) -> Result<T, MalformedInput> {
    line.trim().parse().map_err(|_| error)
}

/// Parses a decimal amount, rejecting anything that is not a finite number.
///
/// Amounts finer than the money precision are rejected instead of rounded, so the
/// minimum and positivity checks always see exactly what was typed.
fn parse_amount(line: &str) -> Result<Money, MalformedInput> {
    let value: f64 = parse_number(line, MalformedInput::Amount)?;
    if !value.is_finite() {
        return Err(MalformedInput::Amount);
    }
    let scaled = value * DECIMAL_PRECISION;
    let tolerance = (scaled.abs() * f64::EPSILON * 4.0).max(1e-6);
    if (scaled - scaled.round()).abs() > tolerance {
        return Err(MalformedInput::AmountPrecision);
    }
    Ok(money_from_f64(value))
}

/// The counter's minimum deposit. Applied here rather than in [`Customer::deposit`],
/// which only requires a positive amount.
fn check_deposit_policy(amount: Money, minimum: Money) -> Result<(), TransactionError> {
    if amount < minimum {
        return Err(TransactionError::BelowMinimum { minimum });
    }
    Ok(())
}

impl<R: BufRead, W: Write, E: Write, L: Ledger> Teller<R, W, E, L> {
    pub fn new(
        input: R,
        output: W,
        errors: E,
        queue: CustomerQueue,
        ledger: L,
        min_deposit: Money,
    ) -> Self {
        Teller {
            input,
            output,
            errors,
            queue,
            ledger,
            min_deposit,
            finalized: Vec::new(),
        }
    }

    /// Runs until the user exits or input ends, and returns every customer finalized
    /// along the way.
    pub fn run(mut self) -> io::Result<Vec<Customer>> {
        let mut state = MenuState::Idle;
        loop {
            state = match state {
                MenuState::Idle => self.idle()?,
                MenuState::Serving(session) => self.serve(session)?,
                MenuState::Exit => break,
            };
        }
        writeln!(self.output, "Exiting system. Goodbye!")?;
        self.output.flush()?;
        self.errors.flush()?;
        Ok(self.finalized)
    }

    /// Prints `prompt` and reads one line. Returns `None` at end of input.
    fn prompt(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let len = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(len);
        Ok(Some(line))
    }

    /// Reports a rejection on the error writer.
    fn report(&mut self, message: impl std::fmt::Display) -> io::Result<()> {
        writeln!(self.errors, "{message}.")
    }

    fn idle(&mut self) -> io::Result<MenuState> {
        writeln!(self.output, "\nBank Transaction Menu:")?;
        writeln!(self.output, "1. Add Customer to Queue")?;
        writeln!(self.output, "2. Process Next Customer")?;
        writeln!(self.output, "3. Exit")?;
        writeln!(self.output, "4. View Queue")?;
        let Some(line) = self.prompt("Choose option: ")? else {
            return Ok(MenuState::Exit);
        };
        match parse_number::<u32>(&line, MalformedInput::Choice) {
            Ok(1) => self.add_customer(),
            Ok(2) => self.next_customer(),
            Ok(3) => Ok(MenuState::Exit),
            Ok(4) => {
                self.show_queue()?;
                Ok(MenuState::Idle)
            }
            Ok(_) => {
                self.report("Invalid option")?;
                Ok(MenuState::Idle)
            }
            Err(e) => {
                self.report(e)?;
                Ok(MenuState::Idle)
            }
        }
    }

    fn add_customer(&mut self) -> io::Result<MenuState> {
        if self.queue.is_full() {
            self.report(QueueError::QueueFull)?;
            return Ok(MenuState::Idle);
        }
        let Some(name) = self.prompt("Enter customer name: ")? else {
            return Ok(MenuState::Exit);
        };
        let Some(line) = self.prompt("Enter account number: ")? else {
            return Ok(MenuState::Exit);
        };
        let account_number: AccountNumber =
            match parse_number(&line, MalformedInput::AccountNumber) {
                Ok(number) => number,
                Err(e) => {
                    self.report(e)?;
                    return Ok(MenuState::Idle);
                }
            };

        let customer = Customer::new(name.as_str(), account_number);
        let name = customer.get_name().clone();
        match self.queue.enqueue(customer) {
            Ok(()) => writeln!(self.output, "Customer '{name}' added to the queue.")?,
            Err(e) => self.report(e)?,
        }
        Ok(MenuState::Idle)
    }

    fn next_customer(&mut self) -> io::Result<MenuState> {
        match TellerSession::begin(&mut self.queue) {
            Ok(session) => {
                let customer = session.customer();
                writeln!(
                    self.output,
                    "\nProcessing Customer: {}, Account Number: {}",
                    customer.get_name(),
                    customer.get_account_number()
                )?;
                Ok(MenuState::Serving(session))
            }
            Err(e) => {
                self.report(e)?;
                Ok(MenuState::Idle)
            }
        }
    }

    fn show_queue(&mut self) -> io::Result<()> {
        let Some(next) = self.queue.peek() else {
            return self.report(QueueError::QueueEmpty);
        };
        let next = next.get_name().clone();
        writeln!(
            self.output,
            "Customers waiting: {} of {}. Next in line: {next}",
            self.queue.len(),
            self.queue.capacity()
        )?;
        for (position, customer) in self.queue.iter().enumerate() {
            writeln!(
                self.output,
                "{}. {}, Account Number: {}",
                position + 1,
                customer.get_name(),
                customer.get_account_number()
            )?;
        }
        Ok(())
    }

    fn serve(&mut self, mut session: TellerSession) -> io::Result<MenuState> {
        writeln!(
            self.output,
            "\n1. Deposit\n2. Withdraw\n3. View Balance\n4. Finish"
        )?;
        let Some(line) = self.prompt("Choose: ")? else {
            // Input ended mid-session. Finalize so the record is not lost.
            self.finish(session)?;
            return Ok(MenuState::Exit);
        };
        match parse_number::<u32>(&line, MalformedInput::Choice) {
            Ok(1) => {
                let Some(amount) = self.read_amount("Enter amount to deposit: ")? else {
                    return Ok(MenuState::Serving(session));
                };
                let result = check_deposit_policy(amount, self.min_deposit)
                    .and_then(|()| session.deposit(amount));
                match result {
                    Ok(balance) => writeln!(
                        self.output,
                        "Deposited {}. New Balance: {}",
                        format_money(amount),
                        format_money(balance)
                    )?,
                    Err(e) => self.report(e)?,
                }
            }
            Ok(2) => {
                let Some(amount) = self.read_amount("Enter amount to withdraw: ")? else {
                    return Ok(MenuState::Serving(session));
                };
                match session.withdraw(amount) {
                    Ok(balance) => writeln!(
                        self.output,
                        "Withdrawn {}. New Balance: {}",
                        format_money(amount),
                        format_money(balance)
                    )?,
                    Err(e) => self.report(e)?,
                }
            }
            Ok(3) => {
                let customer = session.customer();
                writeln!(
                    self.output,
                    "Customer: {}, Account Number: {}, Balance: {}",
                    customer.get_name(),
                    customer.get_account_number(),
                    format_money(session.view_balance())
                )?;
            }
            Ok(4) => {
                self.finish(session)?;
                return Ok(MenuState::Idle);
            }
            Ok(_) => self.report("Invalid option")?,
            Err(e) => self.report(e)?,
        }
        Ok(MenuState::Serving(session))
    }

    /// Reads an amount. Malformed input is reported and yields `None`, as does end of
    /// input, which the next prompt then picks up.
    fn read_amount(&mut self, prompt: &str) -> io::Result<Option<Money>> {
        let Some(line) = self.prompt(prompt)? else {
            return Ok(None);
        };
        match parse_amount(&line) {
            Ok(amount) => Ok(Some(amount)),
            Err(e) => {
                self.report(e)?;
                Ok(None)
            }
        }
    }

    fn finish(&mut self, session: TellerSession) -> io::Result<()> {
        writeln!(
            self.output,
            "Finished processing {}.",
            session.customer().get_name()
        )?;
        let finished = session.finish(&mut self.ledger);
        match &finished.persisted {
            Ok(()) => {
                let location = self.ledger.location();
                writeln!(self.output, "Customer details saved to {location}")?;
            }
            Err(e) => self.report(e)?,
        }
        info!(
            "Finalized account {} with balance {}",
            finished.customer.get_account_number(),
            format_money(finished.customer.get_balance())
        );
        debug!("{} customers still waiting", self.queue.len());
        self.finalized.push(finished.customer);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{io::Cursor, num::NonZeroUsize};

    use super::*;
    use crate::bank::LedgerEntry;

    /// Everything a scripted run produced.
    struct Transcript {
        output: String,
        errors: String,
        ledger: Vec<LedgerEntry>,
        finalized: Vec<Customer>,
    }

    fn run_script(capacity: usize, script: &str) -> Transcript {
        let mut output: Vec<u8> = Vec::new();
        let mut errors: Vec<u8> = Vec::new();
        let mut ledger: Vec<LedgerEntry> = Vec::new();
        let finalized = {
            let teller = Teller::new(
                Cursor::new(script.as_bytes()),
                &mut output,
                &mut errors,
                CustomerQueue::new(NonZeroUsize::new(capacity).unwrap()),
                &mut ledger,
                money_from_f64(500.0),
            );
            teller.run().unwrap()
        };
        Transcript {
            output: String::from_utf8(output).unwrap(),
            errors: String::from_utf8(errors).unwrap(),
            ledger,
            finalized,
        }
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(" 12.5 "), Ok(125_000));
        assert_eq!(parse_amount("0.1"), Ok(1_000));
        assert_eq!(parse_amount("0.0001"), Ok(1));
        assert_eq!(parse_amount("123456789.1234"), Ok(1_234_567_891_234));
        assert_eq!(parse_amount("abc"), Err(MalformedInput::Amount));
        assert_eq!(parse_amount("NaN"), Err(MalformedInput::Amount));
        assert_eq!(parse_amount("inf"), Err(MalformedInput::Amount));
    }

    #[test]
    fn test_parse_amount_rejects_sub_unit_input() {
        assert_eq!(parse_amount("499.99996"), Err(MalformedInput::AmountPrecision));
        assert_eq!(parse_amount("0.00004"), Err(MalformedInput::AmountPrecision));
        assert_eq!(parse_amount("-0.00001"), Err(MalformedInput::AmountPrecision));
    }

    #[test]
    fn test_deposit_policy() {
        let minimum = money_from_f64(500.0);
        assert!(check_deposit_policy(minimum, minimum).is_ok());
        assert_eq!(
            check_deposit_policy(money_from_f64(499.99), minimum),
            Err(TransactionError::BelowMinimum { minimum })
        );
    }

    #[test]
    fn test_full_visit() {
        let run = run_script(10, "1\nAlice\n1001\n2\n1\n1000\n2\n200\n3\n4\n3\n");
        assert!(run.output.contains("Customer 'Alice' added to the queue."));
        assert!(run.output.contains("Processing Customer: Alice, Account Number: 1001"));
        assert!(run.output.contains("Deposited 1000.00. New Balance: 1000.00"));
        assert!(run.output.contains("Withdrawn 200.00. New Balance: 800.00"));
        assert!(run.output.contains("Customer: Alice, Account Number: 1001, Balance: 800.00"));
        assert!(run.output.contains("Customer details saved to memory"));
        assert!(run.output.ends_with("Exiting system. Goodbye!\n"));
        assert!(run.errors.is_empty());
        assert_eq!(
            run.ledger[0].to_string(),
            "Name: Alice, Account Number: 1001, Balance: 800.00, Deposit: 1000.00, Withdraw: 200.00"
        );
        assert_eq!(run.finalized.len(), 1);
    }

    #[test]
    fn test_deposit_below_minimum_is_rejected() {
        let run = run_script(10, "1\nBob\n7\n2\n1\n499\n1\n-3\n4\n3\n");
        assert_eq!(run.errors.matches("Amount must be at least 500.00.").count(), 2);
        assert!(!run.output.contains("Amount must be at least"));
        assert_eq!(run.ledger[0].balance, 0);
        assert_eq!(run.ledger[0].deposited, 0);
    }

    #[test]
    fn test_sub_unit_amounts_are_rejected() {
        let run = run_script(
            10,
            "1\nBob\n7\n2\n1\n499.99996\n1\n500\n2\n0.00004\n4\n3\n",
        );
        assert_eq!(
            run.errors
                .matches("Amount has more than four decimal places.")
                .count(),
            2
        );
        assert!(!run.errors.contains("Amount must be positive."));
        assert_eq!(run.ledger[0].deposited, money_from_f64(500.0));
        assert_eq!(run.ledger[0].balance, money_from_f64(500.0));
        assert_eq!(run.ledger[0].withdrawn, 0);
    }

    #[test]
    fn test_withdraw_rejections() {
        let run = run_script(10, "1\nBob\n7\n2\n1\n500\n2\n800\n2\n0\n4\n3\n");
        assert!(run.errors.contains("Insufficient balance."));
        assert!(run.errors.contains("Amount must be positive."));
        assert_eq!(run.ledger[0].balance, money_from_f64(500.0));
        assert_eq!(run.ledger[0].withdrawn, 0);
    }

    #[test]
    fn test_malformed_input_reprompts() {
        let run = run_script(
            10,
            "x\n1\nCarol\nabc\n1\nCarol\n5\n2\nwhat\n1\nlots\n9\n4\n3\n",
        );
        assert!(run.errors.contains("Invalid input. Please enter a number."));
        assert!(run.errors.contains("Invalid account number format."));
        assert!(run.errors.contains("Invalid amount format."));
        assert!(run.errors.contains("Invalid option."));
        assert_eq!(run.ledger.len(), 1);
        assert_eq!(run.ledger[0].account_number, 5);
    }

    #[test]
    fn test_served_in_arrival_order() {
        let run = run_script(3, "1\nA\n1\n1\nB\n2\n1\nC\n3\n2\n4\n2\n4\n3\n");
        let a = run.output.find("Processing Customer: A").unwrap();
        let b = run.output.find("Processing Customer: B").unwrap();
        assert!(a < b);
        assert!(!run.output.contains("Processing Customer: C"));
        let served: Vec<_> = run.ledger.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(served, vec!["A", "B"]);
    }

    #[test]
    fn test_queue_full_and_empty() {
        let run = run_script(1, "2\n1\nA\n1\n1\n4\n3\n");
        assert!(run.errors.contains("No customers in queue."));
        assert!(run.errors.contains("Queue is full. Cannot add more customers."));
        assert!(run.output.contains("Customers waiting: 1 of 1. Next in line: A"));
        assert!(run.output.contains("1. A, Account Number: 1"));
    }

    #[test]
    fn test_end_of_input_finishes_session() {
        let run = run_script(2, "1\nDora\n9\n2\n1\n600\n");
        assert!(run.output.contains("Finished processing Dora."));
        assert_eq!(run.ledger[0].balance, money_from_f64(600.0));
        assert_eq!(run.finalized.len(), 1);
        assert!(run.output.ends_with("Exiting system. Goodbye!\n"));
    }

    #[test]
    fn test_long_name_is_truncated() {
        let name = "N".repeat(70);
        let run = run_script(2, &format!("1\n{name}\n1\n2\n4\n3\n"));
        assert_eq!(run.ledger[0].name.len(), 49);
    }
}

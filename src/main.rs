use std::{io, num::NonZeroUsize, path::PathBuf};

use clap::Parser;
use log::{debug, error};

mod bank;
mod menu;
mod report;

/// Single-teller bank queue.
#[derive(Parser, Debug)]
#[command(name = "teller", version, about)]
struct Args {
    /// File that finalized customers are appended to
    #[arg(short, long, default_value = bank::DEFAULT_LEDGER_PATH)]
    ledger: PathBuf,

    /// Maximum number of customers waiting at once
    #[arg(short, long, default_value_t = NonZeroUsize::new(bank::DEFAULT_CAPACITY).unwrap_or(NonZeroUsize::MIN))]
    capacity: NonZeroUsize,

    /// Smallest deposit accepted at the counter
    #[arg(short, long, default_value_t = bank::DEFAULT_MIN_DEPOSIT)]
    min_deposit: f64,

    /// Write a CSV summary of every finalized customer here on exit
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// Print the entries already in the ledger with their totals, then exit
    #[arg(long)]
    show_ledger: bool,
}

fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let args = Args::parse();
    debug!("Starting with {args:?}");

    if args.show_ledger {
        match bank::read_entries(&args.ledger) {
            Ok(entries) => report::write_ledger_summary(io::stdout().lock(), &entries)?,
            Err(err) => {
                error!("Could not read ledger: {err}");
                eprintln!("{err}");
            }
        }
        return Ok(());
    }

    let ledger = bank::FileLedger::new(args.ledger);
    debug!("Ledger at {}", ledger.path().display());
    let teller = menu::Teller::new(
        io::stdin().lock(),
        io::stdout(),
        io::stderr(),
        bank::CustomerQueue::new(args.capacity),
        ledger,
        bank::money_from_f64(args.min_deposit),
    );
    let finalized = teller.run()?;

    if let Some(path) = args.report {
        if let Err(err) = report::write_report_to_path(&path, &finalized) {
            error!("Error writing report to {}: {err}", path.display());
            eprintln!("Error writing report: {err}");
        }
    }
    Ok(())
}

//! Exceptional Banking CLI
//!
//! Loads persisted accounts and prints a CSV summary of each one.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- alice.txt bob.txt > summary.csv
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity
//! - `BANKING_MAX_GROUPS`: Maximum transaction groups per account

use exceptional_banking::{
    write_summaries, Account, AccountConfig, BankingError, IdAllocator, Result,
};
use log::warn;
use std::env;
use std::io;
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let paths: Vec<String> = env::args().skip(1).collect();
    if paths.is_empty() {
        return Err(BankingError::MissingArgument);
    }

    let config = AccountConfig::from_env()?;
    let ids = IdAllocator::new();

    let mut accounts = Vec::with_capacity(paths.len());
    for path in &paths {
        let loaded = Account::load(path, &ids, config)?;
        if !loaded.skipped.is_empty() {
            warn!(
                "{}: skipped {} invalid transaction group(s)",
                path,
                loaded.skipped.len()
            );
        }
        accounts.push(loaded.account);
    }

    let stdout = io::stdout();
    let handle = stdout.lock();
    write_summaries(handle, &accounts)?;

    Ok(())
}

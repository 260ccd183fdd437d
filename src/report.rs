//! CSV summary of loaded accounts.

use crate::account::Account;
use crate::error::Result;
use crate::group::Amount;
use crate::id::AccountId;
use serde::Serialize;
use std::io::Write;

/// One output row per account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSummary {
    pub id: AccountId,
    pub name: String,
    pub groups: usize,
    pub transactions: usize,
    pub balance: Amount,
    pub overdrafts: usize,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        AccountSummary {
            id: account.id(),
            name: account.name().to_string(),
            groups: account.groups().len(),
            transactions: account.transaction_count(),
            balance: account.current_balance(),
            overdrafts: account.number_of_overdrafts(),
        }
    }
}

/// Writes a summary row for each account, in the order given.
pub fn write_summaries<'a, W, I>(writer: W, accounts: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Account>,
{
    let mut csv_writer = csv::Writer::from_writer(writer);

    for account in accounts {
        csv_writer.serialize(AccountSummary::from(account))?;
    }

    csv_writer.flush()?;
    Ok(())
}

//! Account model: an ordered, bounded sequence of transaction groups.
//!
//! Transaction indices are global across the account: group 0's expanded
//! transactions come first, then group 1's, and so on.

use crate::config::AccountConfig;
use crate::error::{BankingError, Result};
use crate::group::{Amount, TransactionGroup, TOTALS_OVERFLOW};
use crate::id::{AccountId, IdAllocator};
use log::{debug, warn};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

/// A bank account made of transaction groups.
///
/// # Invariants
///
/// - `groups.len() <= capacity` at all times
/// - Groups are append-only and kept in the order they were added
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    id: AccountId,
    name: String,
    groups: Vec<TransactionGroup>,
    capacity: usize,
}

/// An encoding line dropped while reconstructing an account.
#[derive(Debug)]
pub struct SkippedLine {
    /// 1-indexed line number within the source.
    pub line: usize,

    /// The line as read.
    pub content: String,

    /// Why the line was rejected.
    pub error: BankingError,
}

/// Result of reconstructing an account from a persisted representation.
///
/// Reconstruction succeeds partially: every valid encoding line becomes a
/// group, every invalid one is recorded in `skipped`.
#[derive(Debug)]
pub struct LoadedAccount {
    pub account: Account,
    pub skipped: Vec<SkippedLine>,
}

impl Account {
    /// Creates an empty account with the next identifier from `ids`.
    pub fn new(name: impl Into<String>, ids: &IdAllocator, config: AccountConfig) -> Self {
        Self::with_id(ids.next_id(), name, config)
    }

    fn with_id(id: AccountId, name: impl Into<String>, config: AccountConfig) -> Self {
        Account {
            id,
            name: name.into(),
            groups: Vec::new(),
            capacity: config.max_groups,
        }
    }

    /// Reconstructs an account from a file.
    ///
    /// Returns [`BankingError::SourceNotFound`] if the file does not exist.
    pub fn load(
        path: impl AsRef<Path>,
        ids: &IdAllocator,
        config: AccountConfig,
    ) -> Result<LoadedAccount> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => BankingError::SourceNotFound {
                path: path.display().to_string(),
            },
            _ => BankingError::Io(e),
        })?;

        Self::from_reader(BufReader::new(file), ids, config)
    }

    /// Reconstructs an account from its line-oriented representation.
    ///
    /// The first line is the name, the second the identifier, which is
    /// adopted verbatim and pushed past in `ids`. Each remaining line is an
    /// encoding passed to [`add_transaction_group`](Self::add_transaction_group).
    /// Lines rejected as invalid encodings are skipped, including lines that
    /// are not valid UTF-8; any other error aborts reconstruction.
    pub fn from_reader<R: BufRead>(
        reader: R,
        ids: &IdAllocator,
        config: AccountConfig,
    ) -> Result<LoadedAccount> {
        let mut lines = reader.split(b'\n').map(|line| line.map(decode_line));

        let name = lines.next().transpose()?.ok_or_else(|| BankingError::MalformedHeader {
            line: 1,
            message: "missing account name".to_string(),
        })?;
        let id_line = lines.next().transpose()?.ok_or_else(|| BankingError::MalformedHeader {
            line: 2,
            message: "missing account identifier".to_string(),
        })?;
        let id = id_line
            .trim()
            .parse::<AccountId>()
            .map_err(|e| BankingError::MalformedHeader {
                line: 2,
                message: format!("invalid account identifier {:?}: {}", id_line, e),
            })?;
        ids.advance_past(id);

        let mut account = Self::with_id(id, name, config);
        let mut skipped = Vec::new();

        for (idx, line) in lines.enumerate() {
            let line_num = idx + 3; // 1-indexed, after name and identifier
            let content = line?;

            match account.add_transaction_group(&content) {
                Ok(()) => {}
                Err(e) if e.is_invalid_encoding() => {
                    warn!("Line {}: skipping transaction group: {}", line_num, e);
                    skipped.push(SkippedLine {
                        line: line_num,
                        content,
                        error: e,
                    });
                }
                Err(e) => return Err(e),
            }
        }

        debug!(
            "Loaded account {} ({}) with {} groups, {} lines skipped",
            account.id,
            account.name,
            account.groups.len(),
            skipped.len()
        );

        Ok(LoadedAccount { account, skipped })
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Maximum number of groups this account accepts.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn groups(&self) -> &[TransactionGroup] {
        &self.groups
    }

    /// Parses `command` as a transaction group and appends it.
    ///
    /// # Errors
    ///
    /// - [`BankingError::InvalidEncoding`] if a token is not an integer, or
    ///   the encoding breaks its variant's rules
    /// - [`BankingError::CapacityExceeded`] if the account is full
    pub fn add_transaction_group(&mut self, command: &str) -> Result<()> {
        let group = command.parse::<TransactionGroup>()?;
        self.push_group(group)
    }

    /// Appends an already validated group.
    ///
    /// Fails with [`BankingError::InvalidEncoding`] if the account's
    /// transaction count or running balance would overflow with `group`
    /// appended.
    pub fn push_group(&mut self, group: TransactionGroup) -> Result<()> {
        let count_fits = self
            .transaction_count()
            .checked_add(group.transaction_count())
            .is_some();
        if !count_fits || group.checked_closing_balance(self.current_balance()).is_none() {
            return Err(BankingError::invalid_encoding(TOTALS_OVERFLOW));
        }

        if self.groups.len() >= self.capacity {
            return Err(BankingError::CapacityExceeded {
                capacity: self.capacity,
            });
        }

        debug!(
            "Account {}: added {:?} group with {} transactions",
            self.id,
            group.variant(),
            group.transaction_count()
        );
        self.groups.push(group);
        Ok(())
    }

    /// Total number of transactions across all groups.
    pub fn transaction_count(&self) -> usize {
        self.groups.iter().map(TransactionGroup::transaction_count).sum()
    }

    /// Amount of the transaction at global `index`.
    pub fn transaction_amount(&self, index: usize) -> Result<Amount> {
        let limit = self.transaction_count();
        if index >= limit {
            return Err(BankingError::IndexOutOfRange { index, limit });
        }

        let mut start = 0;
        for group in &self.groups {
            let count = group.transaction_count();
            if index < start + count {
                return group.transaction_amount(index - start);
            }
            start += count;
        }

        Err(BankingError::IndexOutOfRange { index, limit })
    }

    /// Every transaction amount, in global order.
    pub fn transactions(&self) -> impl Iterator<Item = Amount> + '_ {
        self.groups.iter().flat_map(TransactionGroup::transactions)
    }

    /// Sum of all transaction amounts.
    pub fn current_balance(&self) -> Amount {
        self.groups.iter().map(TransactionGroup::balance).sum()
    }

    /// Counts debits that leave the running balance negative.
    ///
    /// A credit that leaves the balance negative is not an overdraft. Every
    /// running balance fits in [`Amount`], which [`push_group`](Self::push_group)
    /// checks before appending.
    pub fn number_of_overdrafts(&self) -> usize {
        let mut balance: Amount = 0;
        let mut overdrafts = 0;

        for amount in self.transactions() {
            balance += amount;
            if balance < 0 && amount < 0 {
                overdrafts += 1;
            }
        }

        overdrafts
    }

    /// Writes the persisted representation read by [`from_reader`](Self::from_reader).
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writeln!(writer, "{}", self.name)?;
        writeln!(writer, "{}", self.id)?;
        for group in &self.groups {
            writeln!(writer, "{}", group)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Decodes one raw line, dropping the line terminator.
///
/// Undecodable bytes become U+FFFD, so such a line fails as a non-integer
/// token instead of aborting the read.
fn decode_line(mut bytes: Vec<u8>) -> String {
    if bytes.last() == Some(&b'\r') {
        bytes.pop();
    }
    match String::from_utf8(bytes) {
        Ok(line) => line,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

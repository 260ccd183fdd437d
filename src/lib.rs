//! # Exceptional Banking
//!
//! Bank accounts stored as compactly-encoded transaction groups. Each group
//! expands into a sequence of signed amounts; an account aggregates its
//! groups into a transaction count, indexed lookup, running balance and
//! overdraft count.
//!
//! ## Design Principles
//!
//! - **Validated encodings**: a group only exists if its encoding is valid
//! - **Lazy expansion**: amounts are computed from the compact payload on demand
//! - **Partial reconstruction**: invalid lines in a persisted account are
//!   skipped and reported, never fatal
//! - **Explicit identifiers**: account ids come from an [`IdAllocator`] the
//!   caller owns
//!
//! ## Example
//!
//! ```
//! use exceptional_banking::{Account, AccountConfig, IdAllocator};
//!
//! let ids = IdAllocator::new();
//! let mut account = Account::new("test", &ids, AccountConfig::default());
//! account.add_transaction_group("0 1 1 1 1 0 0 1").unwrap();
//! account.add_transaction_group("2 1 0 0 0").unwrap();
//!
//! assert_eq!(account.transaction_count(), 4);
//! assert_eq!(account.current_balance(), -17);
//! assert_eq!(account.number_of_overdrafts(), 1);
//! ```

pub mod account;
pub mod config;
pub mod error;
pub mod group;
pub mod id;
pub mod report;

pub use account::{Account, LoadedAccount, SkippedLine};
pub use config::AccountConfig;
pub use error::{BankingError, Result};
pub use group::{Amount, EncodingVariant, TransactionGroup, QW_AMOUNTS};
pub use id::{AccountId, IdAllocator};
pub use report::{write_summaries, AccountSummary};

//! Transaction groups: validation and expansion of compact encodings.
//!
//! A group is encoded as a sequence of integers `[tag, payload...]`. The tag
//! selects one of three encodings, each with its own payload rules:
//!
//! | tag | encoding        | payload                                  |
//! |-----|-----------------|------------------------------------------|
//! | 0   | binary amount   | 0s and 1s, each run is one transaction   |
//! | 1   | integer amount  | non-zero amounts, one per transaction    |
//! | 2   | quick withdraw  | exactly 4 non-negative repeat counts     |

use crate::error::{BankingError, Result};
use std::fmt;
use std::str::FromStr;

/// Signed transaction amount. Debits are negative.
pub type Amount = i64;

/// Fixed quick withdraw denominations, one per payload slot.
pub const QW_AMOUNTS: [Amount; 4] = [-20, -40, -80, -100];

// Validation messages carried by `BankingError::InvalidEncoding`.

/// The encoding has no tag.
pub const EMPTY_ENCODING: &str = "transaction group encoding cannot be null or empty";
/// The tag is not 0, 1 or 2.
pub const INVALID_TAG: &str = "the first element within a transaction group must be 0, 1, or 2";
/// A binary payload value is neither 0 nor 1.
pub const BINARY_NOT_BIT: &str = "binary amount transaction groups may only contain 0s and 1s";
/// An integer payload contains a zero amount.
pub const INTEGER_ZERO: &str = "integer amount transaction groups may not contain 0s";
/// A quick withdraw payload does not hold exactly four counts.
pub const QUICK_WITHDRAW_LENGTH: &str = "quick withdraw transaction groups must contain 5 elements";
/// A quick withdraw count is negative.
pub const QUICK_WITHDRAW_NEGATIVE: &str =
    "quick withdraw transaction groups may not contain negative numbers";
/// A command token is not an integer.
pub const NON_INTEGER_TOKEN: &str =
    "addTransactionGroup requires string commands that contain only space separated integer values";
/// The transaction count or a running balance does not fit its integer type.
pub const TOTALS_OVERFLOW: &str = "transaction group totals exceed the supported range";

/// Encoding scheme selected by the leading tag of a group encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingVariant {
    BinaryAmount,
    IntegerAmount,
    QuickWithdraw,
}

impl EncodingVariant {
    /// Maps an encoding tag to its variant.
    pub fn from_tag(tag: Amount) -> Option<Self> {
        match tag {
            0 => Some(EncodingVariant::BinaryAmount),
            1 => Some(EncodingVariant::IntegerAmount),
            2 => Some(EncodingVariant::QuickWithdraw),
            _ => None,
        }
    }

    pub fn tag(self) -> Amount {
        match self {
            EncodingVariant::BinaryAmount => 0,
            EncodingVariant::IntegerAmount => 1,
            EncodingVariant::QuickWithdraw => 2,
        }
    }
}

/// A validated, immutable group of transactions sharing one encoding.
///
/// Each variant carries its payload with the tag stripped. Construct one with
/// `TryFrom<&[Amount]>` from raw integers, or parse a space separated
/// command string.
///
/// # Examples
///
/// ```
/// use exceptional_banking::TransactionGroup;
///
/// let group: TransactionGroup = "0 1 0 0 1 1 1".parse().unwrap();
/// assert_eq!(group.transaction_count(), 3);
/// assert_eq!(group.transaction_amount(2).unwrap(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionGroup {
    /// Runs of equal bits; a run of `n` 1s is `+n`, a run of `n` 0s is `-n`.
    BinaryAmount(Vec<bool>),

    /// One transaction per non-zero value.
    IntegerAmount(Vec<Amount>),

    /// Repeat counts for each of the [`QW_AMOUNTS`] denominations.
    QuickWithdraw([usize; 4]),
}

impl TransactionGroup {
    pub fn variant(&self) -> EncodingVariant {
        match self {
            TransactionGroup::BinaryAmount(_) => EncodingVariant::BinaryAmount,
            TransactionGroup::IntegerAmount(_) => EncodingVariant::IntegerAmount,
            TransactionGroup::QuickWithdraw(_) => EncodingVariant::QuickWithdraw,
        }
    }

    /// Number of transactions this group expands to.
    pub fn transaction_count(&self) -> usize {
        match self {
            TransactionGroup::BinaryAmount(bits) => binary_runs(bits).count(),
            TransactionGroup::IntegerAmount(values) => values.len(),
            TransactionGroup::QuickWithdraw(counts) => counts.iter().sum(),
        }
    }

    /// Amount of the transaction at `index` within this group.
    ///
    /// Returns [`BankingError::IndexOutOfRange`] if `index` is not below
    /// [`transaction_count`](Self::transaction_count).
    pub fn transaction_amount(&self, index: usize) -> Result<Amount> {
        let limit = self.transaction_count();
        if index >= limit {
            return Err(BankingError::IndexOutOfRange { index, limit });
        }

        let amount = match self {
            TransactionGroup::BinaryAmount(bits) => binary_runs(bits).nth(index),
            TransactionGroup::IntegerAmount(values) => values.get(index).copied(),
            TransactionGroup::QuickWithdraw(counts) => quick_withdraw_amount(counts, index),
        };

        amount.ok_or(BankingError::IndexOutOfRange { index, limit })
    }

    /// Net effect of the group on a balance.
    ///
    /// Cannot overflow: construction rejects groups whose running balance
    /// from zero leaves the [`Amount`] range.
    pub fn balance(&self) -> Amount {
        match self {
            TransactionGroup::BinaryAmount(bits) => binary_runs(bits).sum(),
            TransactionGroup::IntegerAmount(values) => values.iter().sum(),
            TransactionGroup::QuickWithdraw(counts) => counts
                .iter()
                .zip(QW_AMOUNTS)
                .map(|(&count, amount)| count as Amount * amount)
                .sum(),
        }
    }

    /// Balance after applying every transaction to `opening`, or `None` if
    /// any intermediate balance overflows.
    pub fn checked_closing_balance(&self, opening: Amount) -> Option<Amount> {
        match self {
            TransactionGroup::BinaryAmount(bits) => {
                binary_runs(bits).try_fold(opening, Amount::checked_add)
            }
            TransactionGroup::IntegerAmount(values) => values
                .iter()
                .try_fold(opening, |balance, &value| balance.checked_add(value)),
            // Every quick withdraw is a debit, so checking each slot's end is enough.
            TransactionGroup::QuickWithdraw(counts) => counts.iter().zip(QW_AMOUNTS).try_fold(
                opening,
                |balance, (&count, amount)| {
                    let debit = Amount::try_from(count).ok()?.checked_mul(amount)?;
                    balance.checked_add(debit)
                },
            ),
        }
    }

    fn checked_transaction_count(&self) -> Option<usize> {
        match self {
            TransactionGroup::QuickWithdraw(counts) => counts
                .iter()
                .try_fold(0usize, |total, &count| total.checked_add(count)),
            _ => Some(self.transaction_count()),
        }
    }

    /// Rejects groups whose count or running balance cannot be represented.
    fn ensure_totals_fit(self) -> Result<Self> {
        if self.checked_transaction_count().is_none()
            || self.checked_closing_balance(0).is_none()
        {
            return Err(BankingError::invalid_encoding(TOTALS_OVERFLOW));
        }
        Ok(self)
    }

    /// Expands the group into its transaction amounts, in order.
    pub fn transactions(&self) -> Box<dyn Iterator<Item = Amount> + '_> {
        match self {
            TransactionGroup::BinaryAmount(bits) => Box::new(binary_runs(bits)),
            TransactionGroup::IntegerAmount(values) => Box::new(values.iter().copied()),
            TransactionGroup::QuickWithdraw(counts) => Box::new(
                counts
                    .iter()
                    .zip(QW_AMOUNTS)
                    .flat_map(|(&count, amount)| std::iter::repeat(amount).take(count)),
            ),
        }
    }
}

/// Signed lengths of the maximal runs of equal bits.
fn binary_runs(bits: &[bool]) -> impl Iterator<Item = Amount> + '_ {
    bits.chunk_by(|a, b| a == b).map(|run| {
        let len = run.len() as Amount;
        if run[0] {
            len
        } else {
            -len
        }
    })
}

/// Walks the quick withdraw slots in order to find the denomination at `index`.
fn quick_withdraw_amount(counts: &[usize; 4], index: usize) -> Option<Amount> {
    let mut remaining = index;
    for (&count, amount) in counts.iter().zip(QW_AMOUNTS) {
        if remaining < count {
            return Some(amount);
        }
        remaining -= count;
    }
    None
}

impl TryFrom<&[Amount]> for TransactionGroup {
    type Error = BankingError;

    /// Validates a raw `[tag, payload...]` encoding.
    fn try_from(encoding: &[Amount]) -> Result<Self> {
        let (&tag, payload) = encoding
            .split_first()
            .ok_or_else(|| BankingError::invalid_encoding(EMPTY_ENCODING))?;
        let variant = EncodingVariant::from_tag(tag)
            .ok_or_else(|| BankingError::invalid_encoding(INVALID_TAG))?;

        let group = match variant {
            EncodingVariant::BinaryAmount => {
                let bits = payload
                    .iter()
                    .map(|&value| match value {
                        0 => Ok(false),
                        1 => Ok(true),
                        _ => Err(BankingError::invalid_encoding(BINARY_NOT_BIT)),
                    })
                    .collect::<Result<Vec<_>>>()?;
                TransactionGroup::BinaryAmount(bits)
            }
            EncodingVariant::IntegerAmount => {
                if payload.contains(&0) {
                    return Err(BankingError::invalid_encoding(INTEGER_ZERO));
                }
                TransactionGroup::IntegerAmount(payload.to_vec())
            }
            EncodingVariant::QuickWithdraw => {
                let raw: [Amount; 4] = payload
                    .try_into()
                    .map_err(|_| BankingError::invalid_encoding(QUICK_WITHDRAW_LENGTH))?;
                let mut counts = [0usize; 4];
                for (count, value) in counts.iter_mut().zip(raw) {
                    *count = usize::try_from(value)
                        .map_err(|_| BankingError::invalid_encoding(QUICK_WITHDRAW_NEGATIVE))?;
                }
                TransactionGroup::QuickWithdraw(counts)
            }
        };

        group.ensure_totals_fit()
    }
}

impl FromStr for TransactionGroup {
    type Err = BankingError;

    /// Parses a whitespace separated command such as `"2 1 0 3 1"`.
    ///
    /// Every token must be an integer before any encoding rule is checked.
    fn from_str(command: &str) -> Result<Self> {
        let encoding = command
            .split_whitespace()
            .map(str::parse::<Amount>)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| BankingError::invalid_encoding(NON_INTEGER_TOKEN))?;

        TransactionGroup::try_from(encoding.as_slice())
    }
}

/// Writes the group back as its encoding line.
impl fmt::Display for TransactionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.variant().tag())?;
        match self {
            TransactionGroup::BinaryAmount(bits) => {
                for &bit in bits {
                    write!(f, " {}", u8::from(bit))?;
                }
            }
            TransactionGroup::IntegerAmount(values) => {
                for value in values {
                    write!(f, " {}", value)?;
                }
            }
            TransactionGroup::QuickWithdraw(counts) => {
                for count in counts {
                    write!(f, " {}", count)?;
                }
            }
        }
        Ok(())
    }
}

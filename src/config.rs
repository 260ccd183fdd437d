//! Account configuration.
//!
//! # Environment Variables
//!
//! - `BANKING_MAX_GROUPS`: maximum number of transaction groups per account

use crate::error::{BankingError, Result};
use std::env;

/// Environment variable holding the per-account group capacity.
pub const MAX_GROUPS_VAR: &str = "BANKING_MAX_GROUPS";

/// Limits applied to every account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountConfig {
    /// Transaction groups an account may hold before
    /// [`BankingError::CapacityExceeded`] is returned.
    pub max_groups: usize,
}

impl AccountConfig {
    pub const DEFAULT_MAX_GROUPS: usize = 64;

    /// Single-group capacity used by the original account format.
    pub fn reference() -> Self {
        AccountConfig { max_groups: 1 }
    }

    /// Reads the configuration from the environment, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        match env::var(MAX_GROUPS_VAR) {
            Ok(value) => Self::with_max_groups(&value),
            Err(_) => Ok(Self::default()),
        }
    }

    fn with_max_groups(value: &str) -> Result<Self> {
        match value.trim().parse::<usize>() {
            Ok(max_groups) if max_groups > 0 => Ok(AccountConfig { max_groups }),
            _ => Err(BankingError::InvalidConfig {
                key: MAX_GROUPS_VAR.to_string(),
                value: value.to_string(),
            }),
        }
    }
}

impl Default for AccountConfig {
    fn default() -> Self {
        AccountConfig {
            max_groups: Self::DEFAULT_MAX_GROUPS,
        }
    }
}

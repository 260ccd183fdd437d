//! Account identifier allocation.

use log::debug;
use std::sync::atomic::{AtomicU64, Ordering};

/// Account identifier.
pub type AccountId = u64;

/// Issues unique, monotonically increasing account identifiers.
///
/// Passed explicitly to account construction instead of living in a static,
/// so tests can start from a known value. Updates are atomic, so one
/// allocator may be shared by reference across threads.
#[derive(Debug)]
pub struct IdAllocator {
    next: AtomicU64,
}

impl IdAllocator {
    /// First identifier handed out by [`IdAllocator::new`].
    pub const FIRST_ID: AccountId = 1000;

    pub fn new() -> Self {
        Self::starting_at(Self::FIRST_ID)
    }

    /// Creates an allocator whose next identifier is `first`.
    pub fn starting_at(first: AccountId) -> Self {
        IdAllocator {
            next: AtomicU64::new(first),
        }
    }

    /// Returns the next identifier and advances the counter.
    pub fn next_id(&self) -> AccountId {
        let id = self.next.fetch_add(1, Ordering::SeqCst);
        debug!("Allocated account id {}", id);
        id
    }

    /// Makes sure identifiers handed out later are greater than `seen`.
    ///
    /// Used when an account with an existing identifier is reconstructed.
    /// Never moves the counter backwards.
    pub fn advance_past(&self, seen: AccountId) {
        let previous = self
            .next
            .fetch_max(seen.saturating_add(1), Ordering::SeqCst);
        if previous <= seen {
            debug!("Advanced account id counter past {}", seen);
        }
    }

    /// The identifier the next call to [`next_id`](Self::next_id) returns.
    pub fn peek(&self) -> AccountId {
        self.next.load(Ordering::SeqCst)
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

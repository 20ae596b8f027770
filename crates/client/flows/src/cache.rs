//! Per-account plaintext guess cache backing the demo fallback.

use std::collections::HashMap;
use std::sync::Mutex;

use client_chain_core::Address;

/// Session-local store of the most recent plaintext guess per account.
///
/// Written only by the submission flow in demo mode; consumed (and
/// thereby cleared) only by the mock decryption fallback. No other
/// writer is permitted, and an entry never survives more than one
/// decrypt attempt.
#[derive(Default)]
pub(crate) struct GuessCache {
    entries: Mutex<HashMap<Address, u32>>,
}

impl GuessCache {
    pub(crate) fn store(&self, account: Address, guess: u32) {
        self.entries.lock().unwrap().insert(account, guess);
    }

    /// Remove and return the cached guess for an account.
    pub(crate) fn take(&self, account: &Address) -> Option<u32> {
        self.entries.lock().unwrap().remove(account)
    }

    /// Read without consuming (status display only).
    pub(crate) fn peek(&self, account: &Address) -> Option<u32> {
        self.entries.lock().unwrap().get(account).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_consumes_the_entry() {
        let cache = GuessCache::default();
        let account = Address::from_bytes([1u8; 20]);

        cache.store(account, 888);
        assert_eq!(cache.peek(&account), Some(888));
        assert_eq!(cache.take(&account), Some(888));
        assert_eq!(cache.take(&account), None);
    }

    #[test]
    fn accounts_do_not_share_entries() {
        let cache = GuessCache::default();
        let first = Address::from_bytes([1u8; 20]);
        let second = Address::from_bytes([2u8; 20]);

        cache.store(first, 42);
        assert_eq!(cache.take(&second), None);
        assert_eq!(cache.take(&first), Some(42));
    }
}

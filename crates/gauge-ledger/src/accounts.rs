//! Reward balances and the updater ledger.
//!
//! [`RewardBook`] keeps per-address accumulated rewards and their sum.
//! The sum is updated in the same call as the balance, and both are checked
//! before either is written, so `total == sum(balances)` always holds.
//!
//! [`UpdaterLedger`] is the append-only list of every address that has ever
//! been credited, in first-credit order, without duplicates.

use std::collections::{HashMap, HashSet};

use gauge_types::{Address, U256};

use crate::{LedgerError, Result};

/// Append-only, duplicate-free list of rewarded addresses.
#[derive(Clone, Debug, Default)]
pub struct UpdaterLedger {
    order: Vec<Address>,
    seen: HashSet<Address>,
}

impl UpdaterLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an address if it is not already present.
    ///
    /// Returns `true` if the address was appended.
    pub fn record(&mut self, address: Address) -> bool {
        if !self.seen.insert(address) {
            return false;
        }
        self.order.push(address);
        true
    }

    /// Whether the address has ever been recorded.
    pub fn contains(&self, address: &Address) -> bool {
        self.seen.contains(address)
    }

    /// Number of recorded addresses.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// A page of addresses: up to `count` entries starting at `offset`.
    ///
    /// An offset past the end yields an empty page.
    pub fn chunk(&self, offset: usize, count: usize) -> &[Address] {
        let start = offset.min(self.order.len());
        let end = start.saturating_add(count).min(self.order.len());
        &self.order[start..end]
    }
}

/// Reward balances per address.
#[derive(Clone, Debug, Default)]
pub struct RewardBook {
    balances: HashMap<Address, U256>,
    total: U256,
    updaters: UpdaterLedger,
}

/// Result of a [`RewardBook::credit`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Credit {
    /// Balance after the credit.
    pub balance: U256,
    /// Whether this was the address's first credit.
    pub first: bool,
}

impl RewardBook {
    /// Create an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` to `address`.
    ///
    /// A first credit (even of zero) appends the address to the updater
    /// ledger.
    ///
    /// # Errors
    ///
    /// [`LedgerError::Overflow`] if the balance or the total would overflow;
    /// nothing is written in that case.
    pub fn credit(&mut self, address: Address, amount: U256) -> Result<Credit> {
        let balance = self
            .balance(&address)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        let total = self
            .total
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;

        self.balances.insert(address, balance);
        self.total = total;
        let first = self.updaters.record(address);
        if first {
            tracing::info!(updater = %address, "new updater recorded");
        }
        Ok(Credit { balance, first })
    }

    /// Accumulated reward of an address (zero if never credited).
    pub fn balance(&self, address: &Address) -> U256 {
        self.balances.get(address).copied().unwrap_or(U256::ZERO)
    }

    /// Sum of all balances.
    pub fn total(&self) -> U256 {
        self.total
    }

    /// The updater ledger.
    pub fn updaters(&self) -> &UpdaterLedger {
        &self.updaters
    }

    /// Number of addresses ever credited.
    pub fn n_updaters(&self) -> usize {
        self.updaters.len()
    }

    /// A page of `(address, balance)` in first-credit order.
    pub fn updaters_chunk(&self, offset: usize, count: usize) -> Vec<(Address, U256)> {
        self.updaters
            .chunk(offset, count)
            .iter()
            .map(|address| (*address, self.balance(address)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> Address {
        Address::from_bytes([n; 32])
    }

    #[test]
    fn test_credit_accumulates() {
        let mut book = RewardBook::new();
        let first = book.credit(addr(1), U256::new(10)).expect("credit");
        assert!(first.first);
        let second = book.credit(addr(1), U256::new(5)).expect("credit");
        assert!(!second.first);
        assert_eq!(second.balance, U256::new(15));
        assert_eq!(book.total(), U256::new(15));
        assert_eq!(book.n_updaters(), 1);
    }

    #[test]
    fn test_total_is_sum_of_balances() {
        let mut book = RewardBook::new();
        for n in 1..=5u8 {
            book.credit(addr(n), U256::new(u128::from(n) * 100))
                .expect("credit");
        }
        let sum = (1..=5u8).fold(U256::ZERO, |acc, n| acc + book.balance(&addr(n)));
        assert_eq!(book.total(), sum);
    }

    #[test]
    fn test_overflow_leaves_state_unchanged() {
        let mut book = RewardBook::new();
        book.credit(addr(1), U256::MAX - U256::ONE).expect("credit");
        let err = book.credit(addr(2), U256::new(2)).expect_err("overflow");
        assert_eq!(err, LedgerError::Overflow);
        assert_eq!(book.balance(&addr(2)), U256::ZERO);
        assert_eq!(book.n_updaters(), 1);
    }

    #[test]
    fn test_zero_credit_still_records_updater() {
        let mut book = RewardBook::new();
        assert!(book.credit(addr(7), U256::ZERO).expect("credit").first);
        assert!(book.updaters().contains(&addr(7)));
    }

    #[test]
    fn test_chunks_reassemble_ledger() {
        let mut book = RewardBook::new();
        for n in 0..10u8 {
            book.credit(addr(n), U256::new(u128::from(n) + 1))
                .expect("credit");
        }
        let full = book.updaters_chunk(0, 10);
        let mut pieced = book.updaters_chunk(0, 1);
        pieced.extend(book.updaters_chunk(1, 1));
        pieced.extend(book.updaters_chunk(2, 8));
        assert_eq!(pieced, full);
        assert_eq!(full[3], (addr(3), U256::new(4)));
    }

    #[test]
    fn test_chunk_bounds() {
        let mut ledger = UpdaterLedger::new();
        ledger.record(addr(1));
        ledger.record(addr(2));
        assert!(!ledger.record(addr(1)));
        assert_eq!(ledger.chunk(1, 100), &[addr(2)]);
        assert!(ledger.chunk(5, 1).is_empty());
        assert!(ledger.chunk(0, 0).is_empty());
        assert_eq!(ledger.chunk(0, usize::MAX).len(), 2);
    }
}

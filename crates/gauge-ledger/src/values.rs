//! Value ledger.
//!
//! Keeps the latest accepted [`StoredValue`] per `(pair, type_code)` slot.
//! A write is accepted only if its `(height, timestamp)` is lexicographically
//! greater than what the slot holds; anything else is a silent no-op. This
//! is what makes resubmitting a record harmless.
//!
//! [`ValueStore`] carries the acceptance rule so that a staged view over the
//! ledger ([`StagedValues`]) behaves exactly like the ledger itself.

use std::collections::HashMap;

use gauge_types::{PairKey, StoredValue, U256};

use crate::{LedgerError, Result};

/// Key of one ledger slot.
pub type SlotKey = (PairKey, u16);

/// Result of an [`ValueStore::apply`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The slot was overwritten.
    Applied {
        /// Slot content before the write (`None` on first write).
        previous: Option<StoredValue>,
        /// Slot content after the write.
        current: StoredValue,
    },
    /// `(height, timestamp)` was not newer; nothing changed.
    Stale {
        /// Slot content, unchanged.
        stored: StoredValue,
    },
}

impl ApplyOutcome {
    /// Whether the slot was mutated.
    pub fn is_applied(&self) -> bool {
        matches!(self, ApplyOutcome::Applied { .. })
    }
}

/// Storage with the monotonic acceptance rule.
pub trait ValueStore {
    /// Current slot content.
    fn slot(&self, pair: PairKey, type_code: u16) -> Option<StoredValue>;

    /// Unconditionally overwrite a slot.
    fn put(&mut self, pair: PairKey, type_code: u16, value: StoredValue);

    /// Apply an observation if it is strictly newer than the stored one.
    fn apply(
        &mut self,
        pair: PairKey,
        type_code: u16,
        value: U256,
        height: u64,
        timestamp: u64,
    ) -> ApplyOutcome {
        let previous = self.slot(pair, type_code);
        if let Some(stored) = previous {
            if !stored.is_superseded_by(height, timestamp) {
                tracing::debug!(
                    %pair,
                    type_code,
                    height,
                    timestamp,
                    stored_height = stored.height,
                    stored_timestamp = stored.timestamp,
                    "stale observation ignored"
                );
                return ApplyOutcome::Stale { stored };
            }
        }
        let current = StoredValue {
            value,
            height,
            timestamp,
        };
        self.put(pair, type_code, current);
        ApplyOutcome::Applied { previous, current }
    }

    /// Stored value for a slot.
    ///
    /// # Errors
    ///
    /// [`LedgerError::NotFound`] if the slot was never written.
    fn get(&self, pair: PairKey, type_code: u16) -> Result<StoredValue> {
        self.slot(pair, type_code)
            .ok_or(LedgerError::NotFound { pair, type_code })
    }
}

/// The committed value ledger.
#[derive(Clone, Debug, Default)]
pub struct ValueLedger {
    slots: HashMap<SlotKey, StoredValue>,
}

impl ValueLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of populated slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no slot has been written.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Start a staged view whose writes do not touch this ledger.
    pub fn stage(&self) -> StagedValues<'_> {
        StagedValues {
            base: self,
            staged: HashMap::new(),
        }
    }

    /// Write back slots produced by a staged view.
    pub fn commit_writes<I>(&mut self, writes: I)
    where
        I: IntoIterator<Item = (SlotKey, StoredValue)>,
    {
        for ((pair, type_code), value) in writes {
            self.put(pair, type_code, value);
        }
    }
}

impl ValueStore for ValueLedger {
    fn slot(&self, pair: PairKey, type_code: u16) -> Option<StoredValue> {
        self.slots.get(&(pair, type_code)).copied()
    }

    fn put(&mut self, pair: PairKey, type_code: u16, value: StoredValue) {
        self.slots.insert((pair, type_code), value);
    }
}

/// Copy-on-write view over a [`ValueLedger`].
///
/// Reads see staged writes first, then the ledger.
#[derive(Debug)]
pub struct StagedValues<'a> {
    base: &'a ValueLedger,
    staged: HashMap<SlotKey, StoredValue>,
}

impl StagedValues<'_> {
    /// Staged writes, in no particular order.
    pub fn into_writes(self) -> Vec<(SlotKey, StoredValue)> {
        self.staged.into_iter().collect()
    }
}

impl ValueStore for StagedValues<'_> {
    fn slot(&self, pair: PairKey, type_code: u16) -> Option<StoredValue> {
        self.staged
            .get(&(pair, type_code))
            .copied()
            .or_else(|| self.base.slot(pair, type_code))
    }

    fn put(&mut self, pair: PairKey, type_code: u16, value: StoredValue) {
        self.staged.insert((pair, type_code), value);
    }
}

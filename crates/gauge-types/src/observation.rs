//! Observations carried in records and the values the ledger keeps for them.

use ethnum::U256;
use serde::{Deserialize, Serialize};

/// One raw measurement inside a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedObservation {
    /// Measurement type code (e.g. 107 base fee, 322 tip).
    pub type_code: u16,
    /// Raw value; fits in 240 bits on the wire.
    pub value: U256,
}

impl TypedObservation {
    /// Create an observation.
    pub fn new(type_code: u16, value: U256) -> Self {
        Self { type_code, value }
    }
}

/// Latest accepted value for one `(pair, type_code)` slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredValue {
    /// Observed value.
    pub value: U256,
    /// Source chain height the value was observed at.
    pub height: u64,
    /// Observation timestamp in milliseconds (48 bits on the wire).
    pub timestamp: u64,
}

impl StoredValue {
    /// Whether `(height, timestamp)` is strictly newer than this value,
    /// compared lexicographically.
    pub fn is_superseded_by(&self, height: u64, timestamp: u64) -> bool {
        (height, timestamp) > (self.height, self.timestamp)
    }
}

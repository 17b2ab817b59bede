//! # gauge-types
//!
//! Shared domain types used across the gauge workspace.
//!
//! ## Modules
//!
//! - [`decimal`] — Decimal text and serde forms for wide integers
//! - [`fixed`] — WAD/RAY fixed-point helpers with floor division
//! - [`observation`] — Typed observations and stored ledger values

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod decimal;
pub mod fixed;
pub mod observation;

pub use ethnum::{I256, U256};
pub use observation::{StoredValue, TypedObservation};

/// Observation type code for the base fee channel.
pub const BASE_FEE_TYPE: u16 = 107;

/// Observation type code for the default tip channel (90th percentile max priority fee).
pub const DEFAULT_TIP_TYPE: u16 = 322;

/// Arithmetic failures in fixed-point and wide-integer helpers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArithmeticError {
    /// A checked operation overflowed its integer width.
    #[error("arithmetic overflow in {0}")]
    Overflow(&'static str),

    /// Division by zero.
    #[error("division by zero in {0}")]
    DivisionByZero(&'static str),
}

/// A 32-byte account identity.
///
/// Signer addresses are the BLAKE3 hash of an Ed25519 verifying key;
/// submitter and authority identities use the same space.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Address(pub [u8; 32]);

impl Address {
    /// Construct from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Raw bytes of the address.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Short form keeps log lines readable.
        write!(f, "Address(0x{}..)", hex::encode(&self.0[..6]))
    }
}

/// Identifies one price feed: a (system, chain) pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairKey {
    /// Producing system identifier.
    pub system_id: u8,
    /// Chain identifier.
    pub chain_id: u64,
}

impl PairKey {
    /// Create a pair key.
    pub const fn new(system_id: u8, chain_id: u64) -> Self {
        Self {
            system_id,
            chain_id,
        }
    }

    /// Packed identifier: `(chain_id << 8) | system_id`.
    pub fn scid(&self) -> u128 {
        (u128::from(self.chain_id) << 8) | u128::from(self.system_id)
    }

    /// Unpack a packed identifier produced by [`PairKey::scid`].
    ///
    /// Returns `None` if the chain part does not fit in 64 bits.
    pub fn from_scid(scid: u128) -> Option<Self> {
        let chain_id = u64::try_from(scid >> 8).ok()?;
        Some(Self {
            system_id: (scid & 0xff) as u8,
            chain_id,
        })
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.system_id, self.chain_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scid_packing() {
        let pair = PairKey::new(2, 1);
        assert_eq!(pair.scid(), (1 << 8) | 2);
        assert_eq!(PairKey::from_scid(pair.scid()), Some(pair));
    }

    #[test]
    fn test_scid_max_chain() {
        let pair = PairKey::new(255, u64::MAX);
        assert_eq!(PairKey::from_scid(pair.scid()), Some(pair));
        assert_eq!(PairKey::from_scid(u128::MAX), None);
    }

    #[test]
    fn test_address_display() {
        let addr = Address::from_bytes([0xab; 32]);
        let shown = addr.to_string();
        assert!(shown.starts_with("0xabab"));
        assert_eq!(shown.len(), 2 + 64);
    }

    #[test]
    fn test_pair_serialization() {
        let pair = PairKey::new(2, 42161);
        let json = serde_json::to_string(&pair).expect("serialize");
        let restored: PairKey = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(pair, restored);
    }
}

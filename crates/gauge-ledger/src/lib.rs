//! # gauge-ledger
//!
//! In-memory state owned by the update pipeline.
//!
//! ## Modules
//!
//! - [`values`] — Latest observed value per (pair, type), with monotonic acceptance
//! - [`accounts`] — Reward balances, total rewards and the append-only updater ledger

pub mod accounts;
pub mod values;

use gauge_types::PairKey;

/// Error types for ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// No value has ever been stored for the slot.
    #[error("no value stored for pair {pair} type {type_code}")]
    NotFound {
        /// The queried pair.
        pair: PairKey,
        /// The queried observation type.
        type_code: u16,
    },

    /// A balance or total would overflow 256 bits.
    #[error("reward balance overflow")]
    Overflow,
}

/// Convenience result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

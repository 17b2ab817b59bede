//! # gauge-rewards
//!
//! Reward law for accepted oracle updates and the per-pair scale registry.
//!
//! ## Modules
//!
//! - [`curve`] — Time-since-update and deviation reward terms
//! - [`scales`] — Per-pair normalization divisors and the deviation measure

pub mod curve;
pub mod scales;

use gauge_types::{ArithmeticError, PairKey, U256};

/// Error types for reward operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RewardError {
    /// The pair has no scale, or a zero scale was supplied.
    #[error("zero scale for pair {pair}")]
    ZeroScale {
        /// Pair the scale belongs to.
        pair: PairKey,
    },

    /// A packed scid that does not unpack to a pair.
    #[error("invalid scid {0:#x}")]
    InvalidScid(u128),

    /// A parameter change would break `min <= max` (or `min < max` for a domain).
    #[error("invalid ordering for {param}: min {min} / max {max}")]
    InvalidOrdering {
        /// Parameter being set.
        param: &'static str,
        /// Resulting minimum.
        min: U256,
        /// Resulting maximum.
        max: U256,
    },

    /// Parameter name not recognised.
    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    /// Fixed-point arithmetic failed.
    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),
}

/// Convenience result type for reward operations.
pub type Result<T> = std::result::Result<T, RewardError>;

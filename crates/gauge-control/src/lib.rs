//! # gauge-control
//!
//! Proportional-integral feedback with anti-windup, one loop per control
//! group.
//!
//! ## Modules
//!
//! - [`pi`] — PI control law, output clamping and per-group integrals
//! - [`ema`] — Exponential moving average of update intervals

pub mod ema;
pub mod pi;

use gauge_types::{ArithmeticError, I256, U256};

/// Identifier of a control group. Any value is valid.
pub type GroupId = U256;

/// Error types for control operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControlError {
    /// Bounds would end up with `lower > upper`.
    #[error("invalid bound ordering: lower {lower} > upper {upper}")]
    InvalidBoundOrdering {
        /// Resulting lower bound.
        lower: I256,
        /// Resulting upper bound.
        upper: I256,
    },

    /// EMA window must be at least one sample.
    #[error("invalid EMA window: {0}")]
    InvalidWindow(u32),

    /// Parameter name not recognised.
    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    /// Fixed-point arithmetic failed.
    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),
}

/// Convenience result type for control operations.
pub type Result<T> = std::result::Result<T, ControlError>;

//! # gauge-core
//!
//! Access control, lifecycle, configuration and the batch update
//! orchestrator that ties codec, signer set, value ledger, reward law and
//! control loops together.
//!
//! ## Modules
//!
//! - [`access`] — Authority set gating every mutator
//! - [`lifecycle`] — Freeze flag and the one-way reward latch
//! - [`config`] — TOML configuration with reference defaults
//! - [`events`] — Events emitted for applied updates
//! - [`controller`] — `RewardController`: plan/commit batch updates and the parameter surface

pub mod access;
pub mod config;
pub mod controller;
pub mod events;
pub mod lifecycle;

pub use config::ControllerConfig;
pub use controller::{CommitReport, Plan, ReceiptOutcome, RewardController, RewardReceipt};
pub use events::OracleUpdated;

use gauge_codec::CodecError;
use gauge_control::ControlError;
use gauge_crypto::CryptoError;
use gauge_ledger::LedgerError;
use gauge_rewards::RewardError;
use gauge_types::{Address, ArithmeticError};

/// Error types for controller operations.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    /// Caller is not an authority.
    #[error("unauthorized caller {caller}")]
    Unauthorized {
        /// The rejected caller.
        caller: Address,
    },

    /// Removing this authority would leave none.
    #[error("cannot remove the last authority")]
    LastAuthority,

    /// Rewards are already on.
    #[error("rewards already on")]
    AlreadyOn,

    /// Updates are frozen.
    #[error("system frozen")]
    SystemFrozen,

    /// State changed between planning and committing.
    #[error("stale plan: planned at revision {planned}, state is at {current}")]
    StalePlan {
        /// Revision the plan was computed against.
        planned: u64,
        /// Current revision.
        current: u64,
    },

    /// Record or batch decoding failed.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Signature or key handling failed.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// Ledger lookup or credit failed.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Control loop operation failed.
    #[error("control error: {0}")]
    Control(#[from] ControlError),

    /// Reward law or scale operation failed.
    #[error("reward error: {0}")]
    Reward(#[from] RewardError),

    /// Configuration could not be loaded.
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),

    /// Fixed-point arithmetic failed.
    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),
}

/// Convenience result type for controller operations.
pub type Result<T> = std::result::Result<T, ControllerError>;

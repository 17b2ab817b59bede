//! Events emitted for applied updates.
//!
//! One [`OracleUpdated`] per record that changed the value ledger. Events
//! are returned from `commit` in batch order; stale records emit nothing.

use gauge_types::{Address, PairKey, U256};
use serde::{Deserialize, Serialize};

/// A pair's stored values advanced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleUpdated {
    pub system_id: u8,
    pub chain_id: u64,
    /// Record height.
    pub height: u64,
    /// Record timestamp in milliseconds.
    pub timestamp: u64,
    /// Submitter credited for the update.
    pub updater: Address,
    #[serde(with = "gauge_types::decimal::unsigned")]
    pub time_reward: U256,
    #[serde(with = "gauge_types::decimal::unsigned")]
    pub deviation_reward: U256,
}

impl OracleUpdated {
    pub fn pair(&self) -> PairKey {
        PairKey::new(self.system_id, self.chain_id)
    }

    /// JSON form, for subscribers outside the process.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

//! Per-pair scale registry.
//!
//! A scale converts a raw price delta into a dimensionless WAD deviation:
//! `deviation = min(abs_delta * 1e18 / scale, max_deviation)`. Zero scales
//! are refused on write, and a missing scale reads as zero.

use std::collections::HashMap;

use gauge_types::fixed::WAD;
use gauge_types::{PairKey, U256};
use serde::{Deserialize, Serialize};

use crate::{Result, RewardError};

/// One `(system_id, chain_id, scale)` assignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleEntry {
    pub system_id: u8,
    pub chain_id: u64,
    #[serde(with = "gauge_types::decimal::unsigned")]
    pub scale: U256,
}

impl ScaleEntry {
    pub fn pair(&self) -> PairKey {
        PairKey::new(self.system_id, self.chain_id)
    }
}

/// Scale per pair.
#[derive(Clone, Debug, Default)]
pub struct ScaleRegistry {
    scales: HashMap<PairKey, U256>,
}

impl ScaleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scale for one pair.
    ///
    /// # Errors
    ///
    /// [`RewardError::ZeroScale`] if `scale` is zero.
    pub fn set_scale(&mut self, system_id: u8, chain_id: u64, scale: U256) -> Result<()> {
        let pair = PairKey::new(system_id, chain_id);
        if scale == U256::ZERO {
            return Err(RewardError::ZeroScale { pair });
        }
        self.scales.insert(pair, scale);
        tracing::info!(pair = %pair, scale = %scale, "scale set");
        Ok(())
    }

    /// Set several scales at once. Either all entries are written or none.
    pub fn set_scales(&mut self, entries: &[ScaleEntry]) -> Result<()> {
        if let Some(zero) = entries.iter().find(|e| e.scale == U256::ZERO) {
            return Err(RewardError::ZeroScale { pair: zero.pair() });
        }
        for entry in entries {
            self.set_scale(entry.system_id, entry.chain_id, entry.scale)?;
        }
        Ok(())
    }

    /// Scale for a pair; zero if never set.
    pub fn get_scale(&self, system_id: u8, chain_id: u64) -> U256 {
        self.scales
            .get(&PairKey::new(system_id, chain_id))
            .copied()
            .unwrap_or_default()
    }

    /// Number of pairs with a scale.
    pub fn len(&self) -> usize {
        self.scales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scales.is_empty()
    }

    /// Capped WAD deviation of `abs_delta` for `pair`.
    ///
    /// # Errors
    ///
    /// [`RewardError::ZeroScale`] if the pair has no scale. A delta too large
    /// to scale saturates at `max_deviation`.
    pub fn deviation(&self, pair: PairKey, abs_delta: U256, max_deviation: U256) -> Result<U256> {
        let scale = self.get_scale(pair.system_id, pair.chain_id);
        if scale == U256::ZERO {
            return Err(RewardError::ZeroScale { pair });
        }
        // A product past 2^256 is far beyond any cap.
        let raw = match abs_delta.checked_mul(WAD) {
            Some(scaled) => scaled / scale,
            None => return Ok(max_deviation),
        };
        Ok(raw.min(max_deviation))
    }

    /// [`ScaleRegistry::deviation`] addressed by packed `scid`.
    ///
    /// # Errors
    ///
    /// [`RewardError::InvalidScid`] if `scid` does not unpack to a pair.
    pub fn deviation_by_scid(&self, scid: u128, abs_delta: U256, max_deviation: U256) -> Result<U256> {
        let pair = PairKey::from_scid(scid).ok_or(RewardError::InvalidScid(scid))?;
        self.deviation(pair, abs_delta, max_deviation)
    }
}

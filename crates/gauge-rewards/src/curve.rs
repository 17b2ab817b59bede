//! Two-term bounded reward law.
//!
//! Each term rises linearly from `min_reward / 2` to `max_reward / 2` over
//! its domain and is flat outside it:
//!
//! ```text
//!          max/2 ┤            ┌──────
//!                │          ╱
//!          min/2 ┤──────┘
//!                └──────┴─────┴──────
//!                     min_x  max_x
//! ```
//!
//! The time term's domain is `[min_ts, max_ts]` (WAD seconds since the
//! pair's previous update); the deviation term's is
//! `[min_deviation, max_deviation]` (WAD, see [`crate::scales`]).

use std::fmt;
use std::str::FromStr;

use gauge_types::fixed::{mul_div, WAD};
use gauge_types::{ArithmeticError, U256};
use serde::{Deserialize, Serialize};

use crate::{Result, RewardError};

/// Reward law parameters, all WAD-scaled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardParams {
    /// Desired interval between updates; consumed by interval control loops.
    #[serde(with = "gauge_types::decimal::unsigned")]
    pub target_time_since: U256,
    /// Reward at the bottom of both domains.
    #[serde(with = "gauge_types::decimal::unsigned")]
    pub min_reward: U256,
    /// Reward at the top of both domains.
    #[serde(with = "gauge_types::decimal::unsigned")]
    pub max_reward: U256,
    /// Lower end of the elapsed-time domain.
    #[serde(with = "gauge_types::decimal::unsigned")]
    pub min_ts: U256,
    /// Upper end of the elapsed-time domain.
    #[serde(with = "gauge_types::decimal::unsigned")]
    pub max_ts: U256,
    /// Lower end of the deviation domain.
    #[serde(with = "gauge_types::decimal::unsigned")]
    pub min_deviation: U256,
    /// Upper end of the deviation domain, also the deviation cap.
    #[serde(with = "gauge_types::decimal::unsigned")]
    pub max_deviation: U256,
}

impl Default for RewardParams {
    fn default() -> Self {
        Self {
            target_time_since: WAD * U256::new(1800),
            min_reward: WAD,
            max_reward: WAD * U256::new(10_000),
            min_ts: WAD,
            max_ts: WAD * U256::new(7200),
            min_deviation: WAD / U256::new(10),
            max_deviation: WAD * U256::new(3),
        }
    }
}

impl RewardParams {
    /// Check ordering: `min_reward <= max_reward`, `min_ts < max_ts`,
    /// `min_deviation < max_deviation`.
    pub fn validate(&self) -> Result<()> {
        if self.min_reward > self.max_reward {
            return Err(RewardError::InvalidOrdering {
                param: "reward",
                min: self.min_reward,
                max: self.max_reward,
            });
        }
        if self.min_ts >= self.max_ts {
            return Err(RewardError::InvalidOrdering {
                param: "ts",
                min: self.min_ts,
                max: self.max_ts,
            });
        }
        if self.min_deviation >= self.max_deviation {
            return Err(RewardError::InvalidOrdering {
                param: "deviation",
                min: self.min_deviation,
                max: self.max_deviation,
            });
        }
        Ok(())
    }
}

/// Settable reward parameters by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RewardParam {
    TargetTimeSince,
    MinReward,
    MaxReward,
    MinTs,
    MaxTs,
    MinDeviation,
    MaxDeviation,
}

impl RewardParam {
    /// Parameter name as used by the mutation surface and config files.
    pub fn name(self) -> &'static str {
        match self {
            RewardParam::TargetTimeSince => "target_time_since",
            RewardParam::MinReward => "min_reward",
            RewardParam::MaxReward => "max_reward",
            RewardParam::MinTs => "min_ts",
            RewardParam::MaxTs => "max_ts",
            RewardParam::MinDeviation => "min_deviation",
            RewardParam::MaxDeviation => "max_deviation",
        }
    }
}

impl FromStr for RewardParam {
    type Err = RewardError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "target_time_since" => RewardParam::TargetTimeSince,
            "min_reward" => RewardParam::MinReward,
            "max_reward" => RewardParam::MaxReward,
            "min_ts" => RewardParam::MinTs,
            "max_ts" => RewardParam::MaxTs,
            "min_deviation" => RewardParam::MinDeviation,
            "max_deviation" => RewardParam::MaxDeviation,
            other => return Err(RewardError::UnknownParameter(other.to_string())),
        })
    }
}

impl fmt::Display for RewardParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reward law evaluator.
#[derive(Clone, Debug, Default)]
pub struct RewardCurve {
    params: RewardParams,
}

impl RewardCurve {
    /// Create a curve from validated parameters.
    pub fn new(params: RewardParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Current parameters.
    pub fn params(&self) -> &RewardParams {
        &self.params
    }

    pub fn target_time_since(&self) -> U256 {
        self.params.target_time_since
    }

    pub fn min_reward(&self) -> U256 {
        self.params.min_reward
    }

    pub fn max_reward(&self) -> U256 {
        self.params.max_reward
    }

    /// Smallest time term, `min_reward / 2`.
    pub fn min_time_reward(&self) -> U256 {
        self.params.min_reward / U256::new(2)
    }

    /// Largest time term, `max_reward / 2`.
    pub fn max_time_reward(&self) -> U256 {
        self.params.max_reward / U256::new(2)
    }

    /// Smallest deviation term, `min_reward / 2`.
    pub fn min_deviation_reward(&self) -> U256 {
        self.params.min_reward / U256::new(2)
    }

    /// Largest deviation term, `max_reward / 2`.
    pub fn max_deviation_reward(&self) -> U256 {
        self.params.max_reward / U256::new(2)
    }

    /// Time term for `elapsed` WAD seconds.
    pub fn time_reward(&self, elapsed: U256) -> Result<U256> {
        interpolate(
            elapsed,
            self.params.min_ts,
            self.params.max_ts,
            self.min_time_reward(),
            self.max_time_reward(),
        )
    }

    /// Deviation term for a WAD deviation.
    pub fn deviation_reward(&self, deviation: U256) -> Result<U256> {
        interpolate(
            deviation,
            self.params.min_deviation,
            self.params.max_deviation,
            self.min_deviation_reward(),
            self.max_deviation_reward(),
        )
    }

    /// Both terms, `(time_reward, deviation_reward)`.
    pub fn calc_reward(&self, elapsed: U256, deviation: U256) -> Result<(U256, U256)> {
        Ok((self.time_reward(elapsed)?, self.deviation_reward(deviation)?))
    }

    /// Sum of both terms.
    pub fn reward(&self, elapsed: U256, deviation: U256) -> Result<U256> {
        let (time, dev) = self.calc_reward(elapsed, deviation)?;
        time.checked_add(dev)
            .ok_or(RewardError::Arithmetic(ArithmeticError::Overflow("reward")))
    }

    /// Set one parameter.
    ///
    /// # Errors
    ///
    /// [`RewardError::InvalidOrdering`] if the change would break the
    /// ordering invariants; parameters are unchanged.
    pub fn set(&mut self, param: RewardParam, value: U256) -> Result<()> {
        let mut next = self.params;
        match param {
            RewardParam::TargetTimeSince => next.target_time_since = value,
            RewardParam::MinReward => next.min_reward = value,
            RewardParam::MaxReward => next.max_reward = value,
            RewardParam::MinTs => next.min_ts = value,
            RewardParam::MaxTs => next.max_ts = value,
            RewardParam::MinDeviation => next.min_deviation = value,
            RewardParam::MaxDeviation => next.max_deviation = value,
        }
        next.validate()?;
        self.params = next;
        tracing::info!(param = %param, value = %value, "reward parameter modified");
        Ok(())
    }
}

/// Linear ramp from `lo` at `min_x` to `hi` at `max_x`, flat outside.
fn interpolate(x: U256, min_x: U256, max_x: U256, lo: U256, hi: U256) -> Result<U256> {
    if x <= min_x {
        return Ok(lo);
    }
    if x >= max_x {
        return Ok(hi);
    }
    let step = mul_div(x - min_x, hi - lo, max_x - min_x)?;
    Ok(lo + step)
}

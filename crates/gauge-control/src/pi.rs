//! Proportional-integral control law with output clamping and anti-windup.
//!
//! ```text
//! raw    = floor(kp * error / 1e18) + floor(ki * integral / 1e18) + co_bias
//! output = clamp(raw, output_lower_bound, output_upper_bound)
//! ```
//!
//! All quantities are signed fixed-point with 18 decimals. Divisions round
//! toward negative infinity.
//!
//! ## Anti-windup
//!
//! [`PiController::update_feedback`] adds the error to the group's integral
//! only when `raw` lies inside the bounds. While the output is pinned at a
//! rail the integral is frozen, so it cannot wind up and cause overshoot
//! once the error reverses. The integral is a flat sum of per-call errors,
//! not weighted by elapsed time.
//!
//! Control groups are created lazily with zero state; any group id is valid.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use gauge_types::fixed::{add, mul_div_floor, to_signed, RAY_I, WAD_I, WAD_TO_RAY};
use gauge_types::{ArithmeticError, I256, U256};
use serde::{Deserialize, Serialize};

use crate::{ControlError, GroupId, Result};

/// Controller gains and bias.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlGains {
    /// Proportional gain.
    #[serde(with = "gauge_types::decimal::signed")]
    pub kp: I256,
    /// Integral gain.
    #[serde(with = "gauge_types::decimal::signed")]
    pub ki: I256,
    /// Output bias.
    #[serde(with = "gauge_types::decimal::signed")]
    pub co_bias: I256,
}

/// State of one control group.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlGroup {
    /// Sum of errors accepted so far.
    pub error_integral: I256,
    /// Last bounded output.
    pub last_output: I256,
    /// Clock reading at the last update.
    pub last_update_time: u64,
}

/// Outcome of a [`PiController::update_feedback`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackUpdate {
    /// Unbounded control law output.
    pub raw_output: I256,
    /// Bounded output, recorded as the group's last output.
    pub output: I256,
    /// Integral after the update.
    pub error_integral: I256,
    /// Whether the raw output was outside the bounds (integral frozen).
    pub saturated: bool,
}

/// Named gain parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GainParam {
    Kp,
    Ki,
    CoBias,
}

/// Named bound parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundParam {
    Upper,
    Lower,
}

impl FromStr for GainParam {
    type Err = ControlError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "kp" => Ok(GainParam::Kp),
            "ki" => Ok(GainParam::Ki),
            "co_bias" => Ok(GainParam::CoBias),
            other => Err(ControlError::UnknownParameter(other.to_string())),
        }
    }
}

impl FromStr for BoundParam {
    type Err = ControlError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "output_upper_bound" => Ok(BoundParam::Upper),
            "output_lower_bound" => Ok(BoundParam::Lower),
            other => Err(ControlError::UnknownParameter(other.to_string())),
        }
    }
}

impl fmt::Display for GainParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GainParam::Kp => "kp",
            GainParam::Ki => "ki",
            GainParam::CoBias => "co_bias",
        })
    }
}

impl fmt::Display for BoundParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BoundParam::Upper => "output_upper_bound",
            BoundParam::Lower => "output_lower_bound",
        })
    }
}

/// RAY-scaled relative error of a WAD observation against a RAY reference.
///
/// `(reference - observed * 1e9) * 1e27 / reference`, positive when
/// `observed` is below `reference`.
///
/// # Errors
///
/// [`ControlError::Arithmetic`] on a zero reference or overflow.
pub fn error(observed: U256, reference: U256) -> Result<I256> {
    let observed = to_signed(observed)?;
    let reference = to_signed(reference)?;
    let scaled = observed
        .checked_mul(WAD_TO_RAY)
        .ok_or(ArithmeticError::Overflow("error"))?;
    let delta = reference
        .checked_sub(scaled)
        .ok_or(ArithmeticError::Overflow("error"))?;
    Ok(mul_div_floor(delta, RAY_I, reference)?)
}

/// WAD-scaled relative deviation of `measured` from `target`.
///
/// `(target - measured) * 1e18 / target`, positive when `measured` is
/// below `target`.
pub fn tracking_error(target: U256, measured: U256) -> Result<I256> {
    let target = to_signed(target)?;
    let measured = to_signed(measured)?;
    let delta = target
        .checked_sub(measured)
        .ok_or(ArithmeticError::Overflow("tracking_error"))?;
    Ok(mul_div_floor(delta, WAD_I, target)?)
}

/// Per-group PI controller sharing one set of gains and bounds.
#[derive(Clone, Debug)]
pub struct PiController {
    gains: ControlGains,
    output_upper_bound: I256,
    output_lower_bound: I256,
    groups: HashMap<GroupId, ControlGroup>,
}

impl PiController {
    /// Create a controller.
    ///
    /// # Errors
    ///
    /// [`ControlError::InvalidBoundOrdering`] if `lower > upper`.
    pub fn new(gains: ControlGains, output_upper_bound: I256, output_lower_bound: I256) -> Result<Self> {
        check_bounds(output_lower_bound, output_upper_bound)?;
        Ok(Self {
            gains,
            output_upper_bound,
            output_lower_bound,
            groups: HashMap::new(),
        })
    }

    /// Current gains.
    pub fn gains(&self) -> ControlGains {
        self.gains
    }

    /// Upper output bound.
    pub fn output_upper_bound(&self) -> I256 {
        self.output_upper_bound
    }

    /// Lower output bound.
    pub fn output_lower_bound(&self) -> I256 {
        self.output_lower_bound
    }

    /// State of a group; zero for a group never updated.
    pub fn group(&self, group_id: GroupId) -> ControlGroup {
        self.groups.get(&group_id).copied().unwrap_or_default()
    }

    /// Accumulated error integral of a group.
    pub fn error_integral(&self, group_id: GroupId) -> I256 {
        self.group(group_id).error_integral
    }

    /// Last bounded output of a group.
    pub fn last_output(&self, group_id: GroupId) -> I256 {
        self.group(group_id).last_output
    }

    /// Clock reading at the group's last update.
    pub fn last_update_time(&self, group_id: GroupId) -> u64 {
        self.group(group_id).last_update_time
    }

    /// Unbounded control law output for an error and integral.
    pub fn raw_output(&self, error: I256, integral: I256) -> Result<I256> {
        let p = mul_div_floor(self.gains.kp, error, WAD_I)?;
        let i = mul_div_floor(self.gains.ki, integral, WAD_I)?;
        Ok(add(add(p, i)?, self.gains.co_bias)?)
    }

    /// Clamp an output to the bounds.
    pub fn bound(&self, raw: I256) -> I256 {
        raw.clamp(self.output_lower_bound, self.output_upper_bound)
    }

    /// Whether `raw` lies outside the bounds.
    pub fn is_saturated(&self, raw: I256) -> bool {
        raw > self.output_upper_bound || raw < self.output_lower_bound
    }

    /// Bounded output the group would produce for `error`, without
    /// changing any state.
    pub fn next_output(&self, group_id: GroupId, error: I256) -> Result<I256> {
        let raw = self.raw_output(error, self.error_integral(group_id))?;
        Ok(self.bound(raw))
    }

    /// Integral and area the group would have after accepting `error`.
    ///
    /// Returns `(new_integral, new_area)`; the area is the error itself.
    /// This does not apply the anti-windup rule.
    pub fn next_error_integral(&self, group_id: GroupId, error: I256) -> Result<(I256, I256)> {
        let integral = add(self.error_integral(group_id), error)?;
        Ok((integral, error))
    }

    /// Feed an error into a group.
    ///
    /// The raw output is computed from the integral as it was before this
    /// call. If it saturates, the integral is left unchanged.
    pub fn update_feedback(&mut self, group_id: GroupId, error: I256, now: u64) -> Result<FeedbackUpdate> {
        let current = self.group(group_id);
        let raw_output = self.raw_output(error, current.error_integral)?;
        let saturated = self.is_saturated(raw_output);

        let error_integral = if saturated {
            current.error_integral
        } else {
            add(current.error_integral, error)?
        };
        let output = self.bound(raw_output);

        self.groups.insert(
            group_id,
            ControlGroup {
                error_integral,
                last_output: output,
                last_update_time: now,
            },
        );

        if saturated {
            tracing::debug!(
                group = %group_id,
                raw = %raw_output,
                output = %output,
                "control output saturated, integral held"
            );
        }
        Ok(FeedbackUpdate {
            raw_output,
            output,
            error_integral,
            saturated,
        })
    }

    /// Set one gain.
    pub fn set_gain(&mut self, param: GainParam, value: I256) {
        match param {
            GainParam::Kp => self.gains.kp = value,
            GainParam::Ki => self.gains.ki = value,
            GainParam::CoBias => self.gains.co_bias = value,
        }
        tracing::info!(param = %param, value = %value, "control gain modified");
    }

    /// Set one output bound.
    ///
    /// # Errors
    ///
    /// [`ControlError::InvalidBoundOrdering`] if the result would have
    /// `lower > upper`; the bounds are unchanged.
    pub fn set_bound(&mut self, param: BoundParam, value: I256) -> Result<()> {
        let (lower, upper) = match param {
            BoundParam::Upper => (self.output_lower_bound, value),
            BoundParam::Lower => (value, self.output_upper_bound),
        };
        check_bounds(lower, upper)?;
        self.output_lower_bound = lower;
        self.output_upper_bound = upper;
        tracing::info!(param = %param, value = %value, "control bound modified");
        Ok(())
    }
}

fn check_bounds(lower: I256, upper: I256) -> Result<()> {
    if lower > upper {
        return Err(ControlError::InvalidBoundOrdering { lower, upper });
    }
    Ok(())
}

//! Exponential moving average of update intervals, one per control group.
//!
//! With window `N` the smoothing factor is `2 / (N + 1)`:
//!
//! ```text
//! ema' = (2 * interval + (N - 1) * ema) / (N + 1)
//! ```
//!
//! The first sample for a group seeds the average directly.

use std::collections::HashMap;

use gauge_types::{ArithmeticError, U256};

use crate::{ControlError, GroupId, Result};

/// Default number of samples in the averaging window.
pub const DEFAULT_WINDOW_SIZE: u32 = 10;

/// Per-group interval averages.
#[derive(Clone, Debug)]
pub struct IntervalEma {
    window: u32,
    averages: HashMap<GroupId, U256>,
}

impl Default for IntervalEma {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW_SIZE,
            averages: HashMap::new(),
        }
    }
}

impl IntervalEma {
    /// Create an average over `window` samples.
    ///
    /// # Errors
    ///
    /// [`ControlError::InvalidWindow`] if `window` is zero.
    pub fn new(window: u32) -> Result<Self> {
        if window == 0 {
            return Err(ControlError::InvalidWindow(window));
        }
        Ok(Self {
            window,
            averages: HashMap::new(),
        })
    }

    /// Window size.
    pub fn window(&self) -> u32 {
        self.window
    }

    /// Current average for a group; zero before the first sample.
    pub fn get(&self, group_id: GroupId) -> U256 {
        self.averages.get(&group_id).copied().unwrap_or_default()
    }

    /// Fold one interval into the group's average and return the new value.
    pub fn update(&mut self, group_id: GroupId, interval: U256) -> Result<U256> {
        let next = match self.averages.get(&group_id) {
            None => interval,
            Some(&ema) => {
                let n = U256::new(u128::from(self.window));
                let weighted = interval
                    .checked_mul(U256::new(2))
                    .and_then(|a| (n - U256::ONE).checked_mul(ema).and_then(|b| a.checked_add(b)))
                    .ok_or(ArithmeticError::Overflow("interval ema"))?;
                weighted / (n + U256::ONE)
            }
        };
        self.averages.insert(group_id, next);
        tracing::trace!(group = %group_id, interval = %interval, ema = %next, "interval ema updated");
        Ok(next)
    }
}

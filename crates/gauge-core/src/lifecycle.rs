//! Freeze flag and the one-way reward latch.

use serde::{Deserialize, Serialize};

use crate::{ControllerError, Result};

/// Lifecycle state. Authority checks happen in the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lifecycle {
    frozen: bool,
    rewards_off: bool,
}

impl Lifecycle {
    /// Unfrozen, with the reward latch in the given state.
    pub fn new(rewards_on: bool) -> Self {
        Self {
            frozen: false,
            rewards_off: !rewards_on,
        }
    }

    pub fn frozen(&self) -> bool {
        self.frozen
    }

    pub fn rewards_off(&self) -> bool {
        self.rewards_off
    }

    /// Fail with [`ControllerError::SystemFrozen`] while frozen.
    pub fn ensure_live(&self) -> Result<()> {
        if self.frozen {
            return Err(ControllerError::SystemFrozen);
        }
        Ok(())
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
        tracing::info!("updates frozen");
    }

    pub fn unfreeze(&mut self) {
        self.frozen = false;
        tracing::info!("updates unfrozen");
    }

    /// Turn rewards on for good.
    ///
    /// # Errors
    ///
    /// [`ControllerError::AlreadyOn`] if rewards are already on.
    pub fn turn_rewards_on(&mut self) -> Result<()> {
        if !self.rewards_off {
            return Err(ControllerError::AlreadyOn);
        }
        self.rewards_off = false;
        tracing::info!("rewards turned on");
        Ok(())
    }
}

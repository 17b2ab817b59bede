//! Authority set.
//!
//! Authorities may change parameters, scales, signers, the freeze flag and
//! the reward latch. The set is never allowed to become empty.

use std::collections::BTreeSet;

use gauge_types::Address;

use crate::{ControllerError, Result};

/// Addresses allowed to call mutators.
#[derive(Clone, Debug)]
pub struct AccessControl {
    authorities: BTreeSet<Address>,
}

impl AccessControl {
    /// Create a set with one initial authority.
    pub fn new(owner: Address) -> Self {
        Self {
            authorities: BTreeSet::from([owner]),
        }
    }

    /// Whether `address` is an authority.
    pub fn is_authority(&self, address: &Address) -> bool {
        self.authorities.contains(address)
    }

    /// Fail with [`ControllerError::Unauthorized`] unless `caller` is an authority.
    pub fn require(&self, caller: &Address) -> Result<()> {
        if self.is_authority(caller) {
            Ok(())
        } else {
            tracing::warn!(caller = %caller, "unauthorized call rejected");
            Err(ControllerError::Unauthorized { caller: *caller })
        }
    }

    /// Grant authority. Returns `false` if `address` already had it.
    pub fn add(&mut self, caller: &Address, address: Address) -> Result<bool> {
        self.require(caller)?;
        let added = self.authorities.insert(address);
        if added {
            tracing::info!(by = %caller, authority = %address, "authority added");
        }
        Ok(added)
    }

    /// Revoke authority. Returns `false` if `address` did not have it.
    ///
    /// # Errors
    ///
    /// [`ControllerError::LastAuthority`] if `address` is the only authority.
    pub fn remove(&mut self, caller: &Address, address: &Address) -> Result<bool> {
        self.require(caller)?;
        if !self.is_authority(address) {
            return Ok(false);
        }
        if self.authorities.len() == 1 {
            return Err(ControllerError::LastAuthority);
        }
        self.authorities.remove(address);
        tracing::info!(by = %caller, authority = %address, "authority removed");
        Ok(true)
    }

    /// Current authorities in address order.
    pub fn authorities(&self) -> impl Iterator<Item = &Address> {
        self.authorities.iter()
    }

    pub fn len(&self) -> usize {
        self.authorities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.authorities.is_empty()
    }
}

//! Enrolled signer set.
//!
//! Ed25519 has no public-key recovery, so recovering the signer of a record
//! is a scan over the enrolled keys for the one that verifies. The set is
//! small (an operator key and a handful of feed keys), so the scan is a
//! fixed, bounded cost per record.

use gauge_types::Address;

use crate::ed25519::{Signature, VerifyingKey};
use crate::{CryptoError, Result};

/// The set of keys whose record signatures are accepted.
#[derive(Clone, Debug, Default)]
pub struct SignerSet {
    signers: Vec<(Address, VerifyingKey)>,
}

impl SignerSet {
    /// Create an empty signer set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enroll a key. Returns `false` if it was already enrolled.
    pub fn enroll(&mut self, key: VerifyingKey) -> bool {
        let address = key.address();
        if self.contains(&address) {
            return false;
        }
        tracing::info!(signer = %address, "signer enrolled");
        self.signers.push((address, key));
        true
    }

    /// Remove a signer by address. Returns `false` if it was not enrolled.
    pub fn revoke(&mut self, address: &Address) -> bool {
        let before = self.signers.len();
        self.signers.retain(|(a, _)| a != address);
        let removed = self.signers.len() != before;
        if removed {
            tracing::info!(signer = %address, "signer revoked");
        }
        removed
    }

    /// Check whether an address is enrolled.
    pub fn contains(&self, address: &Address) -> bool {
        self.signers.iter().any(|(a, _)| a == address)
    }

    /// Number of enrolled signers.
    pub fn len(&self) -> usize {
        self.signers.len()
    }

    /// Whether no signer is enrolled.
    pub fn is_empty(&self) -> bool {
        self.signers.is_empty()
    }

    /// Recover the enrolled signer of a record.
    ///
    /// # Errors
    ///
    /// - [`CryptoError::InvalidLength`] if `signature` is not 64 bytes
    /// - [`CryptoError::InvalidSignature`] if no enrolled key verifies
    pub fn recover(&self, record_body: &[u8], signature: &[u8]) -> Result<Address> {
        let signature = Signature::from_slice(signature)?;
        self.signers
            .iter()
            .find(|(_, key)| key.verify_record(record_body, &signature).is_ok())
            .map(|(address, _)| *address)
            .ok_or(CryptoError::InvalidSignature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ed25519::KeyPair;

    #[test]
    fn test_recover_enrolled_signer() {
        let operator = KeyPair::from_bytes(&[1u8; 32]);
        let feed = KeyPair::from_bytes(&[2u8; 32]);
        let mut set = SignerSet::new();
        assert!(set.enroll(operator.verifying_key.clone()));
        assert!(set.enroll(feed.verifying_key.clone()));

        let body = b"payload";
        let sig = feed.signing_key.sign_record(body).to_bytes();
        let signer = set.recover(body, &sig).expect("enrolled");
        assert_eq!(signer, feed.address());
    }

    #[test]
    fn test_unenrolled_signer_rejected() {
        let operator = KeyPair::from_bytes(&[1u8; 32]);
        let stranger = KeyPair::from_bytes(&[9u8; 32]);
        let mut set = SignerSet::new();
        set.enroll(operator.verifying_key.clone());

        let sig = stranger.signing_key.sign_record(b"payload").to_bytes();
        let err = set.recover(b"payload", &sig).expect_err("not enrolled");
        assert!(matches!(err, CryptoError::InvalidSignature));
    }

    #[test]
    fn test_tampered_body_rejected() {
        let operator = KeyPair::from_bytes(&[1u8; 32]);
        let mut set = SignerSet::new();
        set.enroll(operator.verifying_key.clone());

        let sig = operator.signing_key.sign_record(b"payload").to_bytes();
        assert!(set.recover(b"pay1oad", &sig).is_err());
    }

    #[test]
    fn test_enroll_twice_and_revoke() {
        let operator = KeyPair::from_bytes(&[1u8; 32]);
        let mut set = SignerSet::new();
        assert!(set.enroll(operator.verifying_key.clone()));
        assert!(!set.enroll(operator.verifying_key.clone()));
        assert_eq!(set.len(), 1);

        assert!(set.revoke(&operator.address()));
        assert!(!set.revoke(&operator.address()));
        assert!(set.is_empty());
    }
}

//! # gauge-crypto
//!
//! Record authentication for submitted oracle observations.
//!
//! Every record is signed by one of a small set of enrolled signers (an
//! operator key, a third-party feed key, ...). The signed message is a
//! domain-separated BLAKE3 digest of the record bytes that precede the
//! signature.
//!
//! ## Modules
//!
//! - [`digest`] — Domain-separated BLAKE3 record digests
//! - [`ed25519`] — Ed25519 signing and verification
//! - [`signers`] — Enrolled signer set and signer recovery

pub mod digest;
pub mod ed25519;
pub mod signers;

/// Length in bytes of a record signature.
pub const SIGNATURE_LEN: usize = 64;

/// Error types for cryptographic operations.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    /// Ed25519 signature verification failed.
    #[error("signature verification failed")]
    SignatureVerification,

    /// No enrolled signer produced the signature.
    #[error("invalid signature: no enrolled signer matches")]
    InvalidSignature,

    /// Invalid key or signature length.
    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Invalid input data.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, CryptoError>;

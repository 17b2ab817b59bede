//! Domain-separated BLAKE3 digests of record bytes.
//!
//! Signers sign `digest(record_without_signature)`, never the raw bytes,
//! so that a record digest can never collide with any other BLAKE3 use.

/// Context string for record digests.
pub const RECORD_DIGEST_CONTEXT: &str = "gauge v1 record-digest";

/// Context string for deriving an address from a verifying key.
pub const SIGNER_ADDRESS_CONTEXT: &str = "gauge v1 signer-address";

/// Digest of the record bytes that precede the signature.
pub fn record_digest(record_body: &[u8]) -> [u8; 32] {
    ::blake3::derive_key(RECORD_DIGEST_CONTEXT, record_body)
}

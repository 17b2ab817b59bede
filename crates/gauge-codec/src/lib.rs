//! # gauge-codec
//!
//! Binary codec for signed observation records and batches of records.
//!
//! ## Record layout
//!
//! All integers are big-endian.
//!
//! ```text
//! reserved   6 bytes  (must be zero)
//! count      2 bytes  number of observations
//! timestamp  6 bytes  milliseconds
//! system_id  1 byte
//! chain_id   8 bytes
//! height     8 bytes
//! version    1 byte
//! count x { type 2 bytes | value 30 bytes }
//! signature  64 bytes (Ed25519 over the record digest)
//! ```
//!
//! ## Modules
//!
//! - [`record`] — Record parsing, serialization and channel decoding
//! - [`batch`] — Splitting and joining batches of records

pub mod batch;
pub mod record;

/// Error types for codec operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// A record's bytes do not match its declared layout.
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// Batch framing is broken and no further records can be located.
    #[error("malformed batch: {0}")]
    MalformedBatch(String),

    /// The record carries no observation of the requested type.
    #[error("type {type_code} not present in record")]
    TypeNotPresent {
        /// The requested observation type.
        type_code: u16,
    },
}

/// Convenience result type for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;

//! Signed observation records.
//!
//! A [`Record`] is one system's view of one chain at one height: a header
//! plus an ordered list of typed observations. On the wire it is followed
//! by a 64-byte signature over the digest of everything before it.

use gauge_crypto::ed25519::SigningKey;
use gauge_crypto::SIGNATURE_LEN;
use gauge_types::fixed::fits_bits;
use gauge_types::{PairKey, TypedObservation, U256};
use serde::{Deserialize, Serialize};

use crate::{CodecError, Result};

/// Header length in bytes.
pub const HEADER_LEN: usize = 32;

/// Length of one encoded observation.
pub const OBSERVATION_LEN: usize = 32;

/// Width of an observation value in bytes.
pub const VALUE_LEN: usize = 30;

/// Width of an observation value in bits.
pub const VALUE_BITS: u32 = 240;

/// Width of the timestamp field in bits.
pub const TIMESTAMP_BITS: u32 = 48;

/// Current record format version.
pub const RECORD_VERSION: u8 = 1;

// Header field offsets.
const OFF_RESERVED: usize = 0;
const OFF_COUNT: usize = 6;
const OFF_TIMESTAMP: usize = 8;
const OFF_SYSTEM_ID: usize = 14;
const OFF_CHAIN_ID: usize = 15;
const OFF_HEIGHT: usize = 23;
const OFF_VERSION: usize = 31;

/// A decoded observation record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Observation timestamp in milliseconds.
    pub timestamp: u64,
    /// Producing system.
    pub system_id: u8,
    /// Observed chain.
    pub chain_id: u64,
    /// Chain height the observations were taken at.
    pub height: u64,
    /// Format version.
    pub version: u8,
    /// Observations in wire order.
    pub observations: Vec<TypedObservation>,
}

/// A record together with the exact bytes its signature covers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedRecord {
    /// The decoded record.
    pub record: Record,
    /// Header and observation bytes, as received.
    pub body: Vec<u8>,
    /// Trailing signature bytes.
    pub signature: [u8; SIGNATURE_LEN],
}

/// One decoded channel of a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    /// Observed value.
    pub value: U256,
    /// Record timestamp in milliseconds.
    pub timestamp: u64,
    /// Record height.
    pub height: u64,
}

impl Record {
    /// Create a version-1 record.
    pub fn new(
        system_id: u8,
        chain_id: u64,
        height: u64,
        timestamp: u64,
        observations: Vec<TypedObservation>,
    ) -> Self {
        Self {
            timestamp,
            system_id,
            chain_id,
            height,
            version: RECORD_VERSION,
            observations,
        }
    }

    /// The pair this record describes.
    pub fn pair(&self) -> PairKey {
        PairKey::new(self.system_id, self.chain_id)
    }

    /// Encoded length including the signature, for `count` observations.
    pub fn encoded_len(count: usize) -> usize {
        HEADER_LEN + count * OBSERVATION_LEN + SIGNATURE_LEN
    }

    /// Serialize header and observations (the signed body).
    ///
    /// # Errors
    ///
    /// [`CodecError::MalformedRecord`] if the observation count exceeds
    /// `u16::MAX`, the timestamp exceeds 48 bits or a value exceeds 240 bits.
    pub fn encode_body(&self) -> Result<Vec<u8>> {
        let count = u16::try_from(self.observations.len()).map_err(|_| {
            CodecError::MalformedRecord(format!(
                "{} observations exceed the count field",
                self.observations.len()
            ))
        })?;
        if !fits_bits(U256::from(self.timestamp), TIMESTAMP_BITS) {
            return Err(CodecError::MalformedRecord(format!(
                "timestamp {} exceeds {TIMESTAMP_BITS} bits",
                self.timestamp
            )));
        }

        let mut buf = Vec::with_capacity(HEADER_LEN + self.observations.len() * OBSERVATION_LEN);
        buf.extend_from_slice(&[0u8; 6]);
        buf.extend_from_slice(&count.to_be_bytes());
        buf.extend_from_slice(&self.timestamp.to_be_bytes()[2..]);
        buf.push(self.system_id);
        buf.extend_from_slice(&self.chain_id.to_be_bytes());
        buf.extend_from_slice(&self.height.to_be_bytes());
        buf.push(self.version);

        for obs in &self.observations {
            if !fits_bits(obs.value, VALUE_BITS) {
                return Err(CodecError::MalformedRecord(format!(
                    "value of type {} exceeds {VALUE_BITS} bits",
                    obs.type_code
                )));
            }
            buf.extend_from_slice(&obs.type_code.to_be_bytes());
            buf.extend_from_slice(&obs.value.to_be_bytes()[32 - VALUE_LEN..]);
        }
        Ok(buf)
    }

    /// Serialize and sign, producing the full wire form.
    pub fn sign(&self, key: &SigningKey) -> Result<Vec<u8>> {
        let mut buf = self.encode_body()?;
        let signature = key.sign_record(&buf);
        buf.extend_from_slice(&signature.to_bytes());
        Ok(buf)
    }

    /// Extract one channel.
    ///
    /// The first observation with a matching type wins.
    ///
    /// # Errors
    ///
    /// [`CodecError::TypeNotPresent`] if no observation has `type_code`.
    pub fn decode(&self, type_code: u16) -> Result<Reading> {
        self.observations
            .iter()
            .find(|obs| obs.type_code == type_code)
            .map(|obs| Reading {
                value: obs.value,
                timestamp: self.timestamp,
                height: self.height,
            })
            .ok_or(CodecError::TypeNotPresent { type_code })
    }
}

/// Read the declared full length (including signature) of the record at
/// the start of `bytes`, from its header alone.
///
/// # Errors
///
/// [`CodecError::MalformedRecord`] if fewer than [`HEADER_LEN`] bytes are
/// available.
pub fn declared_len(bytes: &[u8]) -> Result<usize> {
    if bytes.len() < HEADER_LEN {
        return Err(CodecError::MalformedRecord(format!(
            "truncated header: {} bytes, need {HEADER_LEN}",
            bytes.len()
        )));
    }
    let count = u16::from_be_bytes([bytes[OFF_COUNT], bytes[OFF_COUNT + 1]]);
    Ok(Record::encoded_len(usize::from(count)))
}

/// Parse one signed record.
///
/// # Errors
///
/// [`CodecError::MalformedRecord`] if the length does not equal
/// `header + count * 32 + signature` or the reserved bytes are not zero.
pub fn parse(bytes: &[u8]) -> Result<SignedRecord> {
    let expected = declared_len(bytes)?;
    if bytes.len() != expected {
        return Err(CodecError::MalformedRecord(format!(
            "length {} does not match declared length {expected}",
            bytes.len()
        )));
    }
    if bytes[OFF_RESERVED..OFF_COUNT].iter().any(|b| *b != 0) {
        return Err(CodecError::MalformedRecord(
            "reserved header bytes are not zero".to_string(),
        ));
    }

    let count = usize::from(u16::from_be_bytes([bytes[OFF_COUNT], bytes[OFF_COUNT + 1]]));
    let timestamp = be_u64(&bytes[OFF_TIMESTAMP..OFF_SYSTEM_ID]);
    let system_id = bytes[OFF_SYSTEM_ID];
    let chain_id = be_u64(&bytes[OFF_CHAIN_ID..OFF_HEIGHT]);
    let height = be_u64(&bytes[OFF_HEIGHT..OFF_VERSION]);
    let version = bytes[OFF_VERSION];

    let body_len = HEADER_LEN + count * OBSERVATION_LEN;
    let observations = bytes[HEADER_LEN..body_len]
        .chunks_exact(OBSERVATION_LEN)
        .map(|chunk| {
            let type_code = u16::from_be_bytes([chunk[0], chunk[1]]);
            let mut value = [0u8; 32];
            value[32 - VALUE_LEN..].copy_from_slice(&chunk[2..]);
            TypedObservation::new(type_code, U256::from_be_bytes(value))
        })
        .collect();

    let mut signature = [0u8; SIGNATURE_LEN];
    signature.copy_from_slice(&bytes[body_len..]);

    Ok(SignedRecord {
        record: Record {
            timestamp,
            system_id,
            chain_id,
            height,
            version,
            observations,
        },
        body: bytes[..body_len].to_vec(),
        signature,
    })
}

/// Big-endian integer from at most 8 bytes.
fn be_u64(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gauge_crypto::ed25519::KeyPair;

    fn sample() -> Record {
        Record::new(
            2,
            1,
            100,
            1_700_000_000_000,
            vec![
                TypedObservation::new(107, U256::new(900_000_000)),
                TypedObservation::new(199, U256::new(12)),
                TypedObservation::new(322, U256::new(100_000_000)),
            ],
        )
    }

    #[test]
    fn test_header_layout() {
        let body = sample().encode_body().expect("encode");
        assert_eq!(body.len(), HEADER_LEN + 3 * OBSERVATION_LEN);
        assert_eq!(&body[0..6], &[0u8; 6]);
        assert_eq!(&body[6..8], &[0, 3]);
        assert_eq!(body[14], 2);
        assert_eq!(&body[15..23], &1u64.to_be_bytes());
        assert_eq!(&body[23..31], &100u64.to_be_bytes());
        assert_eq!(body[31], RECORD_VERSION);
        // First observation type code.
        assert_eq!(&body[32..34], &107u16.to_be_bytes());
    }

    #[test]
    fn test_parse_signed() {
        let kp = KeyPair::from_bytes(&[3u8; 32]);
        let record = sample();
        let wire = record.sign(&kp.signing_key).expect("sign");
        assert_eq!(wire.len(), Record::encoded_len(3));

        let parsed = parse(&wire).expect("parse");
        assert_eq!(parsed.record, record);
        assert_eq!(parsed.body, wire[..wire.len() - SIGNATURE_LEN]);
        assert!(kp
            .verifying_key
            .verify_record(
                &parsed.body,
                &gauge_crypto::ed25519::Signature::from_bytes(&parsed.signature)
            )
            .is_ok());
    }

    #[test]
    fn test_parse_wrong_length() {
        let kp = KeyPair::from_bytes(&[3u8; 32]);
        let mut wire = sample().sign(&kp.signing_key).expect("sign");
        wire.push(0);
        let err = parse(&wire).expect_err("too long");
        assert!(matches!(err, CodecError::MalformedRecord(_)));

        wire.truncate(wire.len() - 2);
        assert!(parse(&wire).is_err());
    }

    #[test]
    fn test_parse_truncated_header() {
        let err = parse(&[0u8; 10]).expect_err("short");
        assert!(matches!(err, CodecError::MalformedRecord(_)));
    }

    #[test]
    fn test_parse_nonzero_reserved() {
        let kp = KeyPair::from_bytes(&[3u8; 32]);
        let mut wire = sample().sign(&kp.signing_key).expect("sign");
        wire[0] = 1;
        assert!(matches!(
            parse(&wire).expect_err("reserved"),
            CodecError::MalformedRecord(_)
        ));
    }

    #[test]
    fn test_value_width_enforced() {
        let mut record = sample();
        record.observations[0].value = U256::ONE << 240u32;
        assert!(matches!(
            record.encode_body().expect_err("too wide"),
            CodecError::MalformedRecord(_)
        ));
        record.observations[0].value = (U256::ONE << 240u32) - U256::ONE;
        assert!(record.encode_body().is_ok());
    }

    #[test]
    fn test_timestamp_width_enforced() {
        let mut record = sample();
        record.timestamp = 1 << 48;
        assert!(record.encode_body().is_err());
    }

    #[test]
    fn test_decode_channel() {
        let record = sample();
        let tip = record.decode(322).expect("tip present");
        assert_eq!(tip.value, U256::new(100_000_000));
        assert_eq!(tip.height, 100);
        assert_eq!(tip.timestamp, 1_700_000_000_000);

        let err = record.decode(555).expect_err("absent");
        assert_eq!(err, CodecError::TypeNotPresent { type_code: 555 });
    }

    #[test]
    fn test_empty_record() {
        let kp = KeyPair::from_bytes(&[3u8; 32]);
        let record = Record::new(2, 1, 1, 1, Vec::new());
        let wire = record.sign(&kp.signing_key).expect("sign");
        assert_eq!(wire.len(), HEADER_LEN + SIGNATURE_LEN);
        assert_eq!(parse(&wire).expect("parse").record, record);
    }
}

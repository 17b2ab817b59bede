//! Batch framing.
//!
//! Two framings are supported:
//!
//! - [`Framing::Delimited`] (wire-compatible default): records joined by a
//!   33-byte run of ASCII `'0'`. The splitter never searches for the
//!   delimiter; it walks each record by the length its header declares and
//!   then expects either end of input or exactly one delimiter. Delimiter
//!   bytes inside a record are therefore never mistaken for a boundary.
//! - [`Framing::LengthPrefixed`]: every record preceded by its length as a
//!   big-endian `u32`.
//!
//! Once framing breaks, no later record can be located; splitting yields
//! every record found so far plus one `MalformedBatch` frame for the rest.

use serde::{Deserialize, Serialize};

use crate::record::declared_len;
use crate::{CodecError, Result};

/// Length of the record delimiter.
pub const DELIMITER_LEN: usize = 33;

/// Separator placed between successive records of a delimited batch.
pub const DELIMITER: [u8; DELIMITER_LEN] = [b'0'; DELIMITER_LEN];

/// One located record, or the framing error that ended the walk.
pub type Frame<'a> = Result<&'a [u8]>;

/// Batch framing selector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Framing {
    /// Records separated by [`DELIMITER`].
    #[default]
    Delimited,
    /// Records each prefixed with a `u32` big-endian length.
    LengthPrefixed,
}

impl Framing {
    /// Split a batch into record frames.
    pub fn split(self, batch: &[u8]) -> Result<Vec<Frame<'_>>> {
        match self {
            Framing::Delimited => split_delimited(batch),
            Framing::LengthPrefixed => split_length_prefixed(batch),
        }
    }

    /// Join encoded records into a batch.
    pub fn join<R: AsRef<[u8]>>(self, records: &[R]) -> Result<Vec<u8>> {
        match self {
            Framing::Delimited => Ok(join_delimited(records)),
            Framing::LengthPrefixed => join_length_prefixed(records),
        }
    }
}

/// Split a delimited batch.
///
/// # Errors
///
/// [`CodecError::MalformedBatch`] if the batch is empty. Later framing
/// failures are reported in-line as the last frame.
pub fn split_delimited(batch: &[u8]) -> Result<Vec<Frame<'_>>> {
    if batch.is_empty() {
        return Err(CodecError::MalformedBatch("empty batch".to_string()));
    }

    let mut frames = Vec::new();
    let mut pos = 0;
    loop {
        let rest = &batch[pos..];
        let len = match declared_len(rest) {
            Ok(len) => len,
            Err(e) => {
                frames.push(Err(broken(pos, &e.to_string())));
                break;
            }
        };
        if len > rest.len() {
            frames.push(Err(broken(
                pos,
                &format!("record declares {len} bytes, {} remain", rest.len()),
            )));
            break;
        }
        frames.push(Ok(&rest[..len]));
        pos += len;

        if pos == batch.len() {
            break;
        }
        if !batch[pos..].starts_with(&DELIMITER) {
            frames.push(Err(broken(pos, "expected delimiter after record")));
            break;
        }
        pos += DELIMITER_LEN;
        if pos == batch.len() {
            frames.push(Err(broken(pos, "trailing delimiter")));
            break;
        }
    }

    tracing::debug!(frames = frames.len(), bytes = batch.len(), "split delimited batch");
    Ok(frames)
}

/// Join records with [`DELIMITER`] between them (none before the first or
/// after the last).
pub fn join_delimited<R: AsRef<[u8]>>(records: &[R]) -> Vec<u8> {
    let mut out = Vec::new();
    for (i, record) in records.iter().enumerate() {
        if i != 0 {
            out.extend_from_slice(&DELIMITER);
        }
        out.extend_from_slice(record.as_ref());
    }
    out
}

/// Split a length-prefixed batch.
///
/// # Errors
///
/// [`CodecError::MalformedBatch`] if the batch is empty.
pub fn split_length_prefixed(batch: &[u8]) -> Result<Vec<Frame<'_>>> {
    if batch.is_empty() {
        return Err(CodecError::MalformedBatch("empty batch".to_string()));
    }

    let mut frames = Vec::new();
    let mut pos = 0;
    while pos < batch.len() {
        let rest = &batch[pos..];
        if rest.len() < 4 {
            frames.push(Err(broken(pos, "truncated length prefix")));
            break;
        }
        let len = u32::from_be_bytes([rest[0], rest[1], rest[2], rest[3]]) as usize;
        let Some(record) = rest.get(4..4 + len) else {
            frames.push(Err(broken(
                pos,
                &format!("prefix declares {len} bytes, {} remain", rest.len() - 4),
            )));
            break;
        };
        frames.push(Ok(record));
        pos += 4 + len;
    }
    Ok(frames)
}

/// Join records, each prefixed with its `u32` big-endian length.
///
/// # Errors
///
/// [`CodecError::MalformedBatch`] if a record is longer than `u32::MAX`.
pub fn join_length_prefixed<R: AsRef<[u8]>>(records: &[R]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    for record in records {
        let bytes = record.as_ref();
        let len = u32::try_from(bytes.len()).map_err(|_| {
            CodecError::MalformedBatch(format!("record of {} bytes too long", bytes.len()))
        })?;
        out.extend_from_slice(&len.to_be_bytes());
        out.extend_from_slice(bytes);
    }
    Ok(out)
}

fn broken(offset: usize, reason: &str) -> CodecError {
    CodecError::MalformedBatch(format!("at offset {offset}: {reason}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{parse, Record};
    use gauge_crypto::ed25519::KeyPair;
    use gauge_types::{TypedObservation, U256};

    fn signed(chain_id: u64, value: u128) -> Vec<u8> {
        let kp = KeyPair::from_bytes(&[5u8; 32]);
        Record::new(
            2,
            chain_id,
            100,
            1_700_000_000_000,
            vec![
                TypedObservation::new(107, U256::new(value)),
                TypedObservation::new(322, U256::new(value / 10)),
            ],
        )
        .sign(&kp.signing_key)
        .expect("sign")
    }

    #[test]
    fn test_delimiter_constant() {
        assert_eq!(DELIMITER.len(), 33);
        assert!(DELIMITER.iter().all(|b| *b == 0x30));
    }

    #[test]
    fn test_single_record_has_no_delimiter() {
        let a = signed(1, 1000);
        let batch = join_delimited(&[a.clone()]);
        assert_eq!(batch, a);
        let frames = split_delimited(&batch).expect("split");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].as_deref().expect("frame"), a.as_slice());
    }

    #[test]
    fn test_split_reproduces_records() {
        let records = vec![signed(1, 1000), signed(10, 2000), signed(8453, 3000)];
        let batch = join_delimited(&records);
        assert_eq!(
            batch.len(),
            records.iter().map(Vec::len).sum::<usize>() + 2 * DELIMITER_LEN
        );
        let frames = split_delimited(&batch).expect("split");
        assert_eq!(frames.len(), 3);
        for (frame, record) in frames.iter().zip(&records) {
            assert_eq!(frame.as_deref().expect("frame"), record.as_slice());
        }
    }

    #[test]
    fn test_delimiter_inside_record_is_data() {
        // A value whose low bytes are all ASCII '0' puts delimiter-looking
        // bytes inside the record body.
        let kp = KeyPair::from_bytes(&[5u8; 32]);
        let mut raw = [0u8; 32];
        raw[2..].copy_from_slice(&[b'0'; 30]);
        let value = U256::from_be_bytes(raw);
        let tricky = Record::new(
            2,
            1,
            1,
            1,
            vec![
                TypedObservation::new(0x3030, value),
                TypedObservation::new(0x3030, value),
            ],
        )
        .sign(&kp.signing_key)
        .expect("sign");
        let other = signed(10, 5);

        let batch = join_delimited(&[tricky.clone(), other.clone()]);
        let frames = split_delimited(&batch).expect("split");
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].as_deref().expect("first"), tricky.as_slice());
        assert_eq!(frames[1].as_deref().expect("second"), other.as_slice());
        let parsed = parse(frames[0].as_deref().expect("first")).expect("parse");
        assert_eq!(parsed.record.observations[0].value, value);
    }

    #[test]
    fn test_missing_delimiter_breaks_tail() {
        let a = signed(1, 1000);
        let b = signed(10, 2000);
        let mut batch = a.clone();
        batch.extend_from_slice(&b);
        let frames = split_delimited(&batch).expect("split");
        assert_eq!(frames.len(), 2);
        assert!(frames[0].is_ok());
        assert!(matches!(frames[1], Err(CodecError::MalformedBatch(_))));
    }

    #[test]
    fn test_truncated_record_in_batch() {
        let a = signed(1, 1000);
        let b = signed(10, 2000);
        let mut batch = join_delimited(&[a, b]);
        batch.truncate(batch.len() - 10);
        let frames = split_delimited(&batch).expect("split");
        assert_eq!(frames.len(), 2);
        assert!(frames[0].is_ok());
        assert!(frames[1].is_err());
    }

    #[test]
    fn test_trailing_delimiter_rejected() {
        let a = signed(1, 1000);
        let mut batch = a;
        batch.extend_from_slice(&DELIMITER);
        let frames = split_delimited(&batch).expect("split");
        assert_eq!(frames.len(), 2);
        assert!(frames[1].is_err());
    }

    #[test]
    fn test_empty_batch() {
        assert!(matches!(
            split_delimited(&[]).expect_err("empty"),
            CodecError::MalformedBatch(_)
        ));
        assert!(split_length_prefixed(&[]).is_err());
    }

    #[test]
    fn test_length_prefixed_framing() {
        let records = vec![signed(1, 1000), signed(10, 2000)];
        let batch = Framing::LengthPrefixed.join(&records).expect("join");
        assert_eq!(&batch[..4], &(records[0].len() as u32).to_be_bytes());
        let frames = Framing::LengthPrefixed.split(&batch).expect("split");
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].as_deref().expect("frame"), records[1].as_slice());
    }

    #[test]
    fn test_length_prefixed_overrun() {
        let mut batch = 100u32.to_be_bytes().to_vec();
        batch.extend_from_slice(&[0u8; 10]);
        let frames = split_length_prefixed(&batch).expect("split");
        assert_eq!(frames.len(), 1);
        assert!(frames[0].is_err());
    }
}

//! Strict decoder/validator for canonical binary data.
//!
//! Decoding is at least as strict as encoding: a byte stream is accepted
//! only if this implementation could have produced it. Every invariant is
//! re-checked as if the input were adversarial — UTF-8 and surrogate
//! freedom on every STRING (map keys included), key uniqueness and
//! ordering on the wire, depth and count ceilings before children are
//! visited, and exact arity for the fixed-size payloads (BOOLEAN is one
//! byte, 0x00 or 0x01; INTEGER is eight bytes).
//!
//! Two walks share the same rules:
//! - [`decode_value`] materializes a [`Value`] tree plus consumed length,
//! - [`validate_value`] only advances an offset, for the hash fast path
//!   where the caller hashes the original bytes and never needs the tree.
//!
//! Declared counts are compared to the limits before iteration and
//! declared lengths to the remaining input before slicing, so a corrupt
//! length field cannot trigger a large allocation.

use crate::constants::*;
use crate::encode::ensure_scalar_bytes;
use crate::errors::{ErrorKind, ProtocolError};
use crate::value::Value;

fn truncated(what: &str) -> ProtocolError {
    ProtocolError::new(ErrorKind::MalformedStructure, format!("truncated {}", what))
}

fn read_u32be(buf: &[u8], off: usize) -> Result<(u32, usize), ProtocolError> {
    if off + 4 > buf.len() {
        return Err(truncated("u32"));
    }
    let v = u32::from_be_bytes([buf[off], buf[off + 1], buf[off + 2], buf[off + 3]]);
    Ok((v, off + 4))
}

/// Reads a length-prefixed payload, checking the declared length against
/// the remaining input before slicing.
fn read_payload<'a>(
    buf: &'a [u8],
    off: usize,
    what: &str,
) -> Result<(&'a [u8], usize), ProtocolError> {
    let (n, off) = read_u32be(buf, off)?;
    let n = n as usize;
    if n > buf.len() - off {
        return Err(truncated(what));
    }
    Ok((&buf[off..off + n], off + n))
}

/// Reads a STRING-tagged map key and enforces wire ordering against the
/// previous key: equal is a duplicate, descending is an order violation.
fn read_map_key<'a>(
    buf: &'a [u8],
    off: usize,
    prev_key: Option<&[u8]>,
) -> Result<(&'a [u8], usize), ProtocolError> {
    if off >= buf.len() {
        return Err(truncated("map key tag"));
    }
    if buf[off] != TAG_STRING {
        return Err(ProtocolError::new(
            ErrorKind::InvalidShape,
            "map key must be a STRING",
        ));
    }
    let (key, off) = read_payload(buf, off + 1, "map key")?;
    ensure_scalar_bytes(key)?;

    if let Some(prev) = prev_key {
        match prev.cmp(key) {
            std::cmp::Ordering::Equal => {
                return Err(ProtocolError::new(
                    ErrorKind::DuplicateKey,
                    "duplicate key on the wire",
                ));
            }
            std::cmp::Ordering::Greater => {
                return Err(ProtocolError::new(
                    ErrorKind::KeyOrder,
                    "keys out of order on the wire",
                ));
            }
            std::cmp::Ordering::Less => {}
        }
    }
    Ok((key, off))
}

fn read_container_prelude(
    buf: &[u8],
    off: usize,
    depth: u32,
    max_entries: u32,
    what: &str,
) -> Result<(u32, usize), ProtocolError> {
    if depth + 1 > MAX_DEPTH {
        return Err(ProtocolError::new(
            ErrorKind::DepthLimit,
            format!("{} too deep", what),
        ));
    }
    let (count, off) = read_u32be(buf, off)?;
    if count > max_entries {
        return Err(ProtocolError::new(
            ErrorKind::SizeLimit,
            format!("{} entry count exceeds limit", what),
        ));
    }
    Ok((count, off))
}

fn read_tag(buf: &[u8], off: usize) -> Result<(u8, usize), ProtocolError> {
    if off >= buf.len() {
        return Err(truncated("tag"));
    }
    Ok((buf[off], off + 1))
}

/// Decodes one value starting at `off`, returning it with the offset one
/// past its encoding. Depth semantics mirror the encoder: the root call
/// passes 0 and containers check `depth + 1`.
pub fn decode_value(buf: &[u8], off: usize, depth: u32) -> Result<(Value, usize), ProtocolError> {
    let (tag, off) = read_tag(buf, off)?;
    match tag {
        TAG_STRING => {
            let (payload, off) = read_payload(buf, off, "string payload")?;
            let s = ensure_scalar_bytes(payload)?;
            Ok((Value::String(s.to_string()), off))
        }

        TAG_BYTES => {
            let (payload, off) = read_payload(buf, off, "bytes payload")?;
            Ok((Value::Bytes(payload.to_vec()), off))
        }

        TAG_BOOLEAN => {
            let (b, off) = decode_boolean_payload(buf, off)?;
            Ok((Value::Boolean(b), off))
        }

        TAG_INTEGER => {
            let (i, off) = decode_integer_payload(buf, off)?;
            Ok((Value::Integer(i), off))
        }

        TAG_LIST => {
            let (count, mut off) = read_container_prelude(buf, off, depth, MAX_LIST_ENTRIES, "list")?;
            let mut items = Vec::with_capacity(count as usize);
            for _ in 0..count {
                let (item, next) = decode_value(buf, off, depth + 1)?;
                items.push(item);
                off = next;
            }
            Ok((Value::List(items), off))
        }

        TAG_MAP => {
            let (count, mut off) = read_container_prelude(buf, off, depth, MAX_MAP_ENTRIES, "map")?;
            let mut entries = Vec::with_capacity(count as usize);
            let mut prev_key: Option<Vec<u8>> = None;
            for _ in 0..count {
                let (key, next) = read_map_key(buf, off, prev_key.as_deref())?;
                prev_key = Some(key.to_vec());
                let key = String::from_utf8(key.to_vec())
                    .map_err(|_| ProtocolError::new(ErrorKind::InvalidEncoding, "invalid UTF-8"))?;
                let (child, next) = decode_value(buf, next, depth + 1)?;
                entries.push((key, child));
                off = next;
            }
            Ok((Value::Map(entries), off))
        }

        other => Err(ProtocolError::new(
            ErrorKind::MalformedStructure,
            format!("unknown tag 0x{:02x}", other),
        )),
    }
}

/// Validates one value starting at `off` without materializing it,
/// returning the offset one past its encoding. Applies exactly the same
/// rules as [`decode_value`].
pub fn validate_value(buf: &[u8], off: usize, depth: u32) -> Result<usize, ProtocolError> {
    let (tag, off) = read_tag(buf, off)?;
    match tag {
        TAG_STRING => {
            let (payload, off) = read_payload(buf, off, "string payload")?;
            ensure_scalar_bytes(payload)?;
            Ok(off)
        }

        TAG_BYTES => {
            let (_, off) = read_payload(buf, off, "bytes payload")?;
            Ok(off)
        }

        TAG_BOOLEAN => decode_boolean_payload(buf, off).map(|(_, off)| off),

        TAG_INTEGER => decode_integer_payload(buf, off).map(|(_, off)| off),

        TAG_LIST => {
            let (count, mut off) = read_container_prelude(buf, off, depth, MAX_LIST_ENTRIES, "list")?;
            for _ in 0..count {
                off = validate_value(buf, off, depth + 1)?;
            }
            Ok(off)
        }

        TAG_MAP => {
            let (count, mut off) = read_container_prelude(buf, off, depth, MAX_MAP_ENTRIES, "map")?;
            let mut prev_key: Option<Vec<u8>> = None;
            for _ in 0..count {
                let (key, next) = read_map_key(buf, off, prev_key.as_deref())?;
                prev_key = Some(key.to_vec());
                off = validate_value(buf, next, depth + 1)?;
            }
            Ok(off)
        }

        other => Err(ProtocolError::new(
            ErrorKind::MalformedStructure,
            format!("unknown tag 0x{:02x}", other),
        )),
    }
}

fn decode_boolean_payload(buf: &[u8], off: usize) -> Result<(bool, usize), ProtocolError> {
    if off >= buf.len() {
        return Err(truncated("boolean payload"));
    }
    match buf[off] {
        0x00 => Ok((false, off + 1)),
        0x01 => Ok((true, off + 1)),
        other => Err(ProtocolError::new(
            ErrorKind::MalformedStructure,
            format!("invalid boolean payload 0x{:02x}", other),
        )),
    }
}

fn decode_integer_payload(buf: &[u8], off: usize) -> Result<(i64, usize), ProtocolError> {
    if off + 8 > buf.len() {
        return Err(truncated("integer payload"));
    }
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&buf[off..off + 8]);
    // Any 8 bytes form a valid i64; no range check exists on decode.
    Ok((i64::from_be_bytes(raw), off + 8))
}

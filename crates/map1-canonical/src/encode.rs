//! Canonical binary encoder.
//!
//! Encodes a [`Value`] tree into the tagged binary form:
//!
//! ```text
//! STRING  : 0x01 || uint32be(byte_len) || utf8_bytes
//! BYTES   : 0x02 || uint32be(byte_len) || raw_bytes
//! LIST    : 0x03 || uint32be(count)    || element_1 .. element_n
//! MAP     : 0x04 || uint32be(count)    || (key_1 || value_1) .. (key_n || value_n)
//! BOOLEAN : 0x05 || 0x01 (true) / 0x00 (false)
//! INTEGER : 0x06 || int64be, always 8 bytes
//! ```
//!
//! Map entries are sorted here by unsigned-byte comparison of the UTF-8
//! key bytes, then re-checked for adjacency: an equal pair is a
//! duplicate-key error, a descending pair would mean a comparator bug.
//! Encoding is therefore independent of construction order.
//!
//! Depth and count ceilings are checked before recursing into a
//! container's children, never after.

use crate::constants::*;
use crate::errors::{ErrorKind, ProtocolError};
use crate::value::Value;

/// Validates that text contains only Unicode scalar values.
///
/// Rust's `str` cannot hold encoded surrogates, so this cannot fire on a
/// well-formed `String`; it is kept as an explicit guard because surrogate
/// freedom is a wire-level requirement, not a host-language detail.
pub fn ensure_scalar_text(s: &str) -> Result<(), ProtocolError> {
    for ch in s.chars() {
        let cp = ch as u32;
        if (0xD800..=0xDFFF).contains(&cp) {
            return Err(ProtocolError::new(
                ErrorKind::InvalidEncoding,
                format!("surrogate code point U+{:04X}", cp),
            ));
        }
    }
    Ok(())
}

/// Validates raw bytes as UTF-8 text free of surrogate code points.
pub fn ensure_scalar_bytes(b: &[u8]) -> Result<&str, ProtocolError> {
    let s = std::str::from_utf8(b)
        .map_err(|_| ProtocolError::new(ErrorKind::InvalidEncoding, "invalid UTF-8"))?;
    ensure_scalar_text(s)?;
    Ok(s)
}

fn write_length_prefixed(buf: &mut Vec<u8>, tag: u8, payload: &[u8]) -> Result<(), ProtocolError> {
    if payload.len() > u32::MAX as usize {
        return Err(ProtocolError::new(
            ErrorKind::MalformedStructure,
            "payload length exceeds u32",
        ));
    }
    buf.push(tag);
    buf.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    buf.extend_from_slice(payload);
    Ok(())
}

/// Encodes one value into canonical binary form (header excluded).
///
/// `depth` is the nesting level of the enclosing container: the root call
/// passes 0, and entering a LIST or MAP checks `depth + 1` against
/// [`MAX_DEPTH`]. Scalars never consume depth.
pub fn encode_value(value: &Value, depth: u32) -> Result<Vec<u8>, ProtocolError> {
    let mut buf = Vec::new();
    encode_into(&mut buf, value, depth)?;
    Ok(buf)
}

fn encode_into(buf: &mut Vec<u8>, value: &Value, depth: u32) -> Result<(), ProtocolError> {
    match value {
        Value::String(s) => {
            ensure_scalar_text(s)?;
            write_length_prefixed(buf, TAG_STRING, s.as_bytes())
        }

        Value::Bytes(b) => write_length_prefixed(buf, TAG_BYTES, b),

        Value::Boolean(b) => {
            buf.push(TAG_BOOLEAN);
            buf.push(if *b { 0x01 } else { 0x00 });
            Ok(())
        }

        Value::Integer(i) => {
            // i64::to_be_bytes is two's-complement big-endian, exactly the
            // wire form; no sign juggling required.
            buf.push(TAG_INTEGER);
            buf.extend_from_slice(&i.to_be_bytes());
            Ok(())
        }

        Value::List(items) => {
            if depth + 1 > MAX_DEPTH {
                return Err(ProtocolError::new(ErrorKind::DepthLimit, "list too deep"));
            }
            if items.len() > MAX_LIST_ENTRIES as usize {
                return Err(ProtocolError::new(
                    ErrorKind::SizeLimit,
                    "list entry count exceeds limit",
                ));
            }
            buf.push(TAG_LIST);
            buf.extend_from_slice(&(items.len() as u32).to_be_bytes());
            for item in items {
                encode_into(buf, item, depth + 1)?;
            }
            Ok(())
        }

        Value::Map(entries) => {
            if depth + 1 > MAX_DEPTH {
                return Err(ProtocolError::new(ErrorKind::DepthLimit, "map too deep"));
            }
            if entries.len() > MAX_MAP_ENTRIES as usize {
                return Err(ProtocolError::new(
                    ErrorKind::SizeLimit,
                    "map entry count exceeds limit",
                ));
            }

            let mut ordered: Vec<&(String, Value)> = Vec::with_capacity(entries.len());
            for entry in entries {
                ensure_scalar_text(&entry.0)?;
                ordered.push(entry);
            }
            ordered.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));
            ensure_strictly_ascending(&ordered)?;

            buf.push(TAG_MAP);
            buf.extend_from_slice(&(entries.len() as u32).to_be_bytes());
            for (key, child) in ordered {
                write_length_prefixed(buf, TAG_STRING, key.as_bytes())?;
                encode_into(buf, child, depth + 1)?;
            }
            Ok(())
        }
    }
}

/// Checks sorted entries for adjacent equality (duplicate key) and
/// monotonic order. The order arm is unreachable after a correct sort; it
/// guards against comparator bugs as the wire contract demands.
fn ensure_strictly_ascending(ordered: &[&(String, Value)]) -> Result<(), ProtocolError> {
    for pair in ordered.windows(2) {
        match pair[0].0.as_bytes().cmp(pair[1].0.as_bytes()) {
            std::cmp::Ordering::Equal => {
                return Err(ProtocolError::new(
                    ErrorKind::DuplicateKey,
                    format!("duplicate key \"{}\"", pair[0].0),
                ));
            }
            std::cmp::Ordering::Greater => {
                return Err(ProtocolError::new(
                    ErrorKind::KeyOrder,
                    "key comparator produced a descending pair",
                ));
            }
            std::cmp::Ordering::Less => {}
        }
    }
    Ok(())
}

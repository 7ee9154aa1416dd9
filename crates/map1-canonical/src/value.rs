//! The six-type canonical value model.
//!
//! `Value` owns its data: strings are `String`, byte payloads are
//! `Vec<u8>`, containers hold owned children. Map entries are kept as a
//! `Vec<(String, Value)>` rather than a keyed map so construction order is
//! preserved; the encoder sorts entries by raw key bytes and rejects
//! duplicates, so insertion order never leaks into canonical bytes.

use std::fmt;

/// A value in the MAP v1.1 canonical model.
///
/// Map keys are compared and ordered by unsigned-byte comparison of their
/// UTF-8 encoding everywhere in this crate. No other collation exists.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// UTF-8 text containing only Unicode scalar values (no surrogates).
    String(String),
    /// Arbitrary bytes, never validated or transcoded.
    Bytes(Vec<u8>),
    /// True or false. Distinct from the strings "true"/"false".
    Boolean(bool),
    /// Signed 64-bit integer, full two's-complement range. Distinct from
    /// its decimal string rendering.
    Integer(i64),
    /// Ordered sequence of values; order-preserving, duplicates allowed.
    List(Vec<Value>),
    /// Key/value pairs. Keys must be unique; the encoder orders them.
    Map(Vec<(String, Value)>),
}

impl Value {
    /// True for LIST and MAP, the two variants that consume nesting depth.
    pub fn is_container(&self) -> bool {
        matches!(self, Value::List(_) | Value::Map(_))
    }

    /// Builds an empty map value.
    pub fn empty_map() -> Self {
        Value::Map(Vec::new())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::List(items) => write!(f, "[{} items]", items.len()),
            Value::Map(entries) => write!(f, "{{{} entries}}", entries.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_classification() {
        assert!(Value::empty_map().is_container());
        assert!(Value::List(vec![]).is_container());
        assert!(!Value::String("x".into()).is_container());
        assert!(!Value::Bytes(vec![0]).is_container());
        assert!(!Value::Boolean(true).is_container());
        assert!(!Value::Integer(0).is_container());
    }

    #[test]
    fn display_summarizes_containers() {
        let v = Value::Map(vec![("k".into(), Value::Integer(7))]);
        assert_eq!(v.to_string(), "{1 entries}");
        assert_eq!(Value::Integer(-3).to_string(), "-3");
    }
}

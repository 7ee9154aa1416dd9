//! Strict JSON text adapter.
//!
//! A hand-written lexer and recursive-descent parser over the RFC 8259
//! grammar. A generic JSON library is deliberately not used here: number
//! token classification, duplicate-key deferral, and surrogate handling
//! are normative wire contracts, not parsing conveniences, and they need
//! byte-level control.
//!
//! Strictness rules:
//! - a byte-order mark is rejected even when only JSON whitespace
//!   precedes it
//! - the whole input must be valid UTF-8
//! - `\uD800`-`\uDFFF` escapes are rejected outright, paired or not —
//!   JSON text is UTF-8 and surrogates only mean something in UTF-16
//! - `null` and float-shaped number tokens (any `.`, `e`, or `E` in the
//!   raw token) are unsupported types; classification looks at the token
//!   text, never the numeric value, so `1.0` is rejected although it
//!   equals the accepted `1`
//! - integer tokens outside the i64 range are unsupported types
//! - duplicate object keys are detected after escape resolution, deferred,
//!   and only reported when nothing of higher precedence applies
//! - exactly one root value; trailing non-whitespace is a structure error

mod lexer;
mod parser;

use map1_canonical::{ProtocolError, Value, Violations};

/// Parses strict JSON text into a canonical value, returning deferred
/// violations (duplicate keys) for the caller to resolve against later
/// pipeline stages.
pub(crate) fn parse_document(raw: &[u8]) -> Result<(Value, Violations), ProtocolError> {
    let mut parser = parser::Parser::new(raw)?;
    match parser.parse_root() {
        Ok(value) => Ok((value, parser.into_violations())),
        Err(terminal) => Err(parser.violations().prefer(terminal)),
    }
}

/// Parses strict JSON text into a canonical value.
pub fn parse_strict_text(raw: &[u8]) -> Result<Value, ProtocolError> {
    let (value, pending) = parse_document(raw)?;
    pending.finish()?;
    Ok(value)
}

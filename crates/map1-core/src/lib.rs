//! MAP v1.1 canonicalization pipeline.
//!
//! This crate composes the primitives from `map1-canonical` into the four
//! operations the protocol exposes:
//! - [`canonical_bytes`]: project a value and frame its canonical encoding
//! - [`identifier`]: project, encode, and hash a value
//! - [`identifier_from_canonical_bytes`]: re-validate externally supplied
//!   canonical bytes and hash them as-is (fast path)
//! - [`parse_strict_text`]: strict JSON text into the canonical model
//!
//! Pipeline: raw input (native [`Value`] or JSON text) → strict text
//! adapter → projection (FULL or BIND) → canonical encoder → header-prefixed
//! bytes → SHA-256 → identifier. Every stage is a pure function; violations
//! detected at different stages are reconciled through the fixed precedence
//! order, so the reported error depends only on the input.
//!
#![deny(missing_docs)]

/// FULL and BIND projections over canonical values.
pub mod projection;
/// Strict JSON text adapter (lexer + recursive descent).
pub mod text;

pub use map1_canonical::{ErrorKind, Identifier, ProtocolError, Value, SPEC_VERSION};
pub use projection::Projection;
pub use text::parse_strict_text;

use map1_canonical::identity;

/// Projects a descriptor and returns its header-prefixed canonical bytes.
pub fn canonical_bytes(
    descriptor: &Value,
    projection: &Projection<'_>,
) -> Result<Vec<u8>, ProtocolError> {
    let projected = projection::project(descriptor, projection)?;
    identity::canonical_bytes(&projected)
}

/// Projects a descriptor and computes its identifier.
pub fn identifier(
    descriptor: &Value,
    projection: &Projection<'_>,
) -> Result<Identifier, ProtocolError> {
    Ok(Identifier::compute(&canonical_bytes(descriptor, projection)?))
}

/// Parses strict JSON text, projects, and returns canonical bytes.
///
/// Deferred violations from the adapter (duplicate keys) are resolved
/// against anything the later stages raise, so a projection or encoding
/// failure of lower precedence never masks them, and one of higher
/// precedence wins over them.
pub fn canonical_bytes_from_json(
    raw: &[u8],
    projection: &Projection<'_>,
) -> Result<Vec<u8>, ProtocolError> {
    let (value, pending) = text::parse_document(raw)?;
    let projected =
        projection::project(&value, projection).map_err(|e| pending.prefer(e))?;
    let bytes = identity::canonical_bytes(&projected).map_err(|e| pending.prefer(e))?;
    pending.finish()?;
    Ok(bytes)
}

/// Parses strict JSON text, projects, and computes the identifier.
pub fn identifier_from_json(
    raw: &[u8],
    projection: &Projection<'_>,
) -> Result<Identifier, ProtocolError> {
    Ok(Identifier::compute(&canonical_bytes_from_json(raw, projection)?))
}

/// Fast path: fully re-validates canonical bytes and hashes them directly.
pub fn identifier_from_canonical_bytes(canonical: &[u8]) -> Result<Identifier, ProtocolError> {
    identity::identifier_for_canonical_bytes(canonical)
}

//! Canonical-bytes framing and identifier computation.
//!
//! `CANONICAL_BYTES = CANONICAL_HEADER || encode(root_value)`, and the
//! identifier is `map1:` followed by the lowercase hex SHA-256 of those
//! bytes. Two inputs share an identifier iff they share canonical bytes.

use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::constants::*;
use crate::decode::validate_value;
use crate::encode::encode_value;
use crate::errors::{ErrorKind, ProtocolError};
use crate::value::Value;

/// Pattern every identifier string must match.
const IDENTIFIER_PATTERN: &str = r"^map1:[0-9a-f]{64}$";

/// A computed content identifier: `map1:` + 64 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    /// Parses a validated identifier from a string received elsewhere.
    pub fn parse(value: impl Into<String>) -> Result<Self, ProtocolError> {
        let s = value.into();
        let re = Regex::new(IDENTIFIER_PATTERN).expect("invalid regex");
        if !re.is_match(&s) {
            return Err(ProtocolError::new(
                ErrorKind::InvalidShape,
                format!("not a map1 identifier: '{}'", s),
            ));
        }
        Ok(Self(s))
    }

    /// Computes the identifier over already-validated canonical bytes.
    pub fn compute(canonical: &[u8]) -> Self {
        let digest = Sha256::digest(canonical);
        Self(format!("{}:{}", IDENTIFIER_PREFIX, hex::encode(digest)))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Encodes a value into header-prefixed canonical bytes.
pub fn canonical_bytes(value: &Value) -> Result<Vec<u8>, ProtocolError> {
    let body = encode_value(value, 0)?;
    let mut canonical = Vec::with_capacity(CANONICAL_HEADER.len() + body.len());
    canonical.extend_from_slice(CANONICAL_HEADER);
    canonical.extend(body);
    if canonical.len() > MAX_CANONICAL_BYTES {
        return Err(ProtocolError::new(
            ErrorKind::SizeLimit,
            "canonical bytes exceed the size limit",
        ));
    }
    Ok(canonical)
}

/// Computes the identifier for a value (encode, frame, hash).
pub fn identifier_for_value(value: &Value) -> Result<Identifier, ProtocolError> {
    Ok(Identifier::compute(&canonical_bytes(value)?))
}

/// Fast path: fully re-validates externally supplied canonical bytes and
/// hashes them as-is, with no re-encode through the model layer.
///
/// The header is inspected first — it outranks everything, including the
/// size ceiling, and checking five bytes allocates nothing. Exactly one
/// root value must span the remaining input; trailing bytes are rejected.
pub fn identifier_for_canonical_bytes(canonical: &[u8]) -> Result<Identifier, ProtocolError> {
    if !canonical.starts_with(CANONICAL_HEADER) {
        return Err(ProtocolError::new(
            ErrorKind::MalformedHeader,
            "bad canonical header",
        ));
    }
    if canonical.len() > MAX_CANONICAL_BYTES {
        return Err(ProtocolError::new(
            ErrorKind::SizeLimit,
            "canonical bytes exceed the size limit",
        ));
    }
    let end = validate_value(canonical, CANONICAL_HEADER.len(), 0)?;
    if end != canonical.len() {
        return Err(ProtocolError::new(
            ErrorKind::MalformedStructure,
            "trailing bytes after the root value",
        ));
    }
    Ok(Identifier::compute(canonical))
}

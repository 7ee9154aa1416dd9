//! Canonical model primitives for MAP v1.1 identifiers.
//!
//! This crate owns everything that determines the bytes two independent
//! implementations must agree on:
//! - The six-type canonical value model (`Value`)
//! - Compile-time protocol constants (header, type tags, safety limits)
//! - The closed nine-kind error taxonomy and its precedence resolver
//! - The canonical binary encoder and the strict decoder/validator
//! - Identifier computation (`map1:` + lowercase hex SHA-256)
//!
//! Everything here is a pure, synchronous function of its inputs. There is
//! no shared state, no I/O, and no recursion that is not bounded by the
//! depth and size limits in `constants`.
//!
#![deny(missing_docs)]

/// Protocol constants: header, type tags, and normative safety limits.
pub mod constants;
/// Strict decoder/validator for canonical bytes.
pub mod decode;
/// Canonical binary encoder.
pub mod encode;
/// Error taxonomy and precedence resolution.
pub mod errors;
/// Identifier computation and canonical-bytes framing.
pub mod identity;
/// The six-type canonical value model.
pub mod value;

pub use constants::SPEC_VERSION;
pub use errors::{ErrorKind, ProtocolError, Violations};
pub use identity::{canonical_bytes, identifier_for_canonical_bytes, identifier_for_value, Identifier};
pub use value::Value;

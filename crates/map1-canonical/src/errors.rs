//! Error taxonomy and precedence resolution.
//!
//! The taxonomy is closed: exactly nine kinds, ranked by a fixed total
//! order. Whenever more than one violation is detectable for an input, the
//! single highest-precedence one is reported, no matter how a component
//! detects violations internally. `Violations` is the accumulator used by
//! components that must keep going after spotting a low-precedence problem
//! (the strict text adapter defers duplicate-key findings this way).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The nine error kinds, declared in precedence order.
///
/// The derived `Ord` is the precedence order: a variant declared earlier
/// outranks every variant declared after it. Do not reorder or extend this
/// enum; both actions change reported outcomes for multi-fault inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    /// Canonical bytes do not start with the 5-byte header.
    MalformedHeader,
    /// Malformed canonical structure (bad tag, truncation, trailing bytes)
    /// or malformed input text.
    MalformedStructure,
    /// Input has the wrong shape for the requested operation.
    InvalidShape,
    /// A value type the canonical model does not support.
    UnsupportedType,
    /// Invalid UTF-8 or a surrogate code point in text.
    InvalidEncoding,
    /// Two equal map keys in one container.
    DuplicateKey,
    /// Map keys out of unsigned-byte lexicographic order.
    KeyOrder,
    /// Container nesting deeper than the depth limit.
    DepthLimit,
    /// Input or output larger than a size limit.
    SizeLimit,
}

impl ErrorKind {
    /// All kinds, highest precedence first.
    pub const PRECEDENCE: [ErrorKind; 9] = [
        ErrorKind::MalformedHeader,
        ErrorKind::MalformedStructure,
        ErrorKind::InvalidShape,
        ErrorKind::UnsupportedType,
        ErrorKind::InvalidEncoding,
        ErrorKind::DuplicateKey,
        ErrorKind::KeyOrder,
        ErrorKind::DepthLimit,
        ErrorKind::SizeLimit,
    ];

    /// Stable machine-readable code for this kind.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::MalformedHeader => "malformed-header",
            ErrorKind::MalformedStructure => "malformed-structure",
            ErrorKind::InvalidShape => "invalid-shape",
            ErrorKind::UnsupportedType => "unsupported-type",
            ErrorKind::InvalidEncoding => "invalid-encoding",
            ErrorKind::DuplicateKey => "duplicate-key",
            ErrorKind::KeyOrder => "key-order",
            ErrorKind::DepthLimit => "depth-limit",
            ErrorKind::SizeLimit => "size-limit",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// A terminal protocol error: one kind plus human-readable context.
///
/// Errors are non-retryable and carry no partial result. Callers branch on
/// [`ProtocolError::kind`]; the message exists for humans and logs.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct ProtocolError {
    /// Which of the nine kinds this error is.
    pub kind: ErrorKind,
    /// Human-readable context.
    pub message: String,
}

impl ProtocolError {
    /// Creates an error of the given kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Accumulator for violations detected but not yet reported.
///
/// A component records low-precedence findings here and keeps processing.
/// When a terminal error occurs, [`Violations::prefer`] picks the
/// highest-precedence error among the terminal one and everything recorded,
/// so early termination at a safety ceiling can never suppress a
/// higher-precedence violation that was already seen. On success,
/// [`Violations::finish`] surfaces the best recorded violation, if any.
#[derive(Debug, Default, Clone)]
pub struct Violations {
    recorded: Vec<ProtocolError>,
}

impl Violations {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a violation without interrupting processing.
    pub fn record(&mut self, error: ProtocolError) {
        self.recorded.push(error);
    }

    /// True if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.recorded.is_empty()
    }

    /// Resolves a terminal error against everything recorded, returning
    /// the highest-precedence of the set.
    pub fn prefer(&self, terminal: ProtocolError) -> ProtocolError {
        self.recorded
            .iter()
            .filter(|recorded| recorded.kind < terminal.kind)
            .min_by_key(|recorded| recorded.kind)
            .cloned()
            .unwrap_or(terminal)
    }

    /// Consumes the accumulator at the end of a successful pass. Returns
    /// an error if any violation was recorded along the way.
    pub fn finish(self) -> Result<(), ProtocolError> {
        match self.recorded.into_iter().min_by_key(|e| e.kind) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_order_matches_declaration_order() {
        for pair in ErrorKind::PRECEDENCE.windows(2) {
            assert!(pair[0] < pair[1], "{:?} must outrank {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn prefer_picks_recorded_higher_precedence() {
        let mut pending = Violations::new();
        pending.record(ProtocolError::new(ErrorKind::DuplicateKey, "dup"));
        let resolved = pending.prefer(ProtocolError::new(ErrorKind::SizeLimit, "big"));
        assert_eq!(resolved.kind, ErrorKind::DuplicateKey);
    }

    #[test]
    fn prefer_keeps_terminal_when_it_outranks_recorded() {
        let mut pending = Violations::new();
        pending.record(ProtocolError::new(ErrorKind::DuplicateKey, "dup"));
        let resolved = pending.prefer(ProtocolError::new(ErrorKind::UnsupportedType, "null"));
        assert_eq!(resolved.kind, ErrorKind::UnsupportedType);
    }

    #[test]
    fn finish_surfaces_best_recorded_violation() {
        let mut pending = Violations::new();
        pending.record(ProtocolError::new(ErrorKind::SizeLimit, "big"));
        pending.record(ProtocolError::new(ErrorKind::DuplicateKey, "dup"));
        let err = pending.finish().unwrap_err();
        assert_eq!(err.kind, ErrorKind::DuplicateKey);
    }

    #[test]
    fn kind_codes_are_kebab_case() {
        assert_eq!(ErrorKind::MalformedHeader.code(), "malformed-header");
        assert_eq!(
            serde_json::to_string(&ErrorKind::UnsupportedType).unwrap(),
            "\"unsupported-type\""
        );
    }
}

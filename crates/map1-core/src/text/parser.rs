//! Recursive-descent parser from JSON tokens to canonical values.
//!
//! Terminal errors abort the descent immediately; duplicate-key findings
//! are recorded in a [`Violations`] accumulator and resolved by the
//! caller, because a duplicate must only be reported when nothing of
//! higher precedence applies anywhere in the input.

use std::collections::HashSet;

use map1_canonical::constants::MAX_DEPTH;
use map1_canonical::{ErrorKind, ProtocolError, Value, Violations};

use super::lexer::{Lexer, Token};

fn bad_syntax(message: impl Into<String>) -> ProtocolError {
    ProtocolError::new(ErrorKind::MalformedStructure, message)
}

pub(crate) struct Parser<'a> {
    lexer: Lexer<'a>,
    pending: Violations,
}

impl<'a> Parser<'a> {
    pub fn new(raw: &'a [u8]) -> Result<Self, ProtocolError> {
        Ok(Self {
            lexer: Lexer::new(raw)?,
            pending: Violations::new(),
        })
    }

    /// Violations recorded so far (for resolving a terminal error).
    pub fn violations(&self) -> &Violations {
        &self.pending
    }

    /// Consumes the parser, yielding the recorded violations.
    pub fn into_violations(self) -> Violations {
        self.pending
    }

    /// Parses exactly one root value; trailing non-whitespace rejects.
    pub fn parse_root(&mut self) -> Result<Value, ProtocolError> {
        let first = self.lexer.next_token()?;
        let value = self.parse_value(first, 1)?;
        match self.lexer.next_token()? {
            Token::Eof => Ok(value),
            _ => Err(bad_syntax("trailing content after the root value")),
        }
    }

    /// Parses one value. `depth` is the nesting level this value occupies
    /// if it is a container: the root passes 1, children of a depth-d
    /// container pass d + 1. Scalars ignore it.
    fn parse_value(&mut self, token: Token, depth: u32) -> Result<Value, ProtocolError> {
        match token {
            Token::LeftBrace => self.parse_object(depth),
            Token::LeftBracket => self.parse_array(depth),
            Token::String(s) => Ok(Value::String(s)),
            Token::Number(raw) => classify_number(&raw),
            Token::True => Ok(Value::Boolean(true)),
            Token::False => Ok(Value::Boolean(false)),
            Token::Null => Err(ProtocolError::new(
                ErrorKind::UnsupportedType,
                "null has no canonical representation",
            )),
            other => Err(bad_syntax(format!("unexpected token {:?}", other))),
        }
    }

    fn check_depth(depth: u32) -> Result<(), ProtocolError> {
        if depth > MAX_DEPTH {
            Err(ProtocolError::new(
                ErrorKind::DepthLimit,
                "nesting exceeds the depth limit",
            ))
        } else {
            Ok(())
        }
    }

    fn parse_object(&mut self, depth: u32) -> Result<Value, ProtocolError> {
        Self::check_depth(depth)?;

        let mut entries: Vec<(String, Value)> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        let mut token = self.lexer.next_token()?;
        if token == Token::RightBrace {
            return Ok(Value::Map(entries));
        }

        loop {
            let key = match token {
                Token::String(key) => key,
                _ => return Err(bad_syntax("object key must be a string")),
            };
            if self.lexer.next_token()? != Token::Colon {
                return Err(bad_syntax("':' expected after object key"));
            }
            let value_token = self.lexer.next_token()?;
            let value = self.parse_value(value_token, depth + 1)?;

            // Key comparison happens after escape resolution, so "a"
            // and "a" collide. First occurrence wins; the finding is
            // deferred, not raised.
            if seen.insert(key.clone()) {
                entries.push((key, value));
            } else {
                self.pending.record(ProtocolError::new(
                    ErrorKind::DuplicateKey,
                    format!("duplicate object key \"{}\"", key),
                ));
            }

            match self.lexer.next_token()? {
                Token::Comma => token = self.lexer.next_token()?,
                Token::RightBrace => break,
                _ => return Err(bad_syntax("',' or '}' expected in object")),
            }
        }

        entries.sort_by(|(a, _), (b, _)| a.as_bytes().cmp(b.as_bytes()));
        Ok(Value::Map(entries))
    }

    fn parse_array(&mut self, depth: u32) -> Result<Value, ProtocolError> {
        Self::check_depth(depth)?;

        let mut items = Vec::new();
        let mut token = self.lexer.next_token()?;
        if token == Token::RightBracket {
            return Ok(Value::List(items));
        }

        loop {
            items.push(self.parse_value(token, depth + 1)?);
            match self.lexer.next_token()? {
                Token::Comma => token = self.lexer.next_token()?,
                Token::RightBracket => break,
                _ => return Err(bad_syntax("',' or ']' expected in array")),
            }
        }
        Ok(Value::List(items))
    }
}

/// Classifies a grammar-valid number token by its spelling.
///
/// Any `.`, `e`, or `E` makes the token float-shaped and unsupported,
/// whatever its mathematical value. Integer-shaped tokens are parsed
/// through i128 so an out-of-range value is reported as unsupported,
/// never as a syntax error or a silent wrap.
fn classify_number(raw: &str) -> Result<Value, ProtocolError> {
    if raw.contains(['.', 'e', 'E']) {
        return Err(ProtocolError::new(
            ErrorKind::UnsupportedType,
            format!("float-shaped number token '{}'", raw),
        ));
    }
    let wide: i128 = raw
        .parse()
        .map_err(|_| ProtocolError::new(ErrorKind::UnsupportedType, "integer out of range"))?;
    i64::try_from(wide)
        .map(Value::Integer)
        .map_err(|_| {
            ProtocolError::new(
                ErrorKind::UnsupportedType,
                format!("integer token '{}' outside the 64-bit range", raw),
            )
        })
}

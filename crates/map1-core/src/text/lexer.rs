//! JSON tokenizer for the strict text adapter.
//!
//! Input-wide checks (size ceiling, BOM, UTF-8 validity) happen in
//! [`Lexer::new`] so every later stage can assume well-formed text.
//! String escapes are resolved here; number tokens are returned as raw
//! text so the parser can classify them by spelling.

use map1_canonical::constants::MAX_CANONICAL_BYTES;
use map1_canonical::{ErrorKind, ProtocolError};

/// One JSON token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// `null`
    Null,
    /// `true`
    True,
    /// `false`
    False,
    /// String with escapes resolved.
    String(String),
    /// Number as its raw source spelling.
    Number(String),
    /// End of input.
    Eof,
}

fn bad_syntax(message: impl Into<String>) -> ProtocolError {
    ProtocolError::new(ErrorKind::MalformedStructure, message)
}

#[derive(Debug)]
pub(crate) struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Builds a lexer after the input-wide strictness checks.
    pub fn new(input: &'a [u8]) -> Result<Self, ProtocolError> {
        if input.len() > MAX_CANONICAL_BYTES {
            return Err(ProtocolError::new(
                ErrorKind::SizeLimit,
                "input exceeds the size limit",
            ));
        }

        // BOM rejection applies past any leading JSON whitespace.
        let start = input
            .iter()
            .position(|&b| !matches!(b, 0x20 | 0x09 | 0x0A | 0x0D))
            .unwrap_or(input.len());
        if input[start..].starts_with(&[0xEF, 0xBB, 0xBF]) {
            return Err(ProtocolError::new(
                ErrorKind::InvalidShape,
                "byte-order mark rejected",
            ));
        }

        if std::str::from_utf8(input).is_err() {
            return Err(ProtocolError::new(
                ErrorKind::InvalidEncoding,
                "input is not valid UTF-8",
            ));
        }

        Ok(Self { input, pos: 0 })
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let b = self.peek();
        if b.is_some() {
            self.pos += 1;
        }
        b
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.pos += 1;
        }
    }

    /// Returns the next token.
    pub fn next_token(&mut self) -> Result<Token, ProtocolError> {
        self.skip_whitespace();
        match self.peek() {
            None => Ok(Token::Eof),
            Some(b'{') => {
                self.pos += 1;
                Ok(Token::LeftBrace)
            }
            Some(b'}') => {
                self.pos += 1;
                Ok(Token::RightBrace)
            }
            Some(b'[') => {
                self.pos += 1;
                Ok(Token::LeftBracket)
            }
            Some(b']') => {
                self.pos += 1;
                Ok(Token::RightBracket)
            }
            Some(b':') => {
                self.pos += 1;
                Ok(Token::Colon)
            }
            Some(b',') => {
                self.pos += 1;
                Ok(Token::Comma)
            }
            Some(b'"') => self.read_string(),
            Some(b'-') | Some(b'0'..=b'9') => self.read_number(),
            Some(b't') => self.expect_literal(b"true", Token::True),
            Some(b'f') => self.expect_literal(b"false", Token::False),
            Some(b'n') => self.expect_literal(b"null", Token::Null),
            Some(other) => Err(bad_syntax(format!("unexpected byte 0x{:02x}", other))),
        }
    }

    fn expect_literal(&mut self, literal: &[u8], token: Token) -> Result<Token, ProtocolError> {
        for &expected in literal {
            if self.advance() != Some(expected) {
                return Err(bad_syntax("invalid literal"));
            }
        }
        Ok(token)
    }

    fn read_string(&mut self) -> Result<Token, ProtocolError> {
        self.pos += 1; // opening quote
        let mut out = String::new();
        loop {
            match self.advance() {
                None => return Err(bad_syntax("unterminated string")),
                Some(b'"') => return Ok(Token::String(out)),
                Some(b'\\') => out.push(self.read_escape()?),
                Some(b) if b < 0x20 => {
                    return Err(bad_syntax("control character in string"));
                }
                Some(b) if b < 0x80 => out.push(b as char),
                Some(_) => {
                    // Multi-byte sequence; the whole input is known-valid
                    // UTF-8, so re-read the full character.
                    self.pos -= 1;
                    out.push(self.read_utf8_char()?);
                }
            }
        }
    }

    fn read_utf8_char(&mut self) -> Result<char, ProtocolError> {
        let rest = std::str::from_utf8(&self.input[self.pos..])
            .map_err(|_| ProtocolError::new(ErrorKind::InvalidEncoding, "invalid UTF-8"))?;
        let ch = rest
            .chars()
            .next()
            .ok_or_else(|| bad_syntax("unterminated string"))?;
        self.pos += ch.len_utf8();
        Ok(ch)
    }

    fn read_escape(&mut self) -> Result<char, ProtocolError> {
        match self.advance() {
            None => Err(bad_syntax("unterminated escape")),
            Some(b'"') => Ok('"'),
            Some(b'\\') => Ok('\\'),
            Some(b'/') => Ok('/'),
            Some(b'b') => Ok('\x08'),
            Some(b'f') => Ok('\x0C'),
            Some(b'n') => Ok('\n'),
            Some(b'r') => Ok('\r'),
            Some(b't') => Ok('\t'),
            Some(b'u') => self.read_unicode_escape(),
            Some(other) => Err(bad_syntax(format!("bad escape \\{}", other as char))),
        }
    }

    fn read_unicode_escape(&mut self) -> Result<char, ProtocolError> {
        let cp = self.read_hex4()?;
        // Surrogate escapes are rejected whether or not they pair up.
        if (0xD800..=0xDFFF).contains(&cp) {
            return Err(ProtocolError::new(
                ErrorKind::InvalidEncoding,
                format!("surrogate escape \\u{:04X}", cp),
            ));
        }
        char::from_u32(cp as u32).ok_or_else(|| bad_syntax("invalid unicode escape"))
    }

    fn read_hex4(&mut self) -> Result<u16, ProtocolError> {
        let mut value: u16 = 0;
        for _ in 0..4 {
            let digit = match self.advance() {
                Some(b @ b'0'..=b'9') => b - b'0',
                Some(b @ b'a'..=b'f') => b - b'a' + 10,
                Some(b @ b'A'..=b'F') => b - b'A' + 10,
                _ => return Err(bad_syntax("bad \\u escape")),
            };
            value = (value << 4) | u16::from(digit);
        }
        Ok(value)
    }

    /// Reads a number token, validating the RFC 8259 grammar but keeping
    /// the raw spelling: integer-vs-float classification belongs to the
    /// parser and looks only at the token text.
    fn read_number(&mut self) -> Result<Token, ProtocolError> {
        let start = self.pos;

        if self.peek() == Some(b'-') {
            self.pos += 1;
        }

        match self.peek() {
            Some(b'0') => {
                self.pos += 1;
                if let Some(b'0'..=b'9') = self.peek() {
                    return Err(bad_syntax("leading zero in number"));
                }
            }
            Some(b'1'..=b'9') => {
                while let Some(b'0'..=b'9') = self.peek() {
                    self.pos += 1;
                }
            }
            _ => return Err(bad_syntax("digit expected in number")),
        }

        if self.peek() == Some(b'.') {
            self.pos += 1;
            self.read_digits("digit expected after '.'")?;
        }
        if let Some(b'e' | b'E') = self.peek() {
            self.pos += 1;
            if let Some(b'+' | b'-') = self.peek() {
                self.pos += 1;
            }
            self.read_digits("digit expected in exponent")?;
        }

        let raw = std::str::from_utf8(&self.input[start..self.pos])
            .expect("number tokens are ASCII");
        Ok(Token::Number(raw.to_string()))
    }

    fn read_digits(&mut self, message: &str) -> Result<(), ProtocolError> {
        let mut any = false;
        while let Some(b'0'..=b'9') = self.peek() {
            self.pos += 1;
            any = true;
        }
        if any {
            Ok(())
        } else {
            Err(bad_syntax(message))
        }
    }
}

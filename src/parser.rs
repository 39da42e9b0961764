// src/parser.rs
//
// Low-level cursor over a raw specification string. The template grammar
// itself lives in `template.rs`; this type only knows how to walk bytes,
// scan identifiers, and capture bracketed literal keys.

use crate::errors::{InterpError, Result};

pub struct Parser<'a> {
    s: &'a str,
    i: usize,
}

impl<'a> Parser<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    /// Byte offset of the cursor within the input.
    pub fn pos(&self) -> usize {
        self.i
    }

    /// One path segment: letters, digits, underscore, hyphen. A dot is the
    /// path separator and never part of a segment.
    pub fn parse_identifier(&mut self) -> Result<String> {
        let start = self.i;
        while let Some(c) = self.peek_char() {
            if c == '_' || c == '-' || c.is_ascii_alphanumeric() {
                self.i += c.len_utf8();
            } else {
                break;
            }
        }
        if self.i == start {
            return Err(InterpError::MalformedExpression(format!(
                "identifier expected at offset {}",
                start
            )));
        }
        Ok(self.s[start..self.i].to_string())
    }

    /// A quoted literal key, taken verbatim: any character up to the next
    /// closing quote, with no escape processing. Supports keys containing
    /// dots or other non-identifier characters.
    pub fn parse_quoted_literal(&mut self) -> Result<String> {
        let quote = self
            .peek_char()
            .ok_or_else(|| InterpError::MalformedExpression("quoted key expected".into()))?;
        if quote != '\'' && quote != '"' {
            return Err(InterpError::MalformedExpression(
                "expected quoted key".into(),
            ));
        }
        self.i += 1;
        let start = self.i;
        while let Some(c) = self.peek_char() {
            if c == quote {
                let key = self.s[start..self.i].to_string();
                self.i += 1;
                return Ok(key);
            }
            self.i += c.len_utf8();
        }
        Err(InterpError::MalformedExpression(
            "unterminated quoted key".into(),
        ))
    }

    pub fn expect(&mut self, c: char) -> Result<()> {
        if self.consume_char(c) {
            Ok(())
        } else {
            Err(InterpError::MalformedExpression(format!(
                "expected '{}' at offset {}",
                c, self.i
            )))
        }
    }

    pub fn consume_char(&mut self, c: char) -> bool {
        if self.peek_char() == Some(c) {
            self.i += c.len_utf8();
            true
        } else {
            false
        }
    }

    pub fn peek_char(&self) -> Option<char> {
        self.s[self.i..].chars().next()
    }

    pub fn peek_str(&self, lit: &str) -> bool {
        self.s[self.i..].starts_with(lit)
    }

    /// Advance past `n` bytes without inspecting them.
    pub fn advance(&mut self, n: usize) {
        self.i += n;
    }

    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }
}

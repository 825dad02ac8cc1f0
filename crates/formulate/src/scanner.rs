//! Lexical scanner
//!
//! Turns source text into tokens one at a time, tracking the line and column
//! of every token for diagnostics.

use crate::error::{ParseError, ParseResult};
use crate::token::{Token, TokenKind, OPERATORS};

/// Scanner over a single source text
pub struct Scanner<'a> {
    src: &'a str,
    /// Byte offset of the next unread character
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Scanner<'a> {
    /// Create a scanner over raw bytes.
    ///
    /// Malformed UTF-8 anywhere in the input is an error located at the first
    /// offending byte.
    pub fn new(src: &'a [u8]) -> ParseResult<Self> {
        match std::str::from_utf8(src) {
            Ok(text) => Ok(Self::from_text(text)),
            Err(err) => {
                let valid = std::str::from_utf8(&src[..err.valid_up_to()]).unwrap_or_default();
                let mut prefix = Self::from_text(valid);
                while prefix.bump().is_some() {}
                Err(ParseError::new(
                    "illegal utf-8 character",
                    prefix.line,
                    prefix.column,
                ))
            }
        }
    }

    /// Create a scanner over text
    pub fn from_text(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn bump_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek().map_or(false, &pred) {
            self.bump();
        }
    }

    fn skip_whitespace(&mut self) {
        self.bump_while(|c| matches!(c, ' ' | '\t' | '\n' | '\r'));
    }

    /// Scan the next token; returns `Eof` repeatedly once input is exhausted.
    pub fn scan(&mut self) -> ParseResult<Token> {
        self.skip_whitespace();

        let (line, column) = (self.line, self.column);
        let token = |kind, literal: &str| Token {
            kind,
            literal: literal.to_string(),
            line,
            column,
        };

        let c = match self.peek() {
            Some(c) => c,
            None => return Ok(token(TokenKind::Eof, "")),
        };

        match c {
            '{' => {
                let name = self.scan_delimited('}', "identifier", line, column)?;
                Ok(token(TokenKind::QuotedIdent, name))
            }
            '\'' | '"' => {
                let text = self.scan_delimited(c, "string", line, column)?;
                Ok(token(TokenKind::String, text))
            }
            c if c.is_ascii_alphabetic() => {
                let start = self.pos;
                self.bump_while(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
                Ok(token(TokenKind::Ident, &self.src[start..self.pos]))
            }
            c if c.is_ascii_digit() => {
                let start = self.pos;
                self.scan_number();
                Ok(token(TokenKind::Number, &self.src[start..self.pos]))
            }
            c => {
                for (kind, seq) in OPERATORS {
                    if self.rest().starts_with(seq) {
                        self.pos += seq.len();
                        self.column += seq.chars().count();
                        return Ok(token(*kind, ""));
                    }
                }
                self.bump();
                Ok(token(TokenKind::Bad, &c.to_string()))
            }
        }
    }

    /// Digits, an optional fraction and an optional signed exponent.
    ///
    /// The text is validated later, when it is converted to a number.
    fn scan_number(&mut self) {
        self.bump_while(|c| c.is_ascii_digit());
        if self.peek() == Some('.') {
            self.bump();
            self.bump_while(|c| c.is_ascii_digit());
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            self.bump();
            if matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
            self.bump_while(|c| c.is_ascii_digit());
        }
    }

    /// Raw text up to the closing delimiter.
    ///
    /// A backslash keeps the following character from closing the literal and
    /// is itself kept in the text.
    fn scan_delimited(
        &mut self,
        close: char,
        what: &str,
        line: usize,
        column: usize,
    ) -> ParseResult<&'a str> {
        let unterminated = || ParseError::new(format!("unterminated {}", what), line, column);

        let src = self.src;
        self.bump();
        let start = self.pos;
        loop {
            match self.bump() {
                None => return Err(unterminated()),
                Some('\\') => {
                    self.bump().ok_or_else(unterminated)?;
                }
                Some(c) if c == close => {
                    return Ok(&src[start..self.pos - c.len_utf8()]);
                }
                Some(_) => {}
            }
        }
    }
}

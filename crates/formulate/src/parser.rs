//! Formula parser
//!
//! A recursive descent parser with precedence climbing for binary operators.
//! Unary operators bind tighter than any binary operator; binary operators of
//! equal precedence associate to the left.

use crate::ast::{Expr, UnaryOperator};
use crate::error::{ParseError, ParseResult};
use crate::scanner::Scanner;
use crate::token::{Token, TokenKind};
use formulate_core::number::parse_number;
use formulate_core::Value;
use log::debug;
use std::str::FromStr;

/// Nesting allowed by [`ParseOptions::default`]
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Parser limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Deepest nesting of parentheses, calls and operators. Each operator in
    /// a flat chain such as `a + b + c` counts as one level.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Parse source bytes into an expression
///
/// # Example
/// ```rust
/// use formulate::parse;
///
/// let expr = parse(b"2 + 3 * 4").unwrap();
/// assert_eq!(expr.to_string(), "(2 + (3 * 4))");
/// assert!(parse(b"2+2) *2-1").is_err());
/// ```
pub fn parse(src: &[u8]) -> ParseResult<Expr> {
    parse_with_options(src, &ParseOptions::default())
}

/// Parse source text into an expression
pub fn parse_str(src: &str) -> ParseResult<Expr> {
    parse(src.as_bytes())
}

/// Parse source bytes with explicit limits
pub fn parse_with_options(src: &[u8], options: &ParseOptions) -> ParseResult<Expr> {
    let result = Parser::new(src, options).and_then(|mut parser| parser.parse_all());
    if let Err(err) = &result {
        debug!("parse failed: {}", err);
    }
    result
}

impl FromStr for Expr {
    type Err = ParseError;

    fn from_str(s: &str) -> ParseResult<Self> {
        parse_str(s)
    }
}

struct Parser<'a> {
    scanner: Scanner<'a>,
    current: Token,
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a [u8], options: &ParseOptions) -> ParseResult<Self> {
        let mut scanner = Scanner::new(src)?;
        let current = scanner.scan()?;
        Ok(Self {
            scanner,
            current,
            depth: 0,
            max_depth: options.max_depth,
        })
    }

    /// Move to the next token, returning the one just consumed
    fn advance(&mut self) -> ParseResult<Token> {
        let next = self.scanner.scan()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn error<S: Into<String>>(&self, message: S) -> ParseError {
        ParseError::new(message, self.current.line, self.current.column)
    }

    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.depth >= self.max_depth {
            return Err(self.error("expression nested too deeply"));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn parse_all(&mut self) -> ParseResult<Expr> {
        let expr = self.parse_expr()?;
        match self.current.kind {
            TokenKind::Eof => Ok(expr),
            TokenKind::RightParen => Err(self.error("no matching opening parenthesis")),
            _ => Err(self.error(format!("unexpected {}", self.current.describe()))),
        }
    }

    fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.parse_binary(1)
    }

    /// Precedence climbing: consume operators binding at least `min_precedence`
    fn parse_binary(&mut self, min_precedence: u8) -> ParseResult<Expr> {
        let outer = self.depth;
        let result = self.parse_chain(min_precedence);
        self.depth = outer;
        result
    }

    /// Every accepted operator deepens the left-leaning tree by one level
    fn parse_chain(&mut self, min_precedence: u8) -> ParseResult<Expr> {
        let mut left = self.parse_unary()?;

        while let Some(op) = self.current.kind.binary_operator() {
            let precedence = op.precedence();
            if precedence < min_precedence {
                break;
            }
            if self.depth >= self.max_depth {
                return Err(self.error("expression nested too deeply"));
            }
            self.depth += 1;
            self.advance()?;
            let right = self.parse_binary(precedence + 1)?;
            left = Expr::binary(left, op, right);
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        let op = match self.current.kind {
            TokenKind::Minus => UnaryOperator::Negate,
            TokenKind::Plus => UnaryOperator::Plus,
            TokenKind::Not => UnaryOperator::Not,
            _ => return self.parse_operand(),
        };
        self.advance()?;
        let operand = self.nested(|p| p.parse_unary())?;
        Ok(Expr::unary(op, operand))
    }

    fn parse_operand(&mut self) -> ParseResult<Expr> {
        match self.current.kind {
            TokenKind::Ident => {
                let token = self.advance()?;
                match token.literal.to_uppercase().as_str() {
                    "TRUE" => return Ok(Expr::literal(true)),
                    "FALSE" => return Ok(Expr::literal(false)),
                    "NULL" => return Ok(Expr::literal(Value::Null)),
                    _ => {}
                }
                self.parse_name(token.literal)
            }
            TokenKind::QuotedIdent => {
                let token = self.advance()?;
                self.parse_name(token.literal)
            }
            TokenKind::String => {
                let token = self.advance()?;
                Ok(Expr::literal(token.literal))
            }
            TokenKind::Number => {
                let number = parse_number(&self.current.literal)
                    .map_err(|_| self.error(format!("not a number: {}", self.current.literal)))?;
                self.advance()?;
                Ok(Expr::literal(number))
            }
            TokenKind::LeftParen => self.nested(|p| p.parse_paren()),
            _ => Err(self.error("operand expected")),
        }
    }

    /// An identifier, or a call when the name is followed by `(`
    fn parse_name(&mut self, name: String) -> ParseResult<Expr> {
        if self.current.kind == TokenKind::LeftParen {
            self.nested(|p| p.parse_call(&name))
        } else {
            Ok(Expr::Ident(name))
        }
    }

    fn parse_paren(&mut self) -> ParseResult<Expr> {
        self.advance()?; // (
        let expr = self.parse_expr()?;
        if self.current.kind != TokenKind::RightParen {
            return Err(self.error("no closing parenthesis"));
        }
        self.advance()?;
        Ok(expr)
    }

    fn parse_call(&mut self, name: &str) -> ParseResult<Expr> {
        self.advance()?; // (
        let mut args = Vec::new();

        if self.current.kind == TokenKind::RightParen {
            self.advance()?;
            return Ok(Expr::call(name, args));
        }

        loop {
            args.push(self.parse_expr()?);
            match self.current.kind {
                TokenKind::Comma => {
                    self.advance()?;
                }
                TokenKind::RightParen => {
                    self.advance()?;
                    return Ok(Expr::call(name, args));
                }
                _ => return Err(self.error("comma or closing parenthesis expected")),
            }
        }
    }
}

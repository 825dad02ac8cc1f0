//! Token kinds, operator spellings and binary precedence

use crate::ast::BinaryOperator;
use std::fmt;

/// Kind of a lexical token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// End of input
    Eof,
    /// A character that starts no token
    Bad,
    Ident,
    /// `{...}` identifier; never a keyword
    QuotedIdent,
    String,
    Number,

    Comma,
    LeftParen,
    RightParen,
    Not,
    Plus,
    Minus,
    Star,
    Slash,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    And,
    Or,
}

/// Operator and punctuation spellings.
///
/// Order matters: a two-character sequence must come before any
/// one-character prefix of it (`!=` before `!`, `<=` before `<`).
pub const OPERATORS: &[(TokenKind, &str)] = &[
    (TokenKind::Comma, ","),
    (TokenKind::LeftParen, "("),
    (TokenKind::RightParen, ")"),
    (TokenKind::Plus, "+"),
    (TokenKind::Minus, "-"),
    (TokenKind::Star, "*"),
    (TokenKind::Slash, "/"),
    (TokenKind::Equal, "=="),
    (TokenKind::NotEqual, "!="),
    (TokenKind::Not, "!"),
    (TokenKind::NotEqual, "<>"),
    (TokenKind::LessEqual, "<="),
    (TokenKind::Less, "<"),
    (TokenKind::GreaterEqual, ">="),
    (TokenKind::Greater, ">"),
    (TokenKind::And, "&&"),
    (TokenKind::Or, "||"),
];

impl TokenKind {
    /// The binary operator this token spells, if any
    pub fn binary_operator(self) -> Option<BinaryOperator> {
        let op = match self {
            TokenKind::Plus => BinaryOperator::Add,
            TokenKind::Minus => BinaryOperator::Subtract,
            TokenKind::Star => BinaryOperator::Multiply,
            TokenKind::Slash => BinaryOperator::Divide,
            TokenKind::Equal => BinaryOperator::Equal,
            TokenKind::NotEqual => BinaryOperator::NotEqual,
            TokenKind::Less => BinaryOperator::LessThan,
            TokenKind::LessEqual => BinaryOperator::LessEqual,
            TokenKind::Greater => BinaryOperator::GreaterThan,
            TokenKind::GreaterEqual => BinaryOperator::GreaterEqual,
            TokenKind::And => BinaryOperator::And,
            TokenKind::Or => BinaryOperator::Or,
            _ => return None,
        };
        Some(op)
    }

    /// Whether this token ends an operand list (`)`, `,` or end of input)
    pub fn is_terminator(self) -> bool {
        matches!(
            self,
            TokenKind::RightParen | TokenKind::Comma | TokenKind::Eof
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some((_, seq)) = OPERATORS.iter().find(|(kind, _)| kind == self) {
            return write!(f, "'{}'", seq);
        }
        let name = match self {
            TokenKind::Eof => "end of expression",
            TokenKind::Bad => "illegal character",
            TokenKind::Ident | TokenKind::QuotedIdent => "identifier",
            TokenKind::String => "string",
            TokenKind::Number => "number",
            _ => "operator",
        };
        write!(f, "{}", name)
    }
}

/// A scanned token with its literal text and start position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Raw text for identifiers, strings, numbers and bad characters
    pub literal: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    /// Short description for error messages
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Ident | TokenKind::QuotedIdent | TokenKind::Number | TokenKind::Bad => {
                format!("{} '{}'", self.kind, self.literal)
            }
            TokenKind::String => format!("string '{}'", self.literal),
            _ => self.kind.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_two_char_operators_precede_prefixes() {
        let position = |seq: &str| OPERATORS.iter().position(|(_, s)| *s == seq).unwrap();
        assert!(position("!=") < position("!"));
        assert!(position("<=") < position("<"));
        assert!(position("<>") < position("<"));
        assert!(position(">=") < position(">"));
    }

    #[test]
    fn test_binary_precedence() {
        let prec = |kind: TokenKind| kind.binary_operator().unwrap().precedence();
        assert_eq!(prec(TokenKind::Star), 4);
        assert_eq!(prec(TokenKind::Slash), 4);
        assert_eq!(prec(TokenKind::Plus), 3);
        assert_eq!(prec(TokenKind::Minus), 3);
        assert_eq!(prec(TokenKind::LessEqual), 2);
        assert_eq!(prec(TokenKind::NotEqual), 2);
        assert_eq!(prec(TokenKind::And), 1);
        assert_eq!(prec(TokenKind::Or), 1);
        assert_eq!(TokenKind::Not.binary_operator(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(TokenKind::LessEqual.to_string(), "'<='");
        assert_eq!(TokenKind::NotEqual.to_string(), "'!='");
        assert_eq!(TokenKind::Eof.to_string(), "end of expression");
    }
}

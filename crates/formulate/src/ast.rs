//! Expression Abstract Syntax Tree types

use formulate_core::datetime::format_iso8601;
use formulate_core::Value;
use num_traits::Signed;
use std::fmt;

/// Expression AST
///
/// Nodes are immutable once built and form a strict tree rooted at the parse
/// result; the same tree may be evaluated any number of times.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Name resolved against the context's value providers
    Ident(String),

    /// Value fixed at parse time
    Literal(Value),

    /// Prefix operation
    Unary {
        op: UnaryOperator,
        operand: Box<Expr>,
    },

    /// Binary operation
    Binary {
        op: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Function call; the name is uppercase
    Call { name: String, args: Vec<Expr> },
}

/// Prefix operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    /// `-x`
    Negate,
    /// `+x`, asserts a number
    Plus,
    /// `!x`
    Not,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,

    // Comparison
    Equal,
    NotEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,

    // Logical
    And,
    Or,
}

impl UnaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOperator::Negate => "-",
            UnaryOperator::Plus => "+",
            UnaryOperator::Not => "!",
        }
    }
}

impl BinaryOperator {
    /// Binding strength; higher binds tighter
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOperator::Multiply | BinaryOperator::Divide => 4,
            BinaryOperator::Add | BinaryOperator::Subtract => 3,
            BinaryOperator::Equal
            | BinaryOperator::NotEqual
            | BinaryOperator::LessThan
            | BinaryOperator::LessEqual
            | BinaryOperator::GreaterThan
            | BinaryOperator::GreaterEqual => 2,
            BinaryOperator::And | BinaryOperator::Or => 1,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::LessThan => "<",
            BinaryOperator::LessEqual => "<=",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::GreaterEqual => ">=",
            BinaryOperator::And => "&&",
            BinaryOperator::Or => "||",
        }
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl Expr {
    /// Identifier node
    pub fn ident<S: Into<String>>(name: S) -> Self {
        Expr::Ident(name.into())
    }

    /// Literal node
    pub fn literal<V: Into<Value>>(value: V) -> Self {
        Expr::Literal(value.into())
    }

    /// Binary node
    pub fn binary(left: Expr, op: BinaryOperator, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Unary node
    pub fn unary(op: UnaryOperator, operand: Expr) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    /// Call node; the name is normalized to uppercase
    pub fn call(name: &str, args: Vec<Expr>) -> Self {
        Expr::Call {
            name: name.to_uppercase(),
            args,
        }
    }
}

fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let starts_with_letter = chars.next().map_or(false, |c| c.is_ascii_alphabetic());
    starts_with_letter
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
        && !matches!(
            name.to_uppercase().as_str(),
            "TRUE" | "FALSE" | "NULL"
        )
}

fn write_literal(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::Null => f.write_str("NULL"),
        Value::Boolean(true) => f.write_str("TRUE"),
        Value::Boolean(false) => f.write_str("FALSE"),
        Value::Number(n) if n.is_integer() && !n.is_negative() => write!(f, "{}", value),
        Value::Number(_) => write!(f, "({})", value),
        Value::Text(s) if !closes(s, '\'') => write!(f, "'{}'", s),
        Value::Text(s) if !closes(s, '"') => write!(f, "\"{}\"", s),
        Value::Text(s) => write!(f, "'{}'", escape_quotes(s)),
        Value::Timestamp(ts) => write!(f, "DATETIMEVALUE('{}')", format_iso8601(ts)),
    }
}

/// Whether `s` would end a literal delimited by `quote` early. A backslash
/// shields the following character, so a trailing lone one also counts.
fn closes(s: &str, quote: char) -> bool {
    let mut escaped = false;
    for c in s.chars() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return true;
        }
    }
    escaped
}

/// Backslash-escapes the bare `'` characters of `s`. Only text that no
/// single literal can spell reaches here, so the result differs from `s`.
fn escape_quotes(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    let mut escaped = false;
    for c in s.chars() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '\'' {
            out.push('\\');
        }
        out.push(c);
    }
    if escaped {
        out.push('\\');
    }
    out
}

/// Renders a fully parenthesized form that parses back to an equivalent
/// tree for anything the parser produced. Hand-built trees differ in two
/// places: timestamp literals come back as `DATETIMEVALUE` calls, and text
/// holding bare quotes of both kinds gains backslashes.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Ident(name) if is_plain_identifier(name) => f.write_str(name),
            Expr::Ident(name) => write!(f, "{{{}}}", name),
            Expr::Literal(value) => write_literal(f, value),
            Expr::Unary { op, operand } => write!(f, "{}{}", op, operand),
            Expr::Binary { op, left, right } => write!(f, "({} {} {})", left, op, right),
            Expr::Call { name, args } => {
                if is_plain_identifier(name) {
                    write!(f, "{}(", name)?;
                } else {
                    write!(f, "{{{}}}(", name)?;
                }
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_precedence_order() {
        assert!(BinaryOperator::Multiply.precedence() > BinaryOperator::Add.precedence());
        assert!(BinaryOperator::Add.precedence() > BinaryOperator::LessThan.precedence());
        assert!(BinaryOperator::Equal.precedence() > BinaryOperator::Or.precedence());
        assert_eq!(
            BinaryOperator::And.precedence(),
            BinaryOperator::Or.precedence()
        );
    }

    #[test]
    fn test_display() {
        let expr = Expr::call(
            "if",
            vec![
                Expr::binary(
                    Expr::ident("score"),
                    BinaryOperator::GreaterThan,
                    Expr::literal(10),
                ),
                Expr::literal("high"),
                Expr::literal("it's low"),
            ],
        );
        assert_eq!(
            expr.to_string(),
            "IF((score > 10), 'high', \"it's low\")"
        );
    }

    #[test]
    fn test_display_quotes_special_identifiers() {
        assert_eq!(Expr::ident("order.total").to_string(), "order.total");
        assert_eq!(Expr::ident("Total (net)").to_string(), "{Total (net)}");
        assert_eq!(Expr::ident("null").to_string(), "{null}");
    }

    #[test]
    fn test_display_literals() {
        assert_eq!(Expr::literal(Value::Null).to_string(), "NULL");
        assert_eq!(Expr::literal(true).to_string(), "TRUE");
        assert_eq!(Expr::literal(-3).to_string(), "(-3)");
        assert_eq!(
            Expr::literal(Value::ratio(1, 3).unwrap()).to_string(),
            "(1/3)"
        );
        assert_eq!(
            Expr::unary(UnaryOperator::Not, Expr::ident("done")).to_string(),
            "!done"
        );
    }

    #[test]
    fn test_display_text_delimiters() {
        assert_eq!(Expr::literal(r#"a"b\'c"#).to_string(), r#"'a"b\'c'"#);
        assert_eq!(Expr::literal(r#"it's \"x\""#).to_string(), r#""it's \"x\"""#);
        assert_eq!(Expr::literal(r#"it's "x""#).to_string(), r#"'it\'s "x"'"#);
        assert_eq!(Expr::literal("ends\\").to_string(), "'ends\\\\'");
    }
}

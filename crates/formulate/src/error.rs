//! Formula error types
//!
//! Parsing and evaluation report through separate types; a provider's
//! "not mine" answer is a third, distinct type so it can never be mistaken
//! for a real failure.

use formulate_core::Value;
use thiserror::Error;

/// Result type for parsing
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Result type for evaluation
pub type EvalResult<T> = std::result::Result<T, EvalError>;

/// A failure to turn source text into an expression
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at line {line}, column {column}")]
pub struct ParseError {
    pub message: String,
    /// 1-based line
    pub line: usize,
    /// 1-based column, counted in code points
    pub column: usize,
}

impl ParseError {
    pub fn new<S: Into<String>>(message: S, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            line,
            column,
        }
    }
}

/// Errors that can occur while evaluating an expression
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// No value provider knows the identifier
    #[error("unknown value: {0}")]
    UnknownValue(String),

    /// Neither a function provider nor the builtin library knows the function
    #[error("unknown function: {0}")]
    UnknownFunction(String),

    /// Wrong number of arguments
    #[error("function {function}: expected {expected} parameters, actual {actual}")]
    ArgumentCount {
        function: String,
        expected: String,
        actual: usize,
    },

    /// Argument of the wrong type; the index is zero-based
    #[error("function {function}: parameter {index} not a {expected}: {actual}")]
    ArgumentType {
        function: String,
        index: usize,
        expected: &'static str,
        actual: String,
    },

    /// Argument of the right type but an unusable value
    #[error("function {function}: {message}")]
    Argument { function: String, message: String },

    /// Operand of the wrong type
    #[error("operator {operator}: not a {expected}: {value}")]
    Operand {
        operator: &'static str,
        expected: &'static str,
        value: String,
    },

    /// A provider or builtin produced a value outside the value model
    #[error("illegal value {value} returned by {origin}")]
    IllegalValue { value: String, origin: String },

    #[error("division by zero")]
    DivisionByZero,

    /// `CASE` found no matching alternative and has no default
    #[error("function {function}: no value found")]
    NoMatch { function: String },

    /// Number or date conversion failure
    #[error(transparent)]
    Core(#[from] formulate_core::Error),
}

/// Error answer of a function provider
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FunctionError {
    /// The provider does not handle this function; resolution moves on
    #[error("function not defined")]
    NotMine,

    /// The provider handles the function and it failed
    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl From<formulate_core::Error> for FunctionError {
    fn from(err: formulate_core::Error) -> Self {
        FunctionError::Eval(err.into())
    }
}

/// A value as it appears in error messages; text is quoted
pub(crate) fn describe_value(value: &Value) -> String {
    match value {
        Value::Text(s) => format!("'{}'", s),
        other => other.to_string(),
    }
}

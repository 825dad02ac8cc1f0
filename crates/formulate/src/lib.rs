//! # formulate
//!
//! Embeddable spreadsheet-style formula language.
//!
//! This crate provides:
//! - Formula parsing (text → AST)
//! - Formula evaluation (AST → value) with exact rational arithmetic
//! - Built-in text, date and logical functions
//! - Host hooks for named values and functions via [`Context`]
//! - Reference collection for parsed expressions
//!
//! ## Example
//!
//! ```rust
//! use formulate::{parse_str, Context, Value, ValueMap};
//!
//! let expr = parse_str("IF(score > 10, 'high', 'low')").unwrap();
//! let ctx = Context::new().add_value_provider(ValueMap::new().with("score", 12));
//! assert_eq!(expr.evaluate(&ctx).unwrap(), Value::text("high"));
//! ```

pub mod ast;
pub mod context;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod parser;
pub mod references;
pub mod scanner;
pub mod token;

pub use ast::{BinaryOperator, Expr, UnaryOperator};
pub use context::{Context, FunctionProvider, ValueMap, ValueProvider};
pub use error::{EvalError, EvalResult, FunctionError, ParseError, ParseResult};
pub use evaluator::evaluate;
pub use functions::{builtins, Args, FunctionDef, FunctionRegistry};
pub use parser::{parse, parse_str, parse_with_options, ParseOptions};
pub use references::References;

pub use formulate_core;
pub use formulate_core::{BigRational, Tz, Value};

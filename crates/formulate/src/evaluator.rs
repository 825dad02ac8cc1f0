//! Formula evaluator
//!
//! Walks an expression tree against a [`Context`]. Every child is evaluated
//! before its parent combines the results; `&&` and `||` evaluate both sides.

use crate::ast::{BinaryOperator, Expr, UnaryOperator};
use crate::context::Context;
use crate::error::{describe_value, EvalError, EvalResult};
use crate::functions::builtins;
use chrono::DateTime;
use chrono_tz::Tz;
use formulate_core::{BigRational, Value};
use log::{debug, trace};
use num_traits::Zero;
use std::cmp::Ordering;

impl Expr {
    /// Evaluate this expression
    ///
    /// # Example
    /// ```rust
    /// use formulate::{parse_str, Context, Value};
    ///
    /// let expr = parse_str("VALUE('1') / VALUE('3') * 3").unwrap();
    /// assert_eq!(expr.evaluate(&Context::new()).unwrap(), Value::integer(1));
    /// ```
    pub fn evaluate(&self, ctx: &Context) -> EvalResult<Value> {
        evaluate(self, ctx)
    }
}

/// Evaluate an expression
pub fn evaluate(expr: &Expr, ctx: &Context) -> EvalResult<Value> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Ident(name) => evaluate_ident(name, ctx),
        Expr::Unary { op, operand } => {
            let value = evaluate(operand, ctx)?;
            evaluate_unary_op(*op, value)
        }
        Expr::Binary { op, left, right } => {
            let left = evaluate(left, ctx)?;
            let right = evaluate(right, ctx)?;
            evaluate_binary_op(*op, &left, &right)
        }
        Expr::Call { name, args } => evaluate_function(name, args, ctx),
    }
}

/// Reject values outside the value model at the point they enter evaluation
fn validate(value: Value, origin: &str) -> EvalResult<Value> {
    if value.is_well_formed() {
        return Ok(value);
    }
    debug!("{} produced an illegal value", origin);
    Err(EvalError::IllegalValue {
        value: value.to_string(),
        origin: origin.to_string(),
    })
}

fn evaluate_ident(name: &str, ctx: &Context) -> EvalResult<Value> {
    match ctx.lookup_value(name) {
        Some((index, value)) => {
            trace!("value {} resolved by provider {}", name, index);
            validate(value, name)
        }
        None => Err(EvalError::UnknownValue(name.to_string())),
    }
}

fn evaluate_function(name: &str, args: &[Expr], ctx: &Context) -> EvalResult<Value> {
    let mut values = Vec::with_capacity(args.len());
    for arg in args {
        values.push(evaluate(arg, ctx)?);
    }

    if let Some((index, result)) = ctx.call_provided(name, &values) {
        trace!("function {} handled by provider {}", name, index);
        return validate(result?, name);
    }

    let func = builtins()
        .get(name)
        .ok_or_else(|| EvalError::UnknownFunction(name.to_string()))?;
    trace!("function {} handled by builtin", name);
    validate(func.call(&values, ctx)?, name)
}

fn operand_error(operator: &'static str, expected: &'static str, value: &Value) -> EvalError {
    EvalError::Operand {
        operator,
        expected,
        value: describe_value(value),
    }
}

fn evaluate_unary_op(op: UnaryOperator, value: Value) -> EvalResult<Value> {
    match (op, value) {
        (UnaryOperator::Not, Value::Boolean(b)) => Ok(Value::Boolean(!b)),
        (UnaryOperator::Plus, Value::Number(n)) => Ok(Value::Number(n)),
        (UnaryOperator::Negate, Value::Number(n)) => Ok(Value::Number(-n)),
        (UnaryOperator::Not, other) => Err(operand_error(op.symbol(), "boolean", &other)),
        (_, other) => Err(operand_error(op.symbol(), "number", &other)),
    }
}

// Operand families. Each returns both operands, or the first one that does
// not belong to the family.

fn numbers<'v>(x: &'v Value, y: &'v Value) -> Result<(&'v BigRational, &'v BigRational), &'v Value> {
    match (x, y) {
        (Value::Number(x), Value::Number(y)) => Ok((x, y)),
        (Value::Number(_), other) | (other, _) => Err(other),
    }
}

fn booleans<'v>(x: &'v Value, y: &'v Value) -> Result<(bool, bool), &'v Value> {
    match (x, y) {
        (Value::Boolean(x), Value::Boolean(y)) => Ok((*x, *y)),
        (Value::Boolean(_), other) | (other, _) => Err(other),
    }
}

fn timestamps<'v>(
    x: &'v Value,
    y: &'v Value,
) -> Result<(&'v DateTime<Tz>, &'v DateTime<Tz>), &'v Value> {
    match (x, y) {
        (Value::Timestamp(x), Value::Timestamp(y)) => Ok((x, y)),
        (Value::Timestamp(_), other) | (other, _) => Err(other),
    }
}

/// Text operands; `Null` counts as the empty string
fn texts<'v>(x: &'v Value, y: &'v Value) -> Result<(&'v str, &'v str), &'v Value> {
    fn text(v: &Value) -> Option<&str> {
        match v {
            Value::Text(s) => Some(s),
            Value::Null => Some(""),
            _ => None,
        }
    }
    match (text(x), text(y)) {
        (Some(x), Some(y)) => Ok((x, y)),
        (None, _) => Err(x),
        (_, None) => Err(y),
    }
}

fn evaluate_binary_op(op: BinaryOperator, left: &Value, right: &Value) -> EvalResult<Value> {
    let symbol = op.symbol();

    match op {
        BinaryOperator::Add => {
            if let Ok((x, y)) = numbers(left, right) {
                return Ok(Value::Number(x + y));
            }
            let (x, y) = texts(left, right).map_err(|v| operand_error(symbol, "string", v))?;
            Ok(Value::Text(format!("{}{}", x, y)))
        }

        BinaryOperator::Subtract | BinaryOperator::Multiply | BinaryOperator::Divide => {
            let (x, y) = numbers(left, right).map_err(|v| operand_error(symbol, "number", v))?;
            let result = match op {
                BinaryOperator::Subtract => x - y,
                BinaryOperator::Multiply => x * y,
                _ if y.is_zero() => return Err(EvalError::DivisionByZero),
                _ => x / y,
            };
            Ok(Value::Number(result))
        }

        BinaryOperator::Equal
        | BinaryOperator::NotEqual
        | BinaryOperator::LessThan
        | BinaryOperator::LessEqual
        | BinaryOperator::GreaterThan
        | BinaryOperator::GreaterEqual => {
            let ordering = compare(op, left, right)?;
            let result = match op {
                BinaryOperator::Equal => ordering == Ordering::Equal,
                BinaryOperator::NotEqual => ordering != Ordering::Equal,
                BinaryOperator::LessThan => ordering == Ordering::Less,
                BinaryOperator::LessEqual => ordering != Ordering::Greater,
                BinaryOperator::GreaterThan => ordering == Ordering::Greater,
                _ => ordering != Ordering::Less,
            };
            Ok(Value::Boolean(result))
        }

        BinaryOperator::And | BinaryOperator::Or => {
            let (x, y) = booleans(left, right).map_err(|v| operand_error(symbol, "boolean", v))?;
            let result = match op {
                BinaryOperator::And => x && y,
                _ => x || y,
            };
            Ok(Value::Boolean(result))
        }
    }
}

/// Order two operands by the first family both belong to.
///
/// Numbers come first, then booleans (equality only), then timestamps, and
/// finally text, which is compared by code point.
fn compare(op: BinaryOperator, left: &Value, right: &Value) -> EvalResult<Ordering> {
    if let Ok((x, y)) = numbers(left, right) {
        return Ok(x.cmp(y));
    }
    if matches!(op, BinaryOperator::Equal | BinaryOperator::NotEqual) {
        if let Ok((x, y)) = booleans(left, right) {
            return Ok(x.cmp(&y));
        }
    }
    if let Ok((x, y)) = timestamps(left, right) {
        return Ok(x.cmp(y));
    }
    let (x, y) = texts(left, right).map_err(|v| operand_error(op.symbol(), "string", v))?;
    Ok(x.cmp(y))
}

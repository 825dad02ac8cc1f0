//! Logical functions

use super::Args;
use crate::context::Context;
use crate::error::{EvalError, EvalResult};
use formulate_core::Value;

/// CASE(expr, value1, result1 [, value2, result2 ...] [, default])
///
/// Patterns are compared using the type of `expr`; a pattern of another
/// type is an error.
pub fn fn_case(args: &Args<'_>, _ctx: &Context) -> EvalResult<Value> {
    let scrutinee = args.value(0)?;
    let values = args.values();

    let mut i = 1;
    while i + 1 < values.len() {
        let matched = match scrutinee {
            Value::Null => values[i].is_null(),
            Value::Number(n) => args.number(i)? == n,
            Value::Text(s) => args.text(i)? == s.as_str(),
            Value::Boolean(b) => args.boolean(i)? == *b,
            Value::Timestamp(_) => {
                return Err(args.error("timestamps cannot be matched"));
            }
        };
        if matched {
            return Ok(values[i + 1].clone());
        }
        i += 2;
    }

    match values.get(i) {
        Some(default) => Ok(default.clone()),
        None => Err(EvalError::NoMatch {
            function: args.function().to_string(),
        }),
    }
}

/// IF(condition, then, else)
pub fn fn_if(args: &Args<'_>, _ctx: &Context) -> EvalResult<Value> {
    let branch = if args.boolean(0)? { 1 } else { 2 };
    Ok(args.value(branch)?.clone())
}

/// NULLVALUE(expr, substitute)
pub fn fn_nullvalue(args: &Args<'_>, _ctx: &Context) -> EvalResult<Value> {
    let value = args.value(0)?;
    if value.is_null() {
        Ok(args.value(1)?.clone())
    } else {
        Ok(value.clone())
    }
}

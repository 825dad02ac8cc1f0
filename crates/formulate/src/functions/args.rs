//! Argument checking for function implementations
//!
//! [`Args`] wraps the evaluated arguments of one call together with the
//! function name, so every accessor can report which function and which
//! parameter went wrong. Host function providers can use it too.

use crate::error::{describe_value, EvalError, EvalResult};
use chrono::DateTime;
use chrono_tz::Tz;
use formulate_core::number::{parse_number, to_i64_trunc};
use formulate_core::{BigRational, Value};

/// Evaluated arguments of a single call
///
/// # Example
/// ```rust
/// use formulate::{Args, Value};
///
/// let values = [Value::text("abc"), Value::text("2")];
/// let args = Args::new("LEFT", &values);
/// assert_eq!(args.text(0).unwrap(), "abc");
/// assert_eq!(args.integer(1).unwrap(), 2);
/// assert!(args.boolean(0).is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Args<'a> {
    function: &'a str,
    values: &'a [Value],
}

impl<'a> Args<'a> {
    pub fn new(function: &'a str, values: &'a [Value]) -> Self {
        Self { function, values }
    }

    /// Name of the called function
    pub fn function(&self) -> &'a str {
        self.function
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &'a [Value] {
        self.values
    }

    /// Fail unless there are exactly `expected` arguments
    pub fn expect_count(&self, expected: usize) -> EvalResult<()> {
        self.expect_range(expected, Some(expected))
    }

    /// Fail unless the argument count lies in `min..=max`
    pub fn expect_range(&self, min: usize, max: Option<usize>) -> EvalResult<()> {
        let actual = self.values.len();
        let expected = match max {
            Some(max) if min == max && actual != min => min.to_string(),
            Some(max) if actual > max => format!("at most {}", max),
            _ if actual < min => format!("at least {}", min),
            _ => return Ok(()),
        };
        Err(EvalError::ArgumentCount {
            function: self.function.to_string(),
            expected,
            actual,
        })
    }

    /// Argument `index`, failing if it is missing
    pub fn value(&self, index: usize) -> EvalResult<&'a Value> {
        self.values.get(index).ok_or_else(|| EvalError::ArgumentCount {
            function: self.function.to_string(),
            expected: format!("at least {}", index + 1),
            actual: self.values.len(),
        })
    }

    /// Argument `index` if present
    pub fn get(&self, index: usize) -> Option<&'a Value> {
        self.values.get(index)
    }

    fn type_error(&self, index: usize, expected: &'static str, actual: &Value) -> EvalError {
        EvalError::ArgumentType {
            function: self.function.to_string(),
            index,
            expected,
            actual: describe_value(actual),
        }
    }

    /// An argument error for this function
    pub fn error<S: Into<String>>(&self, message: S) -> EvalError {
        EvalError::Argument {
            function: self.function.to_string(),
            message: message.into(),
        }
    }

    pub fn text(&self, index: usize) -> EvalResult<&'a str> {
        match self.value(index)? {
            Value::Text(s) => Ok(s),
            other => Err(self.type_error(index, "string", other)),
        }
    }

    pub fn number(&self, index: usize) -> EvalResult<&'a BigRational> {
        match self.value(index)? {
            Value::Number(n) => Ok(n),
            other => Err(self.type_error(index, "number", other)),
        }
    }

    pub fn boolean(&self, index: usize) -> EvalResult<bool> {
        match self.value(index)? {
            Value::Boolean(b) => Ok(*b),
            other => Err(self.type_error(index, "boolean", other)),
        }
    }

    pub fn timestamp(&self, index: usize) -> EvalResult<&'a DateTime<Tz>> {
        match self.value(index)? {
            Value::Timestamp(ts) => Ok(ts),
            other => Err(self.type_error(index, "timestamp", other)),
        }
    }

    /// A number, or text holding a number
    pub fn numeric(&self, index: usize) -> EvalResult<BigRational> {
        let value = self.value(index)?;
        match value {
            Value::Number(n) => Ok(n.clone()),
            Value::Text(s) => parse_number(s).map_err(|_| self.type_error(index, "number", value)),
            _ => Err(self.type_error(index, "number", value)),
        }
    }

    /// A number or numeric text, truncated toward zero
    pub fn integer(&self, index: usize) -> EvalResult<i64> {
        let n = self.numeric(index)?;
        to_i64_trunc(&n).ok_or_else(|| {
            self.error(format!("parameter {} out of range: {}", index, Value::Number(n.clone())))
        })
    }

    /// Like [`Args::integer`], with negative counts read as zero
    pub fn count(&self, index: usize) -> EvalResult<usize> {
        let n = self.integer(index)?;
        Ok(usize::try_from(n.max(0)).unwrap_or(usize::MAX))
    }
}

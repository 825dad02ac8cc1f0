//! Runtime values

use crate::datetime::format_iso8601;
use crate::error::Error;
use crate::number::format_number;
use chrono::DateTime;
use chrono_tz::Tz;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Zero;
use std::fmt;

/// A value produced by evaluating an expression.
///
/// The set of variants is closed: every literal, operator result, identifier
/// and function result is one of these five.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absence of a value
    #[default]
    Null,

    /// `true` / `false`
    Boolean(bool),

    /// Exact rational number
    Number(BigRational),

    /// Unicode text, indexed by code point
    Text(String),

    /// An instant bound to a time zone
    Timestamp(DateTime<Tz>),
}

impl Value {
    /// Create an integer number
    pub fn integer(n: i64) -> Self {
        Value::Number(BigRational::from_integer(BigInt::from(n)))
    }

    /// Create a number from a numerator/denominator pair.
    ///
    /// Returns `None` for a zero denominator.
    pub fn ratio(numer: i64, denom: i64) -> Option<Self> {
        if denom == 0 {
            return None;
        }
        Some(Value::Number(BigRational::new(
            BigInt::from(numer),
            BigInt::from(denom),
        )))
    }

    /// Create a text value
    pub fn text<S: Into<String>>(s: S) -> Self {
        Value::Text(s.into())
    }

    /// Check if this is `Null`
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get the number, if this is one
    pub fn as_number(&self) -> Option<&BigRational> {
        match self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Get the text, if this is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the boolean, if this is one
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the timestamp, if this is one
    pub fn as_timestamp(&self) -> Option<&DateTime<Tz>> {
        match self {
            Value::Timestamp(ts) => Some(ts),
            _ => None,
        }
    }

    /// Whether the value respects the value model.
    ///
    /// The only shape the enum admits that the model does not is a number with
    /// a zero denominator, which `BigRational::new_raw` can build.
    pub fn is_well_formed(&self) -> bool {
        match self {
            Value::Number(n) => !n.denom().is_zero(),
            _ => true,
        }
    }

    /// Get the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::Text(_) => "string",
            Value::Timestamp(_) => "timestamp",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Number(n) if n.denom().is_zero() => write!(f, "{}/0", n.numer()),
            Value::Number(n) => write!(f, "{}", format_number(n)),
            Value::Text(s) => write!(f, "{}", s),
            Value::Timestamp(ts) => write!(f, "{}", format_iso8601(ts)),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::integer(n.into())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::integer(n)
    }
}

impl From<BigRational> for Value {
    fn from(n: BigRational) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::text(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<DateTime<Tz>> for Value {
    fn from(ts: DateTime<Tz>) -> Self {
        Value::Timestamp(ts)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Floats convert exactly; NaN and infinities are rejected.
impl TryFrom<f64> for Value {
    type Error = Error;

    fn try_from(n: f64) -> Result<Self, Self::Error> {
        BigRational::from_float(n)
            .map(Value::Number)
            .ok_or_else(|| Error::InvalidNumber(n.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::integer(-12).to_string(), "-12");
        assert_eq!(Value::ratio(1, 3).unwrap().to_string(), "1/3");
        assert_eq!(Value::ratio(3, 4).unwrap().to_string(), "0.75");
        assert_eq!(Value::text("Вот").to_string(), "Вот");

        let ts = Tz::UTC.with_ymd_and_hms(2001, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(Value::from(ts).to_string(), "2001-01-02T03:04:05Z");
    }

    #[test]
    fn test_equality_is_exact() {
        assert_eq!(Value::ratio(2, 4), Value::ratio(1, 2));
        assert_ne!(Value::ratio(1, 3), Value::ratio(333, 1000));
    }

    #[test]
    fn test_timestamps_compare_by_instant() {
        let berlin: Tz = "Europe/Berlin".parse().unwrap();
        let utc = Tz::UTC.with_ymd_and_hms(2020, 1, 1, 11, 0, 0).unwrap();
        let local = berlin.with_ymd_and_hms(2020, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(Value::from(utc), Value::from(local));
    }

    #[test]
    fn test_from_float() {
        assert_eq!(Value::try_from(0.5).unwrap(), Value::ratio(1, 2).unwrap());
        assert!(Value::try_from(f64::NAN).is_err());
        assert!(Value::try_from(f64::INFINITY).is_err());
    }

    #[test]
    fn test_well_formed() {
        assert!(Value::integer(1).is_well_formed());
        assert!(Value::Null.is_well_formed());
        let broken = BigRational::new_raw(BigInt::from(1), BigInt::from(0));
        assert!(!Value::Number(broken).is_well_formed());
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(None::<&str>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::text("x"));
    }
}

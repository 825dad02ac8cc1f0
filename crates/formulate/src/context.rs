//! Evaluation context
//!
//! A [`Context`] holds the host's value and function providers and the time
//! zone used to interpret dates. It is built once, shared read-only between
//! evaluations, and may be used from several threads at once.

use crate::error::{EvalResult, FunctionError};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use formulate_core::datetime::{format_with_layout, parse_time_zone, parse_with_layout};
use formulate_core::Value;
use std::collections::HashMap;
use std::fmt;

/// Resolves identifiers to values
pub trait ValueProvider: Send + Sync {
    /// The value named `name`, or `None` if this provider does not know it
    fn resolve_value(&self, name: &str) -> Option<Value>;
}

impl<F> ValueProvider for F
where
    F: Fn(&str) -> Option<Value> + Send + Sync,
{
    fn resolve_value(&self, name: &str) -> Option<Value> {
        self(name)
    }
}

/// Implements functions on behalf of the host
///
/// `name` is always uppercase. A provider that does not implement `name`
/// answers [`FunctionError::NotMine`] and resolution moves on to the next
/// provider and finally to the builtin library.
pub trait FunctionProvider: Send + Sync {
    fn call_function(&self, name: &str, args: &[Value]) -> Result<Value, FunctionError>;
}

impl<F> FunctionProvider for F
where
    F: Fn(&str, &[Value]) -> Result<Value, FunctionError> + Send + Sync,
{
    fn call_function(&self, name: &str, args: &[Value]) -> Result<Value, FunctionError> {
        self(name, args)
    }
}

/// A value provider backed by a map; names are case-sensitive
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueMap {
    values: HashMap<String, Value>,
}

impl ValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`ValueMap::insert`]
    pub fn with<K: Into<String>, V: Into<Value>>(mut self, name: K, value: V) -> Self {
        self.insert(name, value);
        self
    }

    /// Set a value, returning the previous one
    pub fn insert<K: Into<String>, V: Into<Value>>(&mut self, name: K, value: V) -> Option<Value> {
        self.values.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ValueMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ValueMap::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

impl ValueProvider for ValueMap {
    fn resolve_value(&self, name: &str) -> Option<Value> {
        self.values.get(name).cloned()
    }
}

/// Resolution environment for evaluation
///
/// # Example
/// ```rust
/// use formulate::{Context, FunctionError, Value, ValueMap};
///
/// let ctx = Context::new()
///     .add_value_provider(ValueMap::new().with("score", 12))
///     .add_function_provider(|name: &str, args: &[Value]| match name {
///         "DOUBLE" => Ok(Value::text(format!("{0}{0}", args[0]))),
///         _ => Err(FunctionError::NotMine),
///     })
///     .set_time_zone_name("Europe/Berlin")
///     .unwrap();
///
/// let expr = formulate::parse_str("IF(score > 10, DOUBLE('ab'), 'low')").unwrap();
/// assert_eq!(expr.evaluate(&ctx).unwrap(), Value::text("abab"));
/// ```
pub struct Context {
    values: Vec<Box<dyn ValueProvider>>,
    functions: Vec<Box<dyn FunctionProvider>>,
    time_zone: Tz,
}

impl Context {
    /// Empty context in UTC
    pub fn new() -> Self {
        Self {
            values: Vec::new(),
            functions: Vec::new(),
            time_zone: Tz::UTC,
        }
    }

    /// Append a value provider; earlier providers win
    pub fn add_value_provider<P: ValueProvider + 'static>(mut self, provider: P) -> Self {
        self.values.push(Box::new(provider));
        self
    }

    /// Append a function provider; earlier providers win
    pub fn add_function_provider<P: FunctionProvider + 'static>(mut self, provider: P) -> Self {
        self.functions.push(Box::new(provider));
        self
    }

    /// Time zone for local dates and times
    pub fn set_time_zone(mut self, time_zone: Tz) -> Self {
        self.time_zone = time_zone;
        self
    }

    /// Time zone by IANA name
    pub fn set_time_zone_name(self, name: &str) -> formulate_core::Result<Self> {
        let time_zone = parse_time_zone(name)?;
        Ok(self.set_time_zone(time_zone))
    }

    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    /// The current instant in the context time zone
    pub fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.time_zone)
    }

    /// Parse `value` with a human-readable layout (`YYYY-MM-DD hh:mm`).
    ///
    /// Layouts with an offset (`Z`) give absolute instants; others are read
    /// as wall-clock times in the context time zone.
    pub fn parse_date(&self, layout: &str, value: &str) -> formulate_core::Result<DateTime<Tz>> {
        parse_with_layout(layout, value, self.time_zone)
    }

    /// Format a timestamp with a human-readable layout, in its own time zone
    pub fn format_date(&self, value: &DateTime<Tz>, layout: &str) -> String {
        format_with_layout(value, layout)
    }

    /// First value provider that knows `name`, with its registration index
    pub(crate) fn lookup_value(&self, name: &str) -> Option<(usize, Value)> {
        self.values
            .iter()
            .enumerate()
            .find_map(|(index, provider)| provider.resolve_value(name).map(|v| (index, v)))
    }

    /// First function provider that claims `name`, with its registration index
    pub(crate) fn call_provided(
        &self,
        name: &str,
        args: &[Value],
    ) -> Option<(usize, EvalResult<Value>)> {
        for (index, provider) in self.functions.iter().enumerate() {
            match provider.call_function(name, args) {
                Err(FunctionError::NotMine) => continue,
                Err(FunctionError::Eval(err)) => return Some((index, Err(err))),
                Ok(value) => return Some((index, Ok(value))),
            }
        }
        None
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("value_providers", &self.values.len())
            .field("function_providers", &self.functions.len())
            .field("time_zone", &self.time_zone)
            .finish()
    }
}

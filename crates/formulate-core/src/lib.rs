//! # formulate-core
//!
//! Core data types for the formulate expression language.
//!
//! This crate provides:
//! - [`Value`] - the closed set of runtime values (null, boolean, exact
//!   number, text, timestamp)
//! - [`number`] - exact parsing and canonical formatting of rational numbers
//! - [`datetime`] - the human-readable date layout language and timestamp helpers
//!
//! ## Example
//!
//! ```rust
//! use formulate_core::{number::parse_number, Value};
//!
//! let tenth = Value::Number(parse_number("0.1").unwrap());
//! assert_eq!(tenth.to_string(), "0.1");
//! assert_eq!(Value::ratio(1, 10), Some(tenth));
//! ```

pub mod datetime;
pub mod error;
pub mod number;
pub mod value;

pub use chrono_tz::Tz;
pub use error::{Error, Result};
pub use num_rational::BigRational;
pub use value::Value;

//! Exact number parsing and formatting
//!
//! Numbers are arbitrary-precision rationals. Decimal text becomes an exact
//! fraction, never a binary float, and the canonical text form parses back to
//! the same rational.

use crate::error::{Error, Result};
use lazy_regex::regex_captures;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{pow, One, Signed, ToPrimitive, Zero};

/// Largest decimal exponent accepted in number text
const MAX_EXPONENT: i64 = 4096;

fn power_of_ten(exp: usize) -> BigInt {
    pow(BigInt::from(10), exp)
}

/// Parse number text into an exact rational.
///
/// Accepts an optional sign, decimal digits with an optional fraction and
/// exponent (`-1.25e3`), or a `numerator/denominator` pair (`-1/3`).
///
/// # Example
/// ```rust
/// use formulate_core::number::{format_number, parse_number};
///
/// let third = parse_number("1/3").unwrap();
/// assert_eq!(format_number(&third), "1/3");
/// assert_eq!(format_number(&parse_number("2.50").unwrap()), "2.5");
/// ```
pub fn parse_number(text: &str) -> Result<BigRational> {
    let invalid = || Error::InvalidNumber(text.to_string());

    if let Some((_, sign, numer, denom)) = regex_captures!(r"^([+-]?)([0-9]+)/([0-9]+)$", text) {
        let numer: BigInt = numer.parse().map_err(|_| invalid())?;
        let denom: BigInt = denom.parse().map_err(|_| invalid())?;
        if denom.is_zero() {
            return Err(invalid());
        }
        let value = BigRational::new(numer, denom);
        return Ok(if sign == "-" { -value } else { value });
    }

    let (_, sign, int_part, frac_part, exponent) = regex_captures!(
        r"^([+-]?)([0-9]*)(?:\.([0-9]*))?(?:[eE]([+-]?[0-9]+))?$",
        text
    )
    .ok_or_else(invalid)?;

    if int_part.is_empty() && frac_part.is_empty() {
        return Err(invalid());
    }

    let mantissa: BigInt = format!("{int_part}{frac_part}")
        .parse()
        .map_err(|_| invalid())?;

    let exponent: i64 = if exponent.is_empty() {
        0
    } else {
        exponent.parse().map_err(|_| invalid())?
    };
    if exponent.abs() > MAX_EXPONENT {
        return Err(invalid());
    }

    let scale = exponent - frac_part.len() as i64;
    let magnitude = if scale >= 0 {
        BigRational::from_integer(mantissa * power_of_ten(scale as usize))
    } else {
        BigRational::new(mantissa, power_of_ten(scale.unsigned_abs() as usize))
    };

    Ok(if sign == "-" { -magnitude } else { magnitude })
}

/// Canonical text form of a number.
///
/// Integers print as plain digits, terminating decimals in decimal notation
/// and every other rational as `numerator/denominator`.
pub fn format_number(value: &BigRational) -> String {
    if value.is_integer() {
        return value.numer().to_string();
    }

    // A fraction terminates in base 10 iff its reduced denominator has no
    // prime factors other than 2 and 5.
    let reduced = value.reduced();
    let two = BigInt::from(2);
    let five = BigInt::from(5);
    let mut rest = reduced.denom().abs();
    let mut twos = 0usize;
    while (&rest % &two).is_zero() {
        rest /= &two;
        twos += 1;
    }
    let mut fives = 0usize;
    while (&rest % &five).is_zero() {
        rest /= &five;
        fives += 1;
    }

    if !rest.is_one() {
        return format!("{}/{}", reduced.numer(), reduced.denom());
    }

    let scale = twos.max(fives);
    let scaled = reduced.numer() * power_of_ten(scale) / reduced.denom();
    let digits = format!("{:0>width$}", scaled.abs().to_string(), width = scale + 1);
    let (int_digits, frac_digits) = digits.split_at(digits.len() - scale);
    let sign = if reduced.is_negative() { "-" } else { "" };

    format!("{sign}{int_digits}.{frac_digits}")
}

/// Truncate toward zero and convert to `i64`, if it fits.
pub fn to_i64_trunc(value: &BigRational) -> Option<i64> {
    value.trunc().to_integer().to_i64()
}

//! Date functions
//!
//! Dates are timestamps at local midnight in the context time zone.

use super::Args;
use crate::context::Context;
use crate::error::EvalResult;
use chrono::{Datelike, NaiveDate};
use formulate_core::datetime::{parse_iso8601, start_of_day, DEFAULT_DATE_LAYOUT};
use formulate_core::Value;

/// DATE(year, month, day)
///
/// Out-of-range parts are rejected rather than carried over, so
/// `DATE(2001, 13, 1)` is an error and not the first of January 2002.
pub fn fn_date(args: &Args<'_>, ctx: &Context) -> EvalResult<Value> {
    let year = args.integer(0)?;
    let month = args.integer(1)?;
    let day = args.integer(2)?;

    let date = i32::try_from(year)
        .ok()
        .zip(u32::try_from(month).ok())
        .zip(u32::try_from(day).ok())
        .and_then(|((y, m), d)| NaiveDate::from_ymd_opt(y, m, d))
        .ok_or_else(|| args.error(format!("invalid date {}-{}-{}", year, month, day)))?;

    Ok(Value::Timestamp(start_of_day(date, ctx.time_zone())?))
}

/// DATEVALUE(text [, layout]): layout defaults to `YYYY-MM-DD`
pub fn fn_datevalue(args: &Args<'_>, ctx: &Context) -> EvalResult<Value> {
    let text = args.text(0)?;
    let layout = match args.get(1) {
        Some(_) => args.text(1)?,
        None => DEFAULT_DATE_LAYOUT,
    };
    Ok(Value::Timestamp(ctx.parse_date(layout, text)?))
}

/// DATETIMEVALUE(text [, layout]): RFC 3339 unless a layout is given
pub fn fn_datetimevalue(args: &Args<'_>, ctx: &Context) -> EvalResult<Value> {
    let text = args.text(0)?;
    let ts = match args.get(1) {
        Some(_) => ctx.parse_date(args.text(1)?, text)?,
        None => parse_iso8601(text, ctx.time_zone())?,
    };
    Ok(Value::Timestamp(ts))
}

/// DAY(date)
pub fn fn_day(args: &Args<'_>, _ctx: &Context) -> EvalResult<Value> {
    let ts = args.timestamp(0)?;
    Ok(Value::integer(ts.day().into()))
}

/// MONTH(date)
pub fn fn_month(args: &Args<'_>, _ctx: &Context) -> EvalResult<Value> {
    let ts = args.timestamp(0)?;
    Ok(Value::integer(ts.month().into()))
}

/// YEAR(date)
pub fn fn_year(args: &Args<'_>, _ctx: &Context) -> EvalResult<Value> {
    let ts = args.timestamp(0)?;
    Ok(Value::integer(ts.year().into()))
}

/// NOW()
pub fn fn_now(_args: &Args<'_>, ctx: &Context) -> EvalResult<Value> {
    Ok(Value::Timestamp(ctx.now()))
}

/// TODAY(): midnight of the current day in the context time zone
pub fn fn_today(_args: &Args<'_>, ctx: &Context) -> EvalResult<Value> {
    let today = ctx.now().date_naive();
    Ok(Value::Timestamp(start_of_day(today, ctx.time_zone())?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvalError;
    use crate::functions::builtins;
    use chrono::{TimeZone, Timelike};
    use chrono_tz::Tz;
    use formulate_core::datetime::format_iso8601;
    use pretty_assertions::assert_eq;

    fn call_in(tz: Tz, name: &str, args: &[Value]) -> EvalResult<Value> {
        let ctx = Context::new().set_time_zone(tz);
        builtins().get(name).unwrap().call(args, &ctx)
    }

    fn iso(value: Value) -> String {
        format_iso8601(value.as_timestamp().unwrap())
    }

    #[test]
    fn test_date() {
        let value = call_in(
            Tz::Europe__Berlin,
            "DATE",
            &[Value::integer(2001), Value::text("2"), Value::integer(3)],
        )
        .unwrap();
        assert_eq!(iso(value), "2001-02-03T00:00:00+01:00");

        assert!(matches!(
            call_in(Tz::UTC, "DATE", &[Value::integer(2001), Value::integer(2), Value::integer(30)]),
            Err(EvalError::Argument { .. })
        ));
        assert!(call_in(Tz::UTC, "DATE", &[Value::integer(2001), Value::integer(-1), Value::integer(1)]).is_err());
        assert_eq!(
            call_in(Tz::UTC, "DATE", &[Value::integer(2001), Value::integer(13), Value::integer(1)]).unwrap_err(),
            EvalError::Argument {
                function: "DATE".into(),
                message: "invalid date 2001-13-1".into()
            }
        );
    }

    #[test]
    fn test_datevalue() {
        let value = call_in(Tz::UTC, "DATEVALUE", &[Value::text("2001-01-02")]).unwrap();
        assert_eq!(
            value,
            Value::Timestamp(Tz::UTC.with_ymd_and_hms(2001, 1, 2, 0, 0, 0).unwrap())
        );

        let value = call_in(
            Tz::Asia__Tokyo,
            "DATEVALUE",
            &[Value::text("24 Dec 2020 18:30"), Value::text("DD MMM YYYY hh:mm")],
        )
        .unwrap();
        assert_eq!(iso(value), "2020-12-24T18:30:00+09:00");

        let value = call_in(
            Tz::UTC,
            "DATEVALUE",
            &[Value::text("2020-01-02 15"), Value::text("YYYY-MM-DD hh")],
        )
        .unwrap();
        assert_eq!(iso(value), "2020-01-02T15:00:00Z");

        assert!(matches!(
            call_in(Tz::UTC, "DATEVALUE", &[Value::integer(0)]),
            Err(EvalError::ArgumentType { index: 0, .. })
        ));
        assert!(matches!(
            call_in(Tz::UTC, "DATEVALUE", &[Value::text("02/01/2001")]),
            Err(EvalError::Core(formulate_core::Error::InvalidDate { .. }))
        ));
    }

    #[test]
    fn test_datetimevalue() {
        let value = call_in(
            Tz::Europe__Berlin,
            "DATETIMEVALUE",
            &[Value::text("2001-01-02T01:02:03Z")],
        )
        .unwrap();
        assert_eq!(iso(value), "2001-01-02T02:02:03+01:00");

        let value = call_in(
            Tz::UTC,
            "DATETIMEVALUE",
            &[Value::text("2001-01-02 01:02 +0200"), Value::text("YYYY-MM-DD hh:mm Z")],
        )
        .unwrap();
        assert_eq!(iso(value), "2001-01-01T23:02:00Z");
    }

    #[test]
    fn test_date_parts() {
        let ts = Value::Timestamp(Tz::UTC.with_ymd_and_hms(2024, 2, 29, 23, 0, 0).unwrap());
        assert_eq!(call_in(Tz::UTC, "DAY", &[ts.clone()]).unwrap(), Value::integer(29));
        assert_eq!(call_in(Tz::UTC, "MONTH", &[ts.clone()]).unwrap(), Value::integer(2));
        assert_eq!(call_in(Tz::UTC, "YEAR", &[ts]).unwrap(), Value::integer(2024));
        assert!(call_in(Tz::UTC, "DAY", &[Value::text("2024-02-29")]).is_err());
    }

    #[test]
    fn test_now_and_today() {
        let now = call_in(Tz::Asia__Tokyo, "NOW", &[]).unwrap();
        assert_eq!(now.as_timestamp().unwrap().timezone(), Tz::Asia__Tokyo);

        let today = call_in(Tz::Asia__Tokyo, "TODAY", &[]).unwrap();
        let today = today.as_timestamp().unwrap();
        assert_eq!(today.timezone(), Tz::Asia__Tokyo);
        assert_eq!((today.hour(), today.minute(), today.second()), (0, 0, 0));

        assert!(call_in(Tz::UTC, "NOW", &[Value::Null]).is_err());
    }
}

//! Text functions
//!
//! Lengths and positions count Unicode code points, never bytes.

use super::Args;
use crate::context::Context;
use crate::error::EvalResult;
use formulate_core::datetime::format_iso8601;
use formulate_core::number::{format_number, parse_number};
use formulate_core::Value;

/// Longest text, in code points, that padding may produce
pub const MAX_PAD_LEN: usize = 1 << 20;

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn take_left(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

fn take_right(s: &str, n: usize) -> String {
    let len = char_len(s);
    s.chars().skip(len.saturating_sub(n)).collect()
}

fn take_mid(s: &str, start: usize, n: usize) -> String {
    s.chars().skip(start).take(n).collect()
}

/// BEGINS(text, prefix)
pub fn fn_begins(args: &Args<'_>, _ctx: &Context) -> EvalResult<Value> {
    let text = args.text(0)?;
    let prefix = args.text(1)?;
    Ok(Value::Boolean(text.starts_with(prefix)))
}

/// CONTAINS(text, search)
pub fn fn_contains(args: &Args<'_>, _ctx: &Context) -> EvalResult<Value> {
    let text = args.text(0)?;
    let search = args.text(1)?;
    Ok(Value::Boolean(text.contains(search)))
}

/// FIND(text, search): 1-based position of the first match, 0 if absent
pub fn fn_find(args: &Args<'_>, _ctx: &Context) -> EvalResult<Value> {
    let text = args.text(0)?;
    let search = args.text(1)?;
    let position = match text.find(search) {
        Some(offset) => char_len(&text[..offset]) + 1,
        None => 0,
    };
    Ok(Value::integer(position as i64))
}

/// INCLUDES(list, item): whether `item` is an entry of the `;` separated `list`
pub fn fn_includes(args: &Args<'_>, _ctx: &Context) -> EvalResult<Value> {
    let list = args.text(0)?;
    let item = args.text(1)?;
    let found = format!(";{};", list).contains(&format!(";{};", item));
    Ok(Value::Boolean(found))
}

/// JOIN(delimiter, part...): joins the parts that are neither null nor empty
pub fn fn_join(args: &Args<'_>, _ctx: &Context) -> EvalResult<Value> {
    let delimiter = args.text(0)?;
    let mut parts = Vec::with_capacity(args.len().saturating_sub(1));
    for index in 1..args.len() {
        if args.get(index).map_or(true, Value::is_null) {
            continue;
        }
        let part = args.text(index)?;
        if !part.is_empty() {
            parts.push(part);
        }
    }
    Ok(Value::Text(parts.join(delimiter)))
}

/// LEFT(text, count)
pub fn fn_left(args: &Args<'_>, _ctx: &Context) -> EvalResult<Value> {
    let text = args.text(0)?;
    let count = args.count(1)?;
    Ok(Value::Text(take_left(text, count)))
}

/// LEN(text)
pub fn fn_len(args: &Args<'_>, _ctx: &Context) -> EvalResult<Value> {
    let text = args.text(0)?;
    Ok(Value::integer(char_len(text) as i64))
}

/// LOWER(text)
pub fn fn_lower(args: &Args<'_>, _ctx: &Context) -> EvalResult<Value> {
    Ok(Value::Text(args.text(0)?.to_lowercase()))
}

/// UPPER(text)
pub fn fn_upper(args: &Args<'_>, _ctx: &Context) -> EvalResult<Value> {
    Ok(Value::Text(args.text(0)?.to_uppercase()))
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Pad `text` to `target` code points by cycling through `pad`, or cut it
/// down to `target` when it is already longer.
fn pad(args: &Args<'_>, side: Side) -> EvalResult<Value> {
    let text = args.text(0)?;
    let target = args.count(1)?;
    let filler = match args.get(2) {
        Some(_) => args.text(2)?,
        None => " ",
    };

    let len = char_len(text);
    if target <= len {
        return Ok(Value::Text(take_left(text, target)));
    }
    if target > MAX_PAD_LEN {
        return Err(args.error(format!(
            "length {} exceeds the limit of {}",
            target, MAX_PAD_LEN
        )));
    }
    if filler.is_empty() {
        return Err(args.error("empty pad string"));
    }

    let padding: String = filler.chars().cycle().take(target - len).collect();
    let padded = match side {
        Side::Left => padding + text,
        Side::Right => format!("{}{}", text, padding),
    };
    Ok(Value::Text(padded))
}

/// LPAD(text, length [, pad])
pub fn fn_lpad(args: &Args<'_>, _ctx: &Context) -> EvalResult<Value> {
    pad(args, Side::Left)
}

/// RPAD(text, length [, pad])
pub fn fn_rpad(args: &Args<'_>, _ctx: &Context) -> EvalResult<Value> {
    pad(args, Side::Right)
}

/// MID(text, start, count): `start` is 1-based and clamped to 1
pub fn fn_mid(args: &Args<'_>, _ctx: &Context) -> EvalResult<Value> {
    let text = args.text(0)?;
    let start = args.count(1)?.max(1);
    let count = args.count(2)?;
    Ok(Value::Text(take_mid(text, start - 1, count)))
}

/// RIGHT(text, count)
pub fn fn_right(args: &Args<'_>, _ctx: &Context) -> EvalResult<Value> {
    let text = args.text(0)?;
    let count = args.count(1)?;
    Ok(Value::Text(take_right(text, count)))
}

/// SUBSTITUTE(text, old, new): replaces every occurrence
pub fn fn_substitute(args: &Args<'_>, _ctx: &Context) -> EvalResult<Value> {
    let text = args.text(0)?;
    let old = args.text(1)?;
    let new = args.text(2)?;
    Ok(Value::Text(text.replace(old, new)))
}

/// TEXT(value [, layout])
///
/// Numbers use their canonical form, timestamps RFC 3339 unless a layout is
/// given, and null becomes the empty string.
pub fn fn_text(args: &Args<'_>, ctx: &Context) -> EvalResult<Value> {
    let value = args.value(0)?;

    if args.get(1).is_some() {
        let layout = args.text(1)?;
        let ts = args.timestamp(0).map_err(|_| args.error("a layout applies to timestamps only"))?;
        return Ok(Value::Text(ctx.format_date(ts, layout)));
    }

    let text = match value {
        Value::Null => String::new(),
        Value::Boolean(b) => b.to_string(),
        Value::Number(n) => format_number(n),
        Value::Text(s) => s.clone(),
        Value::Timestamp(ts) => format_iso8601(ts),
    };
    Ok(Value::Text(text))
}

/// TRIM(text): strips both ends and collapses inner whitespace runs
pub fn fn_trim(args: &Args<'_>, _ctx: &Context) -> EvalResult<Value> {
    let text = args.text(0)?;
    Ok(Value::Text(text.split_whitespace().collect::<Vec<_>>().join(" ")))
}

/// VALUE(text)
pub fn fn_value(args: &Args<'_>, _ctx: &Context) -> EvalResult<Value> {
    let text = args.text(0)?;
    Ok(Value::Number(parse_number(text)?))
}

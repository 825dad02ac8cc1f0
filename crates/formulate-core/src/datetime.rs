//! Date layouts and timestamp helpers
//!
//! Layouts are written in a small human-readable language (`YYYY-MM-DD`,
//! `DD MMM YYYY hh:mm`, ...) and translated token by token into chrono
//! format strings. Tokens are matched longest first, so `YYYY` is never read
//! as two `YY` and `MMMM` never as `MM` twice.
//!
//! | token | meaning |
//! |-------|---------|
//! | `YYYY` / `YY` | four / two digit year |
//! | `MMMM` / `MMM` | full / abbreviated month name |
//! | `MM` / `M` | month number, padded / unpadded |
//! | `DDDD` / `DDD` | full / abbreviated weekday name |
//! | `DD` / `D` | day of month, padded / unpadded |
//! | `hh` / `h` | hour, 24-hour padded / 12-hour unpadded |
//! | `mm` / `m` | minute, padded / unpadded |
//! | `ss` / `s` | second, padded / unpadded |
//! | `a` | AM / PM |
//! | `Z` | UTC offset |
//!
//! Every other character is copied literally.

use crate::error::{Error, Result};
use chrono::format::{parse, Parsed, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Offset, SecondsFormat, TimeZone};
use chrono_tz::Tz;

/// Layout used by `DATEVALUE` when none is given
pub const DEFAULT_DATE_LAYOUT: &str = "YYYY-MM-DD";

/// What a translated layout is used for.
///
/// The offset token needs a permissive specifier when parsing (accepting `Z`)
/// that chrono cannot format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    Parse,
    Format,
}

/// Layout tokens, longest first within each family
const TOKENS: &[(&str, &str)] = &[
    ("YYYY", "%Y"),
    ("YY", "%y"),
    ("MMMM", "%B"),
    ("MMM", "%b"),
    ("MM", "%m"),
    ("M", "%-m"),
    ("DDDD", "%A"),
    ("DDD", "%a"),
    ("DD", "%d"),
    ("D", "%-d"),
    ("hh", "%H"),
    ("h", "%-I"),
    ("mm", "%M"),
    ("m", "%-M"),
    ("ss", "%S"),
    ("s", "%-S"),
    ("a", "%p"),
    ("Z", "%z"),
];

/// Tokens that carry a time of day
const TIME_TOKENS: &[&str] = &["hh", "h", "mm", "m", "ss", "s", "a"];

/// One piece of a layout: a token or a literal character
enum Piece {
    Token(&'static str, &'static str),
    Literal(char),
}

fn pieces(layout: &str) -> Vec<Piece> {
    let mut out = Vec::new();
    let mut rest = layout;

    'outer: while let Some(c) = rest.chars().next() {
        for (token, spec) in TOKENS {
            if let Some(tail) = rest.strip_prefix(token) {
                out.push(Piece::Token(*token, *spec));
                rest = tail;
                continue 'outer;
            }
        }
        out.push(Piece::Literal(c));
        rest = &rest[c.len_utf8()..];
    }

    out
}

/// Translate a human-readable layout into a chrono format string.
///
/// When parsing, a 12-hour `h` without an `a` marker reads the hour as
/// written, so `3:05` is 03:05 and `12:30` is 12:30.
///
/// # Example
/// ```rust
/// use formulate_core::datetime::{translate_layout, LayoutMode};
///
/// assert_eq!(translate_layout("YYYY-MM-DD", LayoutMode::Format), "%Y-%m-%d");
/// assert_eq!(translate_layout("D MMM YY", LayoutMode::Format), "%-d %b %y");
/// ```
pub fn translate_layout(layout: &str, mode: LayoutMode) -> String {
    let pieces = pieces(layout);
    let has_marker = pieces
        .iter()
        .any(|piece| matches!(piece, Piece::Token("a", _)));

    let mut out = String::with_capacity(layout.len() * 2);
    for piece in pieces {
        match (piece, mode) {
            (Piece::Token("Z", _), LayoutMode::Parse) => out.push_str("%#z"),
            (Piece::Token("h", _), LayoutMode::Parse) if !has_marker => out.push_str("%-H"),
            (Piece::Token(_, spec), _) => out.push_str(spec),
            (Piece::Literal('%'), _) => out.push_str("%%"),
            (Piece::Literal(c), _) => out.push(c),
        }
    }
    out
}

/// Parse text with a human-readable layout.
///
/// If the layout carries an offset (`Z`) the text denotes an absolute instant;
/// otherwise it is a wall-clock time in `tz`. Layouts without time fields
/// yield midnight; missing minutes and seconds are zero.
pub fn parse_with_layout(layout: &str, value: &str, tz: Tz) -> Result<DateTime<Tz>> {
    let format = translate_layout(layout, LayoutMode::Parse);
    let invalid = |reason: String| Error::InvalidDate {
        value: value.to_string(),
        layout: layout.to_string(),
        reason,
    };

    let mut parsed = Parsed::new();
    parse(&mut parsed, value, StrftimeItems::new(&format)).map_err(|e| invalid(e.to_string()))?;

    let tokens: Vec<&str> = pieces(layout)
        .into_iter()
        .filter_map(|piece| match piece {
            Piece::Token(token, _) => Some(token),
            Piece::Literal(_) => None,
        })
        .collect();
    let uses = |wanted: &[&str]| tokens.iter().any(|token| wanted.contains(token));

    if !uses(TIME_TOKENS) {
        parsed.set_hour(0).map_err(|e| invalid(e.to_string()))?;
    }
    if !uses(&["mm", "m"]) {
        parsed.set_minute(0).map_err(|e| invalid(e.to_string()))?;
    }

    if uses(&["Z"]) {
        let instant = parsed.to_datetime().map_err(|e| invalid(e.to_string()))?;
        return Ok(instant.with_timezone(&tz));
    }

    let date = parsed
        .to_naive_date()
        .map_err(|e| invalid(e.to_string()))?;
    let time = parsed
        .to_naive_time()
        .map_err(|e| invalid(e.to_string()))?;
    from_local(date.and_time(time), tz)
}

/// Format a timestamp with a human-readable layout.
pub fn format_with_layout(value: &DateTime<Tz>, layout: &str) -> String {
    value
        .format(&translate_layout(layout, LayoutMode::Format))
        .to_string()
}

/// RFC 3339 text for a timestamp, `Z` for UTC and sub-seconds only when present.
pub fn format_iso8601(value: &DateTime<Tz>) -> String {
    value
        .with_timezone(&value.offset().fix())
        .to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parse RFC 3339 text, expressing the instant in `tz`.
pub fn parse_iso8601(value: &str, tz: Tz) -> Result<DateTime<Tz>> {
    DateTime::parse_from_rfc3339(value)
        .map(|instant| instant.with_timezone(&tz))
        .map_err(|e| Error::InvalidDate {
            value: value.to_string(),
            layout: "RFC 3339".to_string(),
            reason: e.to_string(),
        })
}

/// Midnight at the start of `date` in `tz`.
pub fn start_of_day(date: NaiveDate, tz: Tz) -> Result<DateTime<Tz>> {
    from_local(date.and_time(NaiveTime::MIN), tz)
}

/// Resolve a wall-clock time in `tz`, taking the earlier instant when the
/// time is ambiguous.
pub fn from_local(local: NaiveDateTime, tz: Tz) -> Result<DateTime<Tz>> {
    tz.from_local_datetime(&local)
        .earliest()
        .ok_or_else(|| Error::NonexistentLocalTime(local.to_string()))
}

/// Look up an IANA time zone by name (`Europe/Berlin`, `UTC`, ...).
pub fn parse_time_zone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| Error::InvalidTimeZone(name.to_string()))
}

//! Property tests for string functions and exact arithmetic

use formulate::{parse_str, Context, Value, ValueMap};
use proptest::prelude::*;

fn eval_with(src: &str, s: &str, n: i64) -> Value {
    let ctx = Context::new().add_value_provider(ValueMap::new().with("s", s).with("n", n));
    parse_str(src).unwrap().evaluate(&ctx).unwrap()
}

fn text(value: Value) -> String {
    match value {
        Value::Text(s) => s,
        other => panic!("expected text, got {}", other),
    }
}

proptest! {
    #[test]
    fn left_takes_leading_code_points(s in "[a-zА-я \t]{0,12}", n in -3i64..16) {
        let len = s.chars().count() as i64;
        let left = text(eval_with("LEFT(s, n)", &s, n));
        if n <= 0 {
            prop_assert_eq!(left, "");
        } else if n >= len {
            prop_assert_eq!(left, s);
        } else {
            prop_assert_eq!(left, s.chars().take(n as usize).collect::<String>());
        }
    }

    #[test]
    fn left_and_mid_rebuild_the_text(s in "\\PC{0,12}") {
        let len = s.chars().count() as i64;
        for n in 0..=len {
            let rebuilt = text(eval_with("LEFT(s, n) + MID(s, n + 1, LEN(s))", &s, n));
            prop_assert_eq!(&rebuilt, &s);
        }
    }

    #[test]
    fn right_is_the_tail(s in "\\PC{0,12}", n in 0i64..16) {
        let len = s.chars().count();
        let right = text(eval_with("RIGHT(s, n)", &s, n));
        let skip = len.saturating_sub(n as usize);
        prop_assert_eq!(right, s.chars().skip(skip).collect::<String>());
    }

    #[test]
    fn trim_collapses_whitespace(words in prop::collection::vec("[a-zа-я]{1,5}", 0..5), gap in "[ \t\n]{1,3}") {
        let s = format!("{gap}{}{gap}", words.join(&gap));
        prop_assert_eq!(text(eval_with("TRIM(s)", &s, 0)), words.join(" "));
    }

    #[test]
    fn division_is_exact(a in -1000i64..1000, b in 1i64..1000) {
        let ctx = Context::new();
        let src = format!("{a} / {b} * {b} == {a}");
        prop_assert_eq!(parse_str(&src).unwrap().evaluate(&ctx).unwrap(), Value::Boolean(true));
    }

    #[test]
    fn number_text_round_trips(a in -1000i64..1000, b in 1i64..64) {
        let ctx = Context::new();
        let src = format!("VALUE(TEXT({a} / {b})) == {a} / {b}");
        prop_assert_eq!(parse_str(&src).unwrap().evaluate(&ctx).unwrap(), Value::Boolean(true));
    }
}

//! Tests for host value and function providers

use formulate::{
    parse_str, Args, Context, EvalError, FunctionError, FunctionProvider, Value, ValueMap,
    ValueProvider,
};
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

/// A host record exposing its fields as values
struct Record {
    name: String,
    score: i64,
}

impl ValueProvider for Record {
    fn resolve_value(&self, name: &str) -> Option<Value> {
        match name {
            "name" => Some(Value::text(self.name.clone())),
            "score" => Some(Value::integer(self.score)),
            _ => None,
        }
    }
}

/// Host functions built on the same argument helpers as the builtins
struct Greeter;

impl FunctionProvider for Greeter {
    fn call_function(&self, name: &str, values: &[Value]) -> Result<Value, FunctionError> {
        let args = Args::new(name, values);
        match name {
            "GREET" => {
                args.expect_count(1)?;
                Ok(Value::text(format!("Hello, {}!", args.text(0)?)))
            }
            "BROKEN" => Ok(Value::Number(formulate::BigRational::new_raw(1.into(), 0.into()))),
            _ => Err(FunctionError::NotMine),
        }
    }
}

fn eval(src: &str, ctx: &Context) -> Result<Value, EvalError> {
    parse_str(src).unwrap().evaluate(ctx)
}

#[test]
fn test_first_value_provider_wins() {
    let ctx = Context::new()
        .add_value_provider(Record {
            name: "Ada".into(),
            score: 12,
        })
        .add_value_provider(ValueMap::new().with("name", "shadowed").with("limit", 10));

    assert_eq!(
        eval("IF(score > limit, name + ' is high', name)", &ctx).unwrap(),
        Value::text("Ada is high")
    );
    assert_eq!(
        eval("missing", &ctx).unwrap_err(),
        EvalError::UnknownValue("missing".into())
    );
}

#[test]
fn test_function_providers_and_fallthrough() {
    let ctx = Context::new()
        .add_function_provider(Greeter)
        .add_function_provider(|name: &str, _: &[Value]| match name {
            "LEN" => Ok(Value::integer(-1)),
            _ => Err(FunctionError::NotMine),
        });

    assert_eq!(eval("greet('Ada')", &ctx).unwrap(), Value::text("Hello, Ada!"));
    assert_eq!(
        eval("GREET()", &ctx).unwrap_err(),
        EvalError::ArgumentCount {
            function: "GREET".into(),
            expected: "1".into(),
            actual: 0
        }
    );

    // providers are consulted before builtins
    assert_eq!(eval("LEN('abc')", &ctx).unwrap(), Value::integer(-1));
    assert_eq!(eval("UPPER('abc')", &ctx).unwrap(), Value::text("ABC"));

    assert_eq!(
        eval("NOSUCHFN(1)", &ctx).unwrap_err(),
        EvalError::UnknownFunction("NOSUCHFN".into())
    );
}

#[test]
fn test_illegal_values_are_rejected() {
    let ctx = Context::new()
        .add_function_provider(Greeter)
        .add_value_provider(|name: &str| match name {
            "bad" => Some(Value::Number(formulate::BigRational::new_raw(
                2.into(),
                0.into(),
            ))),
            _ => None,
        });

    assert!(matches!(
        eval("BROKEN()", &ctx),
        Err(EvalError::IllegalValue { ref origin, .. }) if origin == "BROKEN"
    ));
    assert!(matches!(
        eval("bad + 1", &ctx),
        Err(EvalError::IllegalValue { ref origin, .. }) if origin == "bad"
    ));
}

#[test]
fn test_logical_operators_evaluate_both_sides() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let ctx = Context::new().add_function_provider(move |name: &str, _: &[Value]| match name {
        "TICK" => {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Value::Boolean(true))
        }
        _ => Err(FunctionError::NotMine),
    });

    assert_eq!(eval("FALSE && TICK()", &ctx).unwrap(), Value::Boolean(false));
    assert_eq!(eval("TRUE || TICK()", &ctx).unwrap(), Value::Boolean(true));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_context_shared_across_threads() {
    let ctx = Arc::new(
        Context::new()
            .add_value_provider(ValueMap::new().with("base", 100))
            .set_time_zone_name("Europe/Berlin")
            .unwrap(),
    );
    let expr = Arc::new(parse_str("base + n").unwrap());

    let handles: Vec<_> = (0..4)
        .map(|n| {
            let ctx = Arc::clone(&ctx);
            let expr = Arc::clone(&expr);
            thread::spawn(move || {
                let local = Context::new()
                    .add_value_provider(ValueMap::new().with("n", n as i64))
                    .add_value_provider(move |name: &str| {
                        parse_str(name).ok()?.evaluate(&ctx).ok()
                    });
                expr.evaluate(&local)
            })
        })
        .collect();

    let results: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().unwrap().unwrap())
        .collect();
    assert_eq!(
        results,
        (100..104).map(Value::integer).collect::<Vec<_>>()
    );
}

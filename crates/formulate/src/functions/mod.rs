//! Builtin functions
//!
//! Consulted only after every host function provider has declined a call.

pub mod args;
pub mod date;
pub mod logical;
pub mod text;

pub use args::Args;

use crate::context::Context;
use crate::error::EvalResult;
use formulate_core::Value;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Function implementation signature
///
/// Arity is checked against the [`FunctionDef`] before the implementation
/// runs; the context supplies the time zone and the clock.
pub type FunctionImpl = fn(&Args<'_>, &Context) -> EvalResult<Value>;

/// Function definition
pub struct FunctionDef {
    /// Function name (uppercase)
    pub name: &'static str,
    /// Minimum arguments
    pub min_args: usize,
    /// Maximum arguments (None = unlimited)
    pub max_args: Option<usize>,
    /// Implementation
    pub implementation: FunctionImpl,
}

impl FunctionDef {
    /// Check the argument count and run the implementation
    pub fn call(&self, values: &[Value], ctx: &Context) -> EvalResult<Value> {
        let args = Args::new(self.name, values);
        args.expect_range(self.min_args, self.max_args)?;
        (self.implementation)(&args, ctx)
    }
}

/// Function registry
pub struct FunctionRegistry {
    functions: HashMap<&'static str, FunctionDef>,
}

/// Global builtin registry (lazily initialized)
static BUILTINS: OnceLock<FunctionRegistry> = OnceLock::new();

/// The builtin function library
pub fn builtins() -> &'static FunctionRegistry {
    BUILTINS.get_or_init(FunctionRegistry::new)
}

impl FunctionRegistry {
    /// Create a new registry with all builtin functions
    pub fn new() -> Self {
        let mut registry = Self {
            functions: HashMap::new(),
        };

        registry.register_text_functions();
        registry.register_date_functions();
        registry.register_logical_functions();

        registry
    }

    /// Look up a function by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(name.to_uppercase().as_str())
    }

    /// Names of all registered functions, sorted
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.functions.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Register a function
    pub fn register(&mut self, def: FunctionDef) {
        self.functions.insert(def.name, def);
    }

    fn register_text_functions(&mut self) {
        // BEGINS
        self.register(FunctionDef {
            name: "BEGINS",
            min_args: 2,
            max_args: Some(2),
            implementation: text::fn_begins,
        });

        // CONTAINS
        self.register(FunctionDef {
            name: "CONTAINS",
            min_args: 2,
            max_args: Some(2),
            implementation: text::fn_contains,
        });

        // FIND
        self.register(FunctionDef {
            name: "FIND",
            min_args: 2,
            max_args: Some(2),
            implementation: text::fn_find,
        });

        // INCLUDES
        self.register(FunctionDef {
            name: "INCLUDES",
            min_args: 2,
            max_args: Some(2),
            implementation: text::fn_includes,
        });

        // JOIN
        self.register(FunctionDef {
            name: "JOIN",
            min_args: 1,
            max_args: None,
            implementation: text::fn_join,
        });

        // LEFT
        self.register(FunctionDef {
            name: "LEFT",
            min_args: 2,
            max_args: Some(2),
            implementation: text::fn_left,
        });

        // LEN
        self.register(FunctionDef {
            name: "LEN",
            min_args: 1,
            max_args: Some(1),
            implementation: text::fn_len,
        });

        // LOWER
        self.register(FunctionDef {
            name: "LOWER",
            min_args: 1,
            max_args: Some(1),
            implementation: text::fn_lower,
        });

        // LPAD
        self.register(FunctionDef {
            name: "LPAD",
            min_args: 2,
            max_args: Some(3),
            implementation: text::fn_lpad,
        });

        // MID
        self.register(FunctionDef {
            name: "MID",
            min_args: 3,
            max_args: Some(3),
            implementation: text::fn_mid,
        });

        // RIGHT
        self.register(FunctionDef {
            name: "RIGHT",
            min_args: 2,
            max_args: Some(2),
            implementation: text::fn_right,
        });

        // RPAD
        self.register(FunctionDef {
            name: "RPAD",
            min_args: 2,
            max_args: Some(3),
            implementation: text::fn_rpad,
        });

        // SUBSTITUTE
        self.register(FunctionDef {
            name: "SUBSTITUTE",
            min_args: 3,
            max_args: Some(3),
            implementation: text::fn_substitute,
        });

        // TEXT
        self.register(FunctionDef {
            name: "TEXT",
            min_args: 1,
            max_args: Some(2),
            implementation: text::fn_text,
        });

        // TRIM
        self.register(FunctionDef {
            name: "TRIM",
            min_args: 1,
            max_args: Some(1),
            implementation: text::fn_trim,
        });

        // UPPER
        self.register(FunctionDef {
            name: "UPPER",
            min_args: 1,
            max_args: Some(1),
            implementation: text::fn_upper,
        });

        // VALUE
        self.register(FunctionDef {
            name: "VALUE",
            min_args: 1,
            max_args: Some(1),
            implementation: text::fn_value,
        });
    }

    fn register_date_functions(&mut self) {
        // DATE
        self.register(FunctionDef {
            name: "DATE",
            min_args: 3,
            max_args: Some(3),
            implementation: date::fn_date,
        });

        // DATEVALUE
        self.register(FunctionDef {
            name: "DATEVALUE",
            min_args: 1,
            max_args: Some(2),
            implementation: date::fn_datevalue,
        });

        // DATETIMEVALUE
        self.register(FunctionDef {
            name: "DATETIMEVALUE",
            min_args: 1,
            max_args: Some(2),
            implementation: date::fn_datetimevalue,
        });

        // DAY
        self.register(FunctionDef {
            name: "DAY",
            min_args: 1,
            max_args: Some(1),
            implementation: date::fn_day,
        });

        // MONTH
        self.register(FunctionDef {
            name: "MONTH",
            min_args: 1,
            max_args: Some(1),
            implementation: date::fn_month,
        });

        // NOW
        self.register(FunctionDef {
            name: "NOW",
            min_args: 0,
            max_args: Some(0),
            implementation: date::fn_now,
        });

        // TODAY
        self.register(FunctionDef {
            name: "TODAY",
            min_args: 0,
            max_args: Some(0),
            implementation: date::fn_today,
        });

        // YEAR
        self.register(FunctionDef {
            name: "YEAR",
            min_args: 1,
            max_args: Some(1),
            implementation: date::fn_year,
        });
    }

    fn register_logical_functions(&mut self) {
        // CASE
        self.register(FunctionDef {
            name: "CASE",
            min_args: 3,
            max_args: None,
            implementation: logical::fn_case,
        });

        // IF
        self.register(FunctionDef {
            name: "IF",
            min_args: 3,
            max_args: Some(3),
            implementation: logical::fn_if,
        });

        // NULLVALUE
        self.register(FunctionDef {
            name: "NULLVALUE",
            min_args: 2,
            max_args: Some(2),
            implementation: logical::fn_nullvalue,
        });
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvalError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_registry_contents() {
        assert_eq!(
            builtins().names(),
            vec![
                "BEGINS",
                "CASE",
                "CONTAINS",
                "DATE",
                "DATETIMEVALUE",
                "DATEVALUE",
                "DAY",
                "FIND",
                "IF",
                "INCLUDES",
                "JOIN",
                "LEFT",
                "LEN",
                "LOWER",
                "LPAD",
                "MID",
                "MONTH",
                "NOW",
                "NULLVALUE",
                "RIGHT",
                "RPAD",
                "SUBSTITUTE",
                "TEXT",
                "TODAY",
                "TRIM",
                "UPPER",
                "VALUE",
                "YEAR",
            ]
        );
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(builtins().get("len").map(|f| f.name), Some("LEN"));
        assert!(builtins().get("NOSUCHFN").is_none());
    }

    #[test]
    fn test_arity_checked_before_call() {
        let ctx = Context::new();
        let len = builtins().get("LEN").unwrap();
        assert_eq!(
            len.call(&[], &ctx).unwrap_err(),
            EvalError::ArgumentCount {
                function: "LEN".into(),
                expected: "1".into(),
                actual: 0
            }
        );
        assert_eq!(
            len.call(&[Value::text("Вот")], &ctx).unwrap(),
            Value::integer(3)
        );
    }
}

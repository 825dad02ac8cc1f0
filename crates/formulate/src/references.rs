//! Reference collection for parsed expressions
//!
//! Lets a host find out which values and functions an expression needs
//! before evaluating it, e.g. to fetch only the referenced fields.

use crate::ast::Expr;
use std::collections::BTreeSet;

/// Names an expression refers to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct References {
    /// Identifier names, as written
    pub values: BTreeSet<String>,
    /// Function names, uppercase
    pub functions: BTreeSet<String>,
}

impl References {
    /// Create an empty set of references
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the expression refers to nothing outside itself
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.functions.is_empty()
    }

    /// Whether `name` is referenced as a value
    pub fn has_value(&self, name: &str) -> bool {
        self.values.contains(name)
    }

    /// Whether `name` is called (case-insensitive)
    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains(&name.to_uppercase())
    }

    /// Merge another set of references into this one
    pub fn extend(&mut self, other: References) {
        self.values.extend(other.values);
        self.functions.extend(other.functions);
    }

    fn collect(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident(name) => {
                self.values.insert(name.clone());
            }
            Expr::Literal(_) => {}
            Expr::Unary { operand, .. } => self.collect(operand),
            Expr::Binary { left, right, .. } => {
                self.collect(left);
                self.collect(right);
            }
            Expr::Call { name, args } => {
                self.functions.insert(name.clone());
                for arg in args {
                    self.collect(arg);
                }
            }
        }
    }
}

impl Expr {
    /// Collect the distinct identifiers and function names in this expression
    ///
    /// # Example
    /// ```rust
    /// use formulate::parse_str;
    ///
    /// let expr = parse_str("IF(score > limit, UPPER(name), name)").unwrap();
    /// let refs = expr.references();
    /// assert_eq!(refs.values.iter().collect::<Vec<_>>(), ["limit", "name", "score"]);
    /// assert!(refs.has_function("upper"));
    /// ```
    pub fn references(&self) -> References {
        let mut refs = References::new();
        refs.collect(self);
        refs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_str;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_literals_have_no_references() {
        let refs = parse_str("-(1 + 2) * 3 == TRUE").unwrap().references();
        assert!(refs.is_empty());
    }

    #[test]
    fn test_collects_nested_names() {
        let refs = parse_str("len(trim({first name})) + LEN(a) - -b")
            .unwrap()
            .references();
        assert_eq!(
            refs.values,
            ["a", "b", "first name"].iter().map(|s| s.to_string()).collect()
        );
        assert_eq!(
            refs.functions,
            ["LEN", "TRIM"].iter().map(|s| s.to_string()).collect()
        );
        assert!(refs.has_value("first name"));
        assert!(!refs.has_value("A"));
    }

    #[test]
    fn test_extend() {
        let mut refs = parse_str("a").unwrap().references();
        refs.extend(parse_str("NOW() > b").unwrap().references());
        assert!(refs.has_value("a"));
        assert!(refs.has_value("b"));
        assert!(refs.has_function("NOW"));
    }
}

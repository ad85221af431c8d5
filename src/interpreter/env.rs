use std::collections::HashMap;

use super::Value;

/// Name-to-value bindings in force at a point in execution.
///
/// Scoping is copy-down / merge-up: a nested block runs on a `snapshot` of
/// its enclosing environment and, on normal completion, the snapshot is
/// written back wholesale with `merge`. There is no parent-pointer chain;
/// block bindings escaping into the enclosing scope is the language's
/// documented behavior, and only function calls discard their bindings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    bindings: HashMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn snapshot(&self) -> Environment {
        self.clone()
    }

    /// Replace these bindings with the ones a completed block produced.
    pub fn merge(&mut self, completed: Environment) {
        self.bindings = completed.bindings;
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_is_independent_of_the_original() {
        let mut outer = Environment::new();
        outer.define("x", Value::Number(1.0));

        let mut inner = outer.snapshot();
        inner.define("x", Value::Number(2.0));
        inner.define("y", Value::Number(3.0));

        assert_eq!(outer.lookup("x"), Some(&Value::Number(1.0)));
        assert_eq!(outer.lookup("y"), None);

        outer.merge(inner);
        assert_eq!(outer.lookup("x"), Some(&Value::Number(2.0)));
        assert_eq!(outer.lookup("y"), Some(&Value::Number(3.0)));
    }
}

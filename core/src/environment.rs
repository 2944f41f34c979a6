use std::collections::HashMap;

use thiserror::Error;

use crate::value::{Value, ValueError};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EnvironmentError {
    #[error("Unbound symbol: {name}")]
    Unbound { name: String },

    #[error("{name} is a {found}, not a builtin")]
    NotCallable { name: String, found: &'static str },

    #[error(transparent)]
    Value(#[from] ValueError),
}

/// The table of names visible to a program
#[derive(Debug, Clone, Default)]
pub struct Environment {
    bindings: HashMap<String, Value>,
}

impl Environment {
    /// An environment without any bindings
    pub fn new() -> Self {
        Self {
            bindings: HashMap::with_capacity(0),
        }
    }

    /// An environment containing the builtin procedures
    pub fn standard() -> Self {
        let mut env = Self::new();
        env.set("+", Value::builtin("+", sum));
        env.set("list", Value::builtin("list", list));
        env
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        tracing::trace!(%name, "binding");
        self.bindings.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Every bound name in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.bindings.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Call the builtin bound to a name
    pub fn apply(&self, name: &str, args: Vec<Value>) -> Result<Value, EnvironmentError> {
        match self.get(name) {
            Some(Value::Builtin(builtin)) => Ok(builtin.call(args)?),
            Some(other) => Err(EnvironmentError::NotCallable {
                name: name.to_string(),
                found: other.type_name(),
            }),
            None => Err(EnvironmentError::Unbound {
                name: name.to_string(),
            }),
        }
    }
}

/// (+ values...), folds with value addition starting from zero
fn sum(args: Vec<Value>) -> Result<Value, ValueError> {
    args.into_iter()
        .try_fold(Value::Int64(0), |total, value| total + value)
}

/// (list values...)
fn list(args: Vec<Value>) -> Result<Value, ValueError> {
    Ok(Value::List(args))
}

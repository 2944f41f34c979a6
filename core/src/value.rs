use std::{fmt, ops::Add};

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValueError {
    #[error("TypeMismatch: {operation} is not defined for {found}")]
    TypeMismatch {
        operation: &'static str,
        found: &'static str,
    },

    #[error("TypeMismatch: cannot add {left} and {right}")]
    AddMismatch {
        left: &'static str,
        right: &'static str,
    },

    #[error("IntegerOverflow: {left} + {right} does not fit in 64 bits")]
    IntegerOverflow { left: i64, right: i64 },
}

/// Signature of natively implemented procedures
pub type BuiltinFn = fn(Vec<Value>) -> Result<Value, ValueError>;

/// A named reference to a native procedure.  Two builtins are the same if
/// they point at the same function, the name is only used for printing.
#[derive(Clone)]
pub struct Builtin {
    name: String,
    func: BuiltinFn,
}

impl Builtin {
    pub fn new(name: impl Into<String>, func: BuiltinFn) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Address of the native function
    pub fn identity(&self) -> usize {
        self.func as usize
    }

    pub fn call(&self, args: Vec<Value>) -> Result<Value, ValueError> {
        (self.func)(args)
    }
}

impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Builtin({:?} at {})", self.name, self.identity())
    }
}

/// Every piece of syntax and every runtime datum.  Lists and quotes own their
/// children, so cloning a value copies the whole tree.
#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Int64(i64),
    Float64(f64),
    String(String),
    Atom(String),
    List(Vec<Value>),
    Quote(Box<Value>),
    Builtin(Builtin),
}

impl Value {
    pub fn quote(quoted: Value) -> Self {
        Value::Quote(Box::new(quoted))
    }

    pub fn atom(name: impl Into<String>) -> Self {
        Value::Atom(name.into())
    }

    pub fn string(content: impl Into<String>) -> Self {
        Value::String(content.into())
    }

    /// An empty list, grown with [`Value::push`]
    pub fn list() -> Self {
        Value::List(vec![])
    }

    pub fn builtin(name: impl Into<String>, func: BuiltinFn) -> Self {
        Value::Builtin(Builtin::new(name, func))
    }

    /// Name of the variant, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Int64(_) => "i64",
            Value::Float64(_) => "f64",
            Value::String(_) => "string",
            Value::Atom(_) => "atom",
            Value::List(_) => "list",
            Value::Quote(_) => "quote",
            Value::Builtin(_) => "builtin",
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int64(_) | Value::Float64(_))
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, Value::Builtin(_))
    }

    /// The text of a string or an atom
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(text) | Value::Atom(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(values) => Some(values),
            _ => None,
        }
    }

    /// Append to the end of a list
    pub fn push(&mut self, value: Value) -> Result<(), ValueError> {
        match self {
            Value::List(values) => {
                values.push(value);
                Ok(())
            }
            _ => Err(self.mismatch("push")),
        }
    }

    /// Remove the last element of a list, `None` if the list is empty
    pub fn pop(&mut self) -> Result<Option<Value>, ValueError> {
        match self {
            Value::List(values) => Ok(values.pop()),
            _ => Err(self.mismatch("pop")),
        }
    }

    /// Cast a numeric value to an integer, truncating floats towards zero.
    /// Out of range floats saturate and NaN becomes zero.
    pub fn to_int64(&self) -> Result<Value, ValueError> {
        match *self {
            Value::Int64(val) => Ok(Value::Int64(val)),
            Value::Float64(val) => Ok(Value::Int64(val as i64)),
            _ => Err(self.mismatch("integer conversion")),
        }
    }

    /// Cast a numeric value to a float
    pub fn to_float64(&self) -> Result<Value, ValueError> {
        match *self {
            Value::Int64(val) => Ok(Value::Float64(val as f64)),
            Value::Float64(val) => Ok(Value::Float64(val)),
            _ => Err(self.mismatch("float conversion")),
        }
    }

    /// Numeric ordering.  Anything involving a non-numeric operand is `false`
    /// rather than an error.
    pub fn less_than(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Int64(a), Value::Int64(b)) => a < b,
            (Value::Int64(a), Value::Float64(b)) => (*a as f64) < *b,
            (Value::Float64(a), Value::Int64(b)) => *a < *b as f64,
            (Value::Float64(a), Value::Float64(b)) => a < b,
            _ => false,
        }
    }

    pub fn less_or_equal(&self, other: &Value) -> bool {
        self == other || self.less_than(other)
    }

    pub fn greater_or_equal(&self, other: &Value) -> bool {
        !self.less_than(other)
    }

    /// Every atom referenced inside this value, in source order, including
    /// the ones inside quoted forms
    pub fn used_atoms(&self) -> Vec<&str> {
        let mut atoms = vec![];
        self.collect_atoms(&mut atoms);
        atoms
    }

    fn collect_atoms<'a>(&'a self, atoms: &mut Vec<&'a str>) {
        match self {
            Value::Atom(name) => atoms.push(name),
            Value::Quote(quoted) => quoted.collect_atoms(atoms),
            Value::List(values) => {
                for value in values {
                    value.collect_atoms(atoms);
                }
            }
            Value::Nil
            | Value::Int64(_)
            | Value::Float64(_)
            | Value::String(_)
            | Value::Builtin(_) => (),
        }
    }

    /// Machine readable rendering, strings are quoted and escaped
    pub fn debug(&self) -> DebugPrinter<'_> {
        DebugPrinter { value: self }
    }

    fn mismatch(&self, operation: &'static str) -> ValueError {
        ValueError::TypeMismatch {
            operation,
            found: self.type_name(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Int64(a), Value::Int64(b)) => a == b,
            (Value::Float64(a), Value::Float64(b)) => a == b,
            (Value::Int64(a), Value::Float64(b)) => *a as f64 == *b,
            (Value::Float64(a), Value::Int64(b)) => *a == *b as f64,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Atom(a), Value::Atom(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Quote(a), Value::Quote(b)) => a == b,
            (Value::Builtin(a), Value::Builtin(b)) => a == b,
            _ => false,
        }
    }
}

impl<'a> Add<&'a Value> for &'a Value {
    type Output = Result<Value, ValueError>;

    fn add(self, other: &'a Value) -> Self::Output {
        // nil on the right absorbs everything, checked before the left side
        if other.is_nil() {
            return Ok(Value::Nil);
        }

        match (self, other) {
            (Value::Nil, _) => Ok(Value::Nil),
            (Value::Int64(a), Value::Int64(b)) => a
                .checked_add(*b)
                .map(Value::Int64)
                .ok_or(ValueError::IntegerOverflow {
                    left: *a,
                    right: *b,
                }),
            (Value::Int64(a), Value::Float64(b)) => Ok(Value::Float64(*a as f64 + b)),
            (Value::Float64(a), Value::Int64(b)) => Ok(Value::Float64(a + *b as f64)),
            (Value::Float64(a), Value::Float64(b)) => Ok(Value::Float64(a + b)),
            (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{}{}", a, b))),
            (Value::List(a), Value::List(b)) => {
                Ok(Value::List(a.iter().chain(b.iter()).cloned().collect()))
            }
            _ => Err(ValueError::AddMismatch {
                left: self.type_name(),
                right: other.type_name(),
            }),
        }
    }
}

impl Add for Value {
    type Output = Result<Value, ValueError>;

    fn add(self, other: Value) -> Self::Output {
        &self + &other
    }
}

impl From<i64> for Value {
    fn from(val: i64) -> Self {
        Value::Int64(val)
    }
}

impl From<f64> for Value {
    fn from(val: f64) -> Self {
        Value::Float64(val)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::List(values)
    }
}

/// Human readable rendering, strings are printed without quotes.  The
/// elements of a list are always printed in debug form.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::String(text) => write!(f, "{}", text),
            _ => write_common(self, f),
        }
    }
}

/// Prints a value in the debug form, see [`Value::debug`]
pub struct DebugPrinter<'a> {
    value: &'a Value,
}

impl<'a> fmt::Display for DebugPrinter<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.value {
            Value::String(text) => {
                write!(f, "\"")?;
                for ch in text.chars() {
                    match ch {
                        '"' => write!(f, "\\\"")?,
                        '\\' => write!(f, "\\\\")?,
                        '\n' => write!(f, "\\n")?,
                        '\t' => write!(f, "\\t")?,
                        ch => write!(f, "{}", ch)?,
                    }
                }
                write!(f, "\"")
            }
            value => write_common(value, f),
        }
    }
}

/// The parts of display and debug printing that are the same
fn write_common(value: &Value, f: &mut fmt::Formatter) -> fmt::Result {
    match value {
        Value::Nil => write!(f, "nil"),
        Value::Int64(val) => write!(f, "{}", val),
        Value::Float64(val) => write_float(*val, f),
        Value::String(_) => write!(f, "{}", value.debug()),
        Value::Atom(name) => write!(f, "{}", name),
        Value::Quote(quoted) => write!(f, "'{}", quoted.debug()),
        Value::List(values) => {
            write!(f, "(")?;
            for (idx, value) in values.iter().enumerate() {
                if idx != 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", value.debug())?;
            }
            write!(f, ")")
        }
        Value::Builtin(builtin) => write!(f, "<{} at {}>", builtin.name(), builtin.identity()),
    }
}

/// Finite floats always contain a decimal point so they read back as floats
fn write_float(val: f64, f: &mut fmt::Formatter) -> fmt::Result {
    let text = val.to_string();
    if val.is_finite() && !text.contains('.') {
        write!(f, "{}.0", text)
    } else {
        write!(f, "{}", text)
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    fn first(args: Vec<Value>) -> Result<Value, ValueError> {
        Ok(args.into_iter().next().unwrap_or(Value::Nil))
    }

    fn last(args: Vec<Value>) -> Result<Value, ValueError> {
        Ok(args.into_iter().last().unwrap_or(Value::Nil))
    }

    #[test]
    fn numeric_equality_coerces() {
        assert_eq!(Value::Int64(3), Value::Float64(3.0));
        assert_eq!(Value::Float64(3.0), Value::Int64(3));
        assert_ne!(Value::Int64(3), Value::Float64(3.5));
        assert_ne!(Value::Float64(f64::NAN), Value::Float64(f64::NAN));
    }

    #[test]
    fn text_variants_differ() {
        assert_eq!(Value::atom("x"), Value::atom("x"));
        assert_ne!(Value::atom("x"), Value::string("x"));
        assert_eq!(Value::Nil, Value::Nil);
        assert_ne!(Value::Nil, Value::list());
    }

    #[test]
    fn builtins_compare_by_function() {
        let a = Value::builtin("first", first);
        let renamed = Value::builtin("head", first);
        let other = Value::builtin("first", last);

        assert_eq!(a, renamed);
        assert_ne!(a, other);
    }

    #[test]
    fn casts_make_new_values() {
        let float = Value::Float64(-2.9);
        assert_eq!(float.to_int64(), Ok(Value::Int64(-2)));
        assert!(matches!(float, Value::Float64(_)));
        assert!(matches!(Value::Int64(4).to_float64(), Ok(Value::Float64(v)) if v == 4.0));
        assert_eq!(Value::Float64(f64::NAN).to_int64(), Ok(Value::Int64(0)));

        assert_eq!(
            Value::string("1").to_int64(),
            Err(ValueError::TypeMismatch {
                operation: "integer conversion",
                found: "string",
            })
        );
        assert!(Value::Nil.to_float64().is_err());
    }

    #[test]
    fn ordering() {
        assert!(Value::Int64(1).less_than(&Value::Float64(1.5)));
        assert!(Value::Float64(0.5).less_than(&Value::Int64(1)));
        assert!(!Value::Int64(3).less_than(&Value::string("x")));
        assert!(!Value::string("x").less_than(&Value::Int64(3)));

        assert!(Value::Int64(2).less_or_equal(&Value::Float64(2.0)));
        assert!(!Value::Int64(3).less_or_equal(&Value::Int64(2)));

        assert!(Value::Int64(3).greater_or_equal(&Value::Int64(3)));
        // ">=" is the negation of "<", so it holds against non-numbers
        assert!(Value::Int64(3).greater_or_equal(&Value::atom("x")));
    }

    #[test]
    fn addition() {
        assert_eq!(&Value::Int64(1) + &Value::Int64(2), Ok(Value::Int64(3)));
        assert!(matches!(
            &Value::Int64(1) + &Value::Float64(0.5),
            Ok(Value::Float64(v)) if v == 1.5
        ));
        assert_eq!(
            Value::string("ab") + Value::string("cd"),
            Ok(Value::string("abcd"))
        );
        assert_eq!(
            &Value::Int64(1) + &Value::string("x"),
            Err(ValueError::AddMismatch {
                left: "i64",
                right: "string"
            })
        );
        assert_eq!(
            &Value::Int64(i64::MAX) + &Value::Int64(1),
            Err(ValueError::IntegerOverflow {
                left: i64::MAX,
                right: 1
            })
        );
    }

    #[test]
    fn nil_absorbs() {
        assert_eq!(&Value::Int64(1) + &Value::Nil, Ok(Value::Nil));
        assert_eq!(&Value::string("x") + &Value::Nil, Ok(Value::Nil));
        assert_eq!(&Value::Nil + &Value::Int64(1), Ok(Value::Nil));
        assert_eq!(&Value::Nil + &Value::atom("a"), Ok(Value::Nil));
    }

    #[test]
    fn list_addition_copies() {
        let left = Value::from(vec![Value::Int64(1)]);
        let right = Value::from(vec![Value::Int64(2), Value::Int64(3)]);

        let sum = (&left + &right).unwrap();

        assert_eq!(
            sum,
            Value::from(vec![Value::Int64(1), Value::Int64(2), Value::Int64(3)])
        );
        assert_eq!(left.as_list().map(<[Value]>::len), Some(1));
        assert_eq!(right.as_list().map(<[Value]>::len), Some(2));
    }

    #[test]
    fn push_and_pop() {
        let mut list = Value::list();
        list.push(Value::Int64(1)).unwrap();
        list.push(Value::atom("a")).unwrap();

        assert_eq!(list.pop(), Ok(Some(Value::atom("a"))));
        assert_eq!(list.pop(), Ok(Some(Value::Int64(1))));
        assert_eq!(list.pop(), Ok(None));

        let mut atom = Value::atom("a");
        assert!(atom.push(Value::Nil).is_err());
        assert!(atom.pop().is_err());
    }

    #[test]
    fn display_and_debug() {
        let value = Value::from(vec![
            Value::atom("print"),
            Value::string("say \"hi\"\n"),
            Value::Float64(2.0),
            Value::quote(Value::atom("x")),
            Value::Nil,
        ]);

        assert_eq!(
            value.to_string(),
            r#"(print "say \"hi\"\n" 2.0 'x nil)"#
        );
        assert_eq!(value.debug().to_string(), value.to_string());

        assert_eq!(Value::string("a\\b").to_string(), "a\\b");
        assert_eq!(Value::string("a\\b").debug().to_string(), r#""a\\b""#);
        assert_eq!(Value::quote(Value::string("s")).to_string(), r#"'"s""#);
    }

    #[test]
    fn float_rendering() {
        assert_eq!(Value::Float64(2.5).to_string(), "2.5");
        assert_eq!(Value::Float64(-3.0).to_string(), "-3.0");
        assert_eq!(Value::Float64(1e20).to_string(), "100000000000000000000.0");
        assert_eq!(Value::Float64(f64::INFINITY).to_string(), "inf");
        assert_eq!(Value::Float64(f64::NAN).to_string(), "NaN");
    }

    #[test]
    fn builtin_rendering() {
        let builtin = Builtin::new("first", first);
        let expected = format!("<first at {}>", builtin.identity());

        assert_eq!(Value::Builtin(builtin).to_string(), expected);
    }

    #[test]
    fn used_atoms_recurse() {
        let value = Value::from(vec![
            Value::atom("f"),
            Value::quote(Value::from(vec![Value::atom("a"), Value::Int64(1)])),
            Value::string("not-an-atom"),
            Value::atom("b"),
        ]);

        assert_eq!(value.used_atoms(), vec!["f", "a", "b"]);
    }
}

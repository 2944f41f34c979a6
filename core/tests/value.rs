use pretty_assertions::assert_eq;
use rstest::rstest;

use lisp_core::value::{Value, ValueError};

fn non_numeric() -> Vec<Value> {
    vec![
        Value::Nil,
        Value::string("s"),
        Value::atom("a"),
        Value::list(),
        Value::from(vec![Value::Int64(1)]),
        Value::quote(Value::Int64(1)),
    ]
}

#[rstest]
#[case(0)]
#[case(3)]
#[case(-42)]
#[case(1 << 40)]
fn int_float_equality_is_symmetric(#[case] int: i64) {
    let i = Value::Int64(int);
    let f = Value::Float64(int as f64);

    assert_eq!(i, f);
    assert_eq!(f, i);
    assert!(i.less_or_equal(&f) && f.less_or_equal(&i));
    assert!(!i.less_than(&f) && !f.less_than(&i));
}

#[test]
fn non_numeric_right_operand_never_orders() {
    let lefts = vec![Value::Int64(1), Value::Float64(1.0), Value::string("s")];

    for left in &lefts {
        for right in non_numeric() {
            assert!(!left.less_than(&right), "{} < {}", left, right);
        }
    }
}

#[test]
fn nil_absorbs_on_either_side() {
    let mut values = non_numeric();
    values.push(Value::Int64(5));
    values.push(Value::Float64(5.5));

    for value in values {
        assert_eq!(&value + &Value::Nil, Ok(Value::Nil));
        assert_eq!(&Value::Nil + &value, Ok(Value::Nil));
    }
}

#[test]
fn list_addition_leaves_operands() {
    let a = Value::from(vec![Value::atom("x")]);
    let b = Value::from(vec![Value::atom("y"), Value::atom("z")]);

    let joined = (&a + &b).unwrap();

    assert_eq!(joined.to_string(), "(x y z)");
    assert_eq!(a.to_string(), "(x)");
    assert_eq!(b.to_string(), "(y z)");
}

#[rstest]
#[case(Value::Int64(1), Value::string("x"))]
#[case(Value::string("x"), Value::Int64(1))]
#[case(Value::atom("a"), Value::atom("b"))]
#[case(Value::quote(Value::Nil), Value::quote(Value::Nil))]
#[case(Value::list(), Value::string(""))]
fn unsupported_addition(#[case] left: Value, #[case] right: Value) {
    assert_eq!(
        &left + &right,
        Err(ValueError::AddMismatch {
            left: left.type_name(),
            right: right.type_name()
        })
    );
}

#[test]
fn structural_equality() {
    let tree = || {
        Value::from(vec![
            Value::atom("f"),
            Value::quote(Value::from(vec![Value::Int64(1), Value::string("s")])),
        ])
    };

    assert_eq!(tree(), tree());
    assert_eq!(tree().clone(), tree());

    let mut longer = tree();
    longer.push(Value::Nil).unwrap();
    assert_ne!(longer, tree());

    assert_ne!(
        Value::quote(Value::atom("a")),
        Value::quote(Value::string("a"))
    );
}

#[test]
fn error_messages() {
    assert_eq!(
        Value::atom("a").to_float64().unwrap_err().to_string(),
        "TypeMismatch: float conversion is not defined for atom"
    );
    assert_eq!(
        (&Value::Int64(1) + &Value::atom("a")).unwrap_err().to_string(),
        "TypeMismatch: cannot add i64 and atom"
    );
}

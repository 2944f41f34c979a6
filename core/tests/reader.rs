use pretty_assertions::assert_eq;
use rstest::rstest;

use lisp_core::{
    config::Configuration,
    reader::{read_all, read_one, ReadError, Reader},
    value::Value,
};

/// Read a single expression and check nothing is left over
fn read_single(source: &str) -> Value {
    let mut reader = Reader::new(source, &Configuration::new());
    let value = reader.read_one().expect("source should read");
    assert!(reader.is_at_end(), "trailing input after {:?}", source);
    value
}

#[rstest]
#[case("atom")]
#[case("list->vector")]
#[case("42")]
#[case("-17")]
#[case("2.5")]
#[case("-0.125")]
#[case(r#""plain""#)]
#[case(r#""tab\tquote\"slash\\newline\n""#)]
#[case("()")]
#[case("(+ 1 (* 2 3.5) \"s\")")]
#[case("'(a b)")]
#[case("''x")]
#[case("(quote 'nested (list))")]
fn debug_form_round_trips(#[case] source: &str) {
    let value = read_single(source);

    assert_eq!(value.debug().to_string(), source);
    assert_eq!(read_single(&value.debug().to_string()), value);
}

#[test]
fn display_of_read_debug_matches() {
    let values = vec![
        Value::atom("x"),
        Value::Int64(9),
        Value::Float64(0.75),
        Value::List(vec![Value::string("in list"), Value::atom("y")]),
    ];

    for value in values {
        let debug = value.debug().to_string();
        assert_eq!(read_single(&debug).to_string(), debug);
    }
}

#[rstest]
#[case("(1 2", "MalformedProgram: unterminated list starting at 1:1")]
#[case("(a\n  (b", "MalformedProgram: unterminated list starting at 2:3")]
#[case("\"open", "MalformedProgram: unterminated string starting at 1:1")]
#[case("a ]", "MalformedProgram: unexpected character ']' at 1:3")]
#[case("'", "MalformedProgram: quote at 1:1 is not followed by an expression")]
fn malformed_programs(#[case] source: &str, #[case] message: &str) {
    assert_eq!(read_all(source).unwrap_err().to_string(), message);
}

#[test]
fn whole_program() {
    let source = r#"
; greet everyone
(define greet
  (lambda (name)
    (print "hello, " name)))

@entry
(greet 'world)
"#;

    assert_eq!(
        read_all(source),
        Ok(vec![
            Value::List(vec![
                Value::atom("define"),
                Value::atom("greet"),
                Value::List(vec![
                    Value::atom("lambda"),
                    Value::List(vec![Value::atom("name")]),
                    Value::List(vec![
                        Value::atom("print"),
                        Value::string("hello, "),
                        Value::atom("name"),
                    ]),
                ]),
            ]),
            Value::Nil,
            Value::atom("entry"),
            Value::List(vec![Value::atom("greet"), Value::quote(Value::atom("world"))]),
        ])
    );
}

#[test]
fn read_one_walks_a_program() {
    let source = "1 ; one\n'two (three)";
    let mut cursor = 0;
    let mut values = vec![];

    while cursor < source.len() {
        values.push(read_one(source, &mut cursor).unwrap());
    }

    assert_eq!(
        values,
        vec![
            Value::Int64(1),
            Value::quote(Value::atom("two")),
            Value::List(vec![Value::atom("three")]),
        ]
    );
}

#[test]
fn failed_list_is_not_returned() {
    let mut reader = Reader::new("(a b (c", &Configuration::new());

    assert!(matches!(
        reader.read_one(),
        Err(ReadError::UnterminatedList { .. })
    ));
}

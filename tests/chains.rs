//! End-to-end chains over plain values.

use linkwise::prelude::*;
use serde::Serialize;
use serde_json::json;

#[derive(Serialize)]
struct Order {
    id: u32,
    lines: Vec<Line>,
}

#[derive(Serialize)]
struct Line {
    sku: String,
    quantity: u32,
}

fn order() -> Value {
    Value::from_serialize(&Order {
        id: 17,
        lines: vec![
            Line {
                sku: "kettle".to_string(),
                quantity: 1,
            },
            Line {
                sku: "mug".to_string(),
                quantity: 4,
            },
        ],
    })
    .unwrap()
}

#[test]
fn test_square_then_expect() {
    wrap(4_i64)
        .apply(|x: i64| x * x)
        .unwrap()
        .expect()
        .unwrap()
        .to_be(16)
        .unwrap();
}

#[test]
fn test_glom_then_square() {
    wrap(json!({"a": {"b": 3}}))
        .glom(["a", "b"])
        .unwrap()
        .apply(|x: i64| x * x)
        .unwrap()
        .to_be(9)
        .unwrap();
}

#[test]
fn test_map_doubles() {
    wrap(vec![1, 2, 3])
        .map(|x: i64| x * 2)
        .unwrap()
        .expect()
        .unwrap()
        .to_be(vec![2, 4, 6])
        .unwrap();
}

#[test]
fn test_filter_then_index() {
    wrap(vec![1, 2, 3])
        .filter(|x: i64| x > 2)
        .unwrap()
        .expect()
        .unwrap()
        .its(0)
        .unwrap()
        .to_be(3)
        .unwrap();
}

#[test]
fn test_glom_missing_intermediate() {
    let link = wrap(json!({"a": {"c": 1}})).glom(["a", "b", "c"]).unwrap();
    assert_eq!(link.unwrap().unwrap(), Value::Undefined);

    let through_null = wrap(json!({"a": null})).glom(["a", "b"]).unwrap();
    assert_eq!(through_null.unwrap().unwrap(), Value::Undefined);
}

#[test]
fn test_serialized_fixture() {
    let link = wrap(order());
    link.glom(["lines", "1", "sku"]).unwrap().to_be("mug").unwrap();
    link.glom(vec![Key::from("lines"), Key::from(0), Key::from("quantity")])
        .unwrap()
        .to_be(1)
        .unwrap();

    link.its("lines")
        .unwrap()
        .map(|line: Value| line.index(&Key::from("quantity")))
        .unwrap()
        .to_be(vec![1, 4])
        .unwrap();
}

#[test]
fn test_length_of_sequences() {
    wrap(order()).glom(["lines", "length"]).unwrap().to_be(2).unwrap();
    wrap("four").its("length").unwrap().to_be(4).unwrap();
}

#[test]
fn test_invokes_method() {
    let greeter = Value::object([
        ("name", Value::from("lin")),
        (
            "greet",
            Value::function(|this: &Value, args: &[Value]| {
                let name = this.index(&Key::from("name"));
                let greeting = args.first().and_then(Value::as_str).unwrap_or("hello");
                format!("{greeting}, {}", name.as_str().unwrap_or("?"))
            }),
        ),
    ]);

    wrap(greeter.clone())
        .invokes("greet", ["hi"])
        .unwrap()
        .to_be("hi, lin")
        .unwrap();
    wrap(greeter)
        .invokes("greet", NO_ARGS)
        .unwrap()
        .to_be("hello, lin")
        .unwrap();
}

#[test]
fn test_failure_reports_both_sides() {
    let err = wrap(vec![1, 2]).to_be(vec![1, 3]).unwrap_err();
    assert!(err.is_expectation_failed());
    assert_eq!(
        err.to_string(),
        "Expectation failed: expected [1,2] to be deep equal [1,3]"
    );

    let err = expect(json!({"k": "v"})).not().to_be(json!({"k": "v"})).unwrap_err();
    assert_eq!(
        err.to_string(),
        r#"Expectation failed: expected {"k":"v"} to not be deep equal {"k":"v"}"#
    );
}

#[test]
fn test_empty_container_rules() {
    let empty = Container::empty();
    assert!(empty.expect().unwrap_err().is_empty_subject());
    empty.expect_at(5).unwrap().to_be(5).unwrap();
    assert!(empty.its("a").unwrap_err().is_empty_subject());
}

#[test]
fn test_expect_against_other_links() {
    let left = wrap(json!([1, {"x": 2}]));
    let right = wrap(vec![Value::from(1), Value::object([("x", Value::from(2))])]);
    left.to_be(&right).unwrap();
    expect(right.unwrap().unwrap()).to_be(&left).unwrap();
}

#[test]
fn test_not_does_not_leak() {
    let base = expect(10_i64);
    let negated = base.not();
    negated.to_be(11).unwrap();
    base.to_be(10).unwrap();
    assert!(negated.apply(|x: i64| x + 1).unwrap().to_be(11).is_err());
}

#[test]
fn test_caller_errors_propagate() {
    let err = wrap(3_i64)
        .try_apply(|x: i64| -> Result<i64> {
            if x > 2 {
                Err(Error::raised("too big"))
            } else {
                Ok(x)
            }
        })
        .unwrap_err();
    assert_eq!(err, Error::raised("too big"));
}

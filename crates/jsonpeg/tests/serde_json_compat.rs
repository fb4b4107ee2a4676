#![expect(missing_docs)]

mod common;

use jsonpeg::{Map, Value, parse_with_options};
use rstest::rstest;

/// Maps a `serde_json` value onto ours, applying the same numeric policy:
/// integers that fit `i64` stay exact, everything else is `f64`.
fn from_serde(value: &serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(*b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::from(i),
            None => Value::from(n.as_f64().expect("finite number")),
        },
        serde_json::Value::String(s) => Value::from(s.as_str()),
        serde_json::Value::Array(items) => Value::Array(items.iter().map(from_serde).collect()),
        serde_json::Value::Object(members) => Value::Object(
            members
                .iter()
                .map(|(k, v)| (k.clone(), from_serde(v)))
                .collect::<Map>(),
        ),
    }
}

#[test]
fn document_matches_serde_json() {
    let ours = parse_with_options(common::ORIGINAL, common::relaxed()).unwrap();
    let theirs: serde_json::Value = serde_json::from_str(common::ORIGINAL).unwrap();
    assert_eq!(ours, from_serde(&theirs));
}

#[test]
fn canonical_output_is_valid_json() {
    let ours = parse_with_options(common::ORIGINAL, common::relaxed()).unwrap();
    let written = ours.to_string();
    let theirs: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(ours, from_serde(&theirs));
    assert_eq!(parse_with_options(&written, common::relaxed()).unwrap(), ours);
}

#[rstest]
#[case("[]")]
#[case(r#"{"a":{"b":[1,2.5,"c"]}}"#)]
#[case(r#"["\"","\\","\/","\b\f\n\r\t"]"#)]
#[case("[-1.0e-10, 3.5E+3, 0.0]")]
#[case("[9223372036854775807, -9223372036854775808, 9223372036854775808]")]
#[case(r#"{"dup":1,"dup":2}"#)]
fn agrees_with_serde_json(#[case] input: &str) {
    let ours = parse_with_options(input, common::relaxed()).unwrap();
    let theirs: serde_json::Value = serde_json::from_str(input).unwrap();
    assert_eq!(ours, from_serde(&theirs));
}

#[rstest]
#[case("[1,]")]
#[case(r#"{"a" 1}"#)]
#[case("01")]
#[case("[1 2]")]
#[case("{} x")]
#[case("")]
fn both_reject(#[case] input: &str) {
    assert!(parse_with_options(input, common::relaxed()).is_err());
    assert!(serde_json::from_str::<serde_json::Value>(input).is_err());
}

use jsonbind::{parse_str, render, render_pretty, Value};
use test_case::test_case;

#[test_case("null"; "null literal")]
#[test_case("true"; "true literal")]
#[test_case("[]"; "empty array")]
#[test_case("{}"; "empty object")]
#[test_case("-12.5"; "negative decimal")]
#[test_case(r#""café""#; "non-ascii string")]
#[test_case(r#"{"a":1,"b":[true,null],"c":{"d":"x"}}"#; "nested document")]
fn rendered_text_parses_back_to_the_same_tree(input: &str) {
    let tree = parse_str(input).unwrap();
    assert_eq!(parse_str(&render(&tree)).unwrap(), tree);
}

#[test]
fn member_order_survives_the_round_trip() {
    let tree = parse_str(r#"{"z":1,"a":2,"m":3}"#).unwrap();
    assert_eq!(render(&tree), r#"{"z":1,"a":2,"m":3}"#);
}

#[test]
fn duplicate_members_keep_the_last_value_in_place() {
    let tree = parse_str(r#"{"a":1,"b":2,"a":3}"#).unwrap();
    assert_eq!(render(&tree), r#"{"a":3,"b":2}"#);
}

#[test]
fn pretty_output_parses_back_to_the_same_tree() {
    let tree = parse_str(r#"{"a":[1,2],"b":{"c":null}}"#).unwrap();
    assert_eq!(parse_str(&render_pretty(&tree)).unwrap(), tree);
}

#[test]
fn numbers_keep_their_exact_decimal_value() {
    let tree = parse_str("[0.1, 1e2, -12.5e+2, 100e-2]").unwrap();
    assert_eq!(render(&tree), "[0.1,100,-1250,1]");
}

// Depth is limited by memory only; parsing, comparing, rendering and
// dropping a 100k-deep tree must not touch the native call stack.
#[test]
fn deeply_nested_arrays_round_trip() {
    const DEPTH: usize = 100_000;
    let mut text = String::with_capacity(DEPTH * 2);
    for _ in 0..DEPTH {
        text.push('[');
    }
    for _ in 0..DEPTH {
        text.push(']');
    }
    let tree = parse_str(&text).unwrap();
    let rendered = render(&tree);
    assert_eq!(rendered, text);
    assert_eq!(parse_str(&rendered).unwrap(), tree);
}

#[test]
fn reader_input_round_trips() {
    let text = r#"{"city":"München","population":1512491}"#;
    let from_reader = jsonbind::parse_reader(text.as_bytes()).unwrap();
    assert_eq!(from_reader, parse_str(text).unwrap());
    assert_eq!(
        render(&from_reader),
        r#"{"city":"München","population":1512491}"#
    );
}

#[test]
fn parse_failures_leave_no_partial_result() {
    assert!(parse_str(r#"{"a":1,"#).is_err());
    assert!(parse_str("[1,]").is_err());
    assert!(parse_str("[1] x").is_err());
}

#[test]
fn trees_built_by_hand_render_like_parsed_ones() {
    let tree = Value::Object(
        [
            ("name".to_owned(), Value::from("jsonbind")),
            ("stable".to_owned(), Value::from(true)),
        ]
        .into_iter()
        .collect(),
    );
    assert_eq!(render(&tree), r#"{"name":"jsonbind","stable":true}"#);
}

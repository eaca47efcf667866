//! Text emission for [`Value`] trees.
//!
//! The renderer reproduces exact object-member and array-element order and
//! works off an explicit task stack, so trees of any depth render without
//! touching the native call stack.

use std::fmt::Write;

use crate::{Member, Value};

/// Output layout for [`render_into`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStyle {
    /// No insignificant whitespace.
    Compact,
    /// Newlines and two-space indentation.
    Pretty,
}

/// Render a value as compact JSON text.
#[must_use]
pub fn render(value: &Value) -> String {
    let mut out = String::new();
    render_into(value, &mut out, RenderStyle::Compact);
    out
}

/// Render a value with newlines and two-space indentation.
#[must_use]
pub fn render_pretty(value: &Value) -> String {
    let mut out = String::new();
    render_into(value, &mut out, RenderStyle::Pretty);
    out
}

enum Task<'a> {
    Value(&'a Value, usize),
    ArrayTail {
        items: &'a [Value],
        next: usize,
        depth: usize,
    },
    ObjectTail {
        members: &'a [Member],
        next: usize,
        depth: usize,
    },
}

/// Render a value into an existing buffer.
pub fn render_into(value: &Value, out: &mut String, style: RenderStyle) {
    let pretty = style == RenderStyle::Pretty;
    let mut tasks = vec![Task::Value(value, 0)];
    while let Some(task) = tasks.pop() {
        match task {
            Task::Value(value, depth) => match value {
                Value::Null => out.push_str("null"),
                Value::Bool(true) => out.push_str("true"),
                Value::Bool(false) => out.push_str("false"),
                Value::Number(number) => out.push_str(&number.to_plain_string()),
                Value::String(text) => escape_into(text, out),
                Value::Array(items) => {
                    out.push('[');
                    if items.is_empty() {
                        out.push(']');
                    } else {
                        tasks.push(Task::ArrayTail {
                            items,
                            next: 0,
                            depth,
                        });
                    }
                }
                Value::Object(object) => {
                    out.push('{');
                    if object.members.is_empty() {
                        out.push('}');
                    } else {
                        tasks.push(Task::ObjectTail {
                            members: &object.members,
                            next: 0,
                            depth,
                        });
                    }
                }
            },
            Task::ArrayTail { items, next, depth } => {
                if next == items.len() {
                    if pretty {
                        break_line(out, depth);
                    }
                    out.push(']');
                } else {
                    if next > 0 {
                        out.push(',');
                    }
                    if pretty {
                        break_line(out, depth + 1);
                    }
                    tasks.push(Task::ArrayTail {
                        items,
                        next: next + 1,
                        depth,
                    });
                    tasks.push(Task::Value(&items[next], depth + 1));
                }
            }
            Task::ObjectTail {
                members,
                next,
                depth,
            } => {
                if next == members.len() {
                    if pretty {
                        break_line(out, depth);
                    }
                    out.push('}');
                } else {
                    if next > 0 {
                        out.push(',');
                    }
                    if pretty {
                        break_line(out, depth + 1);
                    }
                    let member = &members[next];
                    escape_into(&member.name, out);
                    out.push(':');
                    if pretty {
                        out.push(' ');
                    }
                    tasks.push(Task::ObjectTail {
                        members,
                        next: next + 1,
                        depth,
                    });
                    tasks.push(Task::Value(&member.value, depth + 1));
                }
            }
        }
    }
}

fn break_line(out: &mut String, depth: usize) {
    out.push('\n');
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn escape_into(text: &str, out: &mut String) {
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Object;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;
    use test_case::test_case;

    #[test]
    fn empty_object_renders_as_braces() {
        assert_eq!(render(&Value::Object(Object::new())), "{}");
    }

    #[test]
    fn member_order_is_preserved() {
        let mut inner = Object::new();
        inner.insert("d", Value::Null);
        let mut object = Object::new();
        object.insert("a", 1i64);
        object.insert(
            "b",
            vec![Value::from(1i64), Value::from(2i64), Value::from(3i64)],
        );
        object.insert("c", inner);
        assert_eq!(
            render(&Value::Object(object)),
            r#"{"a":1,"b":[1,2,3],"c":{"d":null}}"#
        );
    }

    #[test_case("plain", r#""plain""#)]
    #[test_case("say \"hi\"", r#""say \"hi\"""#)]
    #[test_case("a\\b", r#""a\\b""#)]
    #[test_case("line\nbreak", r#""line\nbreak""#)]
    #[test_case("tab\there", r#""tab\there""#)]
    #[test_case("\u{0001}", r#""\u0001""#)]
    fn string_escaping(input: &str, expected: &str) {
        assert_eq!(render(&Value::from(input)), expected);
    }

    #[test]
    fn numbers_render_in_plain_notation() {
        let number = BigDecimal::from_str("-12.5e+2").unwrap();
        assert_eq!(render(&Value::Number(number)), "-1250");
    }

    #[test]
    fn decimal_fractions_are_exact() {
        let number = BigDecimal::from_str("0.1").unwrap();
        assert_eq!(render(&Value::Number(number)), "0.1");
    }

    #[test]
    fn pretty_layout() {
        let mut object = Object::new();
        object.insert("a", 1i64);
        object.insert("b", vec![Value::from(true)]);
        let expected = "{\n  \"a\": 1,\n  \"b\": [\n    true\n  ]\n}";
        assert_eq!(render_pretty(&Value::Object(object)), expected);
    }

    #[test]
    fn deep_array_renders_without_overflow() {
        let mut value = Value::Null;
        for _ in 0..200_000 {
            value = Value::Array(vec![value]);
        }
        let text = render(&value);
        assert!(text.starts_with("[[[["));
        assert!(text.ends_with("]]]]"));
    }
}

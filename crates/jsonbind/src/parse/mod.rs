//! Streaming JSON parser.
//!
//! The parser replaces recursive descent with an explicit LIFO stack of
//! state frames, so nesting depth is bounded only by heap. Every character
//! read from the source is dispatched to the top frame, which does exactly
//! one of three things: buffer the character and stay, pop itself and hand
//! its finished value to the frame beneath (optionally forwarding a *stop
//! character* it examined but could not consume), or push a child frame and
//! replay the current character into it.
//!
//! Numbers have no terminator token, so a number frame always consumes one
//! character past its own end and forwards it as the stop character.

mod source;

use std::str::FromStr;

use bigdecimal::BigDecimal;
use jsonbind_value::{Object, Value};

pub use source::{CharSource, Latin1Source, StrSource, TextEncoding, Utf16Source, Utf8Source};

use crate::error::{ParseError, ParseErrorKind};

/// Parse JSON text from a string.
///
/// # Errors
///
/// Fails with a [`ParseError`] on malformed or incomplete input.
pub fn parse_str(input: &str) -> Result<Value, ParseError> {
    Parser::new(ParseOptions::default()).parse(StrSource::new(input))
}

/// Parse JSON text from a blocking byte reader, decoded as UTF-8.
///
/// # Errors
///
/// Fails with a [`ParseError`] on malformed input, invalid UTF-8, or a
/// failing reader.
pub fn parse_reader<R: std::io::Read>(reader: R) -> Result<Value, ParseError> {
    Parser::new(ParseOptions::default()).parse(Utf8Source::new(reader))
}

/// Parse JSON text from a blocking byte reader carrying the named encoding.
///
/// Accepted labels (case-insensitive): `utf-8`, `utf-16le`, `utf-16be`,
/// `latin-1` / `iso-8859-1`.
///
/// # Errors
///
/// Fails with [`ParseErrorKind::UnknownEncoding`] for an unrecognized label,
/// and otherwise like [`parse_reader`].
pub fn parse_reader_with_encoding<R: std::io::Read>(
    reader: R,
    encoding: &str,
) -> Result<Value, ParseError> {
    let parser = Parser::new(ParseOptions::default());
    match TextEncoding::for_name(encoding) {
        Some(TextEncoding::Utf8) => parser.parse(Utf8Source::new(reader)),
        Some(TextEncoding::Utf16Le) => parser.parse(Utf16Source::little_endian(reader)),
        Some(TextEncoding::Utf16Be) => parser.parse(Utf16Source::big_endian(reader)),
        Some(TextEncoding::Latin1) => parser.parse(Latin1Source::new(reader)),
        None => Err(ParseError::new(
            ParseErrorKind::UnknownEncoding(encoding.to_owned()),
            0,
        )),
    }
}

/// Parser configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    trace: bool,
}

impl ParseOptions {
    #[must_use]
    pub fn new() -> Self {
        ParseOptions::default()
    }

    /// Emit a `tracing` event for every frame transition.
    #[must_use]
    pub fn trace(mut self, enabled: bool) -> Self {
        self.trace = enabled;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObjectExpect {
    /// Right after `{`: a member name or an immediate `}`.
    NameOrClose,
    /// Right after `,`: a member name only.
    Name,
    /// After a member: `,` or `}`.
    CommaOrClose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArrayExpect {
    ValueOrClose,
    CommaOrClose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MemberState {
    Name,
    Colon,
    Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Escape {
    None,
    Begin,
    Unicode { digits: u8, acc: u16 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberPhase {
    /// Only a leading `-` seen so far.
    Sign,
    Integer,
    /// Only the `.` seen so far.
    Dot,
    Fraction,
    /// Only the `e`/`E` seen so far.
    ExponentStart,
    ExponentSign,
    Exponent,
}

impl NumberPhase {
    fn is_terminal(self) -> bool {
        matches!(
            self,
            NumberPhase::Integer | NumberPhase::Fraction | NumberPhase::Exponent
        )
    }

    fn expectation(self) -> &'static str {
        match self {
            NumberPhase::Sign => "expected a digit after the sign",
            NumberPhase::Dot => "expected a digit after the decimal point",
            NumberPhase::ExponentStart | NumberPhase::ExponentSign => {
                "expected a digit in the exponent"
            }
            _ => "expected a digit",
        }
    }
}

enum Frame {
    /// Awaiting the first significant character of a value; becomes the
    /// selected construct's frame in place.
    Value,
    Object {
        members: Object,
        expect: ObjectExpect,
    },
    Member {
        name: String,
        state: MemberState,
    },
    Array {
        items: Vec<Value>,
        expect: ArrayExpect,
    },
    Str {
        buf: String,
        escape: Escape,
    },
    Number {
        buf: String,
        phase: NumberPhase,
    },
    Literal {
        text: &'static str,
        matched: usize,
    },
}

fn frame_name(frame: &Frame) -> &'static str {
    match frame {
        Frame::Value => "value",
        Frame::Object { .. } => "object",
        Frame::Member { .. } => "member",
        Frame::Array { .. } => "array",
        Frame::Str { .. } => "string",
        Frame::Number { .. } => "number",
        Frame::Literal { .. } => "literal",
    }
}

enum Step {
    Stay,
    Push(Frame),
    Push2(Frame, Frame),
    PushReplay(Frame),
    Complete(Value, Option<char>),
}

/// A single-use JSON parser.
///
/// A parser holds mutable per-call state and must not be shared across
/// concurrent parse calls; construct one per call ([`Parser::parse`]
/// consumes it).
pub struct Parser {
    stack: Vec<Frame>,
    result: Option<Value>,
    offset: usize,
    trace: bool,
}

impl Parser {
    #[must_use]
    pub fn new(options: ParseOptions) -> Self {
        Parser {
            stack: vec![Frame::Value],
            result: None,
            offset: 0,
            trace: options.trace,
        }
    }

    /// Drain the source and produce the root value.
    ///
    /// # Errors
    ///
    /// Fails with a [`ParseError`] on malformed input, incomplete input, or
    /// a failing source. The source is released on every exit path.
    pub fn parse<S: CharSource>(mut self, mut source: S) -> Result<Value, ParseError> {
        loop {
            let next = source
                .next_char()
                .map_err(|error| self.fail(ParseErrorKind::Read(error)))?;
            let Some(c) = next else { break };
            self.step(c)?;
            self.offset += 1;
        }
        self.finish()
    }

    fn fail(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, self.offset)
    }

    fn push(&mut self, frame: Frame) {
        if self.trace {
            tracing::trace!(
                offset = self.offset,
                frame = frame_name(&frame),
                depth = self.stack.len(),
                "push"
            );
        }
        self.stack.push(frame);
    }

    fn pop(&mut self) {
        let frame = self.stack.pop();
        if self.trace {
            if let Some(frame) = &frame {
                tracing::trace!(
                    offset = self.offset,
                    frame = frame_name(frame),
                    depth = self.stack.len(),
                    "pop"
                );
            }
        }
    }

    fn step(&mut self, c: char) -> Result<(), ParseError> {
        let offset = self.offset;
        let action = {
            let Some(frame) = self.stack.last_mut() else {
                // The root value is complete; only whitespace may follow.
                return if c.is_whitespace() {
                    Ok(())
                } else {
                    Err(ParseError::new(ParseErrorKind::TrailingCharacter(c), offset))
                };
            };
            dispatch(frame, c, offset)?
        };
        match action {
            Step::Stay => Ok(()),
            Step::Push(frame) => {
                self.push(frame);
                Ok(())
            }
            Step::Push2(parent, child) => {
                self.push(parent);
                self.push(child);
                Ok(())
            }
            Step::PushReplay(frame) => {
                self.push(frame);
                self.step(c)
            }
            Step::Complete(value, stop) => {
                self.pop();
                self.complete(value, stop)
            }
        }
    }

    /// Attach a finished value to the frame beneath and replay a forwarded
    /// stop character, if any.
    fn complete(&mut self, value: Value, stop: Option<char>) -> Result<(), ParseError> {
        let member_done = matches!(
            self.stack.last(),
            Some(Frame::Member {
                state: MemberState::Value,
                ..
            })
        );
        if member_done {
            let Some(Frame::Member { name, .. }) = self.stack.pop() else {
                unreachable!("peeked frame disappeared");
            };
            match self.stack.last_mut() {
                Some(Frame::Object { members, expect }) => {
                    members.insert(name, value);
                    *expect = ObjectExpect::CommaOrClose;
                }
                _ => unreachable!("member frames sit on object frames"),
            }
        } else {
            match self.stack.last_mut() {
                None => self.result = Some(value),
                Some(Frame::Array { items, expect }) => {
                    items.push(value);
                    *expect = ArrayExpect::CommaOrClose;
                }
                Some(Frame::Member { name, state }) => {
                    debug_assert_eq!(*state, MemberState::Name);
                    let mut value = value;
                    match &mut value {
                        Value::String(text) => *name = std::mem::take(text),
                        _ => unreachable!("member names parse through a string frame"),
                    }
                    *state = MemberState::Colon;
                }
                Some(_) => unreachable!("scalar frames have no children"),
            }
        }
        if let Some(c) = stop {
            self.step(c)?;
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Value, ParseError> {
        let offset = self.offset;
        // Numbers and literals have no terminator; close out a pending one.
        match self.stack.last_mut() {
            Some(Frame::Number { buf, phase }) => {
                if phase.is_terminal() {
                    let value = number_value(buf, offset)?;
                    self.pop();
                    self.complete(value, None)?;
                } else {
                    let expectation = phase.expectation();
                    return Err(self.fail(ParseErrorKind::MalformedNumber(expectation)));
                }
            }
            Some(Frame::Literal { .. }) => {
                return Err(self.fail(ParseErrorKind::UnexpectedEnd));
            }
            _ => {}
        }
        match self.result.take() {
            Some(value) if self.stack.is_empty() => Ok(value),
            _ => Err(ParseError::new(ParseErrorKind::UnexpectedEnd, offset)),
        }
    }
}

fn dispatch(frame: &mut Frame, c: char, offset: usize) -> Result<Step, ParseError> {
    let unexpected = |expected: &'static str| {
        ParseError::new(ParseErrorKind::UnexpectedCharacter { found: c, expected }, offset)
    };
    match frame {
        Frame::Value => {
            if c.is_whitespace() {
                return Ok(Step::Stay);
            }
            let next = match c {
                '{' => Frame::Object {
                    members: Object::new(),
                    expect: ObjectExpect::NameOrClose,
                },
                '[' => Frame::Array {
                    items: Vec::new(),
                    expect: ArrayExpect::ValueOrClose,
                },
                '"' => Frame::Str {
                    buf: String::new(),
                    escape: Escape::None,
                },
                '-' => Frame::Number {
                    buf: String::from('-'),
                    phase: NumberPhase::Sign,
                },
                '0'..='9' => Frame::Number {
                    buf: String::from(c),
                    phase: NumberPhase::Integer,
                },
                'n' => Frame::Literal {
                    text: "null",
                    matched: 1,
                },
                't' => Frame::Literal {
                    text: "true",
                    matched: 1,
                },
                'f' => Frame::Literal {
                    text: "false",
                    matched: 1,
                },
                _ => return Err(unexpected("a JSON value")),
            };
            *frame = next;
            Ok(Step::Stay)
        }
        Frame::Object { members, expect } => {
            if c.is_whitespace() {
                return Ok(Step::Stay);
            }
            match expect {
                ObjectExpect::NameOrClose | ObjectExpect::Name => match c {
                    '"' => Ok(Step::Push2(
                        Frame::Member {
                            name: String::new(),
                            state: MemberState::Name,
                        },
                        Frame::Str {
                            buf: String::new(),
                            escape: Escape::None,
                        },
                    )),
                    '}' if *expect == ObjectExpect::NameOrClose => Ok(Step::Complete(
                        Value::Object(std::mem::take(members)),
                        None,
                    )),
                    _ => Err(unexpected(if *expect == ObjectExpect::NameOrClose {
                        "a member name or '}'"
                    } else {
                        "a member name"
                    })),
                },
                ObjectExpect::CommaOrClose => match c {
                    ',' => {
                        *expect = ObjectExpect::Name;
                        Ok(Step::Stay)
                    }
                    '}' => Ok(Step::Complete(
                        Value::Object(std::mem::take(members)),
                        None,
                    )),
                    _ => Err(unexpected("',' or '}'")),
                },
            }
        }
        Frame::Member { state, .. } => {
            if c.is_whitespace() {
                return Ok(Step::Stay);
            }
            debug_assert_eq!(*state, MemberState::Colon);
            if c == ':' {
                *state = MemberState::Value;
                Ok(Step::Push(Frame::Value))
            } else {
                Err(unexpected("':'"))
            }
        }
        Frame::Array { items, expect } => {
            if c.is_whitespace() {
                return Ok(Step::Stay);
            }
            match expect {
                ArrayExpect::ValueOrClose => {
                    if c == ']' {
                        Ok(Step::Complete(Value::Array(std::mem::take(items)), None))
                    } else {
                        Ok(Step::PushReplay(Frame::Value))
                    }
                }
                ArrayExpect::CommaOrClose => match c {
                    ',' => Ok(Step::Push(Frame::Value)),
                    ']' => Ok(Step::Complete(Value::Array(std::mem::take(items)), None)),
                    _ => Err(unexpected("',' or ']'")),
                },
            }
        }
        Frame::Str { buf, escape } => match escape {
            Escape::None => match c {
                '"' => Ok(Step::Complete(Value::String(std::mem::take(buf)), None)),
                '\\' => {
                    *escape = Escape::Begin;
                    Ok(Step::Stay)
                }
                _ => {
                    buf.push(c);
                    Ok(Step::Stay)
                }
            },
            Escape::Begin => {
                let decoded = match c {
                    '"' => '"',
                    '\\' => '\\',
                    '/' => '/',
                    'b' => '\u{0008}',
                    'f' => '\u{000C}',
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    'u' => {
                        *escape = Escape::Unicode { digits: 0, acc: 0 };
                        return Ok(Step::Stay);
                    }
                    _ => return Err(ParseError::new(ParseErrorKind::InvalidEscape(c), offset)),
                };
                buf.push(decoded);
                *escape = Escape::None;
                Ok(Step::Stay)
            }
            Escape::Unicode { digits, acc } => {
                let Some(digit) = c.to_digit(16) else {
                    return Err(ParseError::new(
                        ParseErrorKind::InvalidUnicodeEscape(c),
                        offset,
                    ));
                };
                *acc = (*acc << 4) | digit as u16;
                *digits += 1;
                if *digits < 4 {
                    return Ok(Step::Stay);
                }
                let unit = *acc;
                // One UTF-16 code unit only: surrogate halves would require
                // pairing, which the escape grammar does not support.
                match char::from_u32(u32::from(unit)) {
                    Some(decoded) => {
                        buf.push(decoded);
                        *escape = Escape::None;
                        Ok(Step::Stay)
                    }
                    None => Err(ParseError::new(
                        ParseErrorKind::UnsupportedCodePoint(unit),
                        offset,
                    )),
                }
            }
        },
        Frame::Number { buf, phase } => {
            let next = match (*phase, c) {
                (NumberPhase::Sign | NumberPhase::Integer, '0'..='9') => NumberPhase::Integer,
                (NumberPhase::Integer, '.') => NumberPhase::Dot,
                (NumberPhase::Integer | NumberPhase::Fraction, 'e' | 'E') => {
                    NumberPhase::ExponentStart
                }
                (NumberPhase::Dot | NumberPhase::Fraction, '0'..='9') => NumberPhase::Fraction,
                (NumberPhase::ExponentStart, '+' | '-') => NumberPhase::ExponentSign,
                (
                    NumberPhase::ExponentStart | NumberPhase::ExponentSign | NumberPhase::Exponent,
                    '0'..='9',
                ) => NumberPhase::Exponent,
                _ => {
                    if phase.is_terminal() {
                        let value = number_value(buf, offset)?;
                        // The character belongs to the next construct.
                        return Ok(Step::Complete(value, Some(c)));
                    }
                    return Err(ParseError::new(
                        ParseErrorKind::MalformedNumber(phase.expectation()),
                        offset,
                    ));
                }
            };
            buf.push(c);
            *phase = next;
            Ok(Step::Stay)
        }
        Frame::Literal { text, matched } => {
            let expected_char = char::from(text.as_bytes()[*matched]);
            if c == expected_char {
                *matched += 1;
                if *matched == text.len() {
                    Ok(Step::Complete(literal_value(text), None))
                } else {
                    Ok(Step::Stay)
                }
            } else {
                Err(ParseError::new(
                    ParseErrorKind::InvalidLiteral {
                        expected: text,
                        found: c,
                    },
                    offset,
                ))
            }
        }
    }
}

fn literal_value(text: &str) -> Value {
    match text {
        "null" => Value::Null,
        "true" => Value::Bool(true),
        _ => Value::Bool(false),
    }
}

/// Assemble the lexed number text into an exact decimal value.
fn number_value(buf: &mut String, offset: usize) -> Result<Value, ParseError> {
    let text = std::mem::take(buf);
    BigDecimal::from_str(&text).map(Value::Number).map_err(|_| {
        ParseError::new(
            ParseErrorKind::MalformedNumber("unrepresentable numeric text"),
            offset,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseErrorKind;
    use test_case::test_case;

    #[test]
    fn empty_object() {
        let value = parse_str("{}").unwrap();
        let object = value.as_object().unwrap();
        assert!(object.is_empty());
    }

    #[test]
    fn empty_array() {
        let value = parse_str("[]").unwrap();
        assert_eq!(value.as_array().unwrap().len(), 0);
    }

    #[test]
    fn member_and_element_order() {
        let value = parse_str(r#"{"a":1,"b":[1,2,3],"c":{"d":null}}"#).unwrap();
        let object = value.as_object().unwrap();
        let names: Vec<&str> = object.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
        let items = object.get("b").unwrap().as_array().unwrap();
        assert_eq!(items, &[Value::from(1i64), Value::from(2i64), Value::from(3i64)]);
        let inner = object.get("c").unwrap().as_object().unwrap();
        assert!(inner.get("d").unwrap().is_null());
    }

    #[test]
    fn unicode_escape_decodes_one_code_unit() {
        let value = parse_str(r#""abcA""#).unwrap();
        assert_eq!(value.as_str(), Some("abcA"));
    }

    #[test_case(r#""\"\\\/\b\f\n\r\t""#, "\"\\/\u{0008}\u{000C}\n\r\t"; "all simple escapes")]
    #[test_case(r#""caf\u00e9""#, "caf\u{e9}"; "latin escape")]
    #[test_case("\"\u{1F600}\"", "\u{1F600}"; "raw non-bmp character")]
    fn string_decoding(input: &str, expected: &str) {
        assert_eq!(parse_str(input).unwrap().as_str(), Some(expected));
    }

    #[test]
    fn surrogate_escape_is_rejected() {
        let error = parse_str(r#""\ud83d\ude00""#).unwrap_err();
        assert!(matches!(
            error.kind(),
            ParseErrorKind::UnsupportedCodePoint(0xD83D)
        ));
    }

    #[test_case("0", "0"; "zero")]
    #[test_case("-0", "0"; "negative zero")]
    #[test_case("12", "12"; "integer")]
    #[test_case("-12.5e+2", "-1250"; "negative with exponent")]
    #[test_case("0.1", "0.1"; "fraction")]
    #[test_case("1e2", "100"; "lowercase exponent")]
    #[test_case("2E-2", "0.02"; "uppercase exponent")]
    #[test_case("-3.25", "-3.25"; "negative fraction")]
    fn number_grammar(input: &str, expected: &str) {
        let value = parse_str(input).unwrap();
        let expected = BigDecimal::from_str(expected).unwrap();
        assert_eq!(value.as_number(), Some(&expected));
    }

    #[test]
    fn number_stop_character_is_forwarded() {
        let value = parse_str("[1 ,2,3]").unwrap();
        assert_eq!(value.as_array().unwrap().len(), 3);
    }

    #[test]
    fn number_at_end_of_input_completes() {
        let value = parse_str(" 42 ").unwrap();
        assert_eq!(value.as_number(), Some(&BigDecimal::from(42)));
    }

    #[test_case("-"; "bare sign")]
    #[test_case("1."; "dangling decimal point")]
    #[test_case("1e"; "dangling exponent")]
    #[test_case("1e+"; "dangling exponent sign")]
    #[test_case("1.e2"; "empty fraction")]
    fn malformed_numbers(input: &str) {
        let error = parse_str(input).unwrap_err();
        assert!(matches!(error.kind(), ParseErrorKind::MalformedNumber(_)));
    }

    #[test]
    fn missing_member_value_is_rejected() {
        let error = parse_str(r#"{"a":}"#).unwrap_err();
        assert!(matches!(
            error.kind(),
            ParseErrorKind::UnexpectedCharacter { found: '}', .. }
        ));
    }

    #[test_case("[1,2"; "unterminated array")]
    #[test_case(r#"{"a":1"#; "unterminated object")]
    #[test_case(r#""abc"#; "unterminated string")]
    #[test_case(""; "empty input")]
    #[test_case("   "; "whitespace only")]
    #[test_case("tru"; "truncated literal")]
    fn incomplete_input(input: &str) {
        let error = parse_str(input).unwrap_err();
        assert!(matches!(error.kind(), ParseErrorKind::UnexpectedEnd));
    }

    #[test]
    fn trailing_characters_are_rejected() {
        let error = parse_str("[1] x").unwrap_err();
        assert!(matches!(
            error.kind(),
            ParseErrorKind::TrailingCharacter('x')
        ));
    }

    #[test_case("nul!"; "null misspelled")]
    #[test_case("trve"; "true misspelled")]
    #[test_case("falze"; "false misspelled")]
    fn diverging_literals(input: &str) {
        let error = parse_str(input).unwrap_err();
        assert!(matches!(error.kind(), ParseErrorKind::InvalidLiteral { .. }));
    }

    #[test]
    fn duplicate_member_names_are_last_wins() {
        let value = parse_str(r#"{"a":1,"b":2,"a":3}"#).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 2);
        let names: Vec<&str> = object.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(object.get("a"), Some(&Value::from(3i64)));
    }

    #[test]
    fn array_commas_require_values() {
        assert!(parse_str("[1,]").is_err());
        assert!(parse_str("{\"a\":1,}").is_err());
    }

    #[test]
    fn reader_input_parses() {
        let value = parse_reader(r#"{"city":"München"}"#.as_bytes()).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.get("city").unwrap().as_str(), Some("M\u{fc}nchen"));
    }

    #[test]
    fn reader_failures_surface_as_read_errors() {
        struct Failing;
        impl std::io::Read for Failing {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("broken pipe"))
            }
        }
        let error = parse_reader(Failing).unwrap_err();
        assert!(matches!(error.kind(), ParseErrorKind::Read(_)));
    }

    #[test]
    fn named_encodings_decode_byte_sources() {
        let text = r#"{"city":"München"}"#;
        let utf16: Vec<u8> = text.encode_utf16().flat_map(u16::to_le_bytes).collect();
        let value = parse_reader_with_encoding(&utf16[..], "utf-16le").unwrap();
        assert_eq!(value, parse_str(text).unwrap());

        let latin1: Vec<u8> = text.chars().map(|c| c as u8).collect();
        let value = parse_reader_with_encoding(&latin1[..], "ISO-8859-1").unwrap();
        assert_eq!(value, parse_str(text).unwrap());

        let value = parse_reader_with_encoding(text.as_bytes(), "utf-8").unwrap();
        assert_eq!(value, parse_str(text).unwrap());
    }

    #[test]
    fn unknown_encoding_names_are_rejected() {
        let error = parse_reader_with_encoding("1".as_bytes(), "ebcdic").unwrap_err();
        assert!(matches!(error.kind(), ParseErrorKind::UnknownEncoding(_)));
    }

    #[test]
    fn error_offsets_point_at_the_culprit() {
        let error = parse_str("[1, x]").unwrap_err();
        assert_eq!(error.offset(), 4);
    }

    #[test]
    fn leading_zeros_are_tolerated() {
        // The number grammar places no leading-zero restriction.
        let value = parse_str("01").unwrap();
        assert_eq!(value.as_number(), Some(&BigDecimal::from(1)));
    }
}

use std::fmt;

/// A failure while parsing JSON text.
///
/// Any parse failure aborts the entire parse; there is no partial result.
/// The error carries the character offset at which the parser gave up.
#[derive(Debug)]
pub struct ParseError {
    kind: ParseErrorKind,
    offset: usize,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, offset: usize) -> Self {
        ParseError { kind, offset }
    }

    #[must_use]
    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }

    /// Zero-based character offset of the offending input position.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }
}

#[derive(Debug)]
pub enum ParseErrorKind {
    /// A character that no grammar rule at this position accepts.
    UnexpectedCharacter {
        found: char,
        expected: &'static str,
    },
    /// The source ended with unterminated structures on the stack.
    UnexpectedEnd,
    /// A `true`/`false`/`null` literal diverged from its spelling.
    InvalidLiteral {
        expected: &'static str,
        found: char,
    },
    /// Unsupported character after a backslash in a string.
    InvalidEscape(char),
    /// Non-hex-digit inside a `\uXXXX` escape.
    InvalidUnicodeEscape(char),
    /// A `\uXXXX` escape in the surrogate range; code points outside the
    /// Basic Multilingual Plane cannot be escaped.
    UnsupportedCodePoint(u16),
    /// Number text that violates the number grammar.
    MalformedNumber(&'static str),
    /// Non-whitespace input after the root value completed.
    TrailingCharacter(char),
    /// The encoding name given for a byte source is not supported.
    UnknownEncoding(String),
    /// The underlying character source failed.
    Read(std::io::Error),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parse error at offset {}: ", self.offset)?;
        match &self.kind {
            ParseErrorKind::UnexpectedCharacter { found, expected } => {
                write!(f, "unexpected character {found:?}, expected {expected}")
            }
            ParseErrorKind::UnexpectedEnd => {
                f.write_str("unexpected end of input: unterminated structure")
            }
            ParseErrorKind::InvalidLiteral { expected, found } => {
                write!(f, "invalid literal: expected {expected:?}, found {found:?}")
            }
            ParseErrorKind::InvalidEscape(c) => write!(f, "unsupported escape sequence \\{c}"),
            ParseErrorKind::InvalidUnicodeEscape(c) => {
                write!(f, "invalid hex digit {c:?} in unicode escape")
            }
            ParseErrorKind::UnsupportedCodePoint(unit) => write!(
                f,
                "escaped code unit {unit:#06x} is outside the Basic Multilingual Plane"
            ),
            ParseErrorKind::MalformedNumber(detail) => write!(f, "malformed number: {detail}"),
            ParseErrorKind::TrailingCharacter(c) => {
                write!(f, "trailing character {c:?} after the root value")
            }
            ParseErrorKind::UnknownEncoding(name) => {
                write!(f, "unsupported source encoding {name:?}")
            }
            ParseErrorKind::Read(error) => write!(f, "failed to read source: {error}"),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ParseErrorKind::Read(error) => Some(error),
            _ => None,
        }
    }
}

/// A top-level conversion failure.
///
/// These abort the conversion call that raised them. Per-property failures
/// inside the compiled (de)serializer are logged and skipped instead, so
/// they never surface here.
#[derive(Debug)]
pub struct ConversionError {
    kind: ConversionErrorKind,
}

#[derive(Debug)]
pub enum ConversionErrorKind {
    /// No serializer in the chain claimed the host value.
    NoSerializer { type_name: &'static str },
    /// No deserializer in the chain claimed the (target, value) pair.
    NoDeserializer { target: &'static str },
    /// No instantiator can produce a blank target of this type.
    CannotInstantiate { target: &'static str },
    /// No key converter claims the map key type.
    NoMemberNameForKey { type_name: &'static str },
    /// No key converter can rebuild a map key of the target type.
    InvalidKey { target: &'static str, name: String },
    /// A host value had a different type than a binding expected.
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    /// A null result cannot populate a slot that cannot hold null.
    NullNotAllowed { target: &'static str },
    /// A JSON number does not fit the numeric target type.
    NumberOutOfRange { target: &'static str },
    /// A date value that is neither RFC 3339 text nor epoch milliseconds.
    InvalidDate(String),
    /// Failure raised by a user-provided capability.
    Message(String),
}

impl ConversionError {
    #[must_use]
    pub fn kind(&self) -> &ConversionErrorKind {
        &self.kind
    }

    pub(crate) fn no_serializer(type_name: &'static str) -> Self {
        ConversionErrorKind::NoSerializer { type_name }.into()
    }

    pub(crate) fn no_deserializer(target: &'static str) -> Self {
        ConversionErrorKind::NoDeserializer { target }.into()
    }

    pub(crate) fn cannot_instantiate(target: &'static str) -> Self {
        ConversionErrorKind::CannotInstantiate { target }.into()
    }

    pub(crate) fn no_member_name_for_key(type_name: &'static str) -> Self {
        ConversionErrorKind::NoMemberNameForKey { type_name }.into()
    }

    pub(crate) fn invalid_key(target: &'static str, name: &str) -> Self {
        ConversionErrorKind::InvalidKey {
            target,
            name: name.to_owned(),
        }
        .into()
    }

    pub(crate) fn type_mismatch(expected: &'static str, found: &'static str) -> Self {
        ConversionErrorKind::TypeMismatch { expected, found }.into()
    }

    pub(crate) fn null_not_allowed(target: &'static str) -> Self {
        ConversionErrorKind::NullNotAllowed { target }.into()
    }

    pub(crate) fn number_out_of_range(target: &'static str) -> Self {
        ConversionErrorKind::NumberOutOfRange { target }.into()
    }

    pub(crate) fn invalid_date(detail: impl Into<String>) -> Self {
        ConversionErrorKind::InvalidDate(detail.into()).into()
    }

    /// Build an error from a custom capability's failure message.
    #[must_use]
    pub fn message(detail: impl Into<String>) -> Self {
        ConversionErrorKind::Message(detail.into()).into()
    }
}

impl From<ConversionErrorKind> for ConversionError {
    fn from(kind: ConversionErrorKind) -> Self {
        ConversionError { kind }
    }
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ConversionErrorKind::NoSerializer { type_name } => {
                write!(f, "no serializer claims host type `{type_name}`")
            }
            ConversionErrorKind::NoDeserializer { target } => {
                write!(f, "no deserializer claims target type `{target}`")
            }
            ConversionErrorKind::CannotInstantiate { target } => {
                write!(f, "cannot instantiate target type `{target}`")
            }
            ConversionErrorKind::NoMemberNameForKey { type_name } => {
                write!(f, "no key converter claims map key type `{type_name}`")
            }
            ConversionErrorKind::InvalidKey { target, name } => {
                write!(f, "member name {name:?} is not a valid `{target}` map key")
            }
            ConversionErrorKind::TypeMismatch { expected, found } => {
                write!(f, "expected host value of type `{expected}`, found `{found}`")
            }
            ConversionErrorKind::NullNotAllowed { target } => {
                write!(f, "null cannot populate the non-null target `{target}`")
            }
            ConversionErrorKind::NumberOutOfRange { target } => {
                write!(f, "number does not fit the target type `{target}`")
            }
            ConversionErrorKind::InvalidDate(detail) => write!(f, "invalid date: {detail}"),
            ConversionErrorKind::Message(detail) => f.write_str(detail),
        }
    }
}

impl std::error::Error for ConversionError {}

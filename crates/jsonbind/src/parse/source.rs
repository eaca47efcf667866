//! Character sources feeding the parser.
//!
//! Sources are read strictly sequentially with blocking reads and are
//! released on every exit path by ordinary drop semantics.

use std::io;

/// A sequential supply of characters.
pub trait CharSource {
    /// Produce the next character, or `None` at exhaustion.
    ///
    /// # Errors
    ///
    /// Fails when the underlying byte source fails or yields invalid UTF-8.
    fn next_char(&mut self) -> Result<Option<char>, io::Error>;
}

/// A source over an in-memory string.
pub struct StrSource<'a> {
    chars: std::str::Chars<'a>,
}

impl<'a> StrSource<'a> {
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        StrSource {
            chars: input.chars(),
        }
    }
}

impl CharSource for StrSource<'_> {
    fn next_char(&mut self) -> Result<Option<char>, io::Error> {
        Ok(self.chars.next())
    }
}

/// A text encoding a byte source can be declared to carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Utf16Le,
    Utf16Be,
    Latin1,
}

impl TextEncoding {
    /// Resolve a case-insensitive encoding label.
    #[must_use]
    pub fn for_name(name: &str) -> Option<Self> {
        let normalized = name.to_ascii_lowercase();
        match normalized.as_str() {
            "utf-8" | "utf8" => Some(TextEncoding::Utf8),
            "utf-16le" | "utf16le" => Some(TextEncoding::Utf16Le),
            "utf-16be" | "utf16be" => Some(TextEncoding::Utf16Be),
            "latin-1" | "latin1" | "iso-8859-1" => Some(TextEncoding::Latin1),
            _ => None,
        }
    }
}

fn read_byte<R: io::Read>(reader: &mut R) -> Result<Option<u8>, io::Error> {
    let mut buf = [0u8; 1];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buf[0])),
            Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
            Err(error) => return Err(error),
        }
    }
}

/// An incremental UTF-8 decoder over a blocking byte reader.
pub struct Utf8Source<R> {
    reader: R,
}

impl<R: io::Read> Utf8Source<R> {
    pub fn new(reader: R) -> Self {
        Utf8Source { reader }
    }

    fn read_byte(&mut self) -> Result<Option<u8>, io::Error> {
        read_byte(&mut self.reader)
    }
}

fn invalid_text(encoding: &str, detail: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("invalid {encoding}: {detail}"),
    )
}

fn invalid_utf8(detail: &str) -> io::Error {
    invalid_text("UTF-8", detail)
}

impl<R: io::Read> CharSource for Utf8Source<R> {
    fn next_char(&mut self) -> Result<Option<char>, io::Error> {
        let Some(lead) = self.read_byte()? else {
            return Ok(None);
        };
        let (trailing, init, minimum) = match lead {
            0x00..=0x7F => return Ok(Some(char::from(lead))),
            0xC2..=0xDF => (1, u32::from(lead & 0x1F), 0x80),
            0xE0..=0xEF => (2, u32::from(lead & 0x0F), 0x800),
            0xF0..=0xF4 => (3, u32::from(lead & 0x07), 0x1_0000),
            _ => return Err(invalid_utf8("invalid leading byte")),
        };
        let mut code_point = init;
        for _ in 0..trailing {
            let byte = self
                .read_byte()?
                .ok_or_else(|| invalid_utf8("truncated sequence"))?;
            if byte & 0xC0 != 0x80 {
                return Err(invalid_utf8("invalid continuation byte"));
            }
            code_point = (code_point << 6) | u32::from(byte & 0x3F);
        }
        if code_point < minimum {
            return Err(invalid_utf8("overlong sequence"));
        }
        char::from_u32(code_point).map(Some).ok_or_else(|| invalid_utf8("invalid code point"))
    }
}

/// An incremental UTF-16 decoder over a blocking byte reader.
pub struct Utf16Source<R> {
    reader: R,
    big_endian: bool,
}

impl<R: io::Read> Utf16Source<R> {
    pub fn little_endian(reader: R) -> Self {
        Utf16Source {
            reader,
            big_endian: false,
        }
    }

    pub fn big_endian(reader: R) -> Self {
        Utf16Source {
            reader,
            big_endian: true,
        }
    }

    fn read_unit(&mut self) -> Result<Option<u16>, io::Error> {
        let Some(first) = read_byte(&mut self.reader)? else {
            return Ok(None);
        };
        let second = read_byte(&mut self.reader)?
            .ok_or_else(|| invalid_text("UTF-16", "truncated code unit"))?;
        let unit = if self.big_endian {
            u16::from_be_bytes([first, second])
        } else {
            u16::from_le_bytes([first, second])
        };
        Ok(Some(unit))
    }
}

impl<R: io::Read> CharSource for Utf16Source<R> {
    fn next_char(&mut self) -> Result<Option<char>, io::Error> {
        let Some(unit) = self.read_unit()? else {
            return Ok(None);
        };
        match unit {
            0xD800..=0xDBFF => {
                let low = self
                    .read_unit()?
                    .ok_or_else(|| invalid_text("UTF-16", "truncated surrogate pair"))?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return Err(invalid_text("UTF-16", "unpaired high surrogate"));
                }
                let code_point = 0x1_0000
                    + ((u32::from(unit) - 0xD800) << 10)
                    + (u32::from(low) - 0xDC00);
                char::from_u32(code_point)
                    .map(Some)
                    .ok_or_else(|| invalid_text("UTF-16", "invalid code point"))
            }
            0xDC00..=0xDFFF => Err(invalid_text("UTF-16", "unpaired low surrogate")),
            _ => char::from_u32(u32::from(unit))
                .map(Some)
                .ok_or_else(|| invalid_text("UTF-16", "invalid code point")),
        }
    }
}

/// Latin-1 maps every byte directly to its code point.
pub struct Latin1Source<R> {
    reader: R,
}

impl<R: io::Read> Latin1Source<R> {
    pub fn new(reader: R) -> Self {
        Latin1Source { reader }
    }
}

impl<R: io::Read> CharSource for Latin1Source<R> {
    fn next_char(&mut self) -> Result<Option<char>, io::Error> {
        Ok(read_byte(&mut self.reader)?.map(char::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn drain<S: CharSource>(mut source: S) -> Result<String, io::Error> {
        let mut out = String::new();
        while let Some(c) = source.next_char()? {
            out.push(c);
        }
        Ok(out)
    }

    #[test]
    fn str_source_yields_all_characters() {
        assert_eq!(drain(StrSource::new("a\u{1F600}b")).unwrap(), "a\u{1F600}b");
    }

    #[test]
    fn utf8_source_decodes_multibyte_sequences() {
        let bytes = "caf\u{e9} \u{4e16}\u{754c} \u{1F600}".as_bytes();
        assert_eq!(
            drain(Utf8Source::new(bytes)).unwrap(),
            "caf\u{e9} \u{4e16}\u{754c} \u{1F600}"
        );
    }

    #[test]
    fn utf8_source_rejects_truncated_input() {
        let bytes: &[u8] = &[0xE4, 0xB8];
        assert!(drain(Utf8Source::new(bytes)).is_err());
    }

    #[test]
    fn utf8_source_rejects_overlong_encodings() {
        let bytes: &[u8] = &[0xE0, 0x80, 0xAF];
        assert!(drain(Utf8Source::new(bytes)).is_err());
    }

    fn utf16le(text: &str) -> Vec<u8> {
        text.encode_utf16().flat_map(u16::to_le_bytes).collect()
    }

    #[test]
    fn utf16_sources_decode_both_byte_orders() {
        let text = "a\u{e9}\u{1F600}";
        let le = utf16le(text);
        let be: Vec<u8> = text.encode_utf16().flat_map(u16::to_be_bytes).collect();
        assert_eq!(drain(Utf16Source::little_endian(&le[..])).unwrap(), text);
        assert_eq!(drain(Utf16Source::big_endian(&be[..])).unwrap(), text);
    }

    #[test]
    fn utf16_source_rejects_lone_surrogates() {
        let lone_high: &[u8] = &[0x3D, 0xD8, 0x61, 0x00];
        assert!(drain(Utf16Source::little_endian(lone_high)).is_err());
        let lone_low: &[u8] = &[0x00, 0xDC];
        assert!(drain(Utf16Source::little_endian(lone_low)).is_err());
    }

    #[test]
    fn utf16_source_rejects_truncated_units() {
        let odd: &[u8] = &[0x61];
        assert!(drain(Utf16Source::little_endian(odd)).is_err());
    }

    #[test]
    fn latin1_source_maps_high_bytes_to_code_points() {
        let bytes: &[u8] = &[0x63, 0x61, 0x66, 0xE9];
        assert_eq!(drain(Latin1Source::new(bytes)).unwrap(), "caf\u{e9}");
    }

    #[test_case("utf-8", Some(TextEncoding::Utf8))]
    #[test_case("UTF8", Some(TextEncoding::Utf8))]
    #[test_case("utf-16le", Some(TextEncoding::Utf16Le))]
    #[test_case("UTF-16BE", Some(TextEncoding::Utf16Be))]
    #[test_case("iso-8859-1", Some(TextEncoding::Latin1))]
    #[test_case("latin1", Some(TextEncoding::Latin1))]
    #[test_case("ebcdic", None)]
    fn encoding_labels_resolve(name: &str, expected: Option<TextEncoding>) {
        assert_eq!(TextEncoding::for_name(name), expected);
    }
}

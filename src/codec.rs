use encoding_rs::{DecoderResult, Encoding, UTF_16BE, UTF_16LE, mem};

use crate::error::{Error, Result};

/// Spellings accepted on the command line that are not WHATWG labels.
const ALIASES: &[(&str, &str)] = &[
    ("cp932", "windows-31j"),
    ("utf-16-le", "utf-16le"),
    ("utf-16-be", "utf-16be"),
];

/// Names (separators removed) that mean 7-bit ASCII rather than the
/// WHATWG reading of windows-1252.
const ASCII_NAMES: &[&str] = &["ascii", "usascii", "646", "ansix3.41968", "csascii"];

/// Names (separators removed) that mean ISO-8859-1 proper, with
/// 0x80–0x9F decoding to C1 controls.
const LATIN1_NAMES: &[&str] = &[
    "latin", "latin1", "l1", "iso88591", "8859", "cp819", "ibm819", "isoir100", "csisolatin1",
];

/// A character set the input can be decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    /// 7-bit ASCII; any byte ≥ 0x80 is malformed.
    Ascii,
    /// ISO-8859-1, every byte maps to the code point of the same value.
    Latin1,
    /// UTF-16 with the byte order taken from the BOM, little endian without one.
    Utf16,
    Whatwg(&'static Encoding),
}

impl Charset {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ascii => "ascii",
            Self::Latin1 => "iso-8859-1",
            Self::Utf16 => "UTF-16",
            Self::Whatwg(encoding) => encoding.name(),
        }
    }
}

impl From<&'static Encoding> for Charset {
    fn from(encoding: &'static Encoding) -> Self {
        Self::Whatwg(encoding)
    }
}

/// Looks up a character set by name.
///
/// ASCII, Latin-1 and endianness-neutral UTF-16 names are matched first so
/// they keep their strict meaning. Everything else goes through WHATWG
/// labels: as given, then lowercase with `_` read as `-`, then the known
/// aliases, and finally with all separators removed.
pub fn charset_for_label(label: &str) -> Result<Charset> {
    let trimmed = label.trim();
    let normalized = trimmed.to_ascii_lowercase().replace('_', "-");
    let squashed = normalized.replace('-', "");

    if ASCII_NAMES.contains(&squashed.as_str()) {
        return Ok(Charset::Ascii);
    }
    if LATIN1_NAMES.contains(&squashed.as_str()) {
        return Ok(Charset::Latin1);
    }
    if squashed == "utf16" {
        return Ok(Charset::Utf16);
    }

    let unknown = || Error::UnknownEncoding(label.to_string());
    if let Some(encoding) = Encoding::for_label(trimmed.as_bytes()) {
        return Ok(encoding.into());
    }
    if let Some(encoding) = Encoding::for_label(normalized.as_bytes()) {
        return Ok(encoding.into());
    }
    if let Some((_, target)) = ALIASES.iter().find(|(alias, _)| *alias == normalized) {
        return Encoding::for_label(target.as_bytes())
            .map(Charset::from)
            .ok_or_else(unknown);
    }
    Encoding::for_label(squashed.as_bytes())
        .map(Charset::from)
        .ok_or_else(unknown)
}

/// Strictly decodes `input`, failing on the first malformed sequence.
///
/// A UTF-16 byte order mark is dropped (and picks the byte order for
/// [`Charset::Utf16`]); any other BOM is decoded as ordinary text.
pub fn decode(input: &[u8], charset: Charset) -> Result<String> {
    match charset {
        Charset::Ascii => {
            let valid = Encoding::ascii_valid_up_to(input);
            if valid < input.len() {
                return Err(Error::Decode {
                    encoding: charset.name(),
                    offset: valid,
                    bytes: hex_bytes(&input[valid..=valid]),
                });
            }
            Ok(mem::decode_latin1(input).into_owned())
        }
        Charset::Latin1 => Ok(mem::decode_latin1(input).into_owned()),
        Charset::Utf16 => {
            let encoding = match Encoding::for_bom(input) {
                Some((encoding, _)) if encoding == UTF_16BE => UTF_16BE,
                _ => UTF_16LE,
            };
            decode_strict(input, encoding)
        }
        Charset::Whatwg(encoding) => decode_strict(input, encoding),
    }
}

/// Serializes decoded text as UTF-8.
pub fn reencode(text: String) -> Vec<u8> {
    text.into_bytes()
}

fn decode_strict(input: &[u8], encoding: &'static Encoding) -> Result<String> {
    let body = strip_utf16_bom(input, encoding);
    let skipped = input.len() - body.len();

    let mut decoder = encoding.new_decoder_without_bom_handling();
    let capacity = decoder
        .max_utf8_buffer_length_without_replacement(body.len())
        .ok_or(Error::InputTooLarge(input.len()))?;
    let mut text = String::with_capacity(capacity);

    let (result, read) = decoder.decode_to_string_without_replacement(body, &mut text, true);
    match result {
        DecoderResult::InputEmpty => Ok(text),
        DecoderResult::Malformed(bad, after) => {
            let end = read.saturating_sub(after as usize);
            let start = end.saturating_sub(bad as usize);
            Err(Error::Decode {
                encoding: encoding.name(),
                offset: skipped + start,
                bytes: hex_bytes(&body[start..end]),
            })
        }
        DecoderResult::OutputFull => Err(Error::InputTooLarge(input.len())),
    }
}

fn strip_utf16_bom<'a>(input: &'a [u8], encoding: &'static Encoding) -> &'a [u8] {
    match Encoding::for_bom(input) {
        Some((bom_encoding, len))
            if bom_encoding == encoding && (encoding == UTF_16LE || encoding == UTF_16BE) =>
        {
            &input[len..]
        }
        _ => input,
    }
}

fn hex_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("0x{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::{SHIFT_JIS, UTF_8, WINDOWS_1251, WINDOWS_1252};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case::whatwg_label("utf-8", Charset::Whatwg(UTF_8))]
    #[case::upper_case("UTF-8", Charset::Whatwg(UTF_8))]
    #[case::underscore("utf_8", Charset::Whatwg(UTF_8))]
    #[case::ascii("ascii", Charset::Ascii)]
    #[case::us_ascii("US-ASCII", Charset::Ascii)]
    #[case::python_latin1("latin-1", Charset::Latin1)]
    #[case::python_latin1_underscore("latin_1", Charset::Latin1)]
    #[case::latin1("latin1", Charset::Latin1)]
    #[case::iso8859("iso-8859-1", Charset::Latin1)]
    #[case::iso8859_underscore("ISO_8859-1", Charset::Latin1)]
    #[case::cp819("cp819", Charset::Latin1)]
    #[case::windows_1252("windows-1252", Charset::Whatwg(WINDOWS_1252))]
    #[case::cp1252("cp1252", Charset::Whatwg(WINDOWS_1252))]
    #[case::shift_jis("shift_jis", Charset::Whatwg(SHIFT_JIS))]
    #[case::cp932("cp932", Charset::Whatwg(SHIFT_JIS))]
    #[case::cp1251("cp1251", Charset::Whatwg(WINDOWS_1251))]
    #[case::utf16("utf-16", Charset::Utf16)]
    #[case::utf16_underscore("UTF_16", Charset::Utf16)]
    #[case::utf16_le("utf-16-le", Charset::Whatwg(UTF_16LE))]
    #[case::padded(" utf-16be ", Charset::Whatwg(UTF_16BE))]
    fn test_charset_for_label(#[case] label: &str, #[case] expected: Charset) {
        assert_eq!(charset_for_label(label).unwrap(), expected);
    }

    #[rstest]
    #[case::nonsense("klingon")]
    #[case::empty("")]
    fn test_unknown_label(#[case] label: &str) {
        let err = charset_for_label(label).unwrap_err();
        assert!(matches!(err, Error::UnknownEncoding(ref name) if name == label));
    }

    #[rstest]
    #[case::ascii(b"hello".as_slice(), Charset::Ascii, "hello")]
    #[case::utf8(b"hello".as_slice(), Charset::Whatwg(UTF_8), "hello")]
    #[case::latin1(b"caf\xe9".as_slice(), Charset::Latin1, "caf\u{e9}")]
    #[case::latin1_c1_controls(b"\x80\x9f\xa0".as_slice(), Charset::Latin1, "\u{80}\u{9f}\u{a0}")]
    #[case::windows_1252(b"\x80\x9f".as_slice(), Charset::Whatwg(WINDOWS_1252), "€Ÿ")]
    #[case::cyrillic(b"\xcf\xf0\xe8\xe2\xe5\xf2".as_slice(), Charset::Whatwg(WINDOWS_1251), "Привет")]
    #[case::shift_jis(b"\x93\xfa\x96\x7b\x8c\xea".as_slice(), Charset::Whatwg(SHIFT_JIS), "日本語")]
    #[case::utf16_le_bom(b"\xff\xfeH\x00i\x00".as_slice(), Charset::Utf16, "Hi")]
    #[case::utf16_be_bom(b"\xfe\xff\x00H\x00i".as_slice(), Charset::Utf16, "Hi")]
    #[case::utf16_no_bom(b"H\x00i\x00".as_slice(), Charset::Utf16, "Hi")]
    #[case::utf16le_with_bom(b"\xff\xfeH\x00i\x00".as_slice(), Charset::Whatwg(UTF_16LE), "Hi")]
    #[case::utf16be_without_bom(b"\x00H\x00i".as_slice(), Charset::Whatwg(UTF_16BE), "Hi")]
    #[case::utf8_bom_kept(b"\xef\xbb\xbfabc".as_slice(), Charset::Whatwg(UTF_8), "\u{feff}abc")]
    #[case::empty(b"".as_slice(), Charset::Whatwg(UTF_8), "")]
    fn test_decode(#[case] input: &[u8], #[case] charset: Charset, #[case] expected: &str) {
        assert_eq!(decode(input, charset).unwrap(), expected);
    }

    #[rstest]
    #[case::lone_continuation(b"ab\x80cd".as_slice(), Charset::Whatwg(UTF_8), "UTF-8", 2, "0x80")]
    #[case::ascii_high_byte(b"caf\xe9".as_slice(), Charset::Ascii, "ascii", 3, "0xe9")]
    fn test_decode_malformed(
        #[case] input: &[u8],
        #[case] charset: Charset,
        #[case] name: &str,
        #[case] expected_offset: usize,
        #[case] expected_bytes: &str,
    ) {
        match decode(input, charset).unwrap_err() {
            Error::Decode {
                encoding,
                offset,
                bytes,
            } => {
                assert_eq!(encoding, name);
                assert_eq!(offset, expected_offset);
                assert_eq!(bytes, expected_bytes);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[rstest]
    #[case::truncated_utf8(b"abc\xe3\x81".as_slice(), Charset::Whatwg(UTF_8), 3)]
    #[case::odd_utf16_length(b"\xff\xfeH\x00i".as_slice(), Charset::Whatwg(UTF_16LE), 4)]
    fn test_decode_truncated(
        #[case] input: &[u8],
        #[case] charset: Charset,
        #[case] offset: usize,
    ) {
        let err = decode(input, charset).unwrap_err();
        assert!(
            matches!(err, Error::Decode { offset: actual, .. } if actual == offset),
            "unexpected error: {err}"
        );
    }

    #[rstest]
    fn test_reencode_latin1_c1_controls() {
        let text = decode(b"\x80\x9f", charset_for_label("latin-1").unwrap()).unwrap();
        assert_eq!(reencode(text), vec![0xc2, 0x80, 0xc2, 0x9f]);
    }

    #[rstest]
    #[case::single(&[0x80], "0x80")]
    #[case::several(&[0xe3, 0x81, 0x0a], "0xe3 0x81 0x0a")]
    fn test_hex_bytes(#[case] bytes: &[u8], #[case] expected: &str) {
        assert_eq!(hex_bytes(bytes), expected);
    }
}

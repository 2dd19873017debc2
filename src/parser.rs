//! Recursive-descent parser for PDF values.
//!
//! [`PdfParser::read_value`] turns the token stream into [`Object`]s. The
//! grammar is tolerant where real-world files are sloppy:
//!
//! - dictionary values that fail to parse become `Null`; a non-name key
//!   abandons the rest of the dictionary body
//! - array elements that fail to parse are skipped
//! - a missing `endobj` after an indirect object is forgiven
//! - a stream whose `/Length` is absent, zero, indirect, or simply wrong
//!   falls back to scanning for the `endstream` keyword
//!
//! Token-level mismatches surface as [`Error::UnexpectedToken`] so callers
//! can tell them apart from structural failures.

use crate::error::{Error, Result};
use crate::object::{IndirectObject, Object, ObjectRef, Stream};
use crate::reader::Reader;
use crate::tokenizer::{Token, Tokenizer};
use bytes::Bytes;
use indexmap::IndexMap;
use std::io::{Read, Seek};

/// What [`PdfParser::read_value`] is required to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    Null,
    Boolean,
    Numeric,
    String,
    Name,
    Array,
    Dictionary,
    Stream,
    Reference,
    IndirectObject,
    Keyword,
}

impl Expect {
    fn matches(self, obj: &Object) -> bool {
        match (self, obj) {
            (Expect::Null, Object::Null) => true,
            (Expect::Boolean, Object::Boolean(_)) => true,
            (Expect::Numeric, Object::Integer(_) | Object::Real(_)) => true,
            (Expect::String, Object::String { .. }) => true,
            (Expect::Name, Object::Name(_)) => true,
            (Expect::Array, Object::Array(_)) => true,
            (Expect::Dictionary, Object::Dictionary(_)) => true,
            (Expect::Stream, Object::Stream(_)) => true,
            (Expect::Reference, Object::Reference(_)) => true,
            (Expect::IndirectObject, Object::Indirect(_)) => true,
            (Expect::Keyword, Object::Keyword(_)) => true,
            _ => false,
        }
    }
}

/// Parser over a [`Tokenizer`].
#[derive(Debug)]
pub struct PdfParser<R> {
    tokenizer: Tokenizer<R>,
}

impl<R: Read + Seek> PdfParser<R> {
    /// Build a parser over a byte source.
    pub fn new(reader: Reader<R>) -> Self {
        Self {
            tokenizer: Tokenizer::new(reader),
        }
    }

    /// The underlying reader.
    pub fn reader(&self) -> &Reader<R> {
        self.tokenizer.reader()
    }

    /// Mutable access to the underlying reader. Prefer [`reset`] for
    /// repositioning, which also drops pushed-back tokens.
    ///
    /// [`reset`]: PdfParser::reset
    pub fn reader_mut(&mut self) -> &mut Reader<R> {
        self.tokenizer.reader_mut()
    }

    /// The underlying tokenizer.
    pub fn tokenizer_mut(&mut self) -> &mut Tokenizer<R> {
        &mut self.tokenizer
    }

    /// Reposition the parser, discarding any pushed-back tokens.
    pub fn reset(&mut self, pos: i64, length: Option<usize>) -> Result<()> {
        self.tokenizer.clear_stack();
        self.tokenizer.reader_mut().reset(pos, length)
    }

    fn token_error(&self, found: impl Into<String>) -> Error {
        Error::UnexpectedToken {
            offset: self.tokenizer.reader().cursor_pos(),
            found: found.into(),
        }
    }

    /// Read the next value.
    ///
    /// With `expect`, a value of any other type fails with
    /// [`Error::UnexpectedToken`]. End-of-file fails with
    /// [`Error::UnexpectedEof`].
    pub fn read_value(&mut self, expect: Option<Expect>) -> Result<Object> {
        let token = match self.tokenizer.read_token()? {
            Some(t) => t,
            None => return Err(Error::UnexpectedEof),
        };

        let value = match token {
            Token::LParen => self.read_literal_string()?,
            Token::Lt => self.read_hex_string()?,
            Token::DictOpen => self.read_dictionary()?,
            Token::ArrayOpen => self.read_array()?,
            Token::Solidus => self.read_name()?,
            Token::Percent => {
                // comment: drop the rest of the line and try again
                self.tokenizer.reader_mut().read_line(1024)?;
                return self.read_value(expect);
            },
            Token::Word(word) => self.read_word(word)?,
            other => return Err(self.token_error(other.to_string())),
        };

        match expect {
            Some(e) if !e.matches(&value) => Err(self.token_error(format!("{:?}", value))),
            _ => Ok(value),
        }
    }

    /// The version digits following the `%PDF-` header at `header_pos`.
    pub fn pdf_version(&mut self, header_pos: u64) -> Result<String> {
        let reader = self.tokenizer.reader_mut();
        reader.ensure(header_pos, 5)?;
        let rel = reader.offset();
        if &reader.buffer()[rel..rel + 5] != b"%PDF-" {
            return Err(Error::InvalidHeader);
        }

        let mut version = Vec::new();
        let mut at = rel + 5;
        while let Some(b) = reader.byte_at(at)? {
            if b.is_ascii_digit() || b == b'.' {
                version.push(b);
                at += 1;
            } else {
                break;
            }
        }
        if version.is_empty() {
            return Err(Error::InvalidHeader);
        }
        Ok(String::from_utf8_lossy(&version).into_owned())
    }

    // `(` was consumed; scan the balanced body, then decode escapes.
    fn read_literal_string(&mut self) -> Result<Object> {
        let reader = self.tokenizer.reader_mut();
        let mut raw = Vec::new();
        let mut depth = 1usize;
        let mut rel = reader.offset();

        loop {
            let byte = match reader.byte_at(rel)? {
                Some(b) => b,
                None => return Err(Error::UnexpectedEof),
            };
            rel += 1;
            match byte {
                b'\\' => {
                    raw.push(byte);
                    if let Some(next) = reader.byte_at(rel)? {
                        raw.push(next);
                        rel += 1;
                    }
                },
                b'(' => {
                    depth += 1;
                    raw.push(byte);
                },
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                    raw.push(byte);
                },
                _ => raw.push(byte),
            }
        }
        reader.set_offset(rel);

        Ok(Object::String {
            data: decode_literal_escapes(&raw),
            hex: false,
        })
    }

    // `<` was consumed; collect hex digits up to `>`.
    fn read_hex_string(&mut self) -> Result<Object> {
        let reader = self.tokenizer.reader_mut();
        let mut data = Vec::new();
        let mut high: Option<u8> = None;
        let mut rel = reader.offset();

        loop {
            let byte = match reader.byte_at(rel)? {
                Some(b) => b,
                None => return Err(Error::UnexpectedEof),
            };
            rel += 1;
            let digit = match byte {
                b'>' => break,
                b'0'..=b'9' => byte - b'0',
                b'a'..=b'f' => byte - b'a' + 10,
                b'A'..=b'F' => byte - b'A' + 10,
                // non-hex bytes (including whitespace) are skipped
                _ => continue,
            };
            match high.take() {
                Some(h) => data.push((h << 4) | digit),
                None => high = Some(digit),
            }
        }
        if let Some(h) = high {
            data.push(h << 4);
        }
        reader.set_offset(rel);

        Ok(Object::String { data, hex: true })
    }

    fn read_dictionary(&mut self) -> Result<Object> {
        let mut dict = IndexMap::new();
        loop {
            let token = match self.tokenizer.read_token()? {
                Some(t) => t,
                None => break,
            };
            let key = match token {
                Token::DictClose => break,
                Token::Solidus => match self.read_name()? {
                    Object::Name(n) => n,
                    _ => unreachable!(),
                },
                // a key that is not a name poisons the rest of the body
                _ => {
                    self.skip_to_dict_close()?;
                    break;
                },
            };
            // `>>` in value position: the entry gets Null and the dict closes
            match self.tokenizer.read_token()? {
                Some(Token::DictClose) => {
                    dict.insert(key, Object::Null);
                    break;
                },
                Some(token) => self.tokenizer.push_token(token),
                None => {
                    dict.insert(key, Object::Null);
                    break;
                },
            }
            let value = match self.read_value(None) {
                Ok(v) => v,
                Err(e) if e.is_token_error() => Object::Null,
                Err(e) => return Err(e),
            };
            dict.insert(key, value);
        }
        Ok(Object::Dictionary(dict))
    }

    fn skip_to_dict_close(&mut self) -> Result<()> {
        while let Some(token) = self.tokenizer.read_token()? {
            if token == Token::DictClose {
                break;
            }
        }
        Ok(())
    }

    fn read_array(&mut self) -> Result<Object> {
        let mut items = Vec::new();
        loop {
            match self.tokenizer.read_token()? {
                None => break,
                Some(Token::ArrayClose) => break,
                Some(token) => {
                    self.tokenizer.push_token(token);
                    match self.read_value(None) {
                        Ok(v) => items.push(v),
                        // unparseable element: drop it and carry on
                        Err(e) if e.is_token_error() => continue,
                        Err(e) => return Err(e),
                    }
                },
            }
        }
        Ok(Object::Array(items))
    }

    // `/` was consumed.
    fn read_name(&mut self) -> Result<Object> {
        if !self.tokenizer.is_current_byte_regular_character()? {
            return Ok(Object::Name(String::new()));
        }
        match self.tokenizer.read_token()? {
            Some(Token::Word(word)) => Ok(Object::Name(decode_name_escapes(&word))),
            Some(other) => Err(self.token_error(other.to_string())),
            None => Err(Error::UnexpectedEof),
        }
    }

    fn read_word(&mut self, word: String) -> Result<Object> {
        match word.as_str() {
            "true" => return Ok(Object::Boolean(true)),
            "false" => return Ok(Object::Boolean(false)),
            "null" => return Ok(Object::Null),
            _ => {},
        }

        let cleaned = clean_numeric(&word);
        if !is_numeric_word(&cleaned) {
            return Ok(Object::Keyword(word));
        }

        let number = parse_number(&cleaned);

        // `N G R` and `N G obj` need two tokens of lookahead
        if let Object::Integer(id) = number {
            if (0..=i64::from(u32::MAX)).contains(&id) {
                if let Some(token2) = self.tokenizer.read_token()? {
                    if let Some(gen) = token2.as_word().and_then(parse_unsigned) {
                        match self.tokenizer.read_token()? {
                            Some(Token::Word(w)) if w == "R" => {
                                return Ok(Object::Reference(ObjectRef::new(id as u32, gen)));
                            },
                            Some(Token::Word(w)) if w == "obj" => {
                                return self.read_indirect_object(id as u32, gen);
                            },
                            Some(token3) => {
                                self.tokenizer.push_token(token3);
                                self.tokenizer.push_token(token2);
                            },
                            None => self.tokenizer.push_token(token2),
                        }
                    } else {
                        self.tokenizer.push_token(token2);
                    }
                }
            }
        }

        Ok(number)
    }

    // `N G obj` was consumed.
    fn read_indirect_object(&mut self, id: u32, gen: u32) -> Result<Object> {
        let mut value = self.read_value(None)?;

        if let Object::Dictionary(dict) = value {
            value = match self.tokenizer.read_token()? {
                Some(Token::Word(w)) if w == "stream" => {
                    Object::Stream(self.read_stream_body(dict)?)
                },
                Some(token) => {
                    self.tokenizer.push_token(token);
                    Object::Dictionary(dict)
                },
                None => Object::Dictionary(dict),
            };
        }

        // missing endobj is forgiven
        match self.tokenizer.read_token()? {
            Some(Token::Word(w)) if w == "endobj" => {},
            Some(token) => self.tokenizer.push_token(token),
            None => {},
        }

        Ok(Object::Indirect(Box::new(IndirectObject { id, gen, value })))
    }

    // The `stream` keyword was consumed; the cursor sits on its EOL.
    fn read_stream_body(&mut self, dict: IndexMap<String, Object>) -> Result<Stream> {
        let reader = self.tokenizer.reader_mut();
        let mut rel = reader.offset();
        match reader.byte_at(rel)? {
            Some(b'\r') => {
                rel += 1;
                if reader.byte_at(rel)? == Some(b'\n') {
                    rel += 1;
                }
            },
            Some(b'\n') => rel += 1,
            _ => {},
        }
        reader.set_offset(rel);
        let data_start = reader.cursor_pos();

        if matches!(dict.get("Length"), Some(Object::Reference(_))) {
            log::warn!(
                "stream /Length at byte {} is an indirect reference, scanning for endstream; \
                 a body containing the endstream keyword will be truncated",
                data_start
            );
        }

        let length = dict
            .get("Length")
            .and_then(Object::as_integer)
            .filter(|&n| n > 0);

        if let Some(length) = length {
            let data = self.tokenizer.reader_mut().read_bytes(length as usize)?;
            if data.len() == length as usize && self.next_token_is_endstream()? {
                return Ok(Stream {
                    dict,
                    data: Bytes::from(data),
                });
            }
            log::warn!(
                "stream /Length {} at byte {} not followed by endstream, rescanning",
                length,
                data_start
            );
        }

        let data = self.scan_to_endstream(data_start)?;
        // the endstream keyword follows the scanned span
        match self.tokenizer.read_token()? {
            Some(Token::Word(w)) if w == "endstream" => {},
            Some(token) => self.tokenizer.push_token(token),
            None => {},
        }

        Ok(Stream {
            dict,
            data: Bytes::from(data),
        })
    }

    fn next_token_is_endstream(&mut self) -> Result<bool> {
        match self.tokenizer.read_token()? {
            Some(Token::Word(w)) if w == "endstream" => Ok(true),
            Some(token) => {
                self.tokenizer.push_token(token);
                Ok(false)
            },
            None => Ok(false),
        }
    }

    // Recover stream data by searching for the endstream keyword. One
    // trailing EOL belongs to the keyword, not the data; a span that is
    // nothing but whitespace counts as empty.
    fn scan_to_endstream(&mut self, data_start: u64) -> Result<Vec<u8>> {
        self.tokenizer.clear_stack();
        let reader = self.tokenizer.reader_mut();
        reader.ensure(data_start, 0)?;
        let start = reader.offset();

        const NEEDLE: &[u8] = b"endstream";
        let mut searched = start;
        let found = loop {
            let buf = reader.buffer();
            if let Some(at) = find(&buf[searched..], NEEDLE) {
                break searched + at;
            }
            searched = buf.len().saturating_sub(NEEDLE.len() - 1).max(start);
            if !reader.increase_length(8192)? {
                return Err(Error::Parse {
                    offset: data_start,
                    reason: "unterminated stream: endstream keyword not found".to_string(),
                });
            }
        };

        let mut data = reader.buffer()[start..found].to_vec();
        if data.ends_with(b"\r\n") {
            data.truncate(data.len() - 2);
        } else if data.ends_with(b"\n") || data.ends_with(b"\r") {
            data.truncate(data.len() - 1);
        }
        if data.iter().all(|&b| crate::tokenizer::is_whitespace(b)) {
            data.clear();
        }

        reader.set_offset(found);
        Ok(data)
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Repair numbers like `1-2` or `--37`: a dash after the first character is
/// junk left by a broken writer.
fn clean_numeric(word: &str) -> String {
    if word.is_ascii() && !word.is_empty() && word[1..].contains('-') {
        let sign = if word.starts_with('-') { "-" } else { "" };
        format!("{}{}", sign, word.replace('-', ""))
    } else {
        word.to_string()
    }
}

fn is_numeric_word(word: &str) -> bool {
    let digits = word
        .strip_prefix(['-', '+'])
        .unwrap_or(word);
    !digits.is_empty()
        && digits != "."
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
        && digits.matches('.').count() <= 1
}

fn parse_number(word: &str) -> Object {
    if word.contains('.') {
        Object::Real(word.parse().unwrap_or(0.0))
    } else {
        match word.parse::<i64>() {
            Ok(i) => Object::Integer(i),
            Err(_) => Object::Real(word.parse().unwrap_or(0.0)),
        }
    }
}

fn parse_unsigned(word: &str) -> Option<u32> {
    if !word.is_empty() && word.bytes().all(|b| b.is_ascii_digit()) {
        word.parse().ok()
    } else {
        None
    }
}

/// Decode `#XX` escapes in name text.
fn decode_name_escapes(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'#' && i + 2 < bytes.len() {
            let hex = |b: u8| (b as char).to_digit(16).map(|d| d as u8);
            if let (Some(h), Some(l)) = (hex(bytes[i + 1]), hex(bytes[i + 2])) {
                out.push((h << 4) | l);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Decode backslash escapes in a literal string body.
fn decode_literal_escapes(raw: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        if raw[i] != b'\\' {
            out.push(raw[i]);
            i += 1;
            continue;
        }
        i += 1;
        if i >= raw.len() {
            break;
        }
        match raw[i] {
            b'n' => out.push(b'\n'),
            b'r' => out.push(b'\r'),
            b't' => out.push(b'\t'),
            b'b' => out.push(0x08),
            b'f' => out.push(0x0C),
            b'(' => out.push(b'('),
            b')' => out.push(b')'),
            b'\\' => out.push(b'\\'),
            // backslash-EOL is a line continuation
            b'\n' => {},
            b'\r' => {
                if raw.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
            },
            b'0'..=b'7' => {
                let mut value: u16 = 0;
                let mut digits = 0;
                while digits < 3 {
                    match raw.get(i) {
                        Some(&b @ b'0'..=b'7') => {
                            value = value * 8 + (b - b'0') as u16;
                            i += 1;
                            digits += 1;
                        },
                        _ => break,
                    }
                }
                out.push(value as u8);
                continue;
            },
            other => out.push(other),
        }
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parser(data: &[u8]) -> PdfParser<Cursor<Vec<u8>>> {
        let mut reader = Reader::from_bytes(data.to_vec());
        reader.reset(0, None).unwrap();
        PdfParser::new(reader)
    }

    fn parse(data: &[u8]) -> Object {
        parser(data).read_value(None).unwrap()
    }

    #[test]
    fn test_primitives() {
        assert_eq!(parse(b"true"), Object::Boolean(true));
        assert_eq!(parse(b"false"), Object::Boolean(false));
        assert_eq!(parse(b"null"), Object::Null);
        assert_eq!(parse(b"42"), Object::Integer(42));
        assert_eq!(parse(b"-17"), Object::Integer(-17));
        assert_eq!(parse(b"3.14"), Object::Real(3.14));
        assert_eq!(parse(b".5"), Object::Real(0.5));
    }

    #[test]
    fn test_broken_negative_number() {
        assert_eq!(parse(b"1-2"), Object::Integer(12));
        assert_eq!(parse(b"-1-2"), Object::Integer(-12));
    }

    #[test]
    fn test_literal_string() {
        assert_eq!(
            parse(b"(hello)"),
            Object::String {
                data: b"hello".to_vec(),
                hex: false
            }
        );
        // balanced nested parens
        assert_eq!(
            parse(b"(a (b) c)"),
            Object::String {
                data: b"a (b) c".to_vec(),
                hex: false
            }
        );
        // escapes
        assert_eq!(
            parse(br"(line\nnext \(x\) \101)"),
            Object::String {
                data: b"line\nnext (x) A".to_vec(),
                hex: false
            }
        );
    }

    #[test]
    fn test_hex_string() {
        assert_eq!(
            parse(b"<48 65 6C 6c 6F>"),
            Object::String {
                data: b"Hello".to_vec(),
                hex: true
            }
        );
        // odd digit count pads with zero
        assert_eq!(
            parse(b"<7>"),
            Object::String {
                data: vec![0x70],
                hex: true
            }
        );
    }

    #[test]
    fn test_names() {
        assert_eq!(parse(b"/Type"), Object::Name("Type".into()));
        assert_eq!(parse(b"/A#20B"), Object::Name("A B".into()));
        assert_eq!(parse(b"/ "), Object::Name(String::new()));
    }

    #[test]
    fn test_array() {
        assert_eq!(
            parse(b"[1 /Two (three)]"),
            Object::Array(vec![
                Object::Integer(1),
                Object::Name("Two".into()),
                Object::String {
                    data: b"three".to_vec(),
                    hex: false
                },
            ])
        );
    }

    #[test]
    fn test_array_skips_broken_element() {
        assert_eq!(
            parse(b"[1 ) 2]"),
            Object::Array(vec![Object::Integer(1), Object::Integer(2)])
        );
    }

    #[test]
    fn test_dictionary() {
        let obj = parse(b"<</Type /Catalog /Pages 2 0 R>>");
        let dict = obj.as_dict().unwrap();
        assert_eq!(dict.get("Type").unwrap().as_name(), Some("Catalog"));
        assert_eq!(
            dict.get("Pages").unwrap().as_reference(),
            Some(ObjectRef::new(2, 0))
        );
    }

    #[test]
    fn test_dictionary_broken_value_becomes_null() {
        let obj = parse(b"<</Good 1 /Bad ) /After 2>>");
        let dict = obj.as_dict().unwrap();
        assert_eq!(dict.get("Good").unwrap().as_integer(), Some(1));
        assert!(dict.get("Bad").unwrap().is_null());
        assert_eq!(dict.get("After").unwrap().as_integer(), Some(2));
    }

    #[test]
    fn test_reference_and_lookahead_pushback() {
        assert_eq!(parse(b"1 0 R"), Object::Reference(ObjectRef::new(1, 0)));

        // three plain integers: lookahead must not eat the second two
        let mut p = parser(b"1 2 3");
        assert_eq!(p.read_value(None).unwrap(), Object::Integer(1));
        assert_eq!(p.read_value(None).unwrap(), Object::Integer(2));
        assert_eq!(p.read_value(None).unwrap(), Object::Integer(3));
    }

    #[test]
    fn test_indirect_object() {
        let obj = parse(b"7 0 obj\n<</Kind /Test>>\nendobj");
        let ind = obj.as_indirect().unwrap();
        assert_eq!((ind.id, ind.gen), (7, 0));
        assert_eq!(
            ind.value.as_dict().unwrap().get("Kind").unwrap().as_name(),
            Some("Test")
        );
    }

    #[test]
    fn test_indirect_object_missing_endobj() {
        let mut p = parser(b"7 0 obj 13 8 0 obj 14 endobj");
        let first = p.read_value(None).unwrap();
        assert_eq!(first.as_indirect().unwrap().value, Object::Integer(13));
        let second = p.read_value(None).unwrap();
        assert_eq!(second.as_indirect().unwrap().id, 8);
    }

    #[test]
    fn test_stream_with_correct_length() {
        let obj = parse(b"5 0 obj\n<</Length 4>>\nstream\nBODY\nendstream\nendobj");
        let stream = obj.as_indirect().unwrap().value.as_stream().unwrap();
        assert_eq!(&stream.data[..], b"BODY");
    }

    #[test]
    fn test_stream_with_wrong_length_rescans() {
        let obj = parse(b"5 0 obj\n<</Length 99>>\nstream\nBODY\nendstream\nendobj");
        let stream = obj.as_indirect().unwrap().value.as_stream().unwrap();
        assert_eq!(&stream.data[..], b"BODY");
    }

    #[test]
    fn test_stream_without_length_scans() {
        let obj = parse(b"5 0 obj\n<</Kind /X>>\nstream\r\ndata bytes\nendstream\nendobj");
        let stream = obj.as_indirect().unwrap().value.as_stream().unwrap();
        assert_eq!(&stream.data[..], b"data bytes");
    }

    #[test]
    fn test_stream_whitespace_only_is_empty() {
        let obj = parse(b"5 0 obj\n<</Kind /X>>\nstream\n   \n\nendstream\nendobj");
        let stream = obj.as_indirect().unwrap().value.as_stream().unwrap();
        assert!(stream.data.is_empty());
    }

    #[test]
    fn test_comment_skipped() {
        assert_eq!(parse(b"% a comment\n42"), Object::Integer(42));
    }

    #[test]
    fn test_keyword() {
        assert_eq!(parse(b"xref"), Object::Keyword("xref".into()));
        assert_eq!(parse(b"startxref"), Object::Keyword("startxref".into()));
    }

    #[test]
    fn test_expect_mismatch() {
        let err = parser(b"/Name").read_value(Some(Expect::Numeric)).unwrap_err();
        assert!(err.is_token_error());
    }

    #[test]
    fn test_expect_match() {
        assert_eq!(
            parser(b"512").read_value(Some(Expect::Numeric)).unwrap(),
            Object::Integer(512)
        );
    }

    #[test]
    fn test_pdf_version() {
        let mut p = parser(b"%PDF-1.7\nrest");
        assert_eq!(p.pdf_version(0).unwrap(), "1.7");
    }

    #[test]
    fn test_dict_with_non_name_key_abandoned() {
        let obj = parse(b"<</Good 1 2 /Lost 3>>");
        let dict = obj.as_dict().unwrap();
        assert_eq!(dict.len(), 1);
        assert_eq!(dict.get("Good").unwrap().as_integer(), Some(1));
    }
}

//! PDF tokenizer.
//!
//! Lexes raw bytes into lexical tokens respecting the PDF whitespace and
//! delimiter classes (ISO 32000-1:2008, Tables 1 and 2):
//!
//! - whitespace: NUL, TAB, LF, FF, CR, SPACE
//! - delimiters: `( ) < > [ ] { } / %`
//!
//! Everything between those classes is a [`Token::Word`] — numbers,
//! keywords (`obj`, `endobj`, `stream`, `R`, `xref`, ...), and name text
//! after a `/`. The parser decides what a word means; the tokenizer only
//! classifies bytes.
//!
//! A pushback stack supports the parser's lookahead of up to two tokens
//! (number, number, `R`|`obj` disambiguation).

use crate::error::Result;
use crate::reader::Reader;
use std::io::{Read, Seek};

/// Whether a byte is PDF whitespace.
#[inline]
pub fn is_whitespace(byte: u8) -> bool {
    matches!(byte, 0x00 | 0x09 | 0x0A | 0x0C | 0x0D | 0x20)
}

/// Whether a byte is a PDF delimiter character.
#[inline]
pub fn is_delimiter(byte: u8) -> bool {
    matches!(
        byte,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

/// Whether a byte is a regular character (neither whitespace nor
/// delimiter).
#[inline]
pub fn is_regular(byte: u8) -> bool {
    !is_whitespace(byte) && !is_delimiter(byte)
}

/// A lexical unit of PDF syntax.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A run of regular characters: a number, a keyword, or name text.
    Word(String),
    /// `(` — opens a literal string (the parser scans the body itself).
    LParen,
    /// `)` — only seen when unbalanced.
    RParen,
    /// `<` — opens a hex string.
    Lt,
    /// `>` — only seen when unbalanced.
    Gt,
    /// `<<`
    DictOpen,
    /// `>>`
    DictClose,
    /// `[`
    ArrayOpen,
    /// `]`
    ArrayClose,
    /// `{`
    BraceOpen,
    /// `}`
    BraceClose,
    /// `/` — the next word (if adjacent and regular) is the name text.
    Solidus,
    /// `%` — the rest of the line is a comment.
    Percent,
}

impl Token {
    /// The word content, if this token is a word.
    pub fn as_word(&self) -> Option<&str> {
        match self {
            Token::Word(w) => Some(w),
            _ => None,
        }
    }

    /// Whether this token is the given bare word.
    pub fn is_word(&self, word: &str) -> bool {
        matches!(self, Token::Word(w) if w == word)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Word(w) => f.write_str(w),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
            Token::Lt => f.write_str("<"),
            Token::Gt => f.write_str(">"),
            Token::DictOpen => f.write_str("<<"),
            Token::DictClose => f.write_str(">>"),
            Token::ArrayOpen => f.write_str("["),
            Token::ArrayClose => f.write_str("]"),
            Token::BraceOpen => f.write_str("{"),
            Token::BraceClose => f.write_str("}"),
            Token::Solidus => f.write_str("/"),
            Token::Percent => f.write_str("%"),
        }
    }
}

/// Tokenizer over a [`Reader`], with a pushback stack.
#[derive(Debug)]
pub struct Tokenizer<R> {
    reader: Reader<R>,
    stack: Vec<Token>,
}

impl<R: Read + Seek> Tokenizer<R> {
    /// Wrap a reader.
    pub fn new(reader: Reader<R>) -> Self {
        Self {
            reader,
            stack: Vec::new(),
        }
    }

    /// Access the underlying reader.
    pub fn reader(&self) -> &Reader<R> {
        &self.reader
    }

    /// Mutable access to the underlying reader.
    ///
    /// Callers that reposition the reader must also [`clear_stack`]
    /// (or go through `PdfParser::reset`, which does both).
    ///
    /// [`clear_stack`]: Tokenizer::clear_stack
    pub fn reader_mut(&mut self) -> &mut Reader<R> {
        &mut self.reader
    }

    /// Push a token back; it is returned by the next `read_token` call.
    pub fn push_token(&mut self, token: Token) {
        self.stack.push(token);
    }

    /// Drop any pushed-back tokens.
    pub fn clear_stack(&mut self) {
        self.stack.clear();
    }

    /// Advance the cursor past any whitespace.
    pub fn leap_whitespace(&mut self) -> Result<()> {
        loop {
            let rel = self.reader.offset();
            match self.reader.byte_at(rel)? {
                Some(b) if is_whitespace(b) => self.reader.set_offset(rel + 1),
                _ => return Ok(()),
            }
        }
    }

    /// Whether the byte at the cursor is a regular character.
    ///
    /// Used right after a `/` token to detect a zero-length name
    /// (`/` immediately followed by a delimiter or whitespace).
    pub fn is_current_byte_regular_character(&mut self) -> Result<bool> {
        let rel = self.reader.offset();
        Ok(match self.reader.byte_at(rel)? {
            Some(b) => is_regular(b),
            None => false,
        })
    }

    /// Read the next token, or `None` at end-of-file.
    pub fn read_token(&mut self) -> Result<Option<Token>> {
        if let Some(token) = self.stack.pop() {
            return Ok(Some(token));
        }

        self.leap_whitespace()?;

        let rel = self.reader.offset();
        let byte = match self.reader.byte_at(rel)? {
            Some(b) => b,
            None => return Ok(None),
        };

        let token = match byte {
            b'(' => self.take(rel, 1, Token::LParen)?,
            b')' => self.take(rel, 1, Token::RParen)?,
            b'[' => self.take(rel, 1, Token::ArrayOpen)?,
            b']' => self.take(rel, 1, Token::ArrayClose)?,
            b'{' => self.take(rel, 1, Token::BraceOpen)?,
            b'}' => self.take(rel, 1, Token::BraceClose)?,
            b'/' => self.take(rel, 1, Token::Solidus)?,
            b'%' => self.take(rel, 1, Token::Percent)?,
            b'<' => match self.reader.byte_at(rel + 1)? {
                Some(b'<') => self.take(rel, 2, Token::DictOpen)?,
                _ => self.take(rel, 1, Token::Lt)?,
            },
            b'>' => match self.reader.byte_at(rel + 1)? {
                Some(b'>') => self.take(rel, 2, Token::DictClose)?,
                _ => self.take(rel, 1, Token::Gt)?,
            },
            _ => {
                let mut end = rel + 1;
                while let Some(b) = self.reader.byte_at(end)? {
                    if !is_regular(b) {
                        break;
                    }
                    end += 1;
                }
                let word = String::from_utf8_lossy(&self.reader.buffer()[rel..end]).into_owned();
                self.reader.set_offset(end);
                Token::Word(word)
            },
        };

        Ok(Some(token))
    }

    fn take(&mut self, rel: usize, width: usize, token: Token) -> Result<Token> {
        self.reader.set_offset(rel + width);
        Ok(token)
    }
}

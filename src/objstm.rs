//! Object streams (`/Type /ObjStm`).
//!
//! An object stream packs the bodies of many non-stream objects into one
//! compressed stream. The decoded body starts with `/N` pairs of integers
//! (object number, byte offset relative to `/First`), followed by the bare
//! object values with no `obj`/`endobj` wrappers.
//!
//! The body is decoded and parsed once at construction; a single damaged
//! member does not poison its siblings.

use crate::error::{Error, Result};
use crate::object::{Object, Stream};
use crate::parser::PdfParser;
use crate::reader::Reader;

/// A decoded object stream.
#[derive(Debug)]
pub struct ObjectStream {
    ids: Vec<u32>,
    objects: Vec<Option<Object>>,
}

impl ObjectStream {
    /// Decode and index an object stream.
    pub fn new(stream: &Stream) -> Result<Self> {
        match stream.dict.get("Type").and_then(Object::as_name) {
            Some("ObjStm") => {},
            other => {
                return Err(Error::Parse {
                    offset: 0,
                    reason: format!("expected /Type /ObjStm, found {:?}", other),
                })
            },
        }

        let count = require_int(&stream.dict, "N")?;
        let first = require_int(&stream.dict, "First")?;
        let body = stream.decoded()?;

        let mut reader = Reader::from_bytes(body);
        reader.reset(0, None)?;
        let mut parser = PdfParser::new(reader);

        let mut pairs = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let id = read_header_int(&mut parser)?;
            let offset = read_header_int(&mut parser)?;
            pairs.push((id as u32, offset));
        }

        let mut ids = Vec::with_capacity(pairs.len());
        let mut objects = Vec::with_capacity(pairs.len());
        for (id, offset) in pairs {
            ids.push(id);
            let at = first + offset;
            let value = match parser.reset(at as i64, None) {
                Ok(()) => match parser.read_value(None) {
                    Ok(v) => Some(v),
                    Err(e) => {
                        log::warn!("object {} in object stream failed to parse: {}", id, e);
                        None
                    },
                },
                Err(_) => None,
            };
            objects.push(value);
        }

        Ok(Self { ids, objects })
    }

    /// Number of objects in the stream.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The object numbers in storage order.
    pub fn object_ids(&self) -> &[u32] {
        &self.ids
    }

    /// Object number and value at `index`.
    pub fn get(&self, index: usize) -> Result<(u32, Object)> {
        let id = *self.ids.get(index).ok_or_else(|| Error::Parse {
            offset: 0,
            reason: format!(
                "object stream index {} out of range ({} objects)",
                index,
                self.ids.len()
            ),
        })?;
        match &self.objects[index] {
            Some(obj) => Ok((id, obj.clone())),
            None => Err(Error::Parse {
                offset: 0,
                reason: format!("object {} in object stream is damaged", id),
            }),
        }
    }
}

fn require_int(dict: &indexmap::IndexMap<String, Object>, key: &str) -> Result<i64> {
    dict.get(key)
        .and_then(Object::as_integer)
        .filter(|&n| n >= 0)
        .ok_or_else(|| Error::Parse {
            offset: 0,
            reason: format!("object stream is missing a direct /{} entry", key),
        })
}

fn read_header_int<R: std::io::Read + std::io::Seek>(parser: &mut PdfParser<R>) -> Result<i64> {
    parser
        .read_value(Some(crate::parser::Expect::Numeric))?
        .as_integer()
        .ok_or_else(|| Error::Parse {
            offset: 0,
            reason: "non-integer in object stream header".to_string(),
        })
}

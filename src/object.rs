//! PDF object model.
//!
//! [`Object`] is the sum type produced by the parser: every PDF primitive,
//! container, stream, and indirect reference is one variant. Dictionaries
//! use [`IndexMap`] so key order survives a parse/inspect cycle, which
//! matters when diffing trailers from incremental updates.

use crate::decoders;
use crate::error::Result;
use bytes::Bytes;
use indexmap::IndexMap;

/// A reference to an indirect object: `N G R`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectRef {
    /// Object number.
    pub id: u32,
    /// Generation number.
    pub gen: u32,
}

impl ObjectRef {
    pub fn new(id: u32, gen: u32) -> Self {
        Self { id, gen }
    }
}

impl std::fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} R", self.id, self.gen)
    }
}

/// An indirect object definition: `N G obj ... endobj`.
#[derive(Debug, Clone, PartialEq)]
pub struct IndirectObject {
    pub id: u32,
    pub gen: u32,
    pub value: Object,
}

/// A stream: its dictionary plus the raw (still encoded) body bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct Stream {
    pub dict: IndexMap<String, Object>,
    pub data: Bytes,
}

impl Stream {
    /// Decode the body through the filter chain named by `/Filter`,
    /// honoring `/DecodeParms`.
    pub fn decoded(&self) -> Result<Vec<u8>> {
        decoders::decode_stream(&self.dict, &self.data)
    }
}

/// Any PDF value.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    Null,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    /// String bytes; `hex` records whether the source form was `<...>`.
    String {
        data: Vec<u8>,
        hex: bool,
    },
    Name(String),
    Array(Vec<Object>),
    Dictionary(IndexMap<String, Object>),
    Stream(Stream),
    Reference(ObjectRef),
    /// A full `N G obj ... endobj` definition.
    Indirect(Box<IndirectObject>),
    /// A bare keyword the grammar does not otherwise consume
    /// (`xref`, `trailer`, `startxref`, ...).
    Keyword(String),
}

impl Object {
    pub fn is_null(&self) -> bool {
        matches!(self, Object::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Object::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Object::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric value as `f64`, accepting both integers and reals.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Object::Integer(i) => Some(*i as f64),
            Object::Real(r) => Some(*r),
            _ => None,
        }
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            Object::Name(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&[u8]> {
        match self {
            Object::String { data, .. } => Some(data),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Object]> {
        match self {
            Object::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&IndexMap<String, Object>> {
        match self {
            Object::Dictionary(d) => Some(d),
            Object::Stream(s) => Some(&s.dict),
            _ => None,
        }
    }

    pub fn as_stream(&self) -> Option<&Stream> {
        match self {
            Object::Stream(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<ObjectRef> {
        match self {
            Object::Reference(r) => Some(*r),
            _ => None,
        }
    }

    pub fn as_indirect(&self) -> Option<&IndirectObject> {
        match self {
            Object::Indirect(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_keyword(&self) -> Option<&str> {
        match self {
            Object::Keyword(k) => Some(k),
            _ => None,
        }
    }

    /// The value inside an indirect definition, or the object itself.
    pub fn unwrap_indirect(&self) -> &Object {
        match self {
            Object::Indirect(i) => &i.value,
            other => other,
        }
    }
}

//! Cross-reference resolution.
//!
//! [`XrefTable`] locates the `startxref` pointer, walks the `Prev` chain
//! newest to oldest, and answers "where does object N live" without
//! touching bytes it does not need. Classic 20-byte-row tables, xref
//! streams (`/Type /XRef`), and hybrid files (`/XRefStm`) are all handled;
//! sections are scanned in discovery order so the newest definition of an
//! object always wins.
//!
//! Lookups go through a three-state cache: unknown (not yet resolved),
//! found, and known-free. A free entry is memoized as a tombstone so a
//! freed object keeps answering `None` without re-reading the file.
//!
//! All offsets recorded in the file are relative to the `%PDF-` header,
//! which may itself be preceded by garbage bytes; [`Location::Offset`]
//! values have that start offset already applied.

use crate::config::XrefConfig;
use crate::error::{Error, Result};
use crate::object::{Object, Stream};
use crate::objstm::ObjectStream;
use crate::parser::{Expect, PdfParser};
use crate::reader::Reader;
use crate::tokenizer::{is_whitespace, Token};
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use std::io::{Read, Seek};

/// Classic table rows are a fixed 20-byte stride.
const ROW_LEN: u64 = 20;

/// Trailer keys lifted from an xref stream dictionary.
const STREAM_TRAILER_KEYS: [&str; 5] = ["Size", "Root", "Encrypt", "Info", "ID"];

/// How the document stores its cross-reference data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    /// Classic tables only.
    None,
    /// Xref streams only.
    All,
    /// Classic tables with an `/XRefStm` side stream.
    Hybrid,
}

/// Where an object's bytes live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// Absolute byte offset of the `N G obj` header.
    Offset(u64),
    /// Slot `index` inside object stream `stream_id`.
    InStream { stream_id: u32, index: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Cached {
    Found { gen: u32, loc: Location },
    Free,
}

#[derive(Debug, Clone, Copy)]
struct ClassicRange {
    start_id: u32,
    count: u32,
    /// Absolute byte offset of the first row.
    pos: u64,
}

#[derive(Debug)]
struct StreamSection {
    widths: [usize; 3],
    row_len: usize,
    ranges: Vec<(u32, u32)>,
    raw: Stream,
    decoded: Option<Vec<u8>>,
}

impl StreamSection {
    fn bytes(&mut self) -> Result<&[u8]> {
        if self.decoded.is_none() {
            self.decoded = Some(self.raw.decoded()?);
        }
        Ok(self.decoded.as_deref().unwrap_or_default())
    }
}

#[derive(Debug)]
enum Section {
    Classic(Vec<ClassicRange>),
    Stream(StreamSection),
}

enum RowOutcome {
    Found(Cached),
    Free,
    /// Generation did not match; keep scanning older sections.
    Mismatch,
    /// Row unreadable; the lookup answers `None` without failing.
    Malformed,
}

/// The resolved cross-reference state of one document.
#[derive(Debug)]
pub struct XrefTable<R> {
    parser: PdfParser<R>,
    config: XrefConfig,
    start_offset: u64,
    compression: Compression,
    trailer: IndexMap<String, Object>,
    /// Discovery order: newest first.
    sections: Vec<Section>,
    cache: HashMap<(u32, Option<u32>), Cached>,
    objstm_cache: HashMap<u32, ObjectStream>,
}

impl<R: Read + Seek> XrefTable<R> {
    /// Resolve a document with default configuration.
    pub fn new(reader: Reader<R>) -> Result<Self> {
        Self::with_config(reader, XrefConfig::default())
    }

    /// Resolve a document.
    ///
    /// Locates the `%PDF-` header (tolerating leading garbage), reads the
    /// `startxref` pointer from the tail of the file, and walks the whole
    /// `Prev` chain. A chain that revisits an offset fails with
    /// [`Error::InvalidXref`].
    pub fn with_config(reader: Reader<R>, config: XrefConfig) -> Result<Self> {
        let mut parser = PdfParser::new(reader);
        let start_offset = find_header(&mut parser, config.header_scan_chunk)?;

        let mut table = Self {
            parser,
            config,
            start_offset,
            compression: Compression::None,
            trailer: IndexMap::new(),
            sections: Vec::new(),
            cache: HashMap::new(),
            objstm_cache: HashMap::new(),
        };

        let pointer = table.pointer_to_xref()?;
        let mut visited = HashSet::new();
        let mut next = Some(pointer);
        while let Some(offset) = next {
            if !visited.insert(offset) {
                return Err(Error::InvalidXref(format!(
                    "cyclic Prev chain revisits offset {}",
                    offset
                )));
            }
            log::debug!("reading cross-reference section at offset {}", offset);
            next = table.read_xref_at(offset, false)?;
        }

        Ok(table)
    }

    /// Byte offset of the `%PDF-` header within the source.
    pub fn start_offset(&self) -> u64 {
        self.start_offset
    }

    /// How the document stores its cross-reference data.
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// The merged trailer dictionary (newest writer wins per key).
    pub fn trailer(&self) -> &IndexMap<String, Object> {
        &self.trailer
    }

    /// The `/Size` entry of the merged trailer.
    pub fn size(&self) -> Option<i64> {
        self.trailer.get("Size").and_then(Object::as_integer)
    }

    /// The version digits from the file header.
    pub fn pdf_version(&mut self) -> Result<String> {
        self.parser.pdf_version(self.start_offset)
    }

    /// All object numbers covered by any subsection, sorted and deduped.
    /// Object 0 (the free-list head) is skipped.
    pub fn defined_object_ids(&self) -> Vec<u32> {
        let mut ids = Vec::new();
        let mut collect = |start: u32, count: u32| {
            for id in start..start.saturating_add(count) {
                if id != 0 {
                    ids.push(id);
                }
            }
        };
        for section in &self.sections {
            match section {
                Section::Classic(ranges) => {
                    for range in ranges {
                        collect(range.start_id, range.count);
                    }
                },
                Section::Stream(section) => {
                    for &(start, count) in &section.ranges {
                        collect(start, count);
                    }
                },
            }
        }
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Generation number of the live entry for `id`, or `None` when the
    /// object is free or unknown.
    pub fn generation_for(&mut self, id: u32) -> Result<Option<u32>> {
        if self.offset_for(id, None)?.is_none() {
            return Ok(None);
        }
        Ok(match self.cache.get(&(id, None)) {
            Some(Cached::Found { gen, .. }) => Some(*gen),
            _ => None,
        })
    }

    /// Where object `id` lives, or `None` when it is free, unknown, or the
    /// requested generation does not match.
    pub fn offset_for(&mut self, id: u32, gen: Option<u32>) -> Result<Option<Location>> {
        if id == 0 {
            return Ok(None);
        }
        let key = (id, gen);
        if let Some(cached) = self.cache.get(&key) {
            return Ok(match cached {
                Cached::Found { loc, .. } => Some(*loc),
                Cached::Free => None,
            });
        }

        match self.scan_sections(id, gen)? {
            Some(cached) => {
                self.cache.insert(key, cached);
                Ok(match cached {
                    Cached::Found { loc, .. } => Some(loc),
                    Cached::Free => None,
                })
            },
            None => Ok(None),
        }
    }

    /// Resolve and materialize object `id`.
    ///
    /// Compressed objects are pulled out of their object stream, which is
    /// decoded once and cached.
    pub fn fetch(&mut self, id: u32, gen: Option<u32>) -> Result<Option<Object>> {
        let loc = match self.offset_for(id, gen)? {
            Some(loc) => loc,
            None => return Ok(None),
        };

        match loc {
            Location::Offset(abs) => {
                self.parser.reset(abs as i64, None)?;
                let obj = self.parser.read_value(Some(Expect::IndirectObject))?;
                let ind = match obj {
                    Object::Indirect(ind) => ind,
                    _ => return Ok(None),
                };
                if ind.id != id {
                    log::warn!(
                        "object header at byte {} says {} {}, expected object {}",
                        abs,
                        ind.id,
                        ind.gen,
                        id
                    );
                }
                Ok(Some(ind.value))
            },
            Location::InStream { stream_id, index } => {
                if !self.objstm_cache.contains_key(&stream_id) {
                    let objstm = self.load_object_stream(stream_id)?;
                    self.objstm_cache.insert(stream_id, objstm);
                }
                let objstm = self
                    .objstm_cache
                    .get(&stream_id)
                    .ok_or_else(|| Error::InvalidXref(format!(
                        "object stream {} unavailable",
                        stream_id
                    )))?;
                let (oid, obj) = objstm.get(index as usize)?;
                if oid != id {
                    log::warn!(
                        "object stream {} slot {} holds object {}, expected {}",
                        stream_id,
                        index,
                        oid,
                        id
                    );
                }
                Ok(Some(obj))
            },
        }
    }

    fn load_object_stream(&mut self, stream_id: u32) -> Result<ObjectStream> {
        let abs = match self.offset_for(stream_id, None)? {
            Some(Location::Offset(abs)) => abs,
            _ => {
                return Err(Error::InvalidXref(format!(
                    "object stream {} has no usable offset",
                    stream_id
                )))
            },
        };
        self.parser.reset(abs as i64, None)?;
        let obj = self.parser.read_value(Some(Expect::IndirectObject))?;
        let stream = match obj {
            Object::Indirect(ind) => match ind.value {
                Object::Stream(s) => s,
                _ => {
                    return Err(Error::InvalidXref(format!(
                        "object {} is not an object stream",
                        stream_id
                    )))
                },
            },
            _ => {
                return Err(Error::InvalidXref(format!(
                    "object {} is not an object stream",
                    stream_id
                )))
            },
        };
        ObjectStream::new(&stream)
    }

    // -- construction ----------------------------------------------------

    /// Read the numeric pointer after the last `startxref` keyword within
    /// the configured tail window. A corrupted `startref` spelling is
    /// accepted.
    fn pointer_to_xref(&mut self) -> Result<u64> {
        let window = self.config.trailer_search_len;
        self.parser.reset(-(window as i64), Some(window))?;

        let buf = self.parser.reader().buffer();
        let (at, keyword_len) = match rfind(buf, b"startxref") {
            Some(at) => (at, "startxref".len()),
            None => match rfind(buf, b"startref") {
                Some(at) => {
                    log::warn!("startxref keyword is corrupted to startref");
                    (at, "startref".len())
                },
                None => {
                    return Err(Error::InvalidXref(
                        "startxref keyword not found".to_string(),
                    ))
                },
            },
        };

        self.parser.reader_mut().set_offset(at + keyword_len);
        let value = self
            .parser
            .read_value(Some(Expect::Numeric))
            .map_err(|e| match e {
                e if e.is_token_error() => {
                    Error::InvalidXref("startxref is not followed by a number".to_string())
                },
                e => e,
            })?
            .as_integer()
            .filter(|&v| v >= 0)
            .ok_or_else(|| {
                Error::InvalidXref("startxref points to a negative offset".to_string())
            })?;
        Ok(value as u64)
    }

    /// Read one section of the chain at a header-relative offset and
    /// return its `Prev` pointer.
    fn read_xref_at(&mut self, offset: u64, hybrid: bool) -> Result<Option<u64>> {
        let abs = self.start_offset + offset;
        self.parser.reset(abs as i64, None)?;

        let is_classic = matches!(
            self.parser.tokenizer_mut().read_token()?,
            Some(Token::Word(ref w)) if w == "xref"
        );
        if is_classic {
            log::debug!("classic cross-reference table at byte {}", abs);
            self.read_classic_section()
        } else {
            log::debug!("cross-reference stream at byte {}", abs);
            self.parser.reset(abs as i64, None)?;
            self.read_stream_section(hybrid)
        }
    }

    // The `xref` keyword was consumed.
    fn read_classic_section(&mut self) -> Result<Option<u64>> {
        let mut ranges = Vec::new();
        loop {
            match self.parser.tokenizer_mut().read_token()? {
                Some(Token::Word(w)) if w == "trailer" => break,
                Some(Token::Word(w)) => {
                    let start: u32 = w.parse().map_err(|_| {
                        Error::InvalidXref(format!("invalid subsection start {:?}", w))
                    })?;
                    let count = match self.parser.tokenizer_mut().read_token()? {
                        Some(Token::Word(w)) => w.parse::<u32>().map_err(|_| {
                            Error::InvalidXref(format!("invalid subsection count {:?}", w))
                        })?,
                        _ => {
                            return Err(Error::InvalidXref(
                                "subsection count missing".to_string(),
                            ))
                        },
                    };
                    if let Some(range) = self.read_subsection(start, count)? {
                        ranges.push(range);
                    }
                },
                _ => {
                    return Err(Error::InvalidXref(
                        "trailer keyword not found after cross-reference table".to_string(),
                    ))
                },
            }
        }
        self.sections.push(Section::Classic(ranges));

        let trailer = self
            .parser
            .read_value(Some(Expect::Dictionary))
            .map_err(|e| match e {
                e if e.is_token_error() => {
                    Error::InvalidXref("unable to read trailer dictionary".to_string())
                },
                e => e,
            })?;
        let dict = match trailer {
            Object::Dictionary(d) => d,
            _ => return Err(Error::InvalidXref("trailer is not a dictionary".to_string())),
        };

        let prev = dict
            .get("Prev")
            .and_then(Object::as_integer)
            .filter(|&v| v >= 0)
            .map(|v| v as u64);
        let xrefstm = dict
            .get("XRefStm")
            .and_then(Object::as_integer)
            .filter(|&v| v >= 0);
        for (key, value) in dict {
            self.trailer.entry(key).or_insert(value);
        }

        // hybrid files carry an xref stream alongside the classic table;
        // a broken one is ignored rather than failing the document
        if let Some(xrefstm) = xrefstm {
            match self.read_xref_at(xrefstm as u64, true) {
                Ok(_) => {},
                Err(e) => {
                    log::warn!("hybrid cross-reference stream at {} ignored: {}", xrefstm, e)
                },
            }
        }

        Ok(prev)
    }

    /// Read one `start count` subsection. In lazy mode only the row
    /// positions are recorded; in eager mode every row is decoded into the
    /// cache.
    fn read_subsection(&mut self, start: u32, count: u32) -> Result<Option<ClassicRange>> {
        let reader = self.parser.reader_mut();

        // rows begin on the line after `start count`
        let mut rel = reader.offset();
        while matches!(reader.byte_at(rel)?, Some(b' ') | Some(b'\t')) {
            rel += 1;
        }
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
        let pos = reader.cursor_pos();

        if count == 0 {
            return Ok(None);
        }

        // probe the first row plus one byte: the 20-byte stride only works
        // when bytes 19/20 terminate the row and byte 21 starts the next one
        reader.ensure(pos, ROW_LEN as usize).map_err(|_| {
            Error::InvalidXref("cross-reference table is truncated".to_string())
        })?;
        let probe = reader.read_bytes(ROW_LEN as usize + 1)?;
        if !row_shape_ok(&probe) {
            return Err(Error::InvalidXref(
                "cross-reference table seems to be corrupted".to_string(),
            ));
        }

        // a subsection claiming to start at object 1 whose first row is the
        // free-list head really describes object 0; the offsets of every
        // following row are off by one, so the table is unusable
        if start == 1 && &probe[..18] == b"0000000000 65535 f" {
            return Err(Error::InvalidXref(
                "subsection starts at object 1 with the free-list head entry".to_string(),
            ));
        }

        if self.config.read_on_access {
            let after = pos + u64::from(count) * ROW_LEN;
            self.parser.reset(after as i64, None)?;
        } else {
            self.decode_rows_eagerly(start, count, pos)?;
        }

        Ok(Some(ClassicRange {
            start_id: start,
            count,
            pos,
        }))
    }

    fn decode_rows_eagerly(&mut self, start: u32, count: u32, pos: u64) -> Result<()> {
        let start_offset = self.start_offset;
        let block_len = u64::from(count) * ROW_LEN;
        let reader = self.parser.reader_mut();
        reader.ensure(pos, block_len as usize).map_err(|_| {
            Error::InvalidXref("cross-reference table is truncated".to_string())
        })?;
        let block = reader.read_bytes(block_len as usize)?;

        let text = String::from_utf8_lossy(&block);
        let fields: Vec<&str> = text.split_whitespace().collect();
        if fields.len() != 3 * count as usize {
            return Err(Error::InvalidXref(format!(
                "subsection of {} rows has {} fields",
                count,
                fields.len()
            )));
        }

        for i in 0..count as usize {
            let offset: u64 = fields[3 * i].parse().map_err(|_| {
                Error::InvalidXref(format!("invalid row offset {:?}", fields[3 * i]))
            })?;
            let gen: u32 = fields[3 * i + 1].parse().map_err(|_| {
                Error::InvalidXref(format!("invalid row generation {:?}", fields[3 * i + 1]))
            })?;
            let id = start + i as u32;
            let entry = match fields[3 * i + 2] {
                "n" => Cached::Found {
                    gen,
                    loc: Location::Offset(start_offset + offset),
                },
                "f" => Cached::Free,
                other => {
                    return Err(Error::InvalidXref(format!("invalid row type {:?}", other)))
                },
            };
            // newest section was decoded first; older rows must not win
            self.cache.entry((id, None)).or_insert(entry);
        }
        Ok(())
    }

    // The cursor sits at the `N G obj` header of an xref stream.
    fn read_stream_section(&mut self, hybrid: bool) -> Result<Option<u64>> {
        let obj = self
            .parser
            .read_value(Some(Expect::IndirectObject))
            .map_err(|e| match e {
                e if e.is_token_error() => Error::InvalidXref(
                    "neither a cross-reference table nor a stream at the recorded offset"
                        .to_string(),
                ),
                e => e,
            })?;
        let stream = match obj {
            Object::Indirect(ind) => match ind.value {
                Object::Stream(s) => s,
                _ => {
                    return Err(Error::InvalidXref(
                        "indirect object at cross-reference offset is not a stream".to_string(),
                    ))
                },
            },
            _ => {
                return Err(Error::InvalidXref(
                    "cross-reference offset does not hold an indirect object".to_string(),
                ))
            },
        };

        if stream.dict.get("Type").and_then(Object::as_name) != Some("XRef") {
            return Err(Error::InvalidXref(
                "stream at cross-reference offset is not /Type /XRef".to_string(),
            ));
        }

        let size = stream
            .dict
            .get("Size")
            .and_then(Object::as_integer)
            .filter(|&v| v >= 0)
            .ok_or_else(|| Error::InvalidXref("xref stream is missing /Size".to_string()))?;

        let widths = parse_widths(&stream.dict)?;
        let row_len = widths.iter().sum();
        let ranges = parse_index(&stream.dict, size as u32)?;

        for key in STREAM_TRAILER_KEYS {
            if let Some(value) = stream.dict.get(key) {
                if !self.trailer.contains_key(key) {
                    self.trailer.insert(key.to_string(), value.clone());
                }
            }
        }

        let prev = stream
            .dict
            .get("Prev")
            .and_then(Object::as_integer)
            .filter(|&v| v >= 0)
            .map(|v| v as u64);

        if hybrid {
            self.compression = Compression::Hybrid;
        } else if self.compression == Compression::None {
            self.compression = Compression::All;
        }

        self.sections.push(Section::Stream(StreamSection {
            widths,
            row_len,
            ranges,
            raw: stream,
            decoded: None,
        }));

        // a hybrid side stream must not extend the chain
        Ok(if hybrid { None } else { prev })
    }

    // -- lookup ----------------------------------------------------------

    fn scan_sections(&mut self, id: u32, gen: Option<u32>) -> Result<Option<Cached>> {
        let start_offset = self.start_offset;
        for i in 0..self.sections.len() {
            if matches!(self.sections[i], Section::Classic(_)) {
                let ranges = match &self.sections[i] {
                    Section::Classic(ranges) => ranges.clone(),
                    Section::Stream(_) => continue,
                };
                for range in ranges {
                    if id < range.start_id || id - range.start_id >= range.count {
                        continue;
                    }
                    match self.read_classic_row(range, id, gen)? {
                        RowOutcome::Found(cached) => return Ok(Some(cached)),
                        RowOutcome::Free => return Ok(Some(Cached::Free)),
                        RowOutcome::Mismatch => continue,
                        RowOutcome::Malformed => return Ok(None),
                    }
                }
            } else if let Section::Stream(section) = &mut self.sections[i] {
                match stream_lookup(section, id, gen, start_offset)? {
                    Some(RowOutcome::Found(cached)) => return Ok(Some(cached)),
                    Some(RowOutcome::Free) => return Ok(Some(Cached::Free)),
                    Some(RowOutcome::Malformed) => return Ok(None),
                    Some(RowOutcome::Mismatch) | None => {},
                }
            }
        }
        Ok(None)
    }

    /// Decode one classic row on demand. A blank line where a row should
    /// start is skipped once (stray EOL bytes between rows).
    fn read_classic_row(
        &mut self,
        range: ClassicRange,
        id: u32,
        gen: Option<u32>,
    ) -> Result<RowOutcome> {
        let row_pos = range.pos + u64::from(id - range.start_id) * ROW_LEN;
        let reader = self.parser.reader_mut();
        if row_pos >= reader.len() {
            return Ok(RowOutcome::Malformed);
        }
        reader.ensure(row_pos, 0)?;

        let mut line = match reader.read_line(ROW_LEN as usize)? {
            Some(line) => line,
            None => return Ok(RowOutcome::Malformed),
        };
        if line.iter().all(|&b| is_whitespace(b)) {
            line = match reader.read_line(ROW_LEN as usize)? {
                Some(line) => line,
                None => return Ok(RowOutcome::Malformed),
            };
        }

        let text = String::from_utf8_lossy(&line);
        let parts: Vec<&str> = text.split_whitespace().collect();
        if parts.len() < 3 {
            log::warn!("malformed cross-reference row for object {} at byte {}", id, row_pos);
            return Ok(RowOutcome::Malformed);
        }
        if parts[2] == "f" {
            return Ok(RowOutcome::Free);
        }

        let row_gen: u32 = match parts[1].parse() {
            Ok(g) => g,
            Err(_) => return Ok(RowOutcome::Malformed),
        };
        if let Some(wanted) = gen {
            if wanted != row_gen {
                return Ok(RowOutcome::Mismatch);
            }
        }
        let offset: u64 = match parts[0].parse() {
            Ok(o) => o,
            Err(_) => return Ok(RowOutcome::Malformed),
        };

        Ok(RowOutcome::Found(Cached::Found {
            gen: row_gen,
            loc: Location::Offset(self.start_offset + offset),
        }))
    }
}

/// Look `id` up in one xref stream section, decoding its bytes on first
/// touch.
fn stream_lookup(
    section: &mut StreamSection,
    id: u32,
    gen: Option<u32>,
    start_offset: u64,
) -> Result<Option<RowOutcome>> {
    let widths = section.widths;
    let row_len = section.row_len;

    let mut base = 0usize;
    for &(first, count) in &section.ranges.clone() {
        if id < first || id - first >= count {
            base += count as usize;
            continue;
        }
        let index = base + (id - first) as usize;
        let bytes = section.bytes()?;
        let row_start = index * row_len;
        if row_start + row_len > bytes.len() {
            log::warn!("xref stream row {} is out of bounds", index);
            return Ok(Some(RowOutcome::Malformed));
        }
        let row = &bytes[row_start..row_start + row_len];

        let (mut at, w) = (0usize, widths);
        let entry_type = if w[0] == 0 {
            1
        } else {
            read_int(&row[at..at + w[0]])
        };
        at += w[0];
        let field2 = read_int(&row[at..at + w[1]]);
        at += w[1];
        let field3 = read_int(&row[at..at + w[2]]);

        return Ok(Some(match entry_type {
            0 => RowOutcome::Free,
            1 => {
                let row_gen = field3 as u32;
                match gen {
                    Some(wanted) if wanted != row_gen => RowOutcome::Mismatch,
                    _ => RowOutcome::Found(Cached::Found {
                        gen: row_gen,
                        loc: Location::Offset(start_offset + field2),
                    }),
                }
            },
            2 => match gen {
                Some(wanted) if wanted != 0 => RowOutcome::Mismatch,
                _ => RowOutcome::Found(Cached::Found {
                    gen: 0,
                    loc: Location::InStream {
                        stream_id: field2 as u32,
                        index: field3 as u32,
                    },
                }),
            },
            other => {
                log::warn!("xref stream entry type {} for object {} ignored", other, id);
                RowOutcome::Mismatch
            },
        }));
    }
    Ok(None)
}

/// Big-endian variable-width integer; a zero-width field reads as 0.
fn read_int(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
}

fn parse_widths(dict: &IndexMap<String, Object>) -> Result<[usize; 3]> {
    let entries = dict
        .get("W")
        .and_then(Object::as_array)
        .ok_or_else(|| Error::InvalidXref("xref stream is missing /W".to_string()))?;
    if entries.len() < 3 {
        return Err(Error::InvalidXref("xref stream /W needs 3 entries".to_string()));
    }
    let mut widths = [0usize; 3];
    for (slot, entry) in widths.iter_mut().zip(entries) {
        *slot = entry
            .as_integer()
            .filter(|&v| (0..=8).contains(&v))
            .ok_or_else(|| Error::InvalidXref("invalid /W field width".to_string()))?
            as usize;
    }
    if widths.iter().sum::<usize>() == 0 {
        return Err(Error::InvalidXref("xref stream /W is all zero".to_string()));
    }
    Ok(widths)
}

fn parse_index(dict: &IndexMap<String, Object>, size: u32) -> Result<Vec<(u32, u32)>> {
    let entries = match dict.get("Index").and_then(Object::as_array) {
        None => return Ok(vec![(0, size)]),
        Some(entries) => entries,
    };
    if entries.len() % 2 != 0 {
        return Err(Error::InvalidXref(
            "xref stream /Index has an odd number of entries".to_string(),
        ));
    }
    let mut ranges = Vec::with_capacity(entries.len() / 2);
    for pair in entries.chunks(2) {
        let first = pair[0]
            .as_integer()
            .filter(|&v| v >= 0)
            .ok_or_else(|| Error::InvalidXref("invalid /Index entry".to_string()))?;
        let count = pair[1]
            .as_integer()
            .filter(|&v| v >= 0)
            .ok_or_else(|| Error::InvalidXref("invalid /Index entry".to_string()))?;
        ranges.push((first as u32, count as u32));
    }
    Ok(ranges)
}

/// Shape check for the first row of a subsection, given the row's 20 bytes
/// plus the following byte when one exists. Bytes 18 and 19 must terminate
/// the row and byte 20 must already belong to the next line, otherwise the
/// rows are wider than 20 bytes and the stride arithmetic would misread
/// every entry after the first.
fn row_shape_ok(probe: &[u8]) -> bool {
    let eol = |b: u8| matches!(b, b' ' | b'\r' | b'\n');
    probe.len() >= ROW_LEN as usize
        && probe[..10].iter().all(u8::is_ascii_digit)
        && probe[10] == b' '
        && probe[11..16].iter().all(u8::is_ascii_digit)
        && probe[16] == b' '
        && matches!(probe[17], b'n' | b'f')
        && eol(probe[18])
        && eol(probe[19])
        && probe.get(20).map_or(true, |&b| !eol(b))
}

fn find_header<R: Read + Seek>(parser: &mut PdfParser<R>, chunk: usize) -> Result<u64> {
    let reader = parser.reader_mut();
    reader.reset(0, Some(chunk))?;
    loop {
        if let Some(at) = find(reader.buffer(), b"%PDF-") {
            return Ok(at as u64);
        }
        if !reader.increase_length(chunk)? {
            return Err(Error::InvalidHeader);
        }
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .rposition(|window| window == needle)
}

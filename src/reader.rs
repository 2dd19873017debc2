//! Windowed byte source over a file or memory blob.
//!
//! PDF parsing is random access: the trailer is found by searching backward
//! from end-of-file, classic xref rows are read by fixed-stride arithmetic,
//! and stream bodies are sliced by byte count. [`Reader`] exposes a growable
//! buffer window over any `Read + Seek` source together with a cursor, so
//! callers can scan forward incrementally (`increase_length`) without
//! re-reading, or jump anywhere (`reset`, `ensure`).
//!
//! All absolute positions are file offsets; the cursor (`offset`) is
//! relative to the current window start (`pos`).

use crate::error::{Error, Result};
use std::io::{Cursor, Read, Seek, SeekFrom};

/// Default window size loaded by [`Reader::reset`] when no explicit length
/// is requested.
const DEFAULT_BLOCK_SIZE: usize = 8192;

/// A random-access, growable-window byte reader.
#[derive(Debug)]
pub struct Reader<R> {
    source: R,
    /// Total length of the underlying source in bytes.
    len: u64,
    /// The current window.
    buffer: Vec<u8>,
    /// Absolute offset of the window start.
    pos: u64,
    /// Cursor, relative to the window start.
    offset: usize,
    block_size: usize,
}

impl Reader<Cursor<Vec<u8>>> {
    /// Create a reader over an in-memory buffer.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        let len = data.len() as u64;
        Self {
            source: Cursor::new(data),
            len,
            buffer: Vec::new(),
            pos: 0,
            offset: 0,
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

impl<R: Read + Seek> Reader<R> {
    /// Create a reader over any seekable source (e.g. a `File`).
    pub fn new(mut source: R) -> Result<Self> {
        let len = source.seek(SeekFrom::End(0))?;
        Ok(Self {
            source,
            len,
            buffer: Vec::new(),
            pos: 0,
            offset: 0,
            block_size: DEFAULT_BLOCK_SIZE,
        })
    }

    /// Total length of the underlying source.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether the underlying source is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Absolute offset of the window start.
    pub fn pos(&self) -> u64 {
        self.pos
    }

    /// Cursor position relative to the window start.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Move the cursor within the window.
    pub fn set_offset(&mut self, offset: usize) {
        self.offset = offset;
    }

    /// Absolute position of the cursor.
    pub fn cursor_pos(&self) -> u64 {
        self.pos + self.offset as u64
    }

    /// The current window.
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Reposition the window and clear the cursor.
    ///
    /// A negative `pos` is relative to end-of-file (clamped to 0), which is
    /// how the trailer search window is opened. `length` bounds the initial
    /// window; it is clamped to the remaining bytes.
    pub fn reset(&mut self, pos: i64, length: Option<usize>) -> Result<()> {
        let abs = if pos < 0 {
            self.len.saturating_sub(pos.unsigned_abs())
        } else {
            (pos as u64).min(self.len)
        };

        let want = length.unwrap_or(self.block_size);
        let avail = (self.len - abs) as usize;
        let take = want.min(avail);

        self.source.seek(SeekFrom::Start(abs))?;
        self.buffer.resize(take, 0);
        self.source.read_exact(&mut self.buffer)?;
        self.pos = abs;
        self.offset = 0;
        Ok(())
    }

    /// Grow the window forward by up to `n` bytes without moving the cursor.
    ///
    /// Returns `Ok(false)` when the source is exhausted and nothing could be
    /// added; forward-search loops use this as their terminator.
    pub fn increase_length(&mut self, n: usize) -> Result<bool> {
        let end = self.pos + self.buffer.len() as u64;
        if end >= self.len {
            return Ok(false);
        }

        let take = n.min((self.len - end) as usize);
        let old_len = self.buffer.len();
        self.source.seek(SeekFrom::Start(end))?;
        self.buffer.resize(old_len + take, 0);
        self.source.read_exact(&mut self.buffer[old_len..])?;
        Ok(true)
    }

    /// Guarantee that `min` bytes are readable at absolute offset `abs` and
    /// place the cursor there.
    ///
    /// Fails with [`Error::UnexpectedEof`] if the source cannot supply them.
    pub fn ensure(&mut self, abs: u64, min: usize) -> Result<()> {
        if abs + min as u64 > self.len {
            return Err(Error::UnexpectedEof);
        }

        let window_end = self.pos + self.buffer.len() as u64;
        if abs >= self.pos && abs + min as u64 <= window_end {
            self.offset = (abs - self.pos) as usize;
            return Ok(());
        }

        self.reset(abs as i64, Some(min.max(self.block_size)))?;
        Ok(())
    }

    /// Byte at window-relative position `rel`, growing the window if
    /// needed. `None` once the source is exhausted.
    pub fn byte_at(&mut self, rel: usize) -> Result<Option<u8>> {
        while rel >= self.buffer.len() {
            if !self.increase_length(self.block_size)? {
                return Ok(None);
            }
        }
        Ok(Some(self.buffer[rel]))
    }

    /// Read up to `n` bytes at the cursor, advancing it. May return fewer
    /// bytes at end-of-file.
    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        while self.buffer.len() < self.offset + n {
            if !self.increase_length(self.block_size.max(n))? {
                break;
            }
        }
        let end = (self.offset + n).min(self.buffer.len());
        let start = self.offset.min(end);
        let out = self.buffer[start..end].to_vec();
        self.offset = end;
        Ok(out)
    }

    /// Read one line of at most `max` bytes at the cursor.
    ///
    /// The line terminator (`\r\n`, `\n`, or a lone `\r`) is consumed but
    /// not returned. `None` when the cursor is at end-of-file. A line that
    /// reaches `max` bytes without a terminator is returned as-is.
    pub fn read_line(&mut self, max: usize) -> Result<Option<Vec<u8>>> {
        if self.cursor_pos() >= self.len {
            return Ok(None);
        }

        let mut line = Vec::new();
        loop {
            let rel = self.offset + line.len();
            let byte = match self.byte_at(rel)? {
                Some(b) => b,
                None => {
                    // EOF terminates the final line
                    self.offset = rel;
                    return Ok(Some(line));
                },
            };

            match byte {
                b'\n' => {
                    self.offset = rel + 1;
                    return Ok(Some(line));
                },
                b'\r' => {
                    let skip = match self.byte_at(rel + 1)? {
                        Some(b'\n') => 2,
                        _ => 1,
                    };
                    self.offset = rel + skip;
                    return Ok(Some(line));
                },
                b => {
                    line.push(b);
                    if line.len() >= max {
                        self.offset = rel + 1;
                        return Ok(Some(line));
                    }
                },
            }
        }
    }
}

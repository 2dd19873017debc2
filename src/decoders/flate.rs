//! FlateDecode (zlib/deflate).

use crate::error::{Error, Result};
use flate2::read::{DeflateDecoder, ZlibDecoder};
use std::io::Read;

/// Inflate zlib-wrapped data; fall back to raw deflate for writers that
/// omit the zlib header.
pub fn decode(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut zlib = ZlibDecoder::new(data);
    if zlib.read_to_end(&mut out).is_ok() {
        return Ok(out);
    }

    out.clear();
    let mut raw = DeflateDecoder::new(data);
    raw.read_to_end(&mut out)
        .map_err(|e| Error::Decode(format!("flate decode failed: {}", e)))?;
    Ok(out)
}

//! LZWDecode.

use crate::error::{Error, Result};
use weezl::{decode::Decoder, BitOrder};

/// Expand LZW-compressed data.
///
/// `early_change` selects the off-by-one code-width switch used by almost
/// every producer (`/EarlyChange 1`, the default).
pub fn decode(data: &[u8], early_change: bool) -> Result<Vec<u8>> {
    let mut decoder = if early_change {
        Decoder::with_tiff_size_switch(BitOrder::Msb, 8)
    } else {
        Decoder::new(BitOrder::Msb, 8)
    };
    decoder
        .decode(data)
        .map_err(|e| Error::Decode(format!("lzw decode failed: {}", e)))
}

//! ASCIIHexDecode.

use crate::error::{Error, Result};

/// Decode hex pairs. Whitespace is ignored, `>` terminates the data, and a
/// trailing odd digit is padded with zero.
pub fn decode(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(data.len() / 2);
    let mut high: Option<u8> = None;

    for &byte in data {
        let digit = match byte {
            b'>' => break,
            b'0'..=b'9' => byte - b'0',
            b'a'..=b'f' => byte - b'a' + 10,
            b'A'..=b'F' => byte - b'A' + 10,
            0x00 | 0x09 | 0x0A | 0x0C | 0x0D | 0x20 => continue,
            other => {
                return Err(Error::Decode(format!(
                    "invalid hex digit 0x{:02X}",
                    other
                )))
            },
        };
        match high.take() {
            Some(h) => out.push((h << 4) | digit),
            None => high = Some(digit),
        }
    }

    if let Some(h) = high {
        out.push(h << 4);
    }
    Ok(out)
}

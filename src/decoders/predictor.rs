//! Predictor post-processing for Flate/LZW data.
//!
//! Xref streams are almost always written with PNG Up prediction
//! (`/Predictor 12`), so this path is exercised on nearly every modern
//! file.

use crate::error::{Error, Result};

use super::DecodeParams;

/// Reverse the predictor named in `params`. Predictor 1 (none) is the
/// identity; 2 is TIFF horizontal differencing; 10..=15 are the PNG
/// filters, selected per row by a leading filter byte.
pub fn apply(data: &[u8], params: &DecodeParams) -> Result<Vec<u8>> {
    match params.predictor {
        1 => Ok(data.to_vec()),
        2 => tiff(data, params),
        10..=15 => png(data, params),
        other => Err(Error::Decode(format!("unknown predictor {}", other))),
    }
}

fn bytes_per_pixel(params: &DecodeParams) -> usize {
    let bits = params.colors * params.bits_per_component;
    ((bits + 7) / 8).max(1) as usize
}

fn row_len(params: &DecodeParams) -> usize {
    let bits = params.columns * params.colors * params.bits_per_component;
    ((bits + 7) / 8).max(1) as usize
}

fn tiff(data: &[u8], params: &DecodeParams) -> Result<Vec<u8>> {
    if params.bits_per_component != 8 {
        return Err(Error::Decode(
            "TIFF predictor only supported for 8 bits per component".to_string(),
        ));
    }
    let stride = params.colors.max(1) as usize;
    let row = row_len(params);
    let mut out = data.to_vec();
    for r in out.chunks_mut(row) {
        for i in stride..r.len() {
            r[i] = r[i].wrapping_add(r[i - stride]);
        }
    }
    Ok(out)
}

fn png(data: &[u8], params: &DecodeParams) -> Result<Vec<u8>> {
    let row = row_len(params);
    let bpp = bytes_per_pixel(params);
    // each encoded row carries one leading filter-type byte
    if data.len() % (row + 1) != 0 {
        return Err(Error::Decode(format!(
            "predicted data length {} is not a multiple of row size {}",
            data.len(),
            row + 1
        )));
    }

    let mut out = Vec::with_capacity(data.len() / (row + 1) * row);
    let mut prev = vec![0u8; row];

    for encoded in data.chunks(row + 1) {
        let filter = encoded[0];
        let mut cur = encoded[1..].to_vec();

        match filter {
            0 => {},
            1 => {
                for i in bpp..row {
                    cur[i] = cur[i].wrapping_add(cur[i - bpp]);
                }
            },
            2 => {
                for i in 0..row {
                    cur[i] = cur[i].wrapping_add(prev[i]);
                }
            },
            3 => {
                for i in 0..row {
                    let left = if i >= bpp { cur[i - bpp] as u16 } else { 0 };
                    let up = prev[i] as u16;
                    cur[i] = cur[i].wrapping_add(((left + up) / 2) as u8);
                }
            },
            4 => {
                for i in 0..row {
                    let left = if i >= bpp { cur[i - bpp] } else { 0 };
                    let up = prev[i];
                    let up_left = if i >= bpp { prev[i - bpp] } else { 0 };
                    cur[i] = cur[i].wrapping_add(paeth(left, up, up_left));
                }
            },
            other => {
                return Err(Error::Decode(format!("unknown PNG filter type {}", other)));
            },
        }

        out.extend_from_slice(&cur);
        prev = cur;
    }
    Ok(out)
}

fn paeth(a: u8, b: u8, c: u8) -> u8 {
    let p = a as i16 + b as i16 - c as i16;
    let pa = (p - a as i16).abs();
    let pb = (p - b as i16).abs();
    let pc = (p - c as i16).abs();
    if pa <= pb && pa <= pc {
        a
    } else if pb <= pc {
        b
    } else {
        c
    }
}

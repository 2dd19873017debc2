//! Stream filter decoders.
//!
//! Each submodule implements one standard filter. [`decode_stream`] reads
//! `/Filter` and `/DecodeParms` from a stream dictionary and runs the body
//! through the chain in order. Unknown filters fail with
//! [`Error::UnsupportedFilter`] rather than silently passing bytes through.

pub mod ascii_hex;
pub mod flate;
pub mod lzw;
pub mod predictor;

use crate::error::{Error, Result};
use crate::object::Object;
use indexmap::IndexMap;

/// Decode parameters relevant to the filters implemented here.
#[derive(Debug, Clone, Copy)]
pub struct DecodeParams {
    pub predictor: i64,
    pub colors: i64,
    pub bits_per_component: i64,
    pub columns: i64,
    pub early_change: i64,
}

impl Default for DecodeParams {
    fn default() -> Self {
        Self {
            predictor: 1,
            colors: 1,
            bits_per_component: 8,
            columns: 1,
            early_change: 1,
        }
    }
}

impl DecodeParams {
    /// Extract the parameters from a `/DecodeParms` entry, falling back to
    /// the defaults for absent keys.
    pub fn from_object(obj: Option<&Object>) -> Self {
        let mut params = Self::default();
        let dict = match obj {
            Some(Object::Dictionary(d)) => d,
            _ => return params,
        };
        if let Some(v) = dict.get("Predictor").and_then(Object::as_integer) {
            params.predictor = v;
        }
        if let Some(v) = dict.get("Colors").and_then(Object::as_integer) {
            params.colors = v;
        }
        if let Some(v) = dict.get("BitsPerComponent").and_then(Object::as_integer) {
            params.bits_per_component = v;
        }
        if let Some(v) = dict.get("Columns").and_then(Object::as_integer) {
            params.columns = v;
        }
        if let Some(v) = dict.get("EarlyChange").and_then(Object::as_integer) {
            params.early_change = v;
        }
        params
    }
}

/// Names of the filters to apply, in order.
fn filter_chain(dict: &IndexMap<String, Object>) -> Result<Vec<String>> {
    match dict.get("Filter") {
        None => Ok(Vec::new()),
        Some(Object::Name(name)) => Ok(vec![name.clone()]),
        Some(Object::Array(items)) => items
            .iter()
            .map(|item| match item {
                Object::Name(name) => Ok(name.clone()),
                other => Err(Error::Decode(format!(
                    "non-name entry in /Filter array: {:?}",
                    other
                ))),
            })
            .collect(),
        Some(other) => Err(Error::Decode(format!("invalid /Filter value: {:?}", other))),
    }
}

/// Per-filter decode parameters, aligned with the filter chain.
fn params_chain(dict: &IndexMap<String, Object>, n: usize) -> Vec<DecodeParams> {
    let parms = dict.get("DecodeParms").or_else(|| dict.get("DP"));
    match parms {
        Some(Object::Array(items)) => (0..n)
            .map(|i| DecodeParams::from_object(items.get(i)))
            .collect(),
        other => {
            let mut out = vec![DecodeParams::default(); n];
            if let Some(first) = out.first_mut() {
                *first = DecodeParams::from_object(other);
            }
            out
        },
    }
}

/// Run `data` through the stream's filter chain.
pub fn decode_stream(dict: &IndexMap<String, Object>, data: &[u8]) -> Result<Vec<u8>> {
    let filters = filter_chain(dict)?;
    let params = params_chain(dict, filters.len());

    let mut out = data.to_vec();
    for (filter, param) in filters.iter().zip(params) {
        out = match filter.as_str() {
            "FlateDecode" | "Fl" => {
                let inflated = flate::decode(&out)?;
                predictor::apply(&inflated, &param)?
            },
            "LZWDecode" | "LZW" => {
                let expanded = lzw::decode(&out, param.early_change != 0)?;
                predictor::apply(&expanded, &param)?
            },
            "ASCIIHexDecode" | "AHx" => ascii_hex::decode(&out)?,
            other => return Err(Error::UnsupportedFilter(other.to_string())),
        };
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict_with_filter(filter: Object) -> IndexMap<String, Object> {
        let mut dict = IndexMap::new();
        dict.insert("Filter".to_string(), filter);
        dict
    }

    #[test]
    fn test_no_filter_is_identity() {
        let dict = IndexMap::new();
        assert_eq!(decode_stream(&dict, b"raw").unwrap(), b"raw");
    }

    #[test]
    fn test_unknown_filter_is_rejected() {
        let dict = dict_with_filter(Object::Name("DCTDecode".into()));
        assert!(matches!(
            decode_stream(&dict, b""),
            Err(Error::UnsupportedFilter(name)) if name == "DCTDecode"
        ));
    }

    #[test]
    fn test_flate_roundtrip_via_chain() {
        use flate2::write::ZlibEncoder;
        use flate2::Compression;
        use std::io::Write;

        let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
        enc.write_all(b"hello stream body").unwrap();
        let compressed = enc.finish().unwrap();

        let dict = dict_with_filter(Object::Name("FlateDecode".into()));
        assert_eq!(
            decode_stream(&dict, &compressed).unwrap(),
            b"hello stream body"
        );
    }

    #[test]
    fn test_filter_array_chain() {
        use flate2::write::ZlibEncoder;
        use flate2::Compression;
        use std::io::Write;

        let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
        enc.write_all(b"chained").unwrap();
        let compressed = enc.finish().unwrap();
        let hexed: String = compressed.iter().map(|b| format!("{:02X}", b)).collect();
        let input = format!("{}>", hexed);

        let dict = dict_with_filter(Object::Array(vec![
            Object::Name("ASCIIHexDecode".into()),
            Object::Name("FlateDecode".into()),
        ]));
        assert_eq!(decode_stream(&dict, input.as_bytes()).unwrap(), b"chained");
    }

    #[test]
    fn test_decode_params_extraction() {
        let mut parms = IndexMap::new();
        parms.insert("Predictor".to_string(), Object::Integer(12));
        parms.insert("Columns".to_string(), Object::Integer(4));
        let params = DecodeParams::from_object(Some(&Object::Dictionary(parms)));
        assert_eq!(params.predictor, 12);
        assert_eq!(params.columns, 4);
        assert_eq!(params.colors, 1);
        assert_eq!(params.bits_per_component, 8);
    }
}

//! # AMF3 — Action Message Format v3 Value Codec
//!
//! Binary game objects ship as one AMF3 value wrapped in *raw* deflate — no
//! zlib header, no gzip framing. This crate decodes that wire form into a
//! `serde_json::Value` tree (insertion-ordered maps) and encodes JSON back.
//!
//! ## Supported markers
//!
//! ```text
//! 0x00 undefined   -> null          0x06 string      (utf8-vr, ref table)
//! 0x01 null        -> null          0x08 date        -> epoch-millis double
//! 0x02 false                        0x09 array       (dense + associative)
//! 0x03 true                         0x0a object      (traits, dynamic members)
//! 0x04 integer     (29-bit signed)
//! 0x05 double      (f64 BE)
//! ```
//!
//! XML, XMLDocument, ByteArray, and externalizable traits are rejected as
//! [`Amf3Error::Unsupported`] — the game never emits them.
//!
//! ## Reference tables
//!
//! Strings, complex values, and traits each get a read-side reference table
//! per the format. Complex-table slots are reserved *before* member decoding
//! so indices line up with writers that emit back-references. The encoder
//! maintains a write-side string table; complex values are always written
//! inline (game payloads are trees, not graphs).
//!
//! ## Containers
//!
//! Empty arrays and objects decode to empty containers, never to `null`, so
//! a JSON round-trip cannot lose structure. JSON objects encode as
//! anonymous dynamic objects and JSON arrays as dense strict arrays.

use thiserror::Error;

mod reader;
mod writer;

pub use reader::decode_value;
pub use writer::encode_value;

use serde_json::Value;

/// Errors from the AMF3 codec.
#[derive(Debug, Error)]
pub enum Amf3Error {
    /// Truncated input, a dangling reference, or a structural violation.
    #[error("bad amf3: {0}")]
    Corrupt(String),

    /// A marker or trait shape the game formats never use.
    #[error("unsupported amf3 marker 0x{0:02x}")]
    Unsupported(u8),

    /// A JSON value with no AMF3 representation (e.g. an empty object key,
    /// which would collide with the dynamic-member terminator).
    #[error("cannot encode as amf3: {0}")]
    Unencodable(String),

    /// Deflate wrapper or buffer I/O failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid JSON handed to the encoder.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Inflates and decodes a deflate-wrapped AMF3 payload, rendering JSON.
///
/// `indent == 0` emits compact JSON, otherwise pretty-printed.
pub fn to_json(raw: &[u8], indent: usize) -> Result<Vec<u8>, Amf3Error> {
    let data = codec::flate::inflate(raw)
        .map_err(|e| Amf3Error::Corrupt(format!("flate decompress error: {e}")))?;
    let value = decode_value(&data)?;
    Ok(codec::json::to_vec(&value, indent)?)
}

/// Encodes a JSON document as a deflate-wrapped AMF3 payload.
pub fn from_json(json: &[u8]) -> Result<Vec<u8>, Amf3Error> {
    let value: Value = serde_json::from_slice(json)?;
    let encoded = encode_value(&value)?;
    Ok(codec::flate::deflate(&encoded)?)
}

//! # OrderedMap — The Game's Recursive Container Format
//!
//! Master tables ship as a bespoke nested ordered map. A node is either a
//! *leaf* — a zlib-compressed CSV record set — or a *map*:
//!
//! ```text
//! [header_size: i32 LE][zlib(header): header_size bytes][value_section ...]
//!
//! inflated header:
//! [entries_count: i32 LE]
//! [key_end: i32 LE][value_end: i32 LE]   * entries_count   (cumulative)
//! [key_section ...]
//! ```
//!
//! Keys and values are sliced out of their sections with cumulative end
//! offsets (`key_i = key_section[key_end_{i-1} .. key_end_i]`, first offset
//! implicitly 0). Every value is itself a node, parsed leaf-first: attempt a
//! zlib inflate, fall back to the map layout when that fails.
//!
//! ## Order
//!
//! Key order is load-bearing — the client indexes some tables positionally —
//! so decoded maps are `Vec<(String, Node)>` and JSON emission preserves
//! insertion order. Re-encoding shallow-parses JSON objects into an ordered
//! `(key, raw value)` list and recurses on the raw slices rather than
//! round-tripping through a full parse.
//!
//! ## Round-trip contract
//!
//! `decode(encode(decode(b))) == decode(b)`. Byte equality of `encode` with
//! the original is *not* guaranteed — zlib output differs across compressor
//! settings — so equality checks must re-decode.

use thiserror::Error;

mod decode;
mod encode;
mod node;

pub use decode::decode;
pub use encode::encode;
pub use node::Node;

/// Errors from the ordered-map codec.
#[derive(Debug, Error)]
pub enum OrderedMapError {
    /// Structural violation: truncated or oversized header, negative or
    /// non-monotonic offsets, non-UTF-8 key bytes, or JSON input that is
    /// neither an array nor an object.
    #[error("malformed ordered map: {0}")]
    Malformed(String),

    /// A leaf payload that inflated but is not valid CSV, or a PNG/CSV
    /// primitive failure bubbling up.
    #[error(transparent)]
    Codec(#[from] codec::CodecError),

    /// Invalid JSON handed to the encoder.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Compression I/O failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Decodes raw ordered-map bytes and renders them as JSON.
///
/// `indent == 0` emits compact JSON; otherwise pretty-printed with that many
/// spaces. `flatten_csv` collapses each CSV leaf into a single row-major
/// array of strings.
pub fn to_json(raw: &[u8], indent: usize, flatten_csv: bool) -> Result<Vec<u8>, OrderedMapError> {
    let node = decode(raw, flatten_csv)?;
    Ok(codec::json::to_vec(&node, indent)?)
}

/// Re-encodes JSON (as produced by [`to_json`]) into ordered-map bytes.
pub fn from_json(json: &[u8]) -> Result<Vec<u8>, OrderedMapError> {
    encode(json)
}

#[cfg(test)]
mod tests;

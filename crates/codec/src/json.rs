//! Order-preserving JSON emission.
//!
//! Decoded containers are insertion-ordered trees; this helper serializes
//! them compactly at `indent == 0` or pretty-printed with the given number
//! of spaces otherwise. Kept here so the ordered-map and AMF3 crates emit
//! byte-identical styles.

use serde::Serialize;

/// Serializes `value` to JSON bytes with `indent` spaces per level.
pub fn to_vec<T: Serialize>(value: &T, indent: usize) -> serde_json::Result<Vec<u8>> {
    if indent == 0 {
        return serde_json::to_vec(value);
    }
    let pad = vec![b' '; indent];
    let mut out = Vec::new();
    let fmt = serde_json::ser::PrettyFormatter::with_indent(&pad);
    let mut ser = serde_json::Serializer::with_formatter(&mut out, fmt);
    value.serialize(&mut ser)?;
    Ok(out)
}

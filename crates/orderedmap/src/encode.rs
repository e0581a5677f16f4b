use byteorder::{LittleEndian, WriteBytesExt};
use indexmap::IndexMap;
use serde_json::value::RawValue;

use crate::OrderedMapError;

/// Encodes JSON bytes into the ordered-map wire format.
///
/// Mirrors the decoder: a JSON array becomes a zlib-compressed CSV leaf, a
/// JSON object becomes the map layout with every child encoded recursively.
/// Objects are shallow-parsed — keys in order, values kept as raw JSON
/// slices — so child formatting never goes through a parse/serialize round.
///
/// Empty input encodes to empty bytes; any other leading byte is
/// [`OrderedMapError::Malformed`].
pub fn encode(json: &[u8]) -> Result<Vec<u8>, OrderedMapError> {
    let data = trim_leading_whitespace(json);
    if data.is_empty() {
        return Ok(Vec::new());
    }
    match data[0] {
        b'[' => encode_leaf(data),
        b'{' => encode_map(data),
        b => Err(OrderedMapError::Malformed(format!(
            "expected '[' or '{{' at start of node, found 0x{b:02x}"
        ))),
    }
}

fn encode_leaf(data: &[u8]) -> Result<Vec<u8>, OrderedMapError> {
    let rows: Vec<Vec<String>> = serde_json::from_slice(data)?;
    let csv = codec::csv::write_rows(&rows);
    Ok(codec::zlib::compress(&csv)?)
}

fn encode_map(data: &[u8]) -> Result<Vec<u8>, OrderedMapError> {
    let children: IndexMap<String, Box<RawValue>> = serde_json::from_slice(data)?;

    let mut key_section: Vec<u8> = Vec::new();
    let mut value_section: Vec<u8> = Vec::new();
    let mut offsets: Vec<(i32, i32)> = Vec::with_capacity(children.len());

    for (key, raw_value) in &children {
        let value = encode(raw_value.get().as_bytes())?;

        key_section.extend_from_slice(key.as_bytes());
        value_section.extend_from_slice(&value);

        let key_end = section_offset(key_section.len(), "key")?;
        let value_end = section_offset(value_section.len(), "value")?;
        offsets.push((key_end, value_end));
    }

    // Header: entries_count | (key_end, value_end) pairs | key_section.
    let mut header = Vec::with_capacity(4 + offsets.len() * 8 + key_section.len());
    header.write_i32::<LittleEndian>(offsets.len() as i32)?;
    for (key_end, value_end) in &offsets {
        header.write_i32::<LittleEndian>(*key_end)?;
        header.write_i32::<LittleEndian>(*value_end)?;
    }
    header.extend_from_slice(&key_section);

    let compressed_header = codec::zlib::compress(&header)?;
    let header_size = section_offset(compressed_header.len(), "compressed header")?;

    let mut out = Vec::with_capacity(4 + compressed_header.len() + value_section.len());
    out.write_i32::<LittleEndian>(header_size)?;
    out.extend_from_slice(&compressed_header);
    out.extend_from_slice(&value_section);
    Ok(out)
}

/// The wire format stores section offsets as signed 32-bit values.
fn section_offset(len: usize, what: &str) -> Result<i32, OrderedMapError> {
    i32::try_from(len).map_err(|_| {
        OrderedMapError::Malformed(format!("{what} section exceeds i32 range: {len} bytes"))
    })
}

fn trim_leading_whitespace(data: &[u8]) -> &[u8] {
    let start = data
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(data.len());
    &data[start..]
}

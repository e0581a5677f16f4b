use byteorder::{LittleEndian, ReadBytesExt};

use crate::{Node, OrderedMapError};

/// Decodes ordered-map bytes into a [`Node`] tree.
///
/// A node is probed leaf-first: if the whole buffer inflates as zlib it must
/// be CSV (a leaf that inflates but fails CSV parsing is an error, not a
/// fallback). Otherwise the buffer is parsed as the map layout with full
/// bounds validation; any structural violation is
/// [`OrderedMapError::Malformed`].
pub fn decode(raw: &[u8], flatten_csv: bool) -> Result<Node, OrderedMapError> {
    if let Ok(inflated) = codec::zlib::decompress(raw) {
        let rows = codec::csv::read_rows(&inflated)?;
        if flatten_csv {
            return Ok(Node::Flat(rows.into_iter().flatten().collect()));
        }
        return Ok(Node::Rows(rows));
    }
    decode_map(raw, flatten_csv)
}

fn decode_map(raw: &[u8], flatten_csv: bool) -> Result<Node, OrderedMapError> {
    if raw.len() < 4 {
        return Err(OrderedMapError::Malformed(format!(
            "buffer too short for header length: {} bytes",
            raw.len()
        )));
    }

    let mut rd = &raw[..4];
    let header_size = rd.read_i32::<LittleEndian>()?;
    if header_size < 0 {
        return Err(OrderedMapError::Malformed(format!(
            "negative header size: {header_size}"
        )));
    }
    let header_end = 4usize
        .checked_add(header_size as usize)
        .filter(|&end| end <= raw.len())
        .ok_or_else(|| {
            OrderedMapError::Malformed(format!(
                "header size {header_size} exceeds buffer of {} bytes",
                raw.len()
            ))
        })?;

    let header = codec::zlib::decompress(&raw[4..header_end])
        .map_err(|e| OrderedMapError::Malformed(format!("header is not a zlib stream: {e}")))?;
    if header.len() < 4 {
        return Err(OrderedMapError::Malformed(format!(
            "inflated header too short: {} bytes",
            header.len()
        )));
    }

    let mut rd = &header[..4];
    let entries_count = rd.read_i32::<LittleEndian>()?;
    if entries_count < 0 {
        return Err(OrderedMapError::Malformed(format!(
            "negative entry count: {entries_count}"
        )));
    }
    let count = entries_count as usize;
    let offsets_end = count
        .checked_mul(8)
        .and_then(|n| n.checked_add(4))
        .filter(|&end| end <= header.len())
        .ok_or_else(|| {
            OrderedMapError::Malformed(format!(
                "offset table for {count} entries exceeds header of {} bytes",
                header.len()
            ))
        })?;

    let key_section = &header[offsets_end..];
    let value_section = &raw[header_end..];

    let mut entries = Vec::with_capacity(count);
    let mut key_start = 0usize;
    let mut value_start = 0usize;

    for i in 0..count {
        let mut rd = &header[4 + i * 8..offsets_end];
        let key_end = rd.read_i32::<LittleEndian>()?;
        let value_end = rd.read_i32::<LittleEndian>()?;

        let key_end = usize::try_from(key_end)
            .ok()
            .filter(|&e| e >= key_start && e <= key_section.len())
            .ok_or_else(|| {
                OrderedMapError::Malformed(format!("key offset {key_end} out of range at entry {i}"))
            })?;
        let value_end = usize::try_from(value_end)
            .ok()
            .filter(|&e| e >= value_start && e <= value_section.len())
            .ok_or_else(|| {
                OrderedMapError::Malformed(format!(
                    "value offset {value_end} out of range at entry {i}"
                ))
            })?;

        let key = std::str::from_utf8(&key_section[key_start..key_end])
            .map_err(|e| OrderedMapError::Malformed(format!("key is not utf-8 at entry {i}: {e}")))?
            .to_string();
        let value = decode(&value_section[value_start..value_end], flatten_csv)?;

        entries.push((key, value));
        key_start = key_end;
        value_start = value_end;
    }

    Ok(Node::Map(entries))
}

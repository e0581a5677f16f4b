//! Whole-buffer raw deflate (RFC 1951) helpers.
//!
//! AMF3 payloads ship as a bare deflate stream — no zlib header, no gzip
//! framing — so these intentionally do not share code with [`crate::zlib`].

use std::io::{self, Read, Write};

use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;

/// Inflates a complete raw-deflate stream.
pub fn inflate(compressed: &[u8]) -> io::Result<Vec<u8>> {
    let mut out = Vec::new();
    DeflateDecoder::new(compressed).read_to_end(&mut out)?;
    Ok(out)
}

/// Deflates `raw` with no framing, at the default compression level.
pub fn deflate(raw: &[u8]) -> io::Result<Vec<u8>> {
    let mut enc = DeflateEncoder::new(Vec::new(), Compression::default());
    enc.write_all(raw)?;
    enc.finish()
}

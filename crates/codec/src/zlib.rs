//! Whole-buffer zlib (RFC 1950) helpers.
//!
//! Decompression failure is an expected outcome here, not a defect: the
//! ordered-map decoder probes leaves by attempting an inflate and falls back
//! to the map layout when the bytes are not a zlib stream.

use std::io::{self, Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

/// Inflates a complete zlib stream.
///
/// Returns the underlying decoder error when `compressed` is not valid
/// zlib; callers probing for leaf payloads treat that as "not a leaf".
pub fn decompress(compressed: &[u8]) -> io::Result<Vec<u8>> {
    let mut out = Vec::new();
    ZlibDecoder::new(compressed).read_to_end(&mut out)?;
    Ok(out)
}

/// Deflates `raw` into a zlib stream at the default compression level.
pub fn compress(raw: &[u8]) -> io::Result<Vec<u8>> {
    let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
    enc.write_all(raw)?;
    enc.finish()
}

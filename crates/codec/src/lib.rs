//! # Codec — Primitive Encodings
//!
//! The small encodings every game format is built from:
//!
//! | Module   | Purpose                                                    |
//! |----------|------------------------------------------------------------|
//! | [`zlib`] | zlib (RFC 1950) compress / decompress of whole buffers     |
//! | [`flate`]| raw deflate (RFC 1951) — no zlib or gzip framing           |
//! | [`csv`]  | RFC-4180 record sets (the ordered-map leaf payload)        |
//! | [`png`]  | the client's one-byte-per-char `PNG` → `png` obfuscation   |
//! | [`json`] | order-preserving JSON emission with optional indentation   |
//!
//! Container formats (the ordered map, AMF3) live in their own crates and
//! compose these primitives.

use std::io;

use thiserror::Error;

pub mod csv;
pub mod flate;
pub mod json;
pub mod png;
pub mod zlib;

/// Errors from the primitive codecs.
#[derive(Debug, Error)]
pub enum CodecError {
    /// An underlying I/O or decompression error.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// CSV payload that violates RFC-4180 quoting or is not UTF-8.
    #[error("bad csv: {0}")]
    BadCsv(String),

    /// A stored image whose obfuscated magic is not `png` (or a genuine
    /// PNG handed to the decoder a second time).
    #[error("bad png magic: expected {expected}, found {found}")]
    BadPngMagic {
        /// Hex of the magic the operation required.
        expected: String,
        /// Hex of the three bytes actually present at offset 1.
        found: String,
    },

    /// Input too short to carry the format's fixed header.
    #[error("truncated input: need at least {need} bytes, have {have}")]
    Truncated {
        /// Minimum byte count the format requires.
        need: usize,
        /// Byte count actually supplied.
        have: usize,
    },
}

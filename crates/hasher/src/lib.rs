//! # Hasher — Content Addressing
//!
//! Maps logical asset paths to their on-disk location in the game's
//! content-addressed dump.
//!
//! The client never stores an asset under its logical name. Instead, every
//! file lives at a location derived from a salted SHA-1 of a *transformed*
//! logical path:
//!
//! ```text
//! <root>/upload/<hex[0..2]>/<hex[2..]>
//!        where hex = lowercase SHA-1(transformed_path || SALT)
//! ```
//!
//! The transformation depends on the asset kind — master tables are wrapped
//! as `master/<path>.orderedmap`, binary objects get `<ext>.amf3.deflate`
//! appended, images get `.png` — and is applied by the format handlers. This
//! crate provides the shared pieces: the digest, the shard layout, and the
//! path-string helpers.
//!
//! ## Example
//!
//! ```rust
//! use hasher::{content_address, master_table_path};
//!
//! let hex = content_address(&master_table_path("character/character"));
//! assert_eq!(hex.len(), 40);
//! ```

use sha1::{Digest, Sha1};
use std::path::{Path, PathBuf};

/// Salt appended to the transformed logical path before hashing.
///
/// Fixed in the client binary; changing it orphans every existing dump.
pub const DIGEST_SALT: &str = "K6R9T9Hz22OpeIGEWB0ui6c6PYFQnJGy";

/// Directory under the dump root holding the content-addressed shards.
pub const UPLOAD_DIR: &str = "upload";

/// Returns the lowercase hex SHA-1 of `transformed || DIGEST_SALT`.
///
/// The digest runs over the exact byte sequence of the path — no
/// normalization happens here; callers hash the already-transformed form.
#[must_use]
pub fn content_address(transformed: &str) -> String {
    let mut h = Sha1::new();
    h.update(transformed.as_bytes());
    h.update(DIGEST_SALT.as_bytes());
    hex::encode(h.finalize())
}

/// Returns the on-disk location of a content address under `root`:
/// `<root>/upload/<hex[0..2]>/<hex[2..]>`.
///
/// # Panics
///
/// Panics if `hex` is shorter than 2 characters; [`content_address`] always
/// produces 40.
#[must_use]
pub fn shard_path(root: &Path, hex: &str) -> PathBuf {
    root.join(UPLOAD_DIR).join(&hex[0..2]).join(&hex[2..])
}

/// Appends `ext` to a logical path and cleans the result.
#[must_use]
pub fn add_ext(path: &str, ext: &str) -> String {
    clean(&format!("{path}{ext}"))
}

/// Wraps a logical path into its master-table form:
/// `master/<path>.orderedmap`.
#[must_use]
pub fn master_table_path(path: &str) -> String {
    clean(&format!("master/{path}.orderedmap"))
}

/// Normalizes a forward-slash logical path.
///
/// Collapses repeated slashes, drops `.` segments, resolves `..` against
/// prior segments, and trims the trailing slash. A path that escapes its
/// root (`a/../../b`) keeps the surplus `..` segments, mirroring lexical
/// cleaning. Empty input cleans to `.`.
#[must_use]
pub fn clean(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut out: Vec<&str> = Vec::new();

    for seg in path.split('/') {
        match seg {
            "" | "." => {}
            ".." => match out.last() {
                Some(&last) if last != ".." => {
                    out.pop();
                }
                Some(_) => out.push(".."),
                None if rooted => {}
                None => out.push(".."),
            },
            _ => out.push(seg),
        }
    }

    let joined = out.join("/");
    match (rooted, joined.is_empty()) {
        (true, true) => "/".to_string(),
        (true, false) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

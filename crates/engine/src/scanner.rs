//! Generic reference extraction.
//!
//! Decoded assets mention other assets by logical path. The pattern is
//! deliberately loose — any `segment/segment...` run over the path
//! alphabet — and emits duplicates; deduplication belongs to the crawler's
//! coordinator, which owns the seen-set.

use std::sync::OnceLock;

use regex::bytes::Regex;

fn path_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"[.$a-zA-Z_0-9]+?/[.$a-zA-Z_0-9/]+").expect("path pattern compiles")
    })
}

/// Returns every non-overlapping logical-path candidate in `data`.
pub(crate) fn find_paths(data: &[u8]) -> Vec<String> {
    path_pattern()
        .find_iter(data)
        .filter_map(|m| std::str::from_utf8(m.as_bytes()).ok())
        .map(str::to_string)
        .collect()
}

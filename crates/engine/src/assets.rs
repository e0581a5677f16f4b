//! Embedded seed data.
//!
//! The crawl has to start somewhere: a curated list of master-table paths
//! known to exist in every client build, plus whatever the boot manifest
//! mentions. Both ship inside the binary so a bare `extract` works with no
//! extra inputs.

use std::sync::OnceLock;

use regex::bytes::Regex;

/// Curated seed paths, one logical path per line.
pub(crate) const PATH_LIST: &str = include_str!("../assets/pathlist");

/// Boot archive manifest as shipped by the client; scanned, not parsed.
pub(crate) const BOOT_MANIFEST: &[u8] = include_bytes!("../assets/boot_manifest");

/// The embedded seed paths.
pub(crate) fn default_paths() -> impl Iterator<Item = &'static str> {
    PATH_LIST.lines().filter(|line| !line.is_empty())
}

/// Paths mentioned by the embedded boot manifest.
///
/// The manifest format is not worth a schema; every `"path":"..."` value on
/// a line is a seed.
pub(crate) fn boot_paths() -> Vec<String> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN
        .get_or_init(|| Regex::new(r#""path":"(.*)""#).expect("boot path pattern compiles"));

    pattern
        .captures_iter(BOOT_MANIFEST)
        .filter_map(|caps| {
            let m = caps.get(1)?;
            std::str::from_utf8(m.as_bytes()).ok().map(str::to_string)
        })
        .collect()
}

//! Path-list file I/O.
//!
//! The path list is the crawl's persistent memory: sorted logical paths,
//! one per line, LF-terminated UTF-8. It is read as extra seeds at startup
//! and rewritten with the full DiscoveredSet on success, so successive runs
//! converge even when the embedded seeds lag the live asset graph.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};

/// Reads a path list; a missing file is an empty list, not an error.
pub(crate) fn read(path: &Path) -> Result<Vec<String>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(e).with_context(|| format!("read path list, path={}", path.display()))
        }
    };
    Ok(text
        .lines()
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Writes `paths` sorted, one per line.
pub(crate) fn write(path: &Path, mut paths: Vec<String>) -> Result<()> {
    paths.sort();

    let mut out = Vec::with_capacity(paths.iter().map(|p| p.len() + 1).sum());
    for p in &paths {
        out.extend_from_slice(p.as_bytes());
        out.push(b'\n');
    }

    let mut file = fs::File::create(path)
        .with_context(|| format!("create path list, path={}", path.display()))?;
    file.write_all(&out)
        .with_context(|| format!("write path list, path={}", path.display()))?;
    Ok(())
}

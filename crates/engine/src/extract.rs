//! The fixed-point crawl: dump in, decoded tree + path list out.

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::assets;
use crate::config::ExtractorConfig;
use crate::handler::{extract_handlers, Handler};
use crate::pathlist;

/// Crawls a content-addressed dump to the transitive closure of its seeds.
pub struct Extractor {
    config: ExtractorConfig,
    handlers: Vec<Box<dyn Handler>>,
}

impl Extractor {
    /// Builds an extractor with resolved configuration.
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        Ok(Self {
            config: config.resolved()?,
            handlers: extract_handlers(),
        })
    }

    /// Runs the crawl to its fixed point.
    ///
    /// Every seed and discovered path is probed against every handler; the
    /// decoded tree lands under the destination root and the full
    /// DiscoveredSet is written, sorted, to the path-list file. Per-item
    /// failures do not stop the crawl; they aggregate into the returned
    /// error once the frontier drains.
    pub fn extract_assets(&self) -> Result<()> {
        info!("extracting assets");
        fs::create_dir_all(&self.config.dest_path).with_context(|| {
            format!(
                "create destination, path={}",
                self.config.dest_path.display()
            )
        })?;

        let seeds = self.initial_paths()?;
        debug!(seed_count = seeds.len(), "seeding crawl");

        // The DiscoveredSet lives on the coordinator: dispatch runs
        // single-threaded, so no lock is needed.
        let mut seen: HashSet<String> = seeds.iter().cloned().collect();

        let items: Vec<dispatch::Item<String, Vec<String>>> =
            seeds.into_iter().map(dispatch::Item::new).collect();

        let crawl = dispatch::run(
            |item| {
                let mut new_items = Vec::new();
                for reference in item.output.iter().flatten() {
                    if reference.is_empty() {
                        continue;
                    }
                    if !seen.contains(reference) {
                        seen.insert(reference.clone());
                        new_items.push(dispatch::Item::new(reference.clone()));
                    }
                }
                Ok(new_items)
            },
            |logical: &String| self.extract_path(logical),
            items,
            self.config.concurrency,
        );

        let discovered: Vec<String> = seen.into_iter().filter(|p| !p.is_empty()).collect();
        let count = discovered.len();
        pathlist::write(&self.config.path_list, discovered)?;
        info!(discovered = count, "crawl finished");

        crawl.map_err(anyhow::Error::new)
    }

    /// Assembles the seed set: embedded path list and boot manifest (unless
    /// disabled) plus the user path-list file.
    fn initial_paths(&self) -> Result<BTreeSet<String>> {
        let mut paths = BTreeSet::new();
        if !self.config.no_default_paths {
            paths.extend(assets::default_paths().map(str::to_string));
            paths.extend(assets::boot_paths());
        }
        paths.extend(pathlist::read(&self.config.path_list)?);
        paths.retain(|p| !p.is_empty());
        Ok(paths)
    }

    /// Probes every handler for `logical`, concatenating the references of
    /// all that hit. Runs on worker threads.
    fn extract_path(&self, logical: &str) -> Result<Vec<String>> {
        let mut refs = Vec::new();
        for handler in &self.handlers {
            if let Some(mut found) = extract_file(logical, handler.as_ref(), &self.config)? {
                refs.append(&mut found);
            }
        }
        Ok(refs)
    }
}

/// Reads, decodes, and writes one (path, format) pair.
///
/// A missing source file yields `Ok(None)` — the path simply does not exist
/// in this format — so the caller can keep probing. Everything else is an
/// error for the whole item.
fn extract_file(
    logical: &str,
    handler: &dyn Handler,
    config: &ExtractorConfig,
) -> Result<Option<Vec<String>>> {
    let src = handler.source_path(logical, config);
    let dest = handler.dest_path(logical, config);

    let raw = match fs::read(&src) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| {
                format!("read failed, path={logical}, src={}", src.display())
            })
        }
    };

    let decoded = handler
        .decode(&raw, config)
        .with_context(|| format!("parse failed, path={logical}, src={}", src.display()))?;

    write_artifact(&dest, &decoded)
        .with_context(|| format!("write failed, path={logical}, dest={}", dest.display()))?;

    Ok(Some(handler.scan_refs(&decoded)))
}

fn write_artifact(dest: &Path, decoded: &[u8]) -> io::Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(dest, decoded)
}

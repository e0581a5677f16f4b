//! The re-encode walk: decoded tree in, content-addressed dump out.
//!
//! Only the ordered map packs back. The walk reuses the dispatcher —
//! directories are items whose "references" are their children — which
//! gives the same bounded parallelism and error aggregation as the crawl
//! for free.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::config::PackerConfig;
use crate::handler::ORDERED_MAP_DIR;

/// Packs a decoded tree back into the content-addressed layout.
pub struct Packer {
    config: PackerConfig,
}

impl Packer {
    /// Builds a packer with resolved configuration.
    pub fn new(config: PackerConfig) -> Result<Self> {
        Ok(Self {
            config: config.resolved()?,
        })
    }

    /// Walks the source tree and re-encodes every matched file.
    ///
    /// Files that do not match the ordered-map output shape
    /// (`orderedmap/<logical>.json`) are skipped. Per-file failures
    /// aggregate; the walk always completes.
    pub fn pack_assets(&self) -> Result<()> {
        info!("packing assets");
        fs::create_dir_all(&self.config.dest_path).with_context(|| {
            format!(
                "create destination, path={}",
                self.config.dest_path.display()
            )
        })?;

        let seeds = list_children(&self.config.src_path)?;
        let items: Vec<dispatch::Item<PathBuf, Vec<PathBuf>>> =
            seeds.into_iter().map(dispatch::Item::new).collect();

        dispatch::run(
            |item| {
                Ok(item
                    .output
                    .iter()
                    .flatten()
                    .cloned()
                    .map(dispatch::Item::new)
                    .collect())
            },
            |path: &PathBuf| self.pack_path(path),
            items,
            self.config.concurrency,
        )
        .map_err(anyhow::Error::new)
    }

    /// One walk step: directories expand, matched files re-encode.
    fn pack_path(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let meta = fs::metadata(path)
            .with_context(|| format!("stat failed, path={}", path.display()))?;
        if meta.is_dir() {
            return list_children(path);
        }

        let Some(logical) = match_orderedmap_dest(&self.config.src_path, path) else {
            return Ok(Vec::new());
        };

        let json = fs::read(path)
            .with_context(|| format!("read failed, path={logical}, src={}", path.display()))?;
        let encoded = orderedmap::from_json(&json)
            .with_context(|| format!("encode failed, path={logical}, src={}", path.display()))?;

        let hex = hasher::content_address(&hasher::master_table_path(&logical));
        let dest = hasher::shard_path(&self.config.dest_path, &hex);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("write failed, path={logical}, dest={}", dest.display()))?;
        }
        fs::write(&dest, &encoded)
            .with_context(|| format!("write failed, path={logical}, dest={}", dest.display()))?;

        Ok(Vec::new())
    }
}

/// Recovers the logical path from a decoded ordered-map artifact location:
/// `<root>/orderedmap/<logical>.json`.
fn match_orderedmap_dest(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root.join(ORDERED_MAP_DIR)).ok()?;
    let rel = rel.to_str()?;
    let logical = rel.strip_suffix(".json")?;
    if logical.is_empty() {
        return None;
    }
    Some(logical.replace(std::path::MAIN_SEPARATOR, "/"))
}

fn list_children(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("read directory, path={}", dir.display()))?;
    let mut children = Vec::new();
    for entry in entries {
        let entry =
            entry.with_context(|| format!("read directory, path={}", dir.display()))?;
        children.push(entry.path());
    }
    Ok(children)
}

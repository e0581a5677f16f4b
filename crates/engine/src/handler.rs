//! The per-format contract.
//!
//! A handler knows, for one on-disk format, where a logical path lives in
//! the dump, where its decoded form belongs in the output tree, how to
//! decode it, and how to pull further logical paths out of the decoded
//! bytes. Handlers are pure over `(logical path, config)`; the extractor
//! owns all file I/O.
//!
//! Probe order is part of the format's identity: a bare logical path can
//! resolve as several formats at once (each transform hashes differently),
//! so the extractor tries every handler in the fixed order below and keeps
//! all the hits.

use std::path::PathBuf;

use anyhow::Result;

use crate::config::ExtractorConfig;
use crate::{esdl, scanner};

/// Output subdirectory for decoded master tables.
pub(crate) const ORDERED_MAP_DIR: &str = "orderedmap";
/// Output subdirectory for everything else.
pub(crate) const ASSETS_DIR: &str = "assets";

pub(crate) trait Handler: Send + Sync {
    /// Content-addressed location of this format for `logical` in the dump.
    fn source_path(&self, logical: &str, config: &ExtractorConfig) -> PathBuf;

    /// Where the decoded artifact is written under the output tree.
    fn dest_path(&self, logical: &str, config: &ExtractorConfig) -> PathBuf;

    /// Decodes raw dump bytes into the output form (usually JSON).
    fn decode(&self, raw: &[u8], config: &ExtractorConfig) -> Result<Vec<u8>>;

    /// Extracts logical-path references from the decoded bytes.
    fn scan_refs(&self, decoded: &[u8]) -> Vec<String>;
}

/// The extract-direction handlers in probe order.
pub(crate) fn extract_handlers() -> Vec<Box<dyn Handler>> {
    vec![
        Box::new(OrderedMapHandler),
        Box::new(Amf3Handler { ext: ".action.dsl" }),
        Box::new(EsdlHandler(Amf3Handler { ext: ".esdl" })),
        Box::new(PngHandler),
    ]
}

/// Master tables: `master/<logical>.orderedmap` hashed into the dump,
/// decoded JSON under `orderedmap/`.
pub(crate) struct OrderedMapHandler;

impl Handler for OrderedMapHandler {
    fn source_path(&self, logical: &str, config: &ExtractorConfig) -> PathBuf {
        let hex = hasher::content_address(&hasher::master_table_path(logical));
        hasher::shard_path(&config.src_path, &hex)
    }

    fn dest_path(&self, logical: &str, config: &ExtractorConfig) -> PathBuf {
        config
            .dest_path
            .join(ORDERED_MAP_DIR)
            .join(hasher::add_ext(logical, ".json"))
    }

    fn decode(&self, raw: &[u8], config: &ExtractorConfig) -> Result<Vec<u8>> {
        Ok(orderedmap::to_json(raw, config.indent, config.flatten_csv)?)
    }

    fn scan_refs(&self, decoded: &[u8]) -> Vec<String> {
        scanner::find_paths(decoded)
    }
}

/// Deflate-wrapped AMF3 objects; `ext` is glued on before hashing
/// (`<logical><ext>.amf3.deflate`) and carried into the output name.
pub(crate) struct Amf3Handler {
    pub(crate) ext: &'static str,
}

impl Handler for Amf3Handler {
    fn source_path(&self, logical: &str, config: &ExtractorConfig) -> PathBuf {
        let transformed = hasher::add_ext(logical, &format!("{}.amf3.deflate", self.ext));
        hasher::shard_path(&config.src_path, &hasher::content_address(&transformed))
    }

    fn dest_path(&self, logical: &str, config: &ExtractorConfig) -> PathBuf {
        config
            .dest_path
            .join(ASSETS_DIR)
            .join(hasher::add_ext(logical, &format!("{}.json", self.ext)))
    }

    fn decode(&self, raw: &[u8], config: &ExtractorConfig) -> Result<Vec<u8>> {
        Ok(amf3::to_json(raw, config.indent)?)
    }

    fn scan_refs(&self, decoded: &[u8]) -> Vec<String> {
        scanner::find_paths(decoded)
    }
}

/// ESDL trees are AMF3 on the wire; only reference mining differs.
pub(crate) struct EsdlHandler(pub(crate) Amf3Handler);

impl Handler for EsdlHandler {
    fn source_path(&self, logical: &str, config: &ExtractorConfig) -> PathBuf {
        self.0.source_path(logical, config)
    }

    fn dest_path(&self, logical: &str, config: &ExtractorConfig) -> PathBuf {
        self.0.dest_path(logical, config)
    }

    fn decode(&self, raw: &[u8], config: &ExtractorConfig) -> Result<Vec<u8>> {
        self.0.decode(raw, config)
    }

    fn scan_refs(&self, decoded: &[u8]) -> Vec<String> {
        esdl::mine_references(decoded).unwrap_or_else(|| scanner::find_paths(decoded))
    }
}

/// Obfuscated PNGs; decoded images reference nothing.
pub(crate) struct PngHandler;

impl Handler for PngHandler {
    fn source_path(&self, logical: &str, config: &ExtractorConfig) -> PathBuf {
        let transformed = hasher::add_ext(logical, ".png");
        hasher::shard_path(&config.src_path, &hasher::content_address(&transformed))
    }

    fn dest_path(&self, logical: &str, config: &ExtractorConfig) -> PathBuf {
        config
            .dest_path
            .join(ASSETS_DIR)
            .join(hasher::add_ext(logical, ".png"))
    }

    fn decode(&self, raw: &[u8], _config: &ExtractorConfig) -> Result<Vec<u8>> {
        Ok(codec::png::decode(raw)?)
    }

    fn scan_refs(&self, _decoded: &[u8]) -> Vec<String> {
        Vec::new()
    }
}

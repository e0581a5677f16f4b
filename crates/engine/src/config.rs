//! Pipeline configuration.
//!
//! Both directions share the same fallback rules: empty paths resolve to
//! the current directory, the path list defaults to `.pathlist` under the
//! destination, and a zero concurrency falls back to the default of 5.

use std::env;
use std::path::PathBuf;

use anyhow::Result;

/// Worker count used when the caller passes 0 or nothing.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Default path-list filename under the destination tree.
pub const PATH_LIST_FILENAME: &str = ".pathlist";

/// Configuration for the extract direction.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Dump root holding `upload/<xx>/<rest>` shards.
    pub src_path: PathBuf,
    /// Root of the decoded output tree.
    pub dest_path: PathBuf,
    /// Path-list file: read as extra seeds, rewritten with every discovered
    /// path on success.
    pub path_list: PathBuf,
    /// Skip the embedded seed paths and boot manifest.
    pub no_default_paths: bool,
    /// Worker thread count; 0 resolves to [`DEFAULT_CONCURRENCY`].
    pub concurrency: usize,
    /// Spaces per indent level in emitted JSON; 0 is compact.
    pub indent: usize,
    /// Collapse CSV leaves into a single row-major array.
    pub flatten_csv: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            src_path: PathBuf::new(),
            dest_path: PathBuf::new(),
            path_list: PathBuf::new(),
            no_default_paths: false,
            concurrency: DEFAULT_CONCURRENCY,
            indent: 0,
            flatten_csv: false,
        }
    }
}

impl ExtractorConfig {
    /// Applies the fallback rules, returning a fully-specified config.
    pub fn resolved(mut self) -> Result<Self> {
        self.src_path = fallback_to_cwd(self.src_path)?;
        self.dest_path = fallback_to_cwd(self.dest_path)?;
        if self.path_list.as_os_str().is_empty() {
            self.path_list = self.dest_path.join(PATH_LIST_FILENAME);
        }
        if self.concurrency == 0 {
            self.concurrency = DEFAULT_CONCURRENCY;
        }
        Ok(self)
    }
}

/// Configuration for the pack direction.
#[derive(Debug, Clone)]
pub struct PackerConfig {
    /// Root of the decoded tree to pack.
    pub src_path: PathBuf,
    /// Dump root to write `upload/<xx>/<rest>` shards into.
    pub dest_path: PathBuf,
    /// Worker thread count; 0 resolves to [`DEFAULT_CONCURRENCY`].
    pub concurrency: usize,
}

impl Default for PackerConfig {
    fn default() -> Self {
        Self {
            src_path: PathBuf::new(),
            dest_path: PathBuf::new(),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl PackerConfig {
    /// Applies the fallback rules, returning a fully-specified config.
    pub fn resolved(mut self) -> Result<Self> {
        self.src_path = fallback_to_cwd(self.src_path)?;
        self.dest_path = fallback_to_cwd(self.dest_path)?;
        if self.concurrency == 0 {
            self.concurrency = DEFAULT_CONCURRENCY;
        }
        Ok(self)
    }
}

fn fallback_to_cwd(path: PathBuf) -> Result<PathBuf> {
    if path.as_os_str().is_empty() || path.as_os_str() == "." {
        return Ok(env::current_dir()?);
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_list_defaults_under_dest() {
        let cfg = ExtractorConfig {
            src_path: PathBuf::from("/dump"),
            dest_path: PathBuf::from("/out"),
            ..ExtractorConfig::default()
        }
        .resolved()
        .unwrap();
        assert_eq!(cfg.path_list, PathBuf::from("/out/.pathlist"));
    }

    #[test]
    fn explicit_path_list_is_kept() {
        let cfg = ExtractorConfig {
            src_path: PathBuf::from("/dump"),
            dest_path: PathBuf::from("/out"),
            path_list: PathBuf::from("/tmp/seeds.txt"),
            ..ExtractorConfig::default()
        }
        .resolved()
        .unwrap();
        assert_eq!(cfg.path_list, PathBuf::from("/tmp/seeds.txt"));
    }

    #[test]
    fn zero_concurrency_resolves_to_the_default() {
        let cfg = ExtractorConfig {
            src_path: PathBuf::from("/dump"),
            dest_path: PathBuf::from("/out"),
            concurrency: 0,
            ..ExtractorConfig::default()
        }
        .resolved()
        .unwrap();
        assert_eq!(cfg.concurrency, DEFAULT_CONCURRENCY);

        let cfg = PackerConfig {
            src_path: PathBuf::from("/out"),
            dest_path: PathBuf::from("/dump"),
            concurrency: 0,
        }
        .resolved()
        .unwrap();
        assert_eq!(cfg.concurrency, DEFAULT_CONCURRENCY);
    }

    #[test]
    fn empty_paths_fall_back_to_the_working_directory() {
        let cfg = ExtractorConfig::default().resolved().unwrap();
        assert!(cfg.src_path.is_absolute());
        assert_eq!(cfg.src_path, cfg.dest_path);
    }
}

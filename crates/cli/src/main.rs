//! # saltmine — offline asset pipeline CLI
//!
//! Subcommands:
//!
//! ```text
//! extract <src> <dest>   Decode a content-addressed dump into a readable tree
//! pack    <src> <dest>   Re-encode a decoded tree back into the dump layout
//! hash    <path>         Print the content address of a logical path
//! ```
//!
//! Logging goes through `tracing`; set `RUST_LOG` (e.g. `RUST_LOG=debug`)
//! to adjust verbosity. Exit status is non-zero when any item failed; the
//! aggregated per-path errors are printed on stderr.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use engine::{ExtractorConfig, PackerConfig};

#[derive(Parser, Debug)]
#[command(name = "saltmine", about = "Offline asset pipeline for content-addressed game dumps", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract assets from a dump at src into readable form at dest
    Extract {
        /// Dump root (holds upload/<xx>/<rest> shards)
        src: PathBuf,
        /// Output root for the decoded tree
        dest: PathBuf,
        /// Newline-delimited file of extra seed paths
        /// (default: <dest>/.pathlist)
        #[arg(short, long)]
        path_list: Option<PathBuf>,
        /// Maximum number of concurrent file extractions
        #[arg(short, long, default_value_t = engine::DEFAULT_CONCURRENCY)]
        concurrency: usize,
        /// Spaces of indentation in extracted JSON (0 = compact)
        #[arg(short, long, default_value_t = 0)]
        indent: usize,
        /// Collapse multi-line CSV leaves into a single array
        #[arg(short, long)]
        flatten_csv: bool,
        /// Skip the embedded seed paths and boot manifest
        #[arg(long)]
        no_default_paths: bool,
    },
    /// Pack a decoded tree at src back into game format at dest
    /// (ordered maps only)
    Pack {
        /// Root of the decoded tree
        src: PathBuf,
        /// Dump root to write shards into
        dest: PathBuf,
        /// Maximum number of concurrent file conversions
        #[arg(short, long, default_value_t = engine::DEFAULT_CONCURRENCY)]
        concurrency: usize,
    },
    /// Print the content-addressed hash of a logical path
    Hash {
        /// Already-transformed logical path (e.g. master/item/item.orderedmap)
        path: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    match Cli::parse().command {
        Commands::Extract {
            src,
            dest,
            path_list,
            concurrency,
            indent,
            flatten_csv,
            no_default_paths,
        } => {
            let config = ExtractorConfig {
                src_path: src,
                dest_path: dest,
                path_list: path_list.unwrap_or_default(),
                no_default_paths,
                concurrency,
                indent,
                flatten_csv,
            };
            engine::Extractor::new(config)?.extract_assets()
        }
        Commands::Pack { src, dest, concurrency } => {
            let config = PackerConfig {
                src_path: src,
                dest_path: dest,
                concurrency,
            };
            engine::Packer::new(config)?.pack_assets()
        }
        Commands::Hash { path } => {
            println!("{}", hasher::content_address(&path));
            Ok(())
        }
    }
}

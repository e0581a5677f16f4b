//! # Engine - Asset Crawl Orchestration
//!
//! Ties the codec crates, the content addressing, and the dispatcher into
//! the two pipeline directions: extract (dump -> readable tree) and pack
//! (readable tree -> dump).
//!
//! ## Extract
//!
//! ```text
//! seeds (embedded pathlist + boot manifest + user pathlist)
//!   |
//!   v
//! ┌──────────────────────────────────────────────────────┐
//! │                   DISPATCHER                         │
//! │                                                      │
//! │ worker: for each handler in fixed order              │
//! │   orderedmap -> .action.dsl amf3 -> .esdl -> png     │
//! │     hash logical path -> read dump shard             │
//! │     (missing file: not an error, try next handler)   │
//! │     decode -> write under dest tree                  │
//! │     scan decoded bytes for more logical paths        │
//! │   |                                                  │
//! │   v                                                  │
//! │ coordinator: dedupe refs against DiscoveredSet,      │
//! │   enqueue the new ones; repeat until frontier empty  │
//! └──────────────────────────────────────────────────────┘
//!   |
//!   v
//! DiscoveredSet, sorted -> .pathlist
//! ```
//!
//! The same logical path may exist in several formats at once (the suffix
//! is appended *before* hashing, so each format hashes to a different
//! shard). Every handler is probed for every path and their references are
//! concatenated; only genuinely absent files are skipped.
//!
//! ## Pack
//!
//! The reverse direction walks the decoded tree with the same dispatcher
//! (directories expand into their children), matches files against the
//! ordered-map output shape (`orderedmap/<logical>.json`), re-encodes them,
//! and writes the result back into the content-addressed layout. Only the
//! ordered map packs back.
//!
//! ## Module Responsibilities
//!
//! | Module      | Purpose                                             |
//! |-------------|-----------------------------------------------------|
//! | [`config`]  | extractor / packer configuration with fallbacks     |
//! | `handler`   | the per-format contract and its four implementations|
//! | `scanner`   | regex reference extraction from decoded bytes       |
//! | `esdl`      | structural reference mining from ESDL trees         |
//! | `assets`    | embedded seed path list and boot manifest           |
//! | `pathlist`  | sorted path-list file I/O                           |
//! | [`extract`] | the fixed-point crawl                               |
//! | [`pack`]    | the re-encode walk                                  |

pub mod config;
pub mod extract;
pub mod pack;

mod assets;
mod esdl;
mod handler;
mod pathlist;
mod scanner;

pub use config::{ExtractorConfig, PackerConfig, DEFAULT_CONCURRENCY};
pub use extract::Extractor;
pub use pack::Packer;

#[cfg(test)]
mod tests;

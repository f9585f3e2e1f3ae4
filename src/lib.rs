//! # codemap
//!
//! Compact structural maps of JS/TS projects.
//!
//! codemap extracts per-file signatures (imports, functions, classes,
//! constants) with tree-sitter, resolves relative imports into a dependency
//! graph, and renders the result in several size-optimized text formats.
//!
//! ## Key properties
//!
//! - **Total extraction**: malformed, oversized, or adversarial input
//!   degrades to a partial or empty record; a scan never fails on one file
//! - **Persistent**: the index survives as `.codemap/index.json`
//! - **Incremental**: single-file edits patch the index without a rescan
//! - **Compact**: the tag-DSL rendering is a fraction of the raw JSON size
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use codemap::{scan, render, RenderFormat, SafetyPolicy};
//! use std::path::Path;
//!
//! let extensions: Vec<String> = ["ts", "tsx", "js", "jsx"]
//!     .iter().map(|e| e.to_string()).collect();
//! let outcome = scan::scan_root(Path::new("."), &extensions, &SafetyPolicy::default());
//!
//! let dsl = render::render(&outcome.index, RenderFormat::Dsl);
//! println!("{dsl}");
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod index;
pub mod render;
pub mod resolver;
pub mod scan;
pub mod storage;

// Re-exports for convenience
pub use error::{CodemapError, DegradeReason, Result};

pub use config::Config;
pub use extractor::{choose_strategy, extract, extract_with_policy, Extraction, SafetyPolicy, Strategy};
pub use index::{
    FileInfo, GraphBuilder, ImportKind, ImportSpec, IndexStats, ProjectIndex, SCHEMA_VERSION,
};
pub use render::{compression_stats, CompressionStats, RenderFormat};
pub use resolver::{ModuleResolver, Resolution};
pub use scan::{ScanDiagnostics, ScanOutcome};

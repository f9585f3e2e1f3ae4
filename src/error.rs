//! Error types for codemap.
//!
//! Two layers: `CodemapError` for failures that genuinely abort an operation
//! (index file I/O, malformed persisted data), and `DegradeReason` for the
//! per-file conditions that are always recovered locally: a degraded file
//! still produces a (possibly empty) record and the scan keeps going.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that propagate out of codemap operations.
#[derive(Debug, Error)]
pub enum CodemapError {
    /// The persisted index file could not be read or written.
    #[error("index file I/O error at {path}: {source}")]
    IndexIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The persisted index file is not valid JSON or has the wrong shape.
    #[error("malformed index file: {0}")]
    MalformedIndex(#[from] serde_json::Error),

    /// The persisted index was written by an incompatible schema version.
    #[error("index schema version {found} is not supported (expected {expected})")]
    SchemaMismatch { found: u32, expected: u32 },

    /// An unknown render format name was requested.
    #[error("unknown render format: {0}")]
    UnknownFormat(String),

    /// The config file exists but could not be parsed.
    #[error("invalid config file: {0}")]
    InvalidConfig(#[from] toml::de::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CodemapError>;

/// Why a file's extraction was degraded instead of fully structural.
///
/// None of these propagate as errors: the first four degrade to an empty or
/// fallback-extracted record, the fifth to "kept in imports, absent from
/// dependencies". They exist so scans can report diagnostics without failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DegradeReason {
    /// File missing, unreadable, or an I/O error at the read boundary.
    ReadFailure,
    /// File exceeds the structural-parse size ceiling.
    OversizedFile,
    /// A suspicious-content heuristic matched the raw text.
    SuspiciousContent,
    /// Tree construction failed on the content.
    StructuralParseFailure,
    /// A relative specifier resolved to no known node.
    UnresolvedImport,
}

impl std::fmt::Display for DegradeReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DegradeReason::ReadFailure => write!(f, "read_failure"),
            DegradeReason::OversizedFile => write!(f, "oversized_file"),
            DegradeReason::SuspiciousContent => write!(f, "suspicious_content"),
            DegradeReason::StructuralParseFailure => write!(f, "structural_parse_failure"),
            DegradeReason::UnresolvedImport => write!(f, "unresolved_import"),
        }
    }
}

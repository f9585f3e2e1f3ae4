//! Full project scan: discovery, parallel extraction, graph assembly.
//!
//! Extraction of each file touches only that file's content, so it runs on
//! the rayon pool; assembly is single-threaded and starts only once every
//! extraction has completed. Per-file problems degrade locally and are
//! tallied in [`ScanDiagnostics`] rather than failing the scan.

use ignore::WalkBuilder;
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::DegradeReason;
use crate::extractor::{self, SafetyPolicy};
use crate::index::{FileInfo, GraphBuilder, ProjectIndex};

/// Per-reason degradation tallies for one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanDiagnostics {
    pub read_failures: usize,
    pub oversized_files: usize,
    pub suspicious_content: usize,
    pub parse_fallbacks: usize,
    pub unresolved_imports: usize,
}

impl ScanDiagnostics {
    fn record(&mut self, reason: DegradeReason) {
        match reason {
            DegradeReason::ReadFailure => self.read_failures += 1,
            DegradeReason::OversizedFile => self.oversized_files += 1,
            DegradeReason::SuspiciousContent => self.suspicious_content += 1,
            DegradeReason::StructuralParseFailure => self.parse_fallbacks += 1,
            DegradeReason::UnresolvedImport => self.unresolved_imports += 1,
        }
    }

    pub fn total_degraded_files(&self) -> usize {
        self.read_failures + self.oversized_files + self.suspicious_content + self.parse_fallbacks
    }
}

/// Result of a full scan.
#[derive(Debug)]
pub struct ScanOutcome {
    pub index: ProjectIndex,
    pub diagnostics: ScanDiagnostics,
}

/// Walk the project root and return project-relative source paths, sorted.
///
/// Gitignore rules and hidden directories are honored; only recognized
/// extensions pass the filter.
pub fn discover(root: &Path, extensions: &[String]) -> Vec<String> {
    let walker = WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        // Honor .gitignore files even when the root is not a git repository.
        .require_git(false)
        .build();

    let mut paths: Vec<String> = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "skipping unreadable directory entry");
                continue;
            }
        };
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        let matches = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| extensions.iter().any(|known| known == e))
            .unwrap_or(false);
        if !matches {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(root) {
            paths.push(relative.to_string_lossy().replace('\\', "/"));
        }
    }
    paths.sort();
    debug!(root = %root.display(), files = paths.len(), "discovery complete");
    paths
}

/// Scan the given project-relative paths under `root` into an index.
pub fn scan(root: &Path, paths: &[String], policy: &SafetyPolicy) -> ScanOutcome {
    let extractions: Vec<(String, FileInfo, Option<DegradeReason>)> = paths
        .par_iter()
        .map(|path| {
            let absolute = root.join(path);
            match fs::read_to_string(&absolute) {
                Ok(content) => {
                    let result = extractor::extract_with_policy(&content, path, policy);
                    (path.clone(), result.info, result.degraded)
                }
                Err(err) => {
                    warn!(path = %path, error = %err, "file unreadable; recording empty record");
                    (path.clone(), FileInfo::default(), Some(DegradeReason::ReadFailure))
                }
            }
        })
        .collect();

    let mut diagnostics = ScanDiagnostics::default();
    let mut records: Vec<(String, FileInfo)> = Vec::with_capacity(extractions.len());
    for (path, info, degraded) in extractions {
        if let Some(reason) = degraded {
            diagnostics.record(reason);
        }
        records.push((path, info));
    }

    let outcome = GraphBuilder::new(root.to_string_lossy()).build(records);
    diagnostics.unresolved_imports = outcome.unresolved_imports;

    if diagnostics.total_degraded_files() > 0 {
        info!(
            read_failures = diagnostics.read_failures,
            oversized = diagnostics.oversized_files,
            suspicious = diagnostics.suspicious_content,
            parse_fallbacks = diagnostics.parse_fallbacks,
            "scan completed with degraded files"
        );
    }

    ScanOutcome {
        index: outcome.index,
        diagnostics,
    }
}

/// Discover and scan in one call, using the given policy and extensions.
pub fn scan_root(root: &Path, extensions: &[String], policy: &SafetyPolicy) -> ScanOutcome {
    let paths = discover(root, extensions);
    scan(root, &paths, policy)
}

//! Incremental index maintenance: single-file change and removal.
//!
//! A changed file gets a fresh extraction and has only its own outgoing
//! edges rebuilt; the rest of the graph is untouched. Resolution runs against
//! the node set as it stands after the change, so edits never see a stale
//! view of the project. The same aggregate invariants as a full build are
//! asserted after every patch.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use super::builder::{assert_consistent, build_tree};
use super::types::{Edge, ProjectIndex};
use crate::error::DegradeReason;
use crate::extractor::{self, SafetyPolicy};
use crate::resolver::{ModuleResolver, Resolution};

/// Result of one incremental patch.
#[derive(Debug)]
pub struct UpdateOutcome {
    /// True when the path was new to the index.
    pub added: bool,
    /// Degradation reported by the fresh extraction, if any.
    pub degraded: Option<DegradeReason>,
    /// Relative specifiers in the changed file that matched no node.
    pub unresolved_imports: usize,
}

/// Re-extract one file and patch it into the index.
///
/// Unknown paths are inserted as new nodes; known paths have their record
/// replaced wholesale. Only the changed file's outgoing edges are rebuilt.
pub fn update(
    index: &mut ProjectIndex,
    path: &str,
    content: &str,
    policy: &SafetyPolicy,
) -> UpdateOutcome {
    let extraction = extractor::extract_with_policy(content, path, policy);
    let mut info = extraction.info;

    let added = !index.files.contains_key(path);
    if added {
        index.nodes.push(path.to_string());
        debug!(path, "new node added to index");
    }

    // Resolve against the node set after the insertion, so a file can
    // depend on itself being present (index files, self-registration).
    let node_set: HashSet<String> = index.nodes.iter().cloned().collect();
    let resolver = ModuleResolver::new(&node_set);

    let mut dependencies: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut unresolved_imports = 0usize;
    for import in &info.imports {
        match resolver.resolve(path, &import.source_specifier) {
            Resolution::Internal(target) => {
                if seen.insert(target.clone()) {
                    dependencies.push(target);
                }
            }
            Resolution::External => {}
            Resolution::Unresolved => {
                unresolved_imports += 1;
                debug!(
                    from = %path,
                    specifier = %import.source_specifier,
                    "relative import did not resolve to any node"
                );
            }
        }
    }
    info.dependencies = dependencies;

    // Replace this file's outgoing edges; incoming edges are unaffected by
    // a content change.
    index.edges.retain(|e| e.from != path);
    for target in &info.dependencies {
        index.edges.push(Edge {
            from: path.to_string(),
            to: target.clone(),
        });
    }

    index.files.insert(path.to_string(), info);
    refresh_derived(index);

    info!(
        path,
        added,
        dependencies = index.files[path].dependencies.len(),
        "index updated"
    );

    UpdateOutcome {
        added,
        degraded: extraction.degraded,
        unresolved_imports,
    }
}

/// Read a file from disk under the index root and patch it in.
///
/// A read failure degrades to an empty record rather than erroring, matching
/// full-scan behavior for unreadable files.
pub fn update_from_disk(
    index: &mut ProjectIndex,
    path: &str,
    policy: &SafetyPolicy,
) -> UpdateOutcome {
    let absolute = Path::new(&index.metadata.root_path).join(path);
    match fs::read_to_string(&absolute) {
        Ok(content) => update(index, path, &content, policy),
        Err(err) => {
            warn!(path, error = %err, "file unreadable; recording empty record");
            let outcome = update(index, path, "", policy);
            UpdateOutcome {
                degraded: Some(DegradeReason::ReadFailure),
                ..outcome
            }
        }
    }
}

/// Remove a file from the index.
///
/// Drops the node, its record, and every edge touching it, and prunes the
/// path from other files' dependency lists. Imports that named the removed
/// file stay in their owners' `imports` (they are raw source text) but no
/// longer resolve. Returns false when the path was not indexed.
pub fn remove(index: &mut ProjectIndex, path: &str) -> bool {
    if index.files.remove(path).is_none() {
        debug!(path, "remove requested for unindexed path");
        return false;
    }

    index.nodes.retain(|n| n != path);
    index.edges.retain(|e| e.from != path && e.to != path);
    for record in index.files.values_mut() {
        record.dependencies.retain(|d| d != path);
    }

    refresh_derived(index);
    info!(path, remaining = index.nodes.len(), "node removed from index");
    true
}

/// Recompute everything derived from the node set after a patch.
fn refresh_derived(index: &mut ProjectIndex) {
    index.tree = build_tree(&index.nodes);
    index.metadata.total_files = index.nodes.len();
    index.metadata.updated_at = chrono::Utc::now();
    assert_consistent(index);
}

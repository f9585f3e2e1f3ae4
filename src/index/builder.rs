//! Graph assembly: per-file records into one consistent project index.
//!
//! Runs single-threaded after all extractions complete: relative imports can
//! only be resolved once the full node set is known. Structurally invalid
//! aggregate state (an edge referencing an unknown node, a file entry with no
//! node) indicates a bug in the builder itself and asserts rather than
//! degrading.

use chrono::Utc;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info};

use super::types::{
    Edge, FileInfo, IndexMetadata, ProjectIndex, TreeNode, TreeNodeKind, SCHEMA_VERSION,
};
use crate::resolver::{ModuleResolver, Resolution};

/// Result of one assembly pass.
#[derive(Debug)]
pub struct BuildOutcome {
    pub index: ProjectIndex,
    /// Relative specifiers that matched no node (kept in imports only).
    pub unresolved_imports: usize,
}

/// Assembles extracted records into a [`ProjectIndex`].
pub struct GraphBuilder {
    root_path: String,
}

impl GraphBuilder {
    pub fn new(root_path: impl Into<String>) -> Self {
        Self {
            root_path: root_path.into(),
        }
    }

    /// Build the index from records in discovery order. Duplicate paths keep
    /// their first record.
    pub fn build(&self, records: Vec<(String, FileInfo)>) -> BuildOutcome {
        let mut nodes: Vec<String> = Vec::with_capacity(records.len());
        let mut files: BTreeMap<String, FileInfo> = BTreeMap::new();
        for (path, info) in records {
            if files.contains_key(&path) {
                continue;
            }
            nodes.push(path.clone());
            files.insert(path, info);
        }

        let node_set: HashSet<String> = nodes.iter().cloned().collect();
        let resolver = ModuleResolver::new(&node_set);

        let mut edges: Vec<Edge> = Vec::new();
        let mut unresolved_imports = 0usize;

        for path in &nodes {
            let record = files.get_mut(path).expect("record exists for every node");
            let mut dependencies: Vec<String> = Vec::new();
            let mut seen: HashSet<String> = HashSet::new();

            for import in &record.imports {
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

            for target in &dependencies {
                edges.push(Edge {
                    from: path.clone(),
                    to: target.clone(),
                });
            }
            record.dependencies = dependencies;
        }

        let now = Utc::now();
        let index = ProjectIndex {
            metadata: IndexMetadata {
                schema_version: SCHEMA_VERSION,
                root_path: self.root_path.clone(),
                created_at: now,
                updated_at: now,
                total_files: nodes.len(),
            },
            tree: build_tree(&nodes),
            nodes,
            edges,
            files,
        };

        assert_consistent(&index);
        info!(
            files = index.metadata.total_files,
            edges = index.edges.len(),
            unresolved = unresolved_imports,
            "index assembled"
        );

        BuildOutcome {
            index,
            unresolved_imports,
        }
    }
}

/// Rebuild the display tree from the node list. Directories sort before
/// files, each group alphabetically, so renderings are diff-friendly.
pub(crate) fn build_tree(nodes: &[String]) -> TreeNode {
    let mut root = TreeNode {
        name: ".".to_string(),
        kind: TreeNodeKind::Directory,
        children: Vec::new(),
    };

    for path in nodes {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        insert_path(&mut root, &segments);
    }

    sort_tree(&mut root);
    root
}

fn insert_path(node: &mut TreeNode, segments: &[&str]) {
    let Some((head, rest)) = segments.split_first() else {
        return;
    };
    let kind = if rest.is_empty() {
        TreeNodeKind::File
    } else {
        TreeNodeKind::Directory
    };

    let child_pos = node
        .children
        .iter()
        .position(|c| c.name == *head && c.kind == kind);
    let child = match child_pos {
        Some(pos) => &mut node.children[pos],
        None => {
            node.children.push(TreeNode {
                name: (*head).to_string(),
                kind,
                children: Vec::new(),
            });
            node.children.last_mut().expect("just pushed")
        }
    };
    insert_path(child, rest);
}

fn sort_tree(node: &mut TreeNode) {
    node.children.sort_by(|a, b| {
        let rank = |n: &TreeNode| match n.kind {
            TreeNodeKind::Directory => 0u8,
            TreeNodeKind::File => 1u8,
        };
        rank(a).cmp(&rank(b)).then_with(|| a.name.cmp(&b.name))
    });
    for child in &mut node.children {
        sort_tree(child);
    }
}

/// Aggregate invariants. A violation here is a builder bug, not bad input.
pub(crate) fn assert_consistent(index: &ProjectIndex) {
    let node_set: HashSet<&str> = index.nodes.iter().map(String::as_str).collect();
    assert_eq!(
        node_set.len(),
        index.nodes.len(),
        "nodes must be unique"
    );
    assert_eq!(
        index.metadata.total_files,
        index.nodes.len(),
        "totalFiles must equal node count"
    );
    assert_eq!(
        index.files.len(),
        index.nodes.len(),
        "files must have exactly one entry per node"
    );
    for path in &index.nodes {
        assert!(
            index.files.contains_key(path),
            "node {path} has no file record"
        );
    }
    for edge in &index.edges {
        assert!(
            node_set.contains(edge.from.as_str()),
            "edge from unknown node {}",
            edge.from
        );
        assert!(
            node_set.contains(edge.to.as_str()),
            "edge to unknown node {}",
            edge.to
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{ImportKind, ImportSpec};

    fn record_with_imports(specs: &[(&str, ImportKind)]) -> FileInfo {
        FileInfo {
            imports: specs
                .iter()
                .map(|(s, k)| ImportSpec::new(*s, *k))
                .collect(),
            ..FileInfo::default()
        }
    }

    #[test]
    fn builds_edges_for_relative_imports() {
        let records = vec![
            (
                "src/a.ts".to_string(),
                record_with_imports(&[("./b", ImportKind::StaticImport)]),
            ),
            ("src/b.ts".to_string(), FileInfo::default()),
        ];
        let outcome = GraphBuilder::new("/proj").build(records);
        let index = outcome.index;

        assert_eq!(index.nodes, vec!["src/a.ts", "src/b.ts"]);
        assert_eq!(index.edges.len(), 1);
        assert_eq!(index.edges[0].from, "src/a.ts");
        assert_eq!(index.edges[0].to, "src/b.ts");
        assert_eq!(index.files["src/a.ts"].dependencies, vec!["src/b.ts"]);
        assert_eq!(outcome.unresolved_imports, 0);
    }

    #[test]
    fn external_imports_produce_no_edges() {
        let records = vec![(
            "src/a.ts".to_string(),
            record_with_imports(&[("react", ImportKind::StaticImport)]),
        )];
        let outcome = GraphBuilder::new("/proj").build(records);
        assert!(outcome.index.edges.is_empty());
        assert!(outcome.index.files["src/a.ts"].dependencies.is_empty());
        // The raw specifier stays in imports.
        assert_eq!(outcome.index.files["src/a.ts"].imports.len(), 1);
    }

    #[test]
    fn unresolved_imports_are_counted_but_kept() {
        let records = vec![(
            "src/a.ts".to_string(),
            record_with_imports(&[("./missing", ImportKind::StaticImport)]),
        )];
        let outcome = GraphBuilder::new("/proj").build(records);
        assert_eq!(outcome.unresolved_imports, 1);
        assert!(outcome.index.edges.is_empty());
        assert_eq!(outcome.index.files["src/a.ts"].imports.len(), 1);
    }

    #[test]
    fn duplicate_imports_collapse_to_one_edge() {
        let records = vec![
            (
                "src/a.ts".to_string(),
                record_with_imports(&[
                    ("./b", ImportKind::StaticImport),
                    ("./b", ImportKind::DynamicImport),
                ]),
            ),
            ("src/b.ts".to_string(), FileInfo::default()),
        ];
        let outcome = GraphBuilder::new("/proj").build(records);
        assert_eq!(outcome.index.edges.len(), 1);
        assert_eq!(outcome.index.files["src/a.ts"].dependencies.len(), 1);
    }

    #[test]
    fn metadata_matches_node_count() {
        let records = vec![
            ("a.ts".to_string(), FileInfo::default()),
            ("b.ts".to_string(), FileInfo::default()),
        ];
        let outcome = GraphBuilder::new("/proj").build(records);
        assert_eq!(outcome.index.metadata.total_files, 2);
        assert_eq!(outcome.index.metadata.schema_version, SCHEMA_VERSION);
        assert_eq!(outcome.index.metadata.root_path, "/proj");
    }

    #[test]
    fn duplicate_discovery_paths_keep_first_record() {
        let records = vec![
            (
                "a.ts".to_string(),
                record_with_imports(&[("./b", ImportKind::StaticImport)]),
            ),
            ("a.ts".to_string(), FileInfo::default()),
            ("b.ts".to_string(), FileInfo::default()),
        ];
        let outcome = GraphBuilder::new("/proj").build(records);
        assert_eq!(outcome.index.nodes.len(), 2);
        assert_eq!(outcome.index.files["a.ts"].imports.len(), 1);
    }

    #[test]
    fn tree_mirrors_nodes() {
        let records = vec![
            ("src/app.ts".to_string(), FileInfo::default()),
            ("src/lib/util.ts".to_string(), FileInfo::default()),
            ("index.ts".to_string(), FileInfo::default()),
        ];
        let outcome = GraphBuilder::new("/proj").build(records);
        let tree = &outcome.index.tree;
        assert_eq!(tree.name, ".");
        // Directories first, then files.
        assert_eq!(tree.children[0].name, "src");
        assert_eq!(tree.children[0].kind, TreeNodeKind::Directory);
        assert_eq!(tree.children[1].name, "index.ts");
        let src = &tree.children[0];
        assert_eq!(src.children[0].name, "lib");
        assert_eq!(src.children[1].name, "app.ts");
    }
}

//! Adjacency-list encoding: one line per edge, isolated nodes trailing.

use std::collections::HashSet;

use crate::index::ProjectIndex;

pub fn render(index: &ProjectIndex) -> String {
    let mut out = String::new();
    for edge in &index.edges {
        out.push_str(&edge.from);
        out.push_str(" -> ");
        out.push_str(&edge.to);
        out.push('\n');
    }

    let connected: HashSet<&str> = index
        .edges
        .iter()
        .flat_map(|e| [e.from.as_str(), e.to.as_str()])
        .collect();
    let isolated: Vec<&str> = index
        .nodes
        .iter()
        .map(String::as_str)
        .filter(|n| !connected.contains(n))
        .collect();

    if !isolated.is_empty() {
        if !index.edges.is_empty() {
            out.push('\n');
        }
        out.push_str("isolated:\n");
        for node in isolated {
            out.push_str("  ");
            out.push_str(node);
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{FileInfo, GraphBuilder, ImportKind, ImportSpec};

    fn importing(targets: &[&str]) -> FileInfo {
        FileInfo {
            imports: targets
                .iter()
                .map(|t| ImportSpec::new(*t, ImportKind::StaticImport))
                .collect(),
            ..FileInfo::default()
        }
    }

    #[test]
    fn edges_then_isolated_block() {
        let index = GraphBuilder::new("/p")
            .build(vec![
                ("a.ts".to_string(), importing(&["./b"])),
                ("b.ts".to_string(), FileInfo::default()),
                ("lonely.ts".to_string(), FileInfo::default()),
            ])
            .index;
        let text = render(&index);
        assert_eq!(text, "a.ts -> b.ts\n\nisolated:\n  lonely.ts\n");
    }

    #[test]
    fn fully_isolated_index_has_no_leading_blank() {
        let index = GraphBuilder::new("/p")
            .build(vec![("a.ts".to_string(), FileInfo::default())])
            .index;
        assert_eq!(render(&index), "isolated:\n  a.ts\n");
    }
}

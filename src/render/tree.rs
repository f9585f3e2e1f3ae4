//! Indented tree outline of the project layout. No signatures.

use crate::index::{ProjectIndex, TreeNode, TreeNodeKind};

pub fn render(index: &ProjectIndex) -> String {
    let mut out = String::new();
    out.push_str(".\n");
    for child in &index.tree.children {
        push_node(&mut out, child, 1);
    }
    out
}

fn push_node(out: &mut String, node: &TreeNode, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
    out.push_str(&node.name);
    if node.kind == TreeNodeKind::Directory {
        out.push('/');
    }
    out.push('\n');
    for child in &node.children {
        push_node(out, child, depth + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{FileInfo, GraphBuilder};

    #[test]
    fn nests_by_indentation_with_directory_slash() {
        let index = GraphBuilder::new("/p")
            .build(vec![
                ("src/lib/util.ts".to_string(), FileInfo::default()),
                ("src/app.ts".to_string(), FileInfo::default()),
                ("index.ts".to_string(), FileInfo::default()),
            ])
            .index;
        let text = render(&index);
        assert_eq!(
            text,
            ".\n  src/\n    lib/\n      util.ts\n    app.ts\n  index.ts\n"
        );
    }
}

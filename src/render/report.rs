//! Long-form markdown report, grouped by directory. Built for human review,
//! not for compression.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::index::{FileInfo, Parameter, ProjectIndex, Visibility};

pub fn render(index: &ProjectIndex) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Project map: {}", index.metadata.root_path);
    let _ = writeln!(
        out,
        "\n{} files, {} dependency edges.\n",
        index.metadata.total_files,
        index.edges.len()
    );

    let mut by_dir: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for path in &index.nodes {
        let dir = match path.rfind('/') {
            Some(pos) => &path[..pos],
            None => ".",
        };
        by_dir.entry(dir).or_default().push(path);
    }

    for (dir, mut paths) in by_dir {
        paths.sort();
        let _ = writeln!(out, "## {dir}/\n");
        for path in paths {
            if let Some(info) = index.files.get(path) {
                push_file(&mut out, path, info);
            }
        }
    }
    out
}

fn push_file(out: &mut String, path: &str, info: &FileInfo) {
    let _ = writeln!(out, "### {path}\n");

    if !info.dependencies.is_empty() {
        let _ = writeln!(out, "Depends on: {}\n", info.dependencies.join(", "));
    }
    let external: Vec<&str> = info
        .imports
        .iter()
        .map(|i| i.source_specifier.as_str())
        .filter(|s| !s.starts_with('.'))
        .collect();
    if !external.is_empty() {
        let _ = writeln!(out, "External imports: {}\n", external.join(", "));
    }

    for func in &info.functions {
        let mut line = String::new();
        if func.is_exported {
            line.push_str("export ");
        }
        if func.is_async {
            line.push_str("async ");
        }
        line.push_str("function ");
        if func.is_generator {
            line.push('*');
        }
        line.push_str(&func.name);
        line.push_str(&format_params(&func.parameters));
        if let Some(ret) = &func.return_type {
            let _ = write!(line, ": {ret}");
        }
        let _ = writeln!(out, "- `{line}`");
    }

    for class in &info.classes {
        let mut line = String::new();
        if class.is_exported {
            line.push_str("export ");
        }
        if class.is_abstract {
            line.push_str("abstract ");
        }
        line.push_str("class ");
        line.push_str(&class.name);
        if let Some(base) = &class.base_class {
            let _ = write!(line, " extends {base}");
        }
        if !class.interfaces.is_empty() {
            let _ = write!(line, " implements {}", class.interfaces.join(", "));
        }
        let _ = writeln!(out, "- `{line}`");

        for method in &class.methods {
            let mut m = String::new();
            m.push_str(visibility_prefix(method.visibility));
            if method.is_static {
                m.push_str("static ");
            }
            if method.is_async {
                m.push_str("async ");
            }
            m.push_str(&method.name);
            m.push_str(&format_params(&method.parameters));
            if let Some(ret) = &method.return_type {
                let _ = write!(m, ": {ret}");
            }
            let _ = writeln!(out, "  - `{m}`");
        }
        for field in &class.fields {
            let mut f = String::new();
            f.push_str(visibility_prefix(field.visibility));
            if field.is_static {
                f.push_str("static ");
            }
            if field.is_readonly {
                f.push_str("readonly ");
            }
            f.push_str(&field.name);
            if let Some(ty) = &field.type_annotation {
                let _ = write!(f, ": {ty}");
            }
            let _ = writeln!(out, "  - `{f}`");
        }
    }

    for constant in &info.constants {
        let mut line = String::new();
        if constant.is_exported {
            line.push_str("export ");
        }
        line.push_str("const ");
        line.push_str(&constant.name);
        if let Some(ty) = &constant.type_annotation {
            let _ = write!(line, ": {ty}");
        }
        let _ = writeln!(out, "- `{line}` ({})", constant.value_kind);
    }

    out.push('\n');
}

fn format_params(params: &[Parameter]) -> String {
    let mut out = String::from("(");
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        if param.variadic {
            out.push_str("...");
        }
        out.push_str(&param.name);
        if param.optional {
            out.push('?');
        }
        if let Some(ty) = &param.type_annotation {
            let _ = write!(out, ": {ty}");
        }
    }
    out.push(')');
    out
}

fn visibility_prefix(visibility: Visibility) -> &'static str {
    match visibility {
        Visibility::Public => "",
        Visibility::Private => "private ",
        Visibility::Protected => "protected ",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::extract;
    use crate::index::GraphBuilder;

    #[test]
    fn groups_by_directory_with_full_signatures() {
        let records = vec![
            (
                "src/a.ts".to_string(),
                extract(
                    "import { b } from './util/b';\nexport function go(n?: number): void {}\n",
                    "src/a.ts",
                ),
            ),
            (
                "src/util/b.ts".to_string(),
                extract("export const B: number = 1;\n", "src/util/b.ts"),
            ),
        ];
        let index = GraphBuilder::new("/p").build(records).index;
        let text = render(&index);

        assert!(text.contains("## src/\n"));
        assert!(text.contains("## src/util/\n"));
        assert!(text.contains("### src/a.ts"));
        assert!(text.contains("Depends on: src/util/b.ts"));
        assert!(text.contains("`export function go(n?: number): void`"));
        assert!(text.contains("`export const B: number` (literal)"));
    }

    #[test]
    fn root_level_files_group_under_dot() {
        let records = vec![(
            "index.ts".to_string(),
            extract("export const X = 1;\n", "index.ts"),
        )];
        let index = GraphBuilder::new("/p").build(records).index;
        assert!(render(&index).contains("## ./\n"));
    }
}

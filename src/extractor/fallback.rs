//! Lightweight fallback extraction.
//!
//! A line-oriented scanner used when the full tree builder is skipped
//! (suspicious content) or fails (corrupt syntax). It recognizes only the
//! four import forms via fixed textual patterns and deliberately extracts no
//! functions, classes, or constants, trading completeness for guaranteed
//! termination.

use crate::index::{FileInfo, ImportKind, ImportSpec};
use regex::Regex;
use std::sync::OnceLock;

struct LinePatterns {
    static_import: Regex,
    side_effect_import: Regex,
    re_export: Regex,
    dynamic_import: Regex,
    runtime_require: Regex,
}

fn patterns() -> &'static LinePatterns {
    static PATTERNS: OnceLock<LinePatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| LinePatterns {
        static_import: Regex::new(r#"^\s*import\s+.+?\s+from\s+['"]([^'"]+)['"]"#)
            .expect("static import pattern"),
        side_effect_import: Regex::new(r#"^\s*import\s+['"]([^'"]+)['"]"#)
            .expect("side-effect import pattern"),
        re_export: Regex::new(r#"^\s*export\s+(?:\*|\{[^}]*\})\s*(?:as\s+\w+\s*)?from\s+['"]([^'"]+)['"]"#)
            .expect("re-export pattern"),
        dynamic_import: Regex::new(r#"import\s*\(\s*['"]([^'"]+)['"]\s*\)"#)
            .expect("dynamic import pattern"),
        runtime_require: Regex::new(r#"require\s*\(\s*['"]([^'"]+)['"]\s*\)"#)
            .expect("require pattern"),
    })
}

/// Scan `content` line by line for import forms. Block-comment spans are
/// stripped before matching and `//` lines are skipped, so commented-out
/// imports are never recorded.
pub fn extract_fallback(content: &str) -> FileInfo {
    let pats = patterns();
    let mut info = FileInfo::default();
    let mut in_block_comment = false;

    for line in content.lines() {
        let stripped = strip_block_comments(line, &mut in_block_comment);
        let trimmed = stripped.trim_start();
        if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }
        scan_line(trimmed, pats, &mut info);
    }

    info
}

/// Remove every `/* ... */` span from one line, tracking comments that stay
/// open across lines.
fn strip_block_comments(line: &str, in_block_comment: &mut bool) -> String {
    let mut out = String::new();
    let mut rest = line;

    loop {
        if *in_block_comment {
            match rest.find("*/") {
                Some(end) => {
                    *in_block_comment = false;
                    rest = &rest[end + 2..];
                }
                None => break,
            }
        } else {
            match rest.find("/*") {
                Some(start) => {
                    out.push_str(&rest[..start]);
                    *in_block_comment = true;
                    rest = &rest[start + 2..];
                }
                None => {
                    out.push_str(rest);
                    break;
                }
            }
        }
    }

    out
}

fn scan_line(line: &str, pats: &LinePatterns, info: &mut FileInfo) {
    if let Some(caps) = pats.re_export.captures(line) {
        push_import(info, &caps[1], ImportKind::ReExport);
        return;
    }
    if let Some(caps) = pats.static_import.captures(line) {
        push_import(info, &caps[1], ImportKind::StaticImport);
        return;
    }
    if let Some(caps) = pats.side_effect_import.captures(line) {
        push_import(info, &caps[1], ImportKind::StaticImport);
        return;
    }
    // Dynamic forms can appear mid-line, and a line can hold more than one.
    for caps in pats.dynamic_import.captures_iter(line) {
        push_import(info, &caps[1], ImportKind::DynamicImport);
    }
    for caps in pats.runtime_require.captures_iter(line) {
        push_import(info, &caps[1], ImportKind::RuntimeRequire);
    }
}

fn push_import(info: &mut FileInfo, specifier: &str, kind: ImportKind) {
    info.imports.push(ImportSpec::new(specifier, kind));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_static_imports() {
        let info = extract_fallback("import { a, b } from './util';\nimport React from 'react';\n");
        assert_eq!(info.imports.len(), 2);
        assert_eq!(info.imports[0].source_specifier, "./util");
        assert_eq!(info.imports[0].kind, ImportKind::StaticImport);
        assert_eq!(info.imports[1].source_specifier, "react");
    }

    #[test]
    fn extracts_side_effect_imports() {
        let info = extract_fallback("import './polyfill';\n");
        assert_eq!(info.imports.len(), 1);
        assert_eq!(info.imports[0].source_specifier, "./polyfill");
    }

    #[test]
    fn extracts_re_exports() {
        let info = extract_fallback("export * from './types';\nexport { x } from './x';\n");
        assert_eq!(info.imports.len(), 2);
        assert!(info.imports.iter().all(|i| i.kind == ImportKind::ReExport));
    }

    #[test]
    fn extracts_dynamic_and_require_forms() {
        let src = "const m = await import('./lazy');\nconst fs = require('fs');\n";
        let info = extract_fallback(src);
        assert_eq!(info.imports.len(), 2);
        assert_eq!(info.imports[0].kind, ImportKind::DynamicImport);
        assert_eq!(info.imports[1].kind, ImportKind::RuntimeRequire);
    }

    #[test]
    fn skips_comment_lines() {
        let src = "// import { a } from './a';\n/* import { b } from './b'; */\nimport { c } from './c';\n";
        let info = extract_fallback(src);
        assert_eq!(info.imports.len(), 1);
        assert_eq!(info.imports[0].source_specifier, "./c");
    }

    #[test]
    fn single_line_block_comment_hides_dynamic_forms() {
        // Unanchored patterns must not match inside the comment span.
        let src = "/* const m = import('./x') */\n/* require('./y') */ const r = require('./real');\n";
        let info = extract_fallback(src);
        assert_eq!(info.imports.len(), 1);
        assert_eq!(info.imports[0].source_specifier, "./real");
        assert_eq!(info.imports[0].kind, ImportKind::RuntimeRequire);
    }

    #[test]
    fn skips_multi_line_block_comments() {
        let src = "/*\nimport { a } from './a';\n*/\nimport { b } from './b';\n";
        let info = extract_fallback(src);
        assert_eq!(info.imports.len(), 1);
        assert_eq!(info.imports[0].source_specifier, "./b");
    }

    #[test]
    fn extracts_no_signatures() {
        let src = "export const X = 1;\nexport function f() {}\nclass C {}\n";
        let info = extract_fallback(src);
        assert!(info.functions.is_empty());
        assert!(info.classes.is_empty());
        assert!(info.constants.is_empty());
    }

    #[test]
    fn empty_input_yields_empty_record() {
        assert!(extract_fallback("").is_empty());
    }
}

//! Dialect detection and tree-sitter grammar loading.

use std::path::Path;
use tree_sitter::Language;

/// Source dialects the structural extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// Plain JavaScript (`.js`, `.mjs`, `.cjs`).
    JavaScript,
    /// JavaScript with embedded JSX templates (`.jsx`).
    Jsx,
    /// Type-annotated TypeScript (`.ts`, `.mts`, `.cts`).
    TypeScript,
    /// TypeScript with embedded JSX templates (`.tsx`).
    Tsx,
}

impl Dialect {
    /// Detect the dialect from a file extension. Returns `None` for paths the
    /// engine does not parse.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        match ext {
            "js" | "mjs" | "cjs" => Some(Dialect::JavaScript),
            "jsx" => Some(Dialect::Jsx),
            "ts" | "mts" | "cts" => Some(Dialect::TypeScript),
            "tsx" => Some(Dialect::Tsx),
            _ => None,
        }
    }

    /// Get the tree-sitter Language for this dialect.
    ///
    /// The JavaScript grammar already parses JSX, so `.jsx` shares it; TSX
    /// needs its own grammar variant.
    pub fn tree_sitter_language(&self) -> Language {
        match self {
            Dialect::JavaScript | Dialect::Jsx => tree_sitter_javascript::LANGUAGE.into(),
            Dialect::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Dialect::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::JavaScript => "JavaScript",
            Dialect::Jsx => "JSX",
            Dialect::TypeScript => "TypeScript",
            Dialect::Tsx => "TSX",
        }
    }
}

/// Extensions probed by the resolver, in resolution order.
pub const SOURCE_EXTENSIONS: [&str; 4] = ["ts", "tsx", "js", "jsx"];

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn detects_dialects_from_extension() {
        assert_eq!(
            Dialect::from_path(&PathBuf::from("src/app.ts")),
            Some(Dialect::TypeScript)
        );
        assert_eq!(
            Dialect::from_path(&PathBuf::from("src/App.tsx")),
            Some(Dialect::Tsx)
        );
        assert_eq!(
            Dialect::from_path(&PathBuf::from("lib/util.mjs")),
            Some(Dialect::JavaScript)
        );
        assert_eq!(
            Dialect::from_path(&PathBuf::from("view.jsx")),
            Some(Dialect::Jsx)
        );
    }

    #[test]
    fn rejects_unsupported_extensions() {
        assert_eq!(Dialect::from_path(&PathBuf::from("main.rs")), None);
        assert_eq!(Dialect::from_path(&PathBuf::from("Makefile")), None);
        assert_eq!(Dialect::from_path(&PathBuf::from("style.css")), None);
    }
}

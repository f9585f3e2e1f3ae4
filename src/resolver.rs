//! Module resolution: raw import specifiers to internal file identities.
//!
//! Relative specifiers are resolved against the importing file's directory by
//! probing the literal path, each recognized source extension, and finally an
//! index file under the path. Everything else is an external package
//! reference. Resolution never touches the filesystem: the candidate set is
//! the discovered node set.

use std::collections::HashSet;

use crate::extractor::SOURCE_EXTENSIONS;

/// How a raw specifier classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Project-internal: the resolved project-relative node path.
    Internal(String),
    /// A package reference outside the project.
    External,
    /// Relative specifier with no matching node.
    Unresolved,
}

/// Resolves specifiers against a fixed node set.
pub struct ModuleResolver<'a> {
    nodes: &'a HashSet<String>,
}

impl<'a> ModuleResolver<'a> {
    pub fn new(nodes: &'a HashSet<String>) -> Self {
        Self { nodes }
    }

    /// Classify one specifier written in `importer` (a project-relative
    /// path).
    pub fn resolve(&self, importer: &str, specifier: &str) -> Resolution {
        if !is_relative(specifier) {
            return Resolution::External;
        }

        let base = normalize(&join(parent_dir(importer), specifier));

        // Literal path first (specifier already carries an extension).
        if self.nodes.contains(&base) {
            return Resolution::Internal(base);
        }
        // Then each recognized extension.
        for ext in SOURCE_EXTENSIONS {
            let candidate = format!("{base}.{ext}");
            if self.nodes.contains(&candidate) {
                return Resolution::Internal(candidate);
            }
        }
        // Then an index file under the path, for directory imports.
        for ext in SOURCE_EXTENSIONS {
            let candidate = format!("{base}/index.{ext}");
            if self.nodes.contains(&candidate) {
                return Resolution::Internal(candidate);
            }
        }

        Resolution::Unresolved
    }
}

fn is_relative(specifier: &str) -> bool {
    specifier.starts_with("./") || specifier.starts_with("../") || specifier == "." || specifier == ".."
}

fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(pos) => &path[..pos],
        None => "",
    }
}

fn join(dir: &str, rel: &str) -> String {
    if dir.is_empty() {
        rel.to_string()
    } else {
        format!("{dir}/{rel}")
    }
}

/// Collapse `.` and `..` segments. Components that would escape the project
/// root are dropped rather than producing a leading `..`.
fn normalize(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

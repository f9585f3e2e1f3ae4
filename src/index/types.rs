//! Core types for the project index.
//!
//! `ProjectIndex` is the aggregate root: it is what a full scan produces,
//! what incremental updates patch, and (serialized as camelCase JSON) the
//! sole interchange document between scans and every downstream consumer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Version of the persisted index document. Bumped on breaking change.
pub const SCHEMA_VERSION: u32 = 1;

/// The aggregate root holding the full structural model of a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectIndex {
    pub metadata: IndexMetadata,
    /// Directory-tree mirror of `nodes`, for display only. Derived, never
    /// authoritative.
    pub tree: TreeNode,
    /// Ordered set of unique project-relative file paths.
    pub nodes: Vec<String>,
    /// Deduplicated directed edges; `from` imports `to`.
    pub edges: Vec<Edge>,
    /// Exactly one entry per member of `nodes`.
    pub files: BTreeMap<String, FileInfo>,
}

/// Index metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexMetadata {
    pub schema_version: u32,
    pub root_path: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Must always equal `nodes.len()`.
    pub total_files: usize,
}

/// A directed dependency edge between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
}

/// A node in the display tree: either a directory with children or a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TreeNodeKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNodeKind {
    Directory,
    File,
}

/// One file's structural record.
///
/// Immutable once produced: incremental updates replace the whole record for
/// a path, never patch individual fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    /// Raw import statements, including external and unresolved specifiers.
    pub imports: Vec<ImportSpec>,
    /// Resolved project-relative paths this file depends on. Always a subset
    /// of the index's `nodes`.
    pub dependencies: Vec<String>,
    pub functions: Vec<FunctionSignature>,
    pub classes: Vec<ClassSignature>,
    pub constants: Vec<ConstantSignature>,
}

impl FileInfo {
    /// True when nothing at all was extracted (the empty-record degradation).
    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
            && self.dependencies.is_empty()
            && self.functions.is_empty()
            && self.classes.is_empty()
            && self.constants.is_empty()
    }
}

/// A single import/re-export/dynamic-import/require expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSpec {
    /// The raw specifier string as written in the source.
    pub source_specifier: String,
    pub kind: ImportKind,
    #[serde(default, skip_serializing_if = "is_false")]
    pub default_binding: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub namespace_binding: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub named_bindings: Vec<String>,
}

impl ImportSpec {
    pub fn new(source_specifier: impl Into<String>, kind: ImportKind) -> Self {
        Self {
            source_specifier: source_specifier.into(),
            kind,
            default_binding: false,
            namespace_binding: false,
            named_bindings: Vec::new(),
        }
    }
}

/// How the dependency was expressed in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportKind {
    StaticImport,
    ReExport,
    DynamicImport,
    RuntimeRequire,
}

impl fmt::Display for ImportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportKind::StaticImport => write!(f, "static-import"),
            ImportKind::ReExport => write!(f, "re-export"),
            ImportKind::DynamicImport => write!(f, "dynamic-import"),
            ImportKind::RuntimeRequire => write!(f, "runtime-require"),
        }
    }
}

/// A top-level function declaration. Anonymous functions are never recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionSignature {
    pub name: String,
    pub parameters: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
    pub is_async: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_generator: bool,
    pub is_exported: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_annotation: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub variadic: bool,
}

/// A top-level class declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSignature {
    pub name: String,
    pub is_exported: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_abstract: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_class: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<String>,
    pub methods: Vec<MethodSignature>,
    pub fields: Vec<FieldSignature>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodSignature {
    pub name: String,
    pub parameters: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
    pub is_async: bool,
    pub visibility: Visibility,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_static: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_abstract: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSignature {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_annotation: Option<String>,
    pub visibility: Visibility,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_static: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_readonly: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    Private,
    Protected,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Public => write!(f, "public"),
            Visibility::Private => write!(f, "private"),
            Visibility::Protected => write!(f, "protected"),
        }
    }
}

/// A recorded top-level constant binding.
///
/// Recording rule: `const` declarations always qualify; `let`/`var` only when
/// exported. Preserved exactly as a precision/recall policy choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstantSignature {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_annotation: Option<String>,
    pub value_kind: ValueKind,
    pub is_exported: bool,
}

/// Coarse classification of a constant's initializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueKind {
    Literal,
    Function,
    Class,
    ObjectLiteral,
    ArrayLiteral,
    Unknown,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Literal => write!(f, "literal"),
            ValueKind::Function => write!(f, "function"),
            ValueKind::Class => write!(f, "class"),
            ValueKind::ObjectLiteral => write!(f, "object-literal"),
            ValueKind::ArrayLiteral => write!(f, "array-literal"),
            ValueKind::Unknown => write!(f, "unknown"),
        }
    }
}

fn is_false(v: &bool) -> bool {
    !v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_kind_serializes_kebab_case() {
        let spec = ImportSpec::new("./util", ImportKind::DynamicImport);
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["kind"], "dynamic-import");
        assert_eq!(json["sourceSpecifier"], "./util");
    }

    #[test]
    fn file_info_default_is_empty() {
        assert!(FileInfo::default().is_empty());
    }

    #[test]
    fn optional_flags_are_omitted_when_false() {
        let sig = FunctionSignature {
            name: "f".to_string(),
            parameters: vec![],
            return_type: None,
            is_async: false,
            is_generator: false,
            is_exported: true,
        };
        let json = serde_json::to_value(&sig).unwrap();
        assert!(json.get("isGenerator").is_none());
        assert!(json.get("returnType").is_none());
        assert_eq!(json["isExported"], true);
    }

    #[test]
    fn value_kind_round_trips() {
        let json = serde_json::to_string(&ValueKind::ObjectLiteral).unwrap();
        assert_eq!(json, "\"object-literal\"");
        let back: ValueKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ValueKind::ObjectLiteral);
    }
}

//! Full structural extraction via tree-sitter.
//!
//! Walks only the direct children of the tree root, dispatching on a closed
//! set of node categories; a bounded secondary walk scans call expressions
//! anywhere in the tree for dynamic-import and runtime-require calls, which
//! can appear inside function bodies.

use tree_sitter::{Node, Parser};

use super::language::Dialect;
use crate::index::{
    ClassSignature, ConstantSignature, FieldSignature, FileInfo, FunctionSignature, ImportKind,
    ImportSpec, MethodSignature, Parameter, ValueKind, Visibility,
};

/// Upper bound on nodes visited by the call-expression scan. Trees produced
/// from gate-approved input stay far below this; the cap guarantees
/// termination on degenerate deeply-nested trees.
const CALL_SCAN_NODE_BUDGET: usize = 200_000;

/// Top-level node categories the extractor dispatches on. New syntax is
/// supported by adding a variant, not by extending a conditional chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TopLevelCategory {
    Import,
    Export,
    Function,
    Class,
    VariableStatement,
}

impl TopLevelCategory {
    fn classify(kind: &str) -> Option<Self> {
        match kind {
            "import_statement" => Some(Self::Import),
            "export_statement" => Some(Self::Export),
            "function_declaration" | "generator_function_declaration" => Some(Self::Function),
            "class_declaration" | "abstract_class_declaration" => Some(Self::Class),
            "lexical_declaration" | "variable_declaration" => Some(Self::VariableStatement),
            _ => None,
        }
    }
}

/// Accumulator the walk returns into. Finished with [`RecordBuilder::finish`].
#[derive(Default)]
struct RecordBuilder {
    info: FileInfo,
}

impl RecordBuilder {
    fn finish(self) -> FileInfo {
        self.info
    }
}

/// Parse `content` with the dialect's grammar and extract the structural
/// record. Returns `None` when tree construction fails, so the caller can
/// fall back to the lightweight extractor.
pub fn extract_structural(content: &str, dialect: Dialect) -> Option<FileInfo> {
    let mut parser = Parser::new();
    parser
        .set_language(&dialect.tree_sitter_language())
        .ok()?;
    let tree = parser.parse(content, None)?;
    let root = tree.root_node();
    let source = content.as_bytes();

    let mut builder = RecordBuilder::default();

    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        if let Some(category) = TopLevelCategory::classify(child.kind()) {
            dispatch_top_level(category, child, source, false, &mut builder);
        }
    }

    scan_dynamic_calls(root, source, &mut builder);

    Some(builder.finish())
}

fn dispatch_top_level(
    category: TopLevelCategory,
    node: Node,
    source: &[u8],
    exported: bool,
    builder: &mut RecordBuilder,
) {
    match category {
        TopLevelCategory::Import => collect_import(node, source, builder),
        TopLevelCategory::Export => collect_export(node, source, builder),
        TopLevelCategory::Function => {
            if let Some(func) = function_signature(node, source, exported) {
                builder.info.functions.push(func);
            }
        }
        TopLevelCategory::Class => {
            if let Some(class) = class_signature(node, source, exported) {
                builder.info.classes.push(class);
            }
        }
        TopLevelCategory::VariableStatement => {
            collect_constants(node, source, exported, builder);
        }
    }
}

// ─── Imports and Re-exports ─────────────────────────────────────

fn collect_import(node: Node, source: &[u8], builder: &mut RecordBuilder) {
    let Some(specifier) = source_specifier(node, source) else {
        return;
    };
    let mut spec = ImportSpec::new(specifier, ImportKind::StaticImport);

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() == "import_clause" {
            let mut clause_cursor = child.walk();
            for binding in child.named_children(&mut clause_cursor) {
                match binding.kind() {
                    "identifier" => spec.default_binding = true,
                    "namespace_import" => spec.namespace_binding = true,
                    "named_imports" => collect_named_bindings(binding, source, &mut spec),
                    _ => {}
                }
            }
        }
    }

    builder.info.imports.push(spec);
}

fn collect_export(node: Node, source: &[u8], builder: &mut RecordBuilder) {
    // Re-export: `export ... from "x"` carries a source field.
    if let Some(specifier) = source_specifier(node, source) {
        let mut spec = ImportSpec::new(specifier, ImportKind::ReExport);
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "export_clause" => collect_named_bindings(child, source, &mut spec),
                "namespace_export" => spec.namespace_binding = true,
                _ => {}
            }
        }
        // Bare `export * from "x"` has neither clause node.
        if !spec.namespace_binding && spec.named_bindings.is_empty() {
            spec.namespace_binding = true;
        }
        builder.info.imports.push(spec);
        return;
    }

    // Exported declaration: re-dispatch the inner node with the export flag.
    if let Some(declaration) = node.child_by_field_name("declaration") {
        if let Some(category) = TopLevelCategory::classify(declaration.kind()) {
            dispatch_top_level(category, declaration, source, true, builder);
        }
        return;
    }

    // `export default function f() {}` / `export default class C {}` carry
    // the declaration as value. Anonymous defaults are skipped by the
    // signature extractors (no name, no record).
    if let Some(value) = node.child_by_field_name("value") {
        if let Some(category) = TopLevelCategory::classify(value.kind()) {
            dispatch_top_level(category, value, source, true, builder);
        }
    }
}

fn collect_named_bindings(node: Node, source: &[u8], spec: &mut ImportSpec) {
    let mut cursor = node.walk();
    for specifier in node.named_children(&mut cursor) {
        if matches!(specifier.kind(), "import_specifier" | "export_specifier") {
            if let Some(name) = specifier.child_by_field_name("name") {
                spec.named_bindings.push(node_text(name, source));
            }
        }
    }
}

fn source_specifier(node: Node, source: &[u8]) -> Option<String> {
    let src = node.child_by_field_name("source")?;
    Some(string_literal_text(src, source))
}

// ─── Functions ──────────────────────────────────────────────────

fn function_signature(node: Node, source: &[u8], exported: bool) -> Option<FunctionSignature> {
    let name = node_text(node.child_by_field_name("name")?, source);
    if name.is_empty() {
        return None;
    }
    Some(FunctionSignature {
        name,
        parameters: parameters(node.child_by_field_name("parameters"), source),
        return_type: annotation_text(node.child_by_field_name("return_type"), source),
        is_async: has_keyword_child(node, "async"),
        is_generator: node.kind() == "generator_function_declaration"
            || has_keyword_child(node, "*"),
        is_exported: exported,
    })
}

fn parameters(params: Option<Node>, source: &[u8]) -> Vec<Parameter> {
    let Some(params) = params else {
        return Vec::new();
    };
    let mut out = Vec::new();
    let mut cursor = params.walk();
    for child in params.named_children(&mut cursor) {
        if let Some(param) = parameter(child, source) {
            out.push(param);
        }
    }
    out
}

fn parameter(node: Node, source: &[u8]) -> Option<Parameter> {
    match node.kind() {
        "identifier" => Some(Parameter {
            name: node_text(node, source),
            ..Parameter::default()
        }),
        // TS parameter wrappers: pattern + optional type, `?`, default value.
        "required_parameter" | "optional_parameter" => {
            let pattern = node.child_by_field_name("pattern")?;
            let variadic = pattern.kind() == "rest_pattern";
            let name = if variadic {
                pattern
                    .named_child(0)
                    .map(|n| node_text(n, source))
                    .unwrap_or_default()
            } else {
                node_text(pattern, source)
            };
            if name.is_empty() {
                return None;
            }
            Some(Parameter {
                name,
                type_annotation: annotation_text(node.child_by_field_name("type"), source),
                optional: node.kind() == "optional_parameter"
                    || node.child_by_field_name("value").is_some(),
                variadic,
            })
        }
        // JS default value: `x = 1`.
        "assignment_pattern" => {
            let left = node.child_by_field_name("left")?;
            Some(Parameter {
                name: node_text(left, source),
                optional: true,
                ..Parameter::default()
            })
        }
        "rest_pattern" => Some(Parameter {
            name: node
                .named_child(0)
                .map(|n| node_text(n, source))
                .unwrap_or_default(),
            variadic: true,
            ..Parameter::default()
        }),
        // Destructuring patterns keep their raw text as the name.
        "object_pattern" | "array_pattern" => Some(Parameter {
            name: node_text(node, source),
            ..Parameter::default()
        }),
        _ => None,
    }
}

// ─── Classes ────────────────────────────────────────────────────

fn class_signature(node: Node, source: &[u8], exported: bool) -> Option<ClassSignature> {
    let name = node_text(node.child_by_field_name("name")?, source);
    if name.is_empty() {
        return None;
    }

    let mut class = ClassSignature {
        name,
        is_exported: exported,
        is_abstract: node.kind() == "abstract_class_declaration",
        base_class: None,
        interfaces: Vec::new(),
        methods: Vec::new(),
        fields: Vec::new(),
    };

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() == "class_heritage" {
            collect_heritage(child, source, &mut class);
        }
    }

    if let Some(body) = node.child_by_field_name("body") {
        let mut body_cursor = body.walk();
        for member in body.named_children(&mut body_cursor) {
            match member.kind() {
                "method_definition" => {
                    if let Some(method) = method_signature(member, source, false) {
                        class.methods.push(method);
                    }
                }
                "abstract_method_signature" => {
                    if let Some(method) = method_signature(member, source, true) {
                        class.methods.push(method);
                    }
                }
                "public_field_definition" | "field_definition" => {
                    if let Some(field) = field_signature(member, source) {
                        class.fields.push(field);
                    }
                }
                _ => {}
            }
        }
    }

    Some(class)
}

/// The TS grammar nests `extends_clause`/`implements_clause` inside the
/// heritage node; the JS grammar puts the base expression there directly.
fn collect_heritage(node: Node, source: &[u8], class: &mut ClassSignature) {
    let mut cursor = node.walk();
    let mut saw_clause = false;
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "extends_clause" => {
                saw_clause = true;
                if let Some(value) = child.child_by_field_name("value").or_else(|| child.named_child(0)) {
                    class.base_class = Some(node_text(value, source));
                }
            }
            "implements_clause" => {
                saw_clause = true;
                let mut impl_cursor = child.walk();
                for iface in child.named_children(&mut impl_cursor) {
                    class.interfaces.push(node_text(iface, source));
                }
            }
            _ => {}
        }
    }
    if !saw_clause {
        if let Some(base) = node.named_child(0) {
            class.base_class = Some(node_text(base, source));
        }
    }
}

fn method_signature(node: Node, source: &[u8], is_abstract: bool) -> Option<MethodSignature> {
    let name_node = node.child_by_field_name("name")?;
    let name = node_text(name_node, source);
    if name.is_empty() {
        return None;
    }
    Some(MethodSignature {
        visibility: member_visibility(node, name_node, source),
        name,
        parameters: parameters(node.child_by_field_name("parameters"), source),
        return_type: annotation_text(node.child_by_field_name("return_type"), source),
        is_async: has_keyword_child(node, "async"),
        is_static: has_keyword_child(node, "static"),
        is_abstract,
    })
}

fn field_signature(node: Node, source: &[u8]) -> Option<FieldSignature> {
    let name_node = node.child_by_field_name("name")?;
    let name = node_text(name_node, source);
    if name.is_empty() {
        return None;
    }
    Some(FieldSignature {
        visibility: member_visibility(node, name_node, source),
        name,
        type_annotation: annotation_text(node.child_by_field_name("type"), source),
        is_static: has_keyword_child(node, "static"),
        is_readonly: has_keyword_child(node, "readonly"),
    })
}

fn member_visibility(node: Node, name_node: Node, source: &[u8]) -> Visibility {
    if name_node.kind() == "private_property_identifier" {
        return Visibility::Private;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "accessibility_modifier" {
            return match node_text(child, source).as_str() {
                "private" => Visibility::Private,
                "protected" => Visibility::Protected,
                _ => Visibility::Public,
            };
        }
    }
    Visibility::Public
}

// ─── Constants ──────────────────────────────────────────────────

/// Recording rule: `const` bindings always; `let`/`var` only when exported.
fn collect_constants(node: Node, source: &[u8], exported: bool, builder: &mut RecordBuilder) {
    let is_const = node
        .child(0)
        .map(|kw| kw.kind() == "const")
        .unwrap_or(false);
    if !is_const && !exported {
        return;
    }

    let mut cursor = node.walk();
    for declarator in node.named_children(&mut cursor) {
        if declarator.kind() != "variable_declarator" {
            continue;
        }
        let Some(name_node) = declarator.child_by_field_name("name") else {
            continue;
        };
        // Destructuring bindings are skipped; only simple names are recorded.
        if name_node.kind() != "identifier" {
            continue;
        }
        builder.info.constants.push(ConstantSignature {
            name: node_text(name_node, source),
            type_annotation: annotation_text(declarator.child_by_field_name("type"), source),
            value_kind: declarator
                .child_by_field_name("value")
                .map(|v| classify_value(v.kind()))
                .unwrap_or(ValueKind::Unknown),
            is_exported: exported,
        });
    }
}

fn classify_value(kind: &str) -> ValueKind {
    match kind {
        "string" | "template_string" | "number" | "true" | "false" | "null" | "undefined"
        | "regex" => ValueKind::Literal,
        "arrow_function" | "function_expression" | "function" | "generator_function" => {
            ValueKind::Function
        }
        "class" => ValueKind::Class,
        "object" => ValueKind::ObjectLiteral,
        "array" => ValueKind::ArrayLiteral,
        _ => ValueKind::Unknown,
    }
}

// ─── Dynamic Call Scan ──────────────────────────────────────────

/// Iterative whole-tree scan for `import(...)` and `require(...)` calls,
/// bounded by a node budget.
fn scan_dynamic_calls(root: Node, source: &[u8], builder: &mut RecordBuilder) {
    let mut stack = vec![root];
    let mut visited = 0usize;

    while let Some(node) = stack.pop() {
        visited += 1;
        if visited > CALL_SCAN_NODE_BUDGET {
            tracing::warn!("call scan budget exhausted; remaining subtrees skipped");
            return;
        }

        if node.kind() == "call_expression" {
            if let Some(spec) = dynamic_call_import(node, source) {
                builder.info.imports.push(spec);
            }
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            stack.push(child);
        }
    }
}

fn dynamic_call_import(node: Node, source: &[u8]) -> Option<ImportSpec> {
    let function = node.child_by_field_name("function")?;
    let kind = match function.kind() {
        "import" => ImportKind::DynamicImport,
        "identifier" if node_text(function, source) == "require" => ImportKind::RuntimeRequire,
        _ => return None,
    };

    let arguments = node.child_by_field_name("arguments")?;
    let mut cursor = arguments.walk();
    let first_string = arguments
        .named_children(&mut cursor)
        .find(|arg| arg.kind() == "string")?;
    Some(ImportSpec::new(
        string_literal_text(first_string, source),
        kind,
    ))
}

// ─── Text Helpers ───────────────────────────────────────────────

fn node_text(node: Node, source: &[u8]) -> String {
    node.utf8_text(source).unwrap_or_default().to_string()
}

/// Text of a `string` node without the surrounding quotes.
fn string_literal_text(node: Node, source: &[u8]) -> String {
    let mut cursor = node.walk();
    if let Some(fragment) = node
        .named_children(&mut cursor)
        .find(|c| c.kind() == "string_fragment")
    {
        return node_text(fragment, source);
    }
    node_text(node, source)
        .trim_matches(|c| c == '"' || c == '\'' || c == '`')
        .to_string()
}

/// Annotation text with the leading `:` of `type_annotation` stripped.
fn annotation_text(node: Option<Node>, source: &[u8]) -> Option<String> {
    let node = node?;
    let text = node_text(node, source);
    let trimmed = text.trim_start_matches(':').trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn has_keyword_child(node: Node, keyword: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|c| c.kind() == keyword);
    found
}

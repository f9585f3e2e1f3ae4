//! Tag-DSL encoding: one line per file, short positional tokens.
//!
//! Line shape:
//!
//! ```text
//! src/app.ts|f:main(argv:string[])->void@ax|c:App<Base+Runnable@x{run()->void@a;name:string}|k:LIMIT@x|>src/lib.ts>src/util.ts
//! ```
//!
//! Segments are `|`-separated: the path, then one `f:`/`c:`/`k:` token per
//! signature, then the dependency list as `>`-prefixed paths. Flag suffixes
//! after `@`: `a` async, `g` generator, `x` exported, `s` static, `r`
//! readonly, `b` abstract, `-`/`#` private/protected members.

use std::fmt::Write;

use crate::index::{
    ClassSignature, ConstantSignature, FunctionSignature, MethodSignature, Parameter,
    ProjectIndex, Visibility,
};

pub fn render(index: &ProjectIndex) -> String {
    let mut out = String::new();
    for path in &index.nodes {
        let Some(info) = index.files.get(path) else {
            continue;
        };
        out.push_str(path);
        for func in &info.functions {
            out.push('|');
            push_function(&mut out, func);
        }
        for class in &info.classes {
            out.push('|');
            push_class(&mut out, class);
        }
        for constant in &info.constants {
            out.push('|');
            push_constant(&mut out, constant);
        }
        if !info.dependencies.is_empty() {
            out.push('|');
            for dep in &info.dependencies {
                out.push('>');
                out.push_str(dep);
            }
        }
        out.push('\n');
    }
    out
}

fn push_function(out: &mut String, func: &FunctionSignature) {
    out.push_str("f:");
    out.push_str(&func.name);
    push_params(out, &func.parameters);
    if let Some(ret) = &func.return_type {
        let _ = write!(out, "->{ret}");
    }
    let mut flags = String::new();
    if func.is_async {
        flags.push('a');
    }
    if func.is_generator {
        flags.push('g');
    }
    if func.is_exported {
        flags.push('x');
    }
    push_flags(out, &flags);
}

fn push_class(out: &mut String, class: &ClassSignature) {
    out.push_str("c:");
    out.push_str(&class.name);
    if let Some(base) = &class.base_class {
        let _ = write!(out, "<{base}");
    }
    for iface in &class.interfaces {
        let _ = write!(out, "+{iface}");
    }
    let mut flags = String::new();
    if class.is_abstract {
        flags.push('b');
    }
    if class.is_exported {
        flags.push('x');
    }
    push_flags(out, &flags);

    if !class.methods.is_empty() || !class.fields.is_empty() {
        out.push('{');
        let mut first = true;
        for method in &class.methods {
            if !first {
                out.push(';');
            }
            first = false;
            push_method(out, method);
        }
        for field in &class.fields {
            if !first {
                out.push(';');
            }
            first = false;
            out.push_str(visibility_sigil(field.visibility));
            out.push_str(&field.name);
            if let Some(ty) = &field.type_annotation {
                let _ = write!(out, ":{ty}");
            }
            let mut flags = String::new();
            if field.is_static {
                flags.push('s');
            }
            if field.is_readonly {
                flags.push('r');
            }
            push_flags(out, &flags);
        }
        out.push('}');
    }
}

fn push_method(out: &mut String, method: &MethodSignature) {
    out.push_str(visibility_sigil(method.visibility));
    out.push_str(&method.name);
    push_params(out, &method.parameters);
    if let Some(ret) = &method.return_type {
        let _ = write!(out, "->{ret}");
    }
    let mut flags = String::new();
    if method.is_async {
        flags.push('a');
    }
    if method.is_static {
        flags.push('s');
    }
    if method.is_abstract {
        flags.push('b');
    }
    push_flags(out, &flags);
}

fn push_constant(out: &mut String, constant: &ConstantSignature) {
    out.push_str("k:");
    out.push_str(&constant.name);
    if let Some(ty) = &constant.type_annotation {
        let _ = write!(out, ":{ty}");
    }
    let _ = write!(out, "={}", constant.value_kind);
    let mut flags = String::new();
    if constant.is_exported {
        flags.push('x');
    }
    push_flags(out, &flags);
}

fn push_params(out: &mut String, params: &[Parameter]) {
    out.push('(');
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        if param.variadic {
            out.push_str("...");
        }
        out.push_str(&param.name);
        if param.optional {
            out.push('?');
        }
        if let Some(ty) = &param.type_annotation {
            let _ = write!(out, ":{ty}");
        }
    }
    out.push(')');
}

fn push_flags(out: &mut String, flags: &str) {
    if !flags.is_empty() {
        out.push('@');
        out.push_str(flags);
    }
}

fn visibility_sigil(visibility: Visibility) -> &'static str {
    match visibility {
        Visibility::Public => "",
        Visibility::Private => "-",
        Visibility::Protected => "#",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::extract;
    use crate::index::GraphBuilder;

    #[test]
    fn one_line_per_file_with_inline_dependencies() {
        let records = vec![
            (
                "src/a.ts".to_string(),
                extract("import { b } from './b';\nexport async function go(n: number): Promise<void> {}\n", "src/a.ts"),
            ),
            ("src/b.ts".to_string(), extract("export const B = 1;\n", "src/b.ts")),
        ];
        let index = GraphBuilder::new("/p").build(records).index;
        let text = render(&index);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("src/a.ts|"));
        assert!(lines[0].contains("f:go(n:number)->Promise<void>@ax"));
        assert!(lines[0].ends_with(">src/b.ts"));
        assert!(lines[1].contains("k:B=literal@x"));
    }

    #[test]
    fn class_members_carry_visibility_sigils() {
        let src = "export class S {\n  private count: number = 0;\n  protected async tick(): Promise<void> {}\n}\n";
        let records = vec![("s.ts".to_string(), extract(src, "s.ts"))];
        let index = GraphBuilder::new("/p").build(records).index;
        let text = render(&index);
        assert!(text.contains("c:S@x{"));
        assert!(text.contains("#tick()->Promise<void>@a"));
        assert!(text.contains("-count:number"));
    }
}

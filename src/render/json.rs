//! Minified short-key JSON projection of the index.
//!
//! Single-character keys, no whitespace. The display tree is omitted: it is
//! derived from `nodes` and a consumer can rebuild it.

use serde_json::{json, Map, Value};

use crate::index::{FileInfo, Parameter, ProjectIndex};

pub fn render(index: &ProjectIndex) -> String {
    let mut files = Map::new();
    for (path, info) in &index.files {
        files.insert(path.clone(), file_value(info));
    }

    let doc = json!({
        "m": {
            "v": index.metadata.schema_version,
            "r": index.metadata.root_path,
            "n": index.metadata.total_files,
        },
        "n": index.nodes,
        "e": index.edges.iter().map(|e| json!([e.from, e.to])).collect::<Vec<_>>(),
        "f": Value::Object(files),
    });
    doc.to_string()
}

fn file_value(info: &FileInfo) -> Value {
    let mut obj = Map::new();
    if !info.imports.is_empty() {
        obj.insert(
            "i".to_string(),
            info.imports
                .iter()
                .map(|i| json!([i.source_specifier, i.kind]))
                .collect(),
        );
    }
    if !info.dependencies.is_empty() {
        obj.insert("d".to_string(), json!(info.dependencies));
    }
    if !info.functions.is_empty() {
        obj.insert(
            "fn".to_string(),
            info.functions
                .iter()
                .map(|f| {
                    let mut v = Map::new();
                    v.insert("n".to_string(), json!(f.name));
                    v.insert("p".to_string(), params_value(&f.parameters));
                    if let Some(ret) = &f.return_type {
                        v.insert("r".to_string(), json!(ret));
                    }
                    set_flag(&mut v, "a", f.is_async);
                    set_flag(&mut v, "g", f.is_generator);
                    set_flag(&mut v, "x", f.is_exported);
                    Value::Object(v)
                })
                .collect(),
        );
    }
    if !info.classes.is_empty() {
        obj.insert(
            "c".to_string(),
            info.classes
                .iter()
                .map(|c| {
                    let mut v = Map::new();
                    v.insert("n".to_string(), json!(c.name));
                    if let Some(base) = &c.base_class {
                        v.insert("b".to_string(), json!(base));
                    }
                    if !c.interfaces.is_empty() {
                        v.insert("if".to_string(), json!(c.interfaces));
                    }
                    if !c.methods.is_empty() {
                        v.insert(
                            "m".to_string(),
                            c.methods
                                .iter()
                                .map(|m| {
                                    let mut mv = Map::new();
                                    mv.insert("n".to_string(), json!(m.name));
                                    mv.insert("p".to_string(), params_value(&m.parameters));
                                    if let Some(ret) = &m.return_type {
                                        mv.insert("r".to_string(), json!(ret));
                                    }
                                    mv.insert("v".to_string(), json!(m.visibility));
                                    set_flag(&mut mv, "a", m.is_async);
                                    set_flag(&mut mv, "s", m.is_static);
                                    Value::Object(mv)
                                })
                                .collect(),
                        );
                    }
                    if !c.fields.is_empty() {
                        v.insert(
                            "fl".to_string(),
                            c.fields
                                .iter()
                                .map(|f| {
                                    let mut fv = Map::new();
                                    fv.insert("n".to_string(), json!(f.name));
                                    if let Some(ty) = &f.type_annotation {
                                        fv.insert("t".to_string(), json!(ty));
                                    }
                                    fv.insert("v".to_string(), json!(f.visibility));
                                    set_flag(&mut fv, "s", f.is_static);
                                    set_flag(&mut fv, "ro", f.is_readonly);
                                    Value::Object(fv)
                                })
                                .collect(),
                        );
                    }
                    set_flag(&mut v, "ab", c.is_abstract);
                    set_flag(&mut v, "x", c.is_exported);
                    Value::Object(v)
                })
                .collect(),
        );
    }
    if !info.constants.is_empty() {
        obj.insert(
            "k".to_string(),
            info.constants
                .iter()
                .map(|k| {
                    let mut v = Map::new();
                    v.insert("n".to_string(), json!(k.name));
                    if let Some(ty) = &k.type_annotation {
                        v.insert("t".to_string(), json!(ty));
                    }
                    v.insert("vk".to_string(), json!(k.value_kind));
                    set_flag(&mut v, "x", k.is_exported);
                    Value::Object(v)
                })
                .collect(),
        );
    }
    Value::Object(obj)
}

fn params_value(params: &[Parameter]) -> Value {
    params
        .iter()
        .map(|p| {
            let mut v = Map::new();
            v.insert("n".to_string(), json!(p.name));
            if let Some(ty) = &p.type_annotation {
                v.insert("t".to_string(), json!(ty));
            }
            set_flag(&mut v, "o", p.optional);
            set_flag(&mut v, "v", p.variadic);
            Value::Object(v)
        })
        .collect()
}

fn set_flag(obj: &mut Map<String, Value>, key: &str, flag: bool) {
    if flag {
        obj.insert(key.to_string(), json!(1));
    }
}

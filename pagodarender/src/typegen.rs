//! TypeScript declaration generator for page props.
//!
//! The frontend consumes the same props structs the server injects into a
//! render, so the engine emits a `.d.ts` file from the Rust props schema
//! at construction time. The scanner is deliberately line-based: props
//! structs are flat records of `pub` fields, which is all the schema file
//! is allowed to contain.
//!
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};

/// One `pub struct` pulled out of the schema source
struct PropsStruct {
    name: String,
    fields: Vec<(String, String)>,
}

/// Read the props schema and produce the full declaration file contents
pub fn generate(schema_path: &Path) -> Result<String> {
    let source = fs::read_to_string(schema_path)
        .with_context(|| format!("reading props schema {}", schema_path.display()))?;

    let structs = parse_structs(&source);
    if structs.is_empty() {
        bail!(
            "props schema {} declares no pub structs",
            schema_path.display()
        );
    }

    let mut out = String::from("// Generated by pagodarender from the props schema. Do not edit.\n");
    for item in &structs {
        out.push_str(&format!("\nexport interface {} {{\n", item.name));
        for (field, rust_type) in &item.fields {
            out.push_str(&format!("  {}: {};\n", camel_case(field), ts_type(rust_type)));
        }
        out.push_str("}\n");
    }
    Ok(out)
}

/// Scan the source for `pub struct Name { pub field: Type, ... }` items.
/// Attributes, doc comments, private fields and non-record structs are
/// skipped.
fn parse_structs(source: &str) -> Vec<PropsStruct> {
    let mut structs = Vec::new();
    let mut current: Option<PropsStruct> = None;

    for raw in source.lines() {
        let line = raw.trim();

        if current.is_none() {
            if let Some(rest) = line.strip_prefix("pub struct ") {
                if !rest.contains('{') {
                    continue; // unit or tuple struct, nothing to emit
                }
                let name: String = rest
                    .chars()
                    .take_while(|c| c.is_alphanumeric() || *c == '_')
                    .collect();
                if !name.is_empty() {
                    current = Some(PropsStruct {
                        name,
                        fields: Vec::new(),
                    });
                }
            }
            continue;
        }

        if line.starts_with('}') {
            if let Some(done) = current.take() {
                structs.push(done);
            }
            continue;
        }

        if let Some(rest) = line.strip_prefix("pub ") {
            if let Some((field, rust_type)) = rest.split_once(':') {
                let field = field.trim();
                let rust_type = rust_type.trim().trim_end_matches(',').trim();
                let is_ident = !field.is_empty()
                    && field.chars().all(|c| c.is_alphanumeric() || c == '_');
                if is_ident && !rust_type.is_empty() {
                    if let Some(item) = current.as_mut() {
                        item.fields.push((field.to_string(), rust_type.to_string()));
                    }
                }
            }
        }
    }

    structs
}

/// snake_case to camelCase, matching the serde rename on the props structs
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for c in field.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Map a Rust field type to its TypeScript counterpart. Unknown names pass
/// through verbatim so props structs can reference each other.
fn ts_type(rust_type: &str) -> String {
    let ty = rust_type.trim();

    if let Some(inner) = ty.strip_prefix("Option<").and_then(|t| t.strip_suffix('>')) {
        return format!("{} | null", ts_type(inner));
    }
    if let Some(inner) = ty.strip_prefix("Vec<").and_then(|t| t.strip_suffix('>')) {
        let mapped = ts_type(inner);
        if mapped.contains(' ') {
            return format!("({})[]", mapped);
        }
        return format!("{}[]", mapped);
    }

    match ty {
        "i8" | "i16" | "i32" | "i64" | "isize" | "u8" | "u16" | "u32" | "u64" | "usize"
        | "f32" | "f64" => "number".to_string(),
        "String" | "&str" | "str" => "string".to_string(),
        "bool" => "boolean".to_string(),
        other => other.to_string(),
    }
}

//! Flow-style rendering of single values.
//!
//! This is the renderer the block dumper delegates to for everything it
//! writes on one line: scalars, mapping keys, and whole containers once the
//! inline depth runs out. Containers are written as `[a, b]` and
//! `{ key: value }`; comments have no flow representation and are dropped.

use crate::dumper::DumpOptions;
use crate::error::{Error, Result};
use crate::key::{Key, is_sequence_run};
use crate::node::{NodeKind, NodeRef};
use crate::tree::CommentedTree;
use yaml_rust2::Yaml;
use yaml_rust2::yaml::Hash;

/// Render a value in flow style.
///
/// Unsupported values (`Yaml::BadValue`, and `Yaml::Alias` unless
/// `object_support` is set) fail with [`Error::UnsupportedType`] when
/// `exception_on_invalid_type` is set and render as `null` otherwise.
pub fn dump<'a>(value: impl Into<NodeRef<'a>>, options: &DumpOptions) -> Result<String> {
    let mut out = String::new();
    write_value(&mut out, value.into(), options)?;
    Ok(out)
}

/// Render a slot key in flow style.
pub fn dump_key(key: &Key, options: &DumpOptions) -> Result<String> {
    dump(&key.to_yaml(), options)
}

fn write_value(out: &mut String, value: NodeRef<'_>, options: &DumpOptions) -> Result<()> {
    match value {
        NodeRef::Plain(yaml) => write_yaml(out, yaml, options),
        NodeRef::Tree(tree) => write_tree(out, tree, options),
    }
}

fn write_yaml(out: &mut String, yaml: &Yaml, options: &DumpOptions) -> Result<()> {
    match yaml {
        Yaml::Null => out.push_str("null"),
        Yaml::Boolean(b) => out.push_str(if *b { "true" } else { "false" }),
        Yaml::Integer(i) => out.push_str(&i.to_string()),
        Yaml::Real(text) => write_real(out, yaml, text),
        Yaml::String(s) => write_string(out, s),
        Yaml::Array(items) => write_sequence(out, items.iter().map(NodeRef::Plain), options)?,
        Yaml::Hash(hash) => write_hash(out, hash, options)?,
        Yaml::Alias(id) if options.object_support => {
            out.push('*');
            out.push_str(&id.to_string());
        }
        Yaml::Alias(_) => write_unsupported(out, "alias", options)?,
        Yaml::BadValue => write_unsupported(out, "bad value", options)?,
    }
    Ok(())
}

fn write_tree(out: &mut String, tree: &CommentedTree, options: &DumpOptions) -> Result<()> {
    if tree.is_empty() {
        out.push_str(match tree.kind() {
            NodeKind::Sequence => "[]",
            _ => "{}",
        });
        return Ok(());
    }

    if !tree.is_hash() {
        return write_sequence(out, tree.values().map(NodeRef::from), options);
    }

    out.push_str("{ ");
    for (i, (key, value)) in tree.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_yaml(out, &key.to_yaml(), options)?;
        out.push_str(": ");
        write_value(out, value.into(), options)?;
    }
    out.push_str(" }");
    Ok(())
}

fn write_hash(out: &mut String, hash: &Hash, options: &DumpOptions) -> Result<()> {
    if hash.is_empty() {
        out.push_str("{}");
        return Ok(());
    }

    if is_sequence_run(hash.keys().map(Yaml::as_i64)) {
        return write_sequence(out, hash.values().map(NodeRef::Plain), options);
    }

    out.push_str("{ ");
    for (i, (key, value)) in hash.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_yaml(out, key, options)?;
        out.push_str(": ");
        write_yaml(out, value, options)?;
    }
    out.push_str(" }");
    Ok(())
}

fn write_sequence<'a>(
    out: &mut String,
    items: impl Iterator<Item = NodeRef<'a>>,
    options: &DumpOptions,
) -> Result<()> {
    out.push('[');
    for (i, item) in items.enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_value(out, item, options)?;
    }
    out.push(']');
    Ok(())
}

fn write_unsupported(out: &mut String, kind: &'static str, options: &DumpOptions) -> Result<()> {
    if options.exception_on_invalid_type {
        return Err(Error::UnsupportedType { kind });
    }
    tracing::debug!(kind, "rendering unsupported value as null");
    out.push_str("null");
    Ok(())
}

/// Reals keep their source text unless they are infinite or NaN, which get
/// the canonical YAML spellings.
fn write_real(out: &mut String, yaml: &Yaml, text: &str) {
    match yaml.as_f64() {
        Some(f) if f.is_nan() => out.push_str(".NaN"),
        Some(f) if f.is_infinite() => out.push_str(if f > 0.0 { ".Inf" } else { "-.Inf" }),
        Some(_) => out.push_str(text),
        // Not a number at all: keep it readable as a string.
        None => write_string(out, text),
    }
}

/// Write a string with the least quoting that round-trips.
fn write_string(out: &mut String, s: &str) {
    if requires_double_quoting(s) {
        write_double_quoted(out, s);
    } else if requires_single_quoting(s) {
        out.push('\'');
        out.push_str(&s.replace('\'', "''"));
        out.push('\'');
    } else {
        out.push_str(s);
    }
}

/// Control characters can only be written escaped, which needs double quotes.
fn requires_double_quoting(s: &str) -> bool {
    s.chars().any(char::is_control)
}

fn requires_single_quoting(s: &str) -> bool {
    let Some(first) = s.chars().next() else {
        return true;
    };

    first.is_whitespace()
        || s.ends_with(char::is_whitespace)
        || matches!(
            first,
            '-' | '?' | ':' | ',' | '[' | ']' | '{' | '}' | '#' | '&' | '*' | '!' | '|' | '>'
                | '\'' | '"' | '%' | '@' | '`'
        )
        || s.contains(": ")
        || s.contains(" #")
        || s.ends_with(':')
        || s.contains([',', '[', ']', '{', '}'])
        || looks_like_bool(s)
        || looks_like_null(s)
        || looks_like_number(s)
}

fn write_double_quoted(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            '\x07' => out.push_str("\\a"),
            '\x08' => out.push_str("\\b"),
            '\x0b' => out.push_str("\\v"),
            '\x0c' => out.push_str("\\f"),
            '\x1b' => out.push_str("\\e"),
            c if c.is_control() && (c as u32) <= 0xff => {
                out.push_str(&format!("\\x{:02X}", c as u32));
            }
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

fn looks_like_bool(s: &str) -> bool {
    matches!(
        s.to_lowercase().as_str(),
        "true" | "false" | "yes" | "no" | "on" | "off" | "y" | "n"
    )
}

fn looks_like_null(s: &str) -> bool {
    matches!(s.to_lowercase().as_str(), "null" | "~" | "nil" | "none")
}

fn looks_like_number(s: &str) -> bool {
    let lower = s.to_lowercase();
    let unsigned = lower.trim_start_matches(['+', '-']);
    s.parse::<i64>().is_ok()
        || s.parse::<f64>().is_ok()
        || matches!(unsigned, ".inf" | ".nan")
        || unsigned.starts_with("0x")
        || unsigned.starts_with("0o")
}

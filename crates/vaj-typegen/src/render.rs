use vaj_types::Networks;

use crate::schema::{version_fields, DeclaredType, Field};

/// Interface name used when the caller has no preference.
pub const DEFAULT_INTERFACE_NAME: &str = "IDeployArtifacts";

/// Spaces per nesting level.
const INDENT: usize = 2;

/// Render the declaration text for the whole structure.
///
/// Each network, contract, alias and version opens a `name: {` block one
/// level deeper than its parent; each network block is followed by a blank
/// line. An empty structure yields an empty interface.
pub fn render_declaration(interface_name: &str, data: &Networks) -> String {
    let mut body = String::new();

    for (network, contracts) in data.iter() {
        let mut depth = INDENT;
        open_block(&mut body, depth, network);

        depth += INDENT;
        for (contract, aliases) in contracts.iter() {
            open_block(&mut body, depth, contract);

            depth += INDENT;
            for (alias, versions) in aliases.iter() {
                open_block(&mut body, depth, alias);

                depth += INDENT;
                for (version, record) in versions.iter() {
                    open_block(&mut body, depth, version);
                    body.push('\n');
                    write_fields(&mut body, &version_fields(record), depth + INDENT);
                    body.push_str(&" ".repeat(depth));
                    body.push_str("};");
                }
                depth -= INDENT;
                close_block(&mut body, depth);
            }
            depth -= INDENT;
            close_block(&mut body, depth);
        }
        depth -= INDENT;
        close_block(&mut body, depth);
        body.push('\n');
    }

    format!("\nexport interface {interface_name} {{{body}}}\n")
}

fn open_block(out: &mut String, depth: usize, name: &str) {
    out.push('\n');
    out.push_str(&" ".repeat(depth));
    out.push_str(&property_key(name));
    out.push_str(": {");
}

fn close_block(out: &mut String, depth: usize) {
    out.push('\n');
    out.push_str(&" ".repeat(depth));
    out.push_str("};");
}

fn write_fields(out: &mut String, fields: &[Field], depth: usize) {
    let pad = " ".repeat(depth);
    for field in fields {
        let key = property_key(&field.name);
        match &field.ty {
            DeclaredType::Object(children) => {
                out.push_str(&format!("{pad}{key}: {{\n"));
                write_fields(out, children, depth + INDENT);
                out.push_str(&format!("{pad}}};\n"));
            }
            DeclaredType::String => out.push_str(&format!("{pad}{key}: string;\n")),
            DeclaredType::Number => out.push_str(&format!("{pad}{key}: number;\n")),
            DeclaredType::Boolean => out.push_str(&format!("{pad}{key}: boolean;\n")),
        }
    }
}

/// Property names that are not plain identifiers are emitted as string literals.
fn property_key(name: &str) -> String {
    if is_identifier(name) {
        name.to_string()
    } else {
        serde_json::to_string(name).unwrap_or_else(|_| format!("\"{name}\""))
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

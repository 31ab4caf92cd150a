//! Generates the `export type <Name> = { ... };` declaration for the
//! canonical key set and splices it into an existing source file.

use crate::error::SyncError;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use tracing::info;

static IDENTIFIER_REGEX: OnceLock<Regex> = OnceLock::new();

/// Render the declaration, one `string` field per key, in the given order.
pub fn render_declaration<'a>(type_name: &str, keys: impl IntoIterator<Item = &'a str>) -> String {
    let fields: Vec<String> = keys
        .into_iter()
        .map(|key| format!("  {}: string;", property_name(key)))
        .collect();

    format!("export type {} = {{\n{}\n}};", type_name, fields.join("\n"))
}

/// Keys that are not identifiers become quoted property names
fn property_name(key: &str) -> String {
    let regex =
        IDENTIFIER_REGEX.get_or_init(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap());

    if regex.is_match(key) {
        key.to_string()
    } else {
        serde_json::Value::String(key.to_string()).to_string()
    }
}

/// The body may hold quoted property names, and braces inside them do not
/// close the declaration.
fn declaration_pattern(type_name: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r#"export type {}\s*=\s*\{{(?:"(?:[^"\\]|\\.)*"|[^}}"])*\}};?"#,
        regex::escape(type_name)
    ))
}

/// Replace the first existing declaration of `type_name` in `source`.
///
/// Returns `None` when `source` has no such declaration. Everything outside
/// the matched span is returned unchanged.
pub fn replace_declaration(source: &str, type_name: &str, declaration: &str) -> Option<String> {
    let pattern = declaration_pattern(type_name).ok()?;
    let found = pattern.find(source)?;

    let mut updated = String::with_capacity(source.len() + declaration.len());
    updated.push_str(&source[..found.start()]);
    updated.push_str(declaration);
    updated.push_str(&source[found.end()..]);
    Some(updated)
}

/// Regenerate the declaration inside the file at `path`.
///
/// Returns whether the file content changed. A missing declaration is a
/// [`SyncError::DeclarationNotFound`]; the file is left untouched.
pub fn update_types_file<'a>(
    path: &Path,
    type_name: &str,
    keys: impl IntoIterator<Item = &'a str>,
) -> Result<bool, SyncError> {
    let source = fs::read_to_string(path).map_err(|e| {
        SyncError::config(format!(
            "Failed to read types file {}: {}",
            path.display(),
            e
        ))
    })?;

    let declaration = render_declaration(type_name, keys);
    let updated = replace_declaration(&source, type_name, &declaration).ok_or_else(|| {
        SyncError::DeclarationNotFound {
            type_name: type_name.to_string(),
            path: path.to_path_buf(),
        }
    })?;

    if updated == source {
        info!("Type {} in {} is up to date", type_name, path.display());
        return Ok(false);
    }

    fs::write(path, updated).map_err(|e| SyncError::io(path, e))?;
    info!("Types updated in {}", path.display());
    Ok(true)
}

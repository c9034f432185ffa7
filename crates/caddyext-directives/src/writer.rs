//! Write pending directives back into the directives file
//!
//! Two orderings are maintained separately:
//! - the order list gets new directives appended, oldest first, because its
//!   order is the order Caddy applies directives in
//! - the import block gets each new import inserted right after the framework
//!   imports, so the most recently added directive's import comes first
//!
//! All edits happen on a copy of the registry's tree. The copy is re-checked
//! against the registry before the file is atomically replaced.

use caddyext_config::Layout;
use caddyext_syntax::{default_package_name, is_identifier, GoSource, NewImport, SyntaxError};
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::entry::Entry;
use crate::errors::{DirectiveError, Result};
use crate::loader;
use crate::registry::Registry;

/// Apply the registry's pending directives and persist the result
pub(crate) fn write(registry: &Registry) -> Result<GoSource> {
    let render_error = |source: SyntaxError| DirectiveError::Render {
        path: registry.path().to_path_buf(),
        source,
    };

    let mut source = registry.source().clone();
    for entry in registry.pending() {
        let qualifier = insert_import(&mut source, entry, registry.layout()).map_err(render_error)?;
        let element = format!(
            "{{\"{}\", {}.{}}}",
            entry.name,
            qualifier,
            registry.layout().setup_symbol
        );
        source
            .append_list_element(&registry.layout().list_name, &element)
            .map_err(render_error)?;
    }

    verify(&source, registry).map_err(render_error)?;
    persist(registry.path(), source.render())?;
    Ok(source)
}

/// Insert the import for `entry` right after the framework imports and
/// return the package name the directive is referenced by
fn insert_import(
    source: &mut GoSource,
    entry: &Entry,
    layout: &Layout,
) -> std::result::Result<String, SyntaxError> {
    let imports = source.imports();
    let position = imports
        .iter()
        .rposition(|spec| layout.is_framework_import(&spec.path))
        .map_or(0, |last| last + 1);
    let bound: HashSet<String> = imports
        .iter()
        .map(|spec| spec.package_name())
        .chain(source.declared_names())
        .collect();

    let package = default_package_name(&entry.import_path);
    let import = if is_identifier(package) && !bound.contains(package) {
        NewImport::new(entry.import_path.as_str())
    } else {
        NewImport::named(unique_alias(&entry.name, &bound), entry.import_path.as_str())
    };

    debug!(
        "Importing {} as `{}` at position {}",
        entry.import_path,
        import.package_name(),
        position
    );
    let qualifier = import.package_name();
    source.insert_import(position, &import)?;
    Ok(qualifier)
}

/// Package alias derived from a directive name, unique among `bound`
fn unique_alias(name: &str, bound: &HashSet<String>) -> String {
    let mut base: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if !base.starts_with(|c: char| c.is_alphabetic() || c == '_') {
        base.insert(0, '_');
    }
    if !is_identifier(&base) {
        base.push('_');
    }

    let mut alias = base.clone();
    let mut suffix = 2;
    while bound.contains(&alias) {
        alias = format!("{}{}", base, suffix);
        suffix += 1;
    }
    alias
}

/// The rendered source must load back to exactly the registry's entries
fn verify(source: &GoSource, registry: &Registry) -> std::result::Result<(), SyntaxError> {
    let entries = loader::extract_entries(source, registry.layout())
        .map_err(|e| SyntaxError::RoundTrip(e.to_string()))?;
    if entries != registry.list() {
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        return Err(SyntaxError::RoundTrip(format!(
            "expected {} directives, re-read {:?}",
            registry.list().len(),
            names
        )));
    }
    Ok(())
}

/// Replace the file at `path` with `content` via a temporary file and rename
pub(crate) fn persist(path: &Path, content: &str) -> Result<()> {
    let write_error = |source: std::io::Error| DirectiveError::Write {
        path: path.to_path_buf(),
        source,
    };

    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut temp_file = NamedTempFile::new_in(parent).map_err(write_error)?;
    temp_file
        .write_all(content.as_bytes())
        .map_err(write_error)?;
    temp_file.as_file().sync_all().map_err(write_error)?;

    if let Ok(metadata) = fs::metadata(path) {
        fs::set_permissions(temp_file.path(), metadata.permissions()).map_err(write_error)?;
    }

    temp_file
        .persist(path)
        .map_err(|e| write_error(e.error))?;
    debug!("Wrote {} bytes to {:?}", content.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_alias() {
        let bound: HashSet<String> = ["gzip".to_string(), "gzip2".to_string()].into();
        assert_eq!(unique_alias("gzip", &bound), "gzip3");
        assert_eq!(unique_alias("rate-limit", &bound), "rate_limit");
        assert_eq!(unique_alias("2fa", &bound), "_2fa");
        assert_eq!(unique_alias("func", &bound), "func_");
    }

    #[test]
    fn test_persist_replaces_content() -> anyhow::Result<()> {
        let temp_dir = tempfile::TempDir::new()?;
        let path = temp_dir.path().join("directives.go");
        fs::write(&path, "old")?;
        persist(&path, "new")?;
        assert_eq!(fs::read_to_string(&path)?, "new");
        assert_eq!(fs::read_dir(temp_dir.path())?.count(), 1);
        Ok(())
    }
}

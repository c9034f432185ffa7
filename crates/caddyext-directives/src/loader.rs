//! Rebuild the registry state from a directives file
//!
//! Directive imports and directive elements of the order list are paired by
//! package name: the element `{"gzip", gzip.Setup}` belongs to the import that
//! binds `gzip`. Both sides must agree one to one; anything else is reported as
//! a consistency error and never repaired.

use caddyext_config::Layout;
use caddyext_syntax::{GoSource, ImportSpec};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::entry::Entry;
use crate::errors::{DirectiveError, Result};

pub(crate) fn read_source(path: &Path) -> Result<GoSource> {
    debug!("Reading directives file: {:?}", path);
    let content = fs::read_to_string(path).map_err(|source| DirectiveError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    GoSource::parse(content).map_err(|source| DirectiveError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Extract the registered directives of `source` in declaration order
pub(crate) fn extract_entries(source: &GoSource, layout: &Layout) -> Result<Vec<Entry>> {
    let imports = source.imports();
    let (framework, directive_imports): (Vec<&ImportSpec>, Vec<&ImportSpec>) = imports
        .iter()
        .partition(|spec| layout.is_framework_import(&spec.path));
    let framework_names: HashSet<String> =
        framework.iter().map(|spec| spec.package_name()).collect();

    let list = source.list_literal(&layout.list_name).ok_or_else(|| {
        DirectiveError::Consistency(format!("`{}` is not declared", layout.list_name))
    })?;

    // Elements without a package qualifier, or qualified by a framework
    // package, are built into Caddy and not managed here.
    let elements: Vec<_> = list
        .elements
        .iter()
        .filter_map(|element| {
            element
                .qualifier
                .as_deref()
                .filter(|q| !framework_names.contains(*q))
                .map(|q| (q, element))
        })
        .collect();

    debug!(
        "Found {} directive imports and {} directive elements in `{}`",
        directive_imports.len(),
        elements.len(),
        layout.list_name
    );

    if elements.len() != directive_imports.len() {
        return Err(DirectiveError::Consistency(format!(
            "{} directive imports but {} directives in `{}`",
            directive_imports.len(),
            elements.len(),
            layout.list_name
        )));
    }

    let mut used_imports = HashSet::new();
    let mut names = HashSet::new();
    let mut entries = Vec::with_capacity(elements.len());
    for (qualifier, element) in elements {
        let name = element.label.clone().ok_or_else(|| {
            DirectiveError::Consistency(format!("`{}` has no directive name", element.text))
        })?;

        let mut candidates = directive_imports
            .iter()
            .enumerate()
            .filter(|(_, spec)| spec.package_name() == qualifier);
        let (index, import) = candidates.next().ok_or_else(|| {
            DirectiveError::Consistency(format!(
                "directive '{}' refers to package `{}`, which is not imported",
                name, qualifier
            ))
        })?;
        if candidates.next().is_some() {
            return Err(DirectiveError::Consistency(format!(
                "package `{}` of directive '{}' is imported more than once",
                qualifier, name
            )));
        }
        if !used_imports.insert(index) {
            return Err(DirectiveError::Consistency(format!(
                "import \"{}\" is shared by more than one directive",
                import.path
            )));
        }
        if !names.insert(name.clone()) {
            return Err(DirectiveError::Consistency(format!(
                "directive '{}' is listed more than once",
                name
            )));
        }
        entries.push(Entry::new(name, import.path.clone()));
    }

    Ok(entries)
}

/// Load the registry state of the file at `path`
pub(crate) fn load(path: &Path, layout: &Layout) -> Result<(GoSource, Vec<Entry>)> {
    let source = read_source(path)?;
    let entries = extract_entries(&source, layout)?;
    info!("Loaded {} directives from {:?}", entries.len(), path);
    Ok((source, entries))
}

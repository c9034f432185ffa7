use std::ops::Range;

use crate::tree::{self, descendants, is_string_literal, GoNode};

/// One `import` spec as it appears in the file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    /// Explicit package name (`alias "path"`, `_ "path"`, `. "path"`)
    pub name: Option<String>,
    /// Unquoted import path
    pub path: String,
    /// Byte range of the spec
    pub range: Range<usize>,
    /// Byte range of the enclosing `import` declaration
    pub declaration: Range<usize>,
    /// Whether the spec sits inside a parenthesized `import ( ... )` block
    pub grouped: bool,
}

impl ImportSpec {
    /// Name this import binds in the file scope
    pub fn package_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| default_package_name(&self.path).to_string())
    }
}

/// An import spec to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewImport {
    pub name: Option<String>,
    pub path: String,
}

impl NewImport {
    pub fn new(path: impl Into<String>) -> Self {
        NewImport {
            name: None,
            path: path.into(),
        }
    }

    pub fn named(name: impl Into<String>, path: impl Into<String>) -> Self {
        NewImport {
            name: Some(name.into()),
            path: path.into(),
        }
    }

    pub fn package_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| default_package_name(&self.path).to_string())
    }

    pub(crate) fn render(&self) -> String {
        match &self.name {
            Some(name) => format!("{} \"{}\"", name, self.path),
            None => format!("\"{}\"", self.path),
        }
    }
}

/// Package name Go assumes for an import path without an explicit name.
///
/// Takes the last path element, skipping a trailing major version element
/// (`/v2`) and a gopkg.in style version suffix (`yaml.v2`).
pub fn default_package_name(path: &str) -> &str {
    let mut segments = path.trim_end_matches('/').rsplit('/');
    let mut last = segments.next().unwrap_or(path);
    if is_major_version(last) {
        if let Some(previous) = segments.next() {
            last = previous;
        }
    }
    match last.rsplit_once(".v") {
        Some((base, version)) if is_version_number(version) => base,
        _ => last,
    }
}

fn is_major_version(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(is_version_number)
}

fn is_version_number(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}

/// Collect every import spec under `root` in declaration order
pub(crate) fn collect(root: &GoNode<'_>) -> Vec<ImportSpec> {
    let mut specs = Vec::new();
    for declaration in descendants(root)
        .into_iter()
        .filter(|n| n.kind() == "import_declaration")
    {
        let declaration_range = declaration.range();
        for child in declaration.children() {
            let kind = child.kind();
            if kind == "import_spec" {
                if let Some(spec) = read_spec(&child, declaration_range.clone(), false) {
                    specs.push(spec);
                }
            } else if kind == "import_spec_list" {
                for grouped in child.children().filter(|n| n.kind() == "import_spec") {
                    if let Some(spec) = read_spec(&grouped, declaration_range.clone(), true) {
                        specs.push(spec);
                    }
                }
            }
        }
    }
    specs
}

fn read_spec(node: &GoNode<'_>, declaration: Range<usize>, grouped: bool) -> Option<ImportSpec> {
    let path_node = node
        .field("path")
        .or_else(|| node.children().find(is_string_literal))?;
    let path = tree::unquote(&path_node.text())?;
    let name = node
        .field("name")
        .or_else(|| {
            node.children().find(|n| {
                let kind = n.kind();
                kind == "package_identifier" || kind == "dot" || kind == "blank_identifier"
            })
        })
        .map(|n| n.text().to_string());
    Some(ImportSpec {
        name,
        path,
        range: node.range(),
        declaration,
        grouped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GoSource;

    #[test]
    fn test_default_package_name() {
        assert_eq!(default_package_name("github.com/mholt/caddy/middleware"), "middleware");
        assert_eq!(default_package_name("github.com/x/ratelimit/v2"), "ratelimit");
        assert_eq!(default_package_name("gopkg.in/yaml.v2"), "yaml");
        assert_eq!(default_package_name("github.com/x/go-gzip"), "go-gzip");
        assert_eq!(default_package_name("fmt"), "fmt");
    }

    #[test]
    fn test_collect_grouped_and_single() -> anyhow::Result<()> {
        let source = GoSource::parse(
            r#"package caddy

import "fmt"

import (
	"github.com/mholt/caddy/caddy/setup"
	gz "github.com/x/go-gzip"
)
"#,
        )?;
        let imports = source.imports();
        assert_eq!(imports.len(), 3);
        assert_eq!(imports[0].path, "fmt");
        assert!(!imports[0].grouped);
        assert_eq!(imports[1].package_name(), "setup");
        assert!(imports[1].grouped);
        assert_eq!(imports[2].name.as_deref(), Some("gz"));
        assert_eq!(imports[2].package_name(), "gz");
        Ok(())
    }

    #[test]
    fn test_render_new_import() {
        assert_eq!(NewImport::new("github.com/a/b").render(), "\"github.com/a/b\"");
        assert_eq!(
            NewImport::named("b2", "github.com/a/b").render(),
            "b2 \"github.com/a/b\""
        );
    }
}

//! Go source adapter for the caddyext directive registry
//!
//! This crate exposes the narrow surface the registry needs over a Go file:
//! 1. Parsing source text with tree-sitter's Go grammar (through ast-grep)
//! 2. Enumerating and inserting `import` specs
//! 3. Locating and extending a package-level list literal
//! 4. Rendering the tree back to text
//!
//! Mutations splice text at node byte ranges and re-parse, so a [`GoSource`]
//! always holds the parse of its current text. A mutation that would leave the
//! source malformed is rejected and the source is left as it was.
mod errors;
mod imports;
mod list_literal;
mod tree;

pub use errors::{Diagnostic, SyntaxError};
pub use imports::{default_package_name, ImportSpec, NewImport};
pub use list_literal::{ListElement, ListLiteral};
pub use tree::is_identifier;

use ast_grep_core::source::StrDoc;
use ast_grep_core::AstGrep;
use ast_grep_language::Go;
use tracing::debug;

/// A parsed Go source file
pub struct GoSource {
    text: String,
    grep: AstGrep<StrDoc<Go>>,
}

impl GoSource {
    /// Parse `text`, rejecting it if the grammar reports any error node
    pub fn parse(text: impl Into<String>) -> Result<Self, SyntaxError> {
        let text = text.into();
        let grep = AstGrep::new(&text, Go);
        let source = GoSource { text, grep };
        if let Some(diagnostic) = source.diagnostics().into_iter().next() {
            return Err(SyntaxError::Malformed(diagnostic));
        }
        Ok(source)
    }

    /// Render the current tree as source text
    pub fn render(&self) -> &str {
        &self.text
    }

    /// Syntax errors in the current tree, in source order
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let root = self.grep.root();
        tree::descendants(&root)
            .into_iter()
            .filter(|n| n.kind() == "ERROR")
            .map(|n| Diagnostic::at(&self.text, n.range().start, &n.text()))
            .collect()
    }

    /// Import specs of every `import` declaration, in declaration order
    pub fn imports(&self) -> Vec<ImportSpec> {
        imports::collect(&self.grep.root())
    }

    /// Identifiers declared at package level, which imports must not shadow
    pub fn declared_names(&self) -> Vec<String> {
        tree::declared_names(&self.grep.root())
    }

    /// Insert `import` so that it becomes the spec at `index` in [`Self::imports`].
    ///
    /// A file without imports gets a parenthesized block after its package
    /// clause. Inserting next to a single-spec `import "x"` declaration turns it
    /// into a parenthesized block.
    pub fn insert_import(&mut self, index: usize, import: &NewImport) -> Result<(), SyntaxError> {
        let specs = self.imports();
        if index > specs.len() {
            return Err(SyntaxError::ImportPosition {
                index,
                len: specs.len(),
            });
        }
        let rendered = import.render();

        let edit = if specs.is_empty() {
            let package_end = self
                .grep
                .root()
                .children()
                .find(|n| n.kind() == "package_clause")
                .map(|n| n.range().end)
                .ok_or(SyntaxError::MissingPackageClause)?;
            tree::Edit::insert(package_end, format!("\n\nimport (\n\t{rendered}\n)"))
        } else {
            let before = index < specs.len();
            let anchor = if before {
                &specs[index]
            } else {
                &specs[index - 1]
            };
            if anchor.grouped {
                let indent = tree::line_indent(&self.text, anchor.range.start);
                if before {
                    tree::Edit::insert(anchor.range.start, format!("{rendered}\n{indent}"))
                } else {
                    tree::Edit::insert(
                        tree::after_line(&self.text, anchor.range.end),
                        format!("\n{indent}{rendered}"),
                    )
                }
            } else {
                let existing = &self.text[anchor.range.clone()];
                let body = if before {
                    format!("\t{rendered}\n\t{existing}")
                } else {
                    format!("\t{existing}\n\t{rendered}")
                };
                tree::Edit::replace(anchor.declaration.clone(), format!("import (\n{body}\n)"))
            }
        };

        debug!("Inserting import {} at position {}", rendered, index);
        self.apply(&edit)
    }

    /// Find the list literal assigned to the package-level var `name`
    pub fn list_literal(&self, name: &str) -> Option<ListLiteral> {
        list_literal::find(&self.grep.root(), name)
    }

    /// Append `element` (Go expression text) at the end of the list literal `name`
    pub fn append_list_element(&mut self, name: &str, element: &str) -> Result<(), SyntaxError> {
        let list = self
            .list_literal(name)
            .ok_or_else(|| SyntaxError::MissingList(name.to_string()))?;
        let edit = list_literal::append_edit(&self.text, &list, element);
        debug!("Appending {} to {}", element, name);
        self.apply(&edit)
    }

    fn apply(&mut self, edit: &tree::Edit) -> Result<(), SyntaxError> {
        *self = GoSource::parse(edit.apply(&self.text))?;
        Ok(())
    }
}

impl Clone for GoSource {
    fn clone(&self) -> Self {
        GoSource {
            text: self.text.clone(),
            grep: AstGrep::new(&self.text, Go),
        }
    }
}

impl std::fmt::Debug for GoSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoSource")
            .field("len", &self.text.len())
            .finish_non_exhaustive()
    }
}

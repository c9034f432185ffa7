//! In-memory view of the directives registered in one directives file

use caddyext_config::Layout;
use caddyext_syntax::GoSource;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::entry::Entry;
use crate::errors::{DirectiveError, Result};
use crate::{loader, skeleton, writer};

/// Ordered directive registry backed by a parsed directives file.
///
/// Entries are kept in declaration order, which is the order Caddy applies
/// directives in. Entries before the `persisted` watermark are on disk; the
/// rest were added since the last load or save.
#[derive(Debug)]
pub struct Registry {
    path: PathBuf,
    layout: Layout,
    source: GoSource,
    entries: Vec<Entry>,
    persisted: usize,
}

impl Registry {
    /// Load the registry from a directives file using the default Caddy layout
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with(path, Layout::default())
    }

    /// Load the registry from a directives file with a custom layout
    pub fn load_with(path: impl AsRef<Path>, layout: Layout) -> Result<Self> {
        let path = path.as_ref();
        let (source, entries) = loader::load(path, &layout)?;
        let persisted = entries.len();
        Ok(Registry {
            path: path.to_path_buf(),
            layout,
            source,
            entries,
            persisted,
        })
    }

    /// Create a fresh directives file at `path` and load it.
    ///
    /// Fails with [`DirectiveError::Write`] if the file already exists.
    pub fn init(path: impl AsRef<Path>, layout: Layout) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Err(DirectiveError::Write {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::AlreadyExists, "file already exists"),
            });
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| DirectiveError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
        writer::persist(path, &skeleton::skeleton(&layout))?;
        info!("Created directives file: {:?}", path);
        Self::load_with(path, layout)
    }

    /// Registered directives in declaration order
    pub fn list(&self) -> &[Entry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Directives added since the last load or save, oldest first
    pub fn pending(&self) -> &[Entry] {
        &self.entries[self.persisted..]
    }

    pub fn has_pending(&self) -> bool {
        self.persisted < self.entries.len()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Source text as last loaded or saved
    pub fn source_text(&self) -> &str {
        self.source.render()
    }

    pub(crate) fn source(&self) -> &GoSource {
        &self.source
    }

    /// Register a new directive at the end of the order.
    ///
    /// Nothing is written until [`Registry::save`].
    pub fn add_directive(&mut self, name: &str, import_path: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(DirectiveError::InvalidDirective(
                "directive name must not be empty".to_string(),
            ));
        }
        if !is_directive_name(name) {
            return Err(DirectiveError::InvalidDirective(format!(
                "'{}' is not a valid directive name",
                name.escape_debug()
            )));
        }
        if import_path.trim().is_empty() {
            return Err(DirectiveError::InvalidDirective(format!(
                "import path of '{}' must not be empty",
                name
            )));
        }
        if self.layout.is_framework_import(import_path) {
            return Err(DirectiveError::InvalidDirective(format!(
                "{} is a framework package, not a directive",
                import_path
            )));
        }
        if self.contains(name) {
            return Err(DirectiveError::DuplicateDirective(name.to_string()));
        }

        debug!("Adding directive {} from {}", name, import_path);
        self.entries.push(Entry::new(name, import_path));
        Ok(())
    }

    /// Write all directives back to the file.
    ///
    /// On failure neither the registry nor the file on disk is changed.
    pub fn save(&mut self) -> Result<()> {
        let source = writer::write(self)?;
        info!(
            "Saved {} directives ({} new) to {:?}",
            self.entries.len(),
            self.pending().len(),
            self.path
        );
        self.source = source;
        self.persisted = self.entries.len();
        Ok(())
    }
}

/// A Caddyfile directive token that survives a Go string literal unchanged
fn is_directive_name(name: &str) -> bool {
    !name.is_empty()
        && name.chars().all(|c| {
            !c.is_whitespace() && !c.is_control() && !matches!(c, '"' | '\\' | '{' | '}' | '#')
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fresh_registry(temp_dir: &TempDir) -> Result<Registry> {
        Registry::init(temp_dir.path().join("directives.go"), Layout::default())
    }

    #[test]
    fn test_add_directive_is_in_memory_only() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let mut registry = fresh_registry(&temp_dir)?;
        let before = std::fs::read_to_string(registry.path())?;

        registry.add_directive("gzip", "github.com/x/gzip")?;

        assert_eq!(registry.list(), &[Entry::new("gzip", "github.com/x/gzip")]);
        assert_eq!(registry.pending().len(), 1);
        assert!(registry.has_pending());
        assert_eq!(std::fs::read_to_string(registry.path())?, before);
        Ok(())
    }

    #[test]
    fn test_add_directive_rejects_empty_values() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let mut registry = fresh_registry(&temp_dir)?;

        assert!(matches!(
            registry.add_directive("", "github.com/x/gzip"),
            Err(DirectiveError::InvalidDirective(_))
        ));
        assert!(matches!(
            registry.add_directive("gzip", " "),
            Err(DirectiveError::InvalidDirective(_))
        ));
        assert!(registry.list().is_empty());
        Ok(())
    }

    #[test]
    fn test_add_directive_rejects_names_go_would_rewrite() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let mut registry = fresh_registry(&temp_dir)?;

        for name in ["my\\tdir", "my\tdir", "a b", "quo\"te", "{x}", "#x"] {
            assert!(
                matches!(
                    registry.add_directive(name, "github.com/x/d"),
                    Err(DirectiveError::InvalidDirective(_))
                ),
                "{:?} was accepted",
                name
            );
        }
        registry.add_directive("rate-limit", "github.com/x/ratelimit")?;
        assert_eq!(registry.list().len(), 1);
        Ok(())
    }

    #[test]
    fn test_add_directive_rejects_framework_package() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let mut registry = fresh_registry(&temp_dir)?;

        let result = registry.add_directive("gzip", "github.com/mholt/caddy/middleware/gzip");
        assert!(matches!(result, Err(DirectiveError::InvalidDirective(_))));
        assert!(!registry.has_pending());

        registry.add_directive("gzip", "github.com/x/gzip")?;
        registry.save()?;
        Ok(())
    }

    #[test]
    fn test_names_are_case_sensitive() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let mut registry = fresh_registry(&temp_dir)?;

        registry.add_directive("gzip", "github.com/x/gzip")?;
        registry.add_directive("Gzip", "github.com/y/gzip")?;

        assert!(registry.contains("Gzip"));
        assert_eq!(
            registry.get("gzip").map(|e| e.import_path.as_str()),
            Some("github.com/x/gzip")
        );
        Ok(())
    }

    #[test]
    fn test_init_refuses_existing_file() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        fresh_registry(&temp_dir)?;
        let result = fresh_registry(&temp_dir);
        assert!(matches!(result, Err(DirectiveError::Write { .. })));
        Ok(())
    }

    #[test]
    fn test_save_clears_pending() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let mut registry = fresh_registry(&temp_dir)?;

        registry.add_directive("gzip", "github.com/x/gzip")?;
        registry.save()?;

        assert!(!registry.has_pending());
        assert_eq!(
            registry.source_text(),
            std::fs::read_to_string(registry.path())?
        );
        Ok(())
    }
}

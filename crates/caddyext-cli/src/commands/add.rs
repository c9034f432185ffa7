use anyhow::{Context, Result};

use crate::common::{open_registry, GlobalOpts};

/// Register a directive and write it into the directives file
pub fn handle_add(name: &str, import_path: &str, opts: &GlobalOpts) -> Result<()> {
    let mut registry = open_registry(opts)?;
    registry.add_directive(name, import_path)?;
    registry
        .save()
        .with_context(|| format!("Failed to add directive '{}'", name))?;

    caddyext_logger::success(&format!(
        "Added directive {} ({}) to {}",
        name,
        import_path,
        registry.path().display()
    ));
    caddyext_logger::step(&format!("{} directives registered", registry.list().len()));
    Ok(())
}

use anyhow::Result;
use caddyext_config::Config;
use caddyext_directives::Registry;
use colored::Colorize;
use std::path::PathBuf;

use crate::common::GlobalOpts;

/// Create a minimal directives file to register directives in
pub fn handle_init(path: Option<PathBuf>, opts: &GlobalOpts) -> Result<()> {
    caddyext_logger::debug("Handling init command");

    let config = Config::load()?;
    let target = path.unwrap_or_else(|| opts.directives_file(&config));
    caddyext_logger::debug(&format!("Target file: {}", target.display()));

    let registry = Registry::init(&target, config.layout)?;
    caddyext_logger::success(&format!(
        "Created directives file: {}",
        registry.path().display()
    ));
    println!();
    println!("Next steps:");
    println!(
        "  1. Add a directive: caddyext --file {} add <name> <import-path>",
        target.display().to_string().bold()
    );
    println!("  2. List directives: caddyext --file {} list", target.display());
    Ok(())
}

use anyhow::{Context, Result};
use caddyext_directives::Entry;
use colored::Colorize;

use crate::common::{open_registry, GlobalOpts};

/// Print the registered directives in the order Caddy applies them
pub fn handle_list(json: bool, opts: &GlobalOpts) -> Result<()> {
    let registry = open_registry(opts)?;
    let entries = registry.list();

    if json {
        let rendered =
            serde_json::to_string_pretty(entries).context("Failed to serialize directives")?;
        println!("{}", rendered);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No third-party directives registered.\n");
        println!(
            "To add one, run:\n  {} add <name> <import-path>",
            "caddyext".bold().cyan()
        );
        return Ok(());
    }

    println!("{}", "Directives:".bold().green());
    for line in format_entries(entries) {
        println!("{}", line);
    }
    Ok(())
}

fn format_entries(entries: &[Entry]) -> Vec<String> {
    let width = entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            format!(
                " {:>2}. {:<width$}  {}",
                i + 1,
                entry.name,
                entry.import_path.dimmed(),
                width = width
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_entries_aligns_names() {
        colored::control::set_override(false);
        let lines = format_entries(&[
            Entry::new("ipfilter", "github.com/pyed/ipfilter"),
            Entry::new("cors", "github.com/captncraig/cors/caddy"),
        ]);
        assert_eq!(lines[0], "  1. ipfilter  github.com/pyed/ipfilter");
        assert_eq!(lines[1], "  2. cors      github.com/captncraig/cors/caddy");
    }
}

use anyhow::Result;
use caddyext_config::{Config, CONFIG_KEYS};
use clap::Subcommand;
use colored::Colorize;

use crate::common::GlobalOpts;

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show the current configuration
    Show,
    /// Set a configuration value
    Set { key: String, value: String },
    /// Print the path of the configuration file
    Path,
}

pub fn handle_config(action: ConfigAction, opts: &GlobalOpts) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = Config::load()?;
            println!("{}", "Configuration:".bold().green());
            for (key, value) in config.values_iter() {
                println!("  {}: {}", key.cyan(), value);
            }
            let resolved = opts.directives_file(&config);
            if opts.verbosity_level() > 0 || config.directives_file.is_none() {
                println!("  {}: {}", "resolved-file".cyan(), resolved.display());
            }
            if !resolved.exists() {
                caddyext_logger::warn(&format!(
                    "Directives file {} does not exist, create it with `caddyext init`",
                    resolved.display()
                ));
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            if let Err(e) = config.set(&key, value.clone()) {
                anyhow::bail!("{}. Supported keys: {}", e, CONFIG_KEYS.join(", "));
            }
            config.save()?;
            caddyext_logger::info(&format!("Wrote {}", Config::path().display()));
            caddyext_logger::success(&format!("Set {} = {}", key, value));
        }
        ConfigAction::Path => {
            let config_path = Config::path();
            caddyext_logger::debug(&format!("Reading config from: {}", config_path.display()));
            println!("{}", config_path.display());
        }
    }
    Ok(())
}

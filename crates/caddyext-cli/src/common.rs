//! Common types and utilities shared across commands

use anyhow::Result;
use caddyext_config::Config;
use caddyext_directives::Registry;
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;

/// Global CLI options available to all commands
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    #[arg(short, long, global = true, help = "Decrease verbosity")]
    pub quiet: bool,

    #[arg(short, long, global = true, action = clap::ArgAction::Count, help = "Increase verbosity (-v for debug, -vv for trace)")]
    pub verbose: u8,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Directives file to edit (overrides the configured location)"
    )]
    pub file: Option<PathBuf>,
}

impl GlobalOpts {
    /// Get the effective verbosity level
    /// - 0: quiet/warn only
    /// - 1: debug (-v)
    /// - 2: trace (-vv)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Directives file selected by `--file`, else by the configuration
    pub fn directives_file(&self, config: &Config) -> PathBuf {
        self.file
            .clone()
            .unwrap_or_else(|| config.resolve_directives_file())
    }
}

/// Load the configuration and the registry it points at
pub fn open_registry(opts: &GlobalOpts) -> Result<Registry> {
    let config = Config::load()?;
    let path = opts.directives_file(&config);
    debug!("Using directives file: {:?}", path);
    Ok(Registry::load_with(&path, config.layout)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_wins_over_verbose() {
        let opts = GlobalOpts {
            quiet: true,
            verbose: 2,
            file: None,
        };
        assert_eq!(opts.verbosity_level(), 0);
    }

    #[test]
    fn test_file_flag_overrides_config() {
        let config = Config {
            directives_file: Some("/srv/directives.go".to_string()),
            ..Default::default()
        };
        let opts = GlobalOpts {
            file: Some(PathBuf::from("local/directives.go")),
            ..Default::default()
        };
        assert_eq!(
            opts.directives_file(&config),
            PathBuf::from("local/directives.go")
        );
        assert_eq!(
            GlobalOpts::default().directives_file(&config),
            PathBuf::from("/srv/directives.go")
        );
    }
}

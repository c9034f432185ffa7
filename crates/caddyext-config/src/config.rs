use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::ConfigError;
use crate::layout::Layout;

/// Location of Caddy's directives file inside a GOPATH workspace
pub const CADDY_DIRECTIVES_RELATIVE: &str = "src/github.com/mholt/caddy/caddy/directives.go";

/// Keys accepted by [`Config::get`] and [`Config::set`]
pub const CONFIG_KEYS: &[&str] = &[
    "directives-file",
    "gopath",
    "list-name",
    "framework-prefixes",
    "setup-symbol",
];

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directives_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gopath: Option<String>,
    #[serde(default)]
    pub layout: Layout,
}

impl Config {
    pub fn path() -> PathBuf {
        // Honor explicit override via CADDYEXT_CONFIG for tests / isolated runs.
        if let Ok(env_path) = std::env::var("CADDYEXT_CONFIG") {
            let trimmed = env_path.trim();
            if !trimmed.is_empty() {
                return PathBuf::from(trimmed);
            }
        }

        #[cfg(not(target_os = "windows"))]
        {
            dirs::home_dir().map_or_else(
                || PathBuf::from(".config/caddyext/caddyext.toml"),
                |h| h.join(".config").join("caddyext").join("caddyext.toml"),
            )
        }

        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map_or_else(
                || PathBuf::from("caddyext\\caddyext.toml"),
                |c| c.join("caddyext").join("caddyext.toml"),
            )
        }
    }

    /// Load from the default location, falling back to defaults if absent
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path(&Self::path())
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to_path(&Self::path())
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "directives-file" => self.directives_file.clone(),
            "gopath" => self.gopath.clone(),
            "list-name" => Some(self.layout.list_name.clone()),
            "framework-prefixes" => Some(self.layout.framework_prefixes.join(",")),
            "setup-symbol" => Some(self.layout.setup_symbol.clone()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: String) -> Result<(), ConfigError> {
        match key {
            "directives-file" => self.directives_file = Some(value),
            "gopath" => self.gopath = Some(value),
            "list-name" => self.layout.list_name = value,
            "framework-prefixes" => {
                self.layout.framework_prefixes = value
                    .split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            "setup-symbol" => self.layout.setup_symbol = value,
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    pub fn values_iter(&self) -> Vec<(&str, String)> {
        CONFIG_KEYS
            .iter()
            .filter_map(|key| self.get(key).map(|value| (*key, value)))
            .collect()
    }

    /// Path of the directives file to operate on.
    ///
    /// An explicit `directives-file` wins; otherwise Caddy's file is looked up
    /// under the configured GOPATH, then `$GOPATH` (first entry), then `~/go`.
    pub fn resolve_directives_file(&self) -> PathBuf {
        if let Some(file) = &self.directives_file {
            return PathBuf::from(file);
        }
        self.resolve_gopath().join(CADDY_DIRECTIVES_RELATIVE)
    }

    fn resolve_gopath(&self) -> PathBuf {
        if let Some(gopath) = &self.gopath {
            return PathBuf::from(gopath);
        }
        if let Some(first) = std::env::var_os("GOPATH")
            .as_deref()
            .and_then(|value| std::env::split_paths(value).find(|p| !p.as_os_str().is_empty()))
        {
            return first;
        }
        dirs::home_dir().map_or_else(|| PathBuf::from("go"), |h| h.join("go"))
    }
}

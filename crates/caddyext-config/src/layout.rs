//! Shape of the directives file the registry edits
//!
//! Caddy's generated `directives.go` keeps its plugin order in a package-level
//! slice and imports a fixed set of framework packages. The layout names those
//! pieces so the registry can tell framework code from registered directives.

use serde::{Deserialize, Serialize};

/// Name of the slice literal holding the directive order
pub const DEFAULT_LIST_NAME: &str = "directiveOrder";

/// Import path prefix shared by all framework imports
pub const DEFAULT_FRAMEWORK_PREFIX: &str = "github.com/mholt/caddy";

/// Exported setup function every directive package provides
pub const DEFAULT_SETUP_SYMBOL: &str = "Setup";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct Layout {
    pub list_name: String,
    pub framework_prefixes: Vec<String>,
    pub setup_symbol: String,
}

impl Default for Layout {
    fn default() -> Self {
        Layout {
            list_name: DEFAULT_LIST_NAME.to_string(),
            framework_prefixes: vec![DEFAULT_FRAMEWORK_PREFIX.to_string()],
            setup_symbol: DEFAULT_SETUP_SYMBOL.to_string(),
        }
    }
}

impl Layout {
    /// Whether `path` belongs to the framework rather than to a directive
    pub fn is_framework_import(&self, path: &str) -> bool {
        self.framework_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }

    /// Base import path used when generating a fresh directives file
    pub fn framework_root(&self) -> &str {
        self.framework_prefixes
            .first()
            .map_or(DEFAULT_FRAMEWORK_PREFIX, String::as_str)
    }
}

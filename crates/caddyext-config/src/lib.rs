//! caddyext configuration
//!
//! Settings live in `~/.config/caddyext/caddyext.toml` (or `$CADDYEXT_CONFIG`)
//! and cover where the directives file is and how it is laid out.

pub mod config;
pub mod errors;
pub mod layout;

pub use config::{Config, CADDY_DIRECTIVES_RELATIVE, CONFIG_KEYS};
pub use errors::ConfigError;
pub use layout::Layout;

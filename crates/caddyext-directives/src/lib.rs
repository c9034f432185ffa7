//! caddyext directive registry
//!
//! Keeps the list of third-party directives compiled into Caddy by editing
//! Caddy's generated `directives.go`:
//! 1. [`Registry::load`] parses the file and pairs directive imports with the
//!    entries of the `directiveOrder` list
//! 2. [`Registry::add_directive`] queues new directives in memory
//! 3. [`Registry::save`] inserts their imports and list entries, re-checks the
//!    result and atomically replaces the file
//!
//! Loading a saved file always yields the same entries in the same order.

pub mod entry;
pub mod errors;
mod loader;
pub mod registry;
pub mod skeleton;
mod writer;

pub use entry::Entry;
pub use errors::{DirectiveError, Result};
pub use registry::Registry;
pub use skeleton::skeleton;

pub use caddyext_config::Layout;

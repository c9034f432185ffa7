use caddyext_syntax::SyntaxError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, editing or saving a directive registry
#[derive(Error, Debug)]
pub enum DirectiveError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: SyntaxError,
    },

    #[error("Inconsistent directives file: {0}")]
    Consistency(String),

    #[error("Directive '{0}' is already registered")]
    DuplicateDirective(String),

    #[error("Invalid directive: {0}")]
    InvalidDirective(String),

    #[error("Failed to render {}: {source}", path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: SyntaxError,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, DirectiveError>;

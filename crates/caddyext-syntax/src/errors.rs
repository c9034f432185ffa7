use std::fmt;
use thiserror::Error;

/// Location of a syntax error inside a Go source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based line number
    pub line: usize,
    /// 1-based column, counted in bytes
    pub column: usize,
    /// First line of the offending text
    pub snippet: String,
}

impl Diagnostic {
    pub(crate) fn at(text: &str, offset: usize, node_text: &str) -> Self {
        let before = &text[..offset.min(text.len())];
        let line = before.matches('\n').count() + 1;
        let column = before.rfind('\n').map_or(before.len(), |nl| before.len() - nl - 1) + 1;
        let snippet = node_text.lines().next().unwrap_or_default().trim();
        let snippet = snippet.chars().take(48).collect();
        Diagnostic {
            line,
            column,
            snippet,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.snippet.is_empty() {
            write!(f, "line {}:{}: syntax error", self.line, self.column)
        } else {
            write!(
                f,
                "line {}:{}: syntax error near `{}`",
                self.line, self.column, self.snippet
            )
        }
    }
}

/// Errors raised while parsing or rewriting Go source
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("Malformed Go source: {0}")]
    Malformed(Diagnostic),

    #[error("No package clause found")]
    MissingPackageClause,

    #[error("List literal `{0}` not declared")]
    MissingList(String),

    #[error("Import position {index} out of range (file has {len} import specs)")]
    ImportPosition { index: usize, len: usize },

    #[error("Rendered source does not round-trip: {0}")]
    RoundTrip(String),
}

use serde::Serialize;
use std::fmt;

/// A registered directive: the name Caddy knows it by and the package that implements it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Entry {
    pub name: String,
    pub import_path: String,
}

impl Entry {
    pub fn new(name: impl Into<String>, import_path: impl Into<String>) -> Self {
        Entry {
            name: name.into(),
            import_path: import_path.into(),
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.import_path)
    }
}

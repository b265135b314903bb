// src/resolve/unit.rs

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use crate::errors::Result;

/// Import path of a unit, e.g. `"example.com/app/internal/store"`.
pub type UnitId = String;

/// Import path standing for native interop. It has no inspectable source.
pub const INTEROP_SENTINEL: &str = "C";

/// A source-holding compilation unit as discovered at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub id: UnitId,
    /// Directory holding the unit's sources.
    pub dir: PathBuf,
    /// Source file names (relative to `dir`).
    pub files: Vec<String>,
    /// Direct dependencies, as import paths.
    pub imports: Vec<UnitId>,
    /// Part of the toolchain's standard library; never watched.
    pub foundation: bool,
    /// True if the unit builds an executable.
    pub command: bool,
    /// Where the toolchain installs the executable, if it is one.
    pub target: Option<PathBuf>,
}

impl Unit {
    /// A plain library unit with no imports. Mostly useful for tests.
    pub fn new(id: impl Into<UnitId>, dir: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            dir: dir.into(),
            files: Vec::new(),
            imports: Vec::new(),
            foundation: false,
            command: false,
            target: None,
        }
    }

    pub fn with_imports<I, S>(mut self, imports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<UnitId>,
    {
        self.imports = imports.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn foundation(mut self) -> Self {
        self.foundation = true;
        self
    }

    pub fn command(mut self, target: impl Into<PathBuf>) -> Self {
        self.command = true;
        self.target = Some(target.into());
        self
    }
}

/// Import paths the resolver never follows: the interop sentinel and
/// relative imports.
pub fn is_skipped_import(id: &str) -> bool {
    id == INTEROP_SENTINEL || id.starts_with('.')
}

/// Where units come from.
///
/// Production code uses [`GoListSource`](super::GoListSource); tests provide
/// an in-memory map.
pub trait UnitSource: Send + Sync {
    /// Inspect a single unit. Failing to find it is an error.
    fn load<'a>(&'a self, id: &'a str) -> Pin<Box<dyn Future<Output = Result<Unit>> + Send + 'a>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_and_relative_imports_are_skipped() {
        assert!(is_skipped_import("C"));
        assert!(is_skipped_import("./internal/x"));
        assert!(is_skipped_import("../shared"));
        assert!(!is_skipped_import("fmt"));
        assert!(!is_skipped_import("example.com/C"));
    }
}

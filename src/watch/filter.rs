// src/watch/filter.rs

use std::path::Path;

use crate::watch::extra::ExtraPathSet;

/// Decides whether a file is worth a rebuild.
///
/// A path qualifies when it has the source extension and is not a dotfile,
/// or when it is one of the extra watch paths.
#[derive(Debug, Clone)]
pub struct SourceFilter {
    extension: String,
    extra: ExtraPathSet,
}

impl SourceFilter {
    pub fn new(extension: impl Into<String>, extra: ExtraPathSet) -> Self {
        let extension = extension.into().trim_start_matches('.').to_string();
        Self { extension, extra }
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn extra(&self) -> &ExtraPathSet {
        &self.extra
    }

    pub fn matches(&self, path: &Path) -> bool {
        if self.extra.contains(path) {
            return true;
        }

        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('.'));

        !hidden && path.extension().and_then(|e| e.to_str()) == Some(self.extension.as_str())
    }
}

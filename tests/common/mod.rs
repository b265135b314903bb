#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub use rewatch_test_utils::{init_tracing, with_timeout};

/// Create `rel` (and its parents) under `root` with some content.
pub fn write_file(root: &Path, rel: &str) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, b"package x\n").unwrap();
    path
}

/// Canonical path of a temp dir, so comparisons survive symlinked tmp roots.
pub fn canonical(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().canonicalize().unwrap()
}

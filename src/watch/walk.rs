// src/watch/walk.rs

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::fs::FileSystem;
use crate::watch::filter::SourceFilter;

/// Collect the paths to subscribe when the directory `root` shows up.
///
/// Watches are not recursive, so every nested directory is returned
/// (to catch future creations below it), together with every nested file
/// the filter accepts. `root` itself comes first. Symlinked directories are
/// not followed and unreadable directories are skipped.
pub fn collect_new_tree(fs: &dyn FileSystem, root: &Path, filter: &SourceFilter) -> Vec<PathBuf> {
    let mut seen = BTreeSet::new();
    let mut paths = vec![root.to_path_buf()];
    seen.insert(root.to_path_buf());

    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let entries = match fs.read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) => {
                debug!(dir = %dir.display(), error = %err, "skipping unreadable dir");
                continue;
            }
        };

        for entry in entries {
            let is_dir = fs.is_dir(&entry) && !fs.is_symlink(&entry);
            if !(is_dir || filter.matches(&entry)) {
                continue;
            }
            if seen.insert(entry.clone()) {
                paths.push(entry.clone());
            }
            if is_dir {
                stack.push(entry);
            }
        }
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;
    use crate::watch::extra::ExtraPathSet;

    #[test]
    fn nested_dirs_and_sources_are_collected() {
        let fs = MockFileSystem::new();
        fs.add_file("/w/pkg/a.go");
        fs.add_file("/w/pkg/notes.txt");
        fs.add_file("/w/pkg/sub/deep/b.go");
        fs.add_dir("/w/pkg/empty");
        fs.add_symlink("/w/pkg/link");

        let filter = SourceFilter::new("go", ExtraPathSet::default());
        let mut paths = collect_new_tree(&fs, Path::new("/w/pkg"), &filter);
        assert_eq!(paths[0], PathBuf::from("/w/pkg"));
        paths.sort();

        assert_eq!(
            paths,
            vec![
                PathBuf::from("/w/pkg"),
                PathBuf::from("/w/pkg/a.go"),
                PathBuf::from("/w/pkg/empty"),
                PathBuf::from("/w/pkg/sub"),
                PathBuf::from("/w/pkg/sub/deep"),
                PathBuf::from("/w/pkg/sub/deep/b.go"),
            ]
        );
    }
}

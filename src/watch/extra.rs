// src/watch/extra.rs

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use tracing::debug;

use crate::errors::{Result, RewatchError};
use crate::fs::FileSystem;

/// Absolute paths matched by the extra watch patterns at startup.
///
/// Resolved once; files created later that would match a pattern are not
/// added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtraPathSet {
    paths: BTreeSet<PathBuf>,
}

impl ExtraPathSet {
    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.paths.iter()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl FromIterator<PathBuf> for ExtraPathSet {
    fn from_iter<I: IntoIterator<Item = PathBuf>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().collect(),
        }
    }
}

/// Expand shell-style patterns into the absolute paths that exist right now.
///
/// Relative patterns are taken relative to `base`. `*`, `?` and `[...]` never
/// match across `/`; `**` matches any number of directories. A pattern with
/// no matches contributes nothing; a malformed pattern is an error.
pub fn expand_patterns(
    fs: &dyn FileSystem,
    patterns: &[String],
    base: &Path,
) -> Result<ExtraPathSet> {
    let mut paths = BTreeSet::new();
    for pattern in patterns {
        let matches = expand_pattern(fs, pattern, base)?;
        if matches.is_empty() {
            debug!(pattern = %pattern, "extra watch pattern matched nothing");
        }
        for path in matches {
            debug!(path = %path.display(), "watch (extra)");
            paths.insert(path);
        }
    }
    Ok(ExtraPathSet { paths })
}

fn expand_pattern(fs: &dyn FileSystem, pattern: &str, base: &Path) -> Result<Vec<PathBuf>> {
    let absolute = lexical_normalize(&base.join(pattern));
    let components: Vec<Component<'_>> = absolute.components().collect();

    // Components that come from `base` are literal even if they look like globs.
    let fixed = if Path::new(pattern).is_absolute() {
        0
    } else {
        let base = lexical_normalize(base);
        base.components()
            .zip(&components)
            .take_while(|(a, b)| a == *b)
            .count()
    };

    let Some(first_glob) = components[fixed..]
        .iter()
        .position(|c| has_glob_meta(&c.as_os_str().to_string_lossy()))
        .map(|i| i + fixed)
    else {
        return Ok(if fs.exists(&absolute) {
            vec![absolute]
        } else {
            Vec::new()
        });
    };

    let literal: PathBuf = components[..first_glob].iter().collect();
    let remaining = components.len() - first_glob;
    let recursive = components[first_glob..]
        .iter()
        .any(|c| c.as_os_str().to_string_lossy().contains("**"));

    let matcher = compile(&glob_source(&literal, &components[first_glob..]), pattern)?;
    Ok(walk_matches(fs, &literal, &matcher, remaining, recursive))
}

/// Glob text for `literal` followed by the pattern components, with the
/// literal part escaped.
fn glob_source(literal: &Path, pattern: &[Component<'_>]) -> String {
    let mut source = globset::escape(&literal.to_string_lossy());
    for component in pattern {
        if !source.ends_with('/') {
            source.push('/');
        }
        source.push_str(&component.as_os_str().to_string_lossy());
    }
    source
}

fn compile(source: &str, pattern: &str) -> Result<GlobMatcher> {
    let glob = GlobBuilder::new(source)
        .literal_separator(true)
        .build()
        .map_err(|e| RewatchError::Config(format!("invalid extra watch pattern '{pattern}': {e}")))?;
    Ok(glob.compile_matcher())
}

/// Walk below `literal`, at most `max_depth` levels unless `recursive`,
/// collecting entries the matcher accepts.
fn walk_matches(
    fs: &dyn FileSystem,
    literal: &Path,
    matcher: &GlobMatcher,
    max_depth: usize,
    recursive: bool,
) -> Vec<PathBuf> {
    let mut found = Vec::new();
    if !fs.is_dir(literal) {
        return found;
    }

    let mut stack = vec![(literal.to_path_buf(), 0usize)];
    while let Some((dir, depth)) = stack.pop() {
        let entries = match fs.read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) => {
                debug!(dir = %dir.display(), error = %err, "skipping unreadable dir");
                continue;
            }
        };

        for entry in entries {
            let depth = depth + 1;
            if matcher.is_match(&entry) {
                found.push(entry.clone());
            }
            let descend = recursive || depth < max_depth;
            if descend && fs.is_dir(&entry) && !fs.is_symlink(&entry) {
                stack.push((entry, depth));
            }
        }
    }

    found.sort();
    found
}

fn has_glob_meta(s: &str) -> bool {
    s.contains(['*', '?', '[', '{'])
}

/// Drop `.` components and fold `..` without touching the filesystem.
fn lexical_normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

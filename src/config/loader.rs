// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cli::CliArgs;
use crate::config::model::{Config, ConfigFile, DEFAULT_CONFIG_FILE};
use crate::errors::{Result, RewatchError};

/// Load a config file from a given path.
///
/// This only performs TOML deserialization; merging with the CLI and
/// validation happen in [`Config::from_sources`].
pub fn load_file(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let file: ConfigFile = toml::from_str(&contents)?;
    Ok(file)
}

/// Build the runtime [`Config`] from CLI flags plus the optional config file.
///
/// - The working dir is `--workdir` or the current directory.
/// - An explicit `--config` must exist; the implicit `Rewatch.toml` in the
///   working dir is only read when present.
pub fn load_config(args: &CliArgs) -> Result<Config> {
    let cwd = std::env::current_dir().map_err(|e| {
        RewatchError::Config(format!("cannot determine current directory: {e}"))
    })?;

    let workdir = resolve_workdir(args.workdir.as_deref(), &cwd)?;

    let file = match &args.config {
        Some(path) => {
            let path = absolutize(Path::new(path), &cwd);
            debug!(path = %path.display(), "loading config file");
            Some(load_file(&path)?)
        }
        None => {
            let implicit = workdir.join(DEFAULT_CONFIG_FILE);
            if implicit.is_file() {
                debug!(path = %implicit.display(), "loading config file");
                Some(load_file(&implicit)?)
            } else {
                None
            }
        }
    };

    Config::from_sources(args, file, workdir)
}

/// Resolve `--workdir` against `cwd` and check that it is a directory.
pub fn resolve_workdir(workdir: Option<&str>, cwd: &Path) -> Result<PathBuf> {
    let dir = match workdir {
        Some(w) if !w.is_empty() => absolutize(Path::new(w), cwd),
        _ => cwd.to_path_buf(),
    };

    if !dir.is_dir() {
        return Err(RewatchError::Config(format!(
            "working dir {} is not a directory",
            dir.display()
        )));
    }
    Ok(dir)
}

fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

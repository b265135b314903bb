// src/config/validate.rs

use std::path::PathBuf;

use crate::cli::CliArgs;
use crate::config::model::{Config, ConfigFile};
use crate::errors::{Result, RewatchError};

impl Config {
    /// Merge CLI flags over the optional file and validate the result.
    ///
    /// Scalar flags given on the command line win; list values (`env`,
    /// extra watches) from the file come first and the CLI ones are appended.
    pub fn from_sources(
        args: &CliArgs,
        file: Option<ConfigFile>,
        workdir: PathBuf,
    ) -> Result<Config> {
        let file = file.unwrap_or_default();

        let package = args.package.trim();
        if package.is_empty() {
            return Err(RewatchError::Config("must provide package path".to_string()));
        }

        let mut env_entries = file.build.env.clone();
        if let Some(raw) = &args.installenv {
            env_entries.extend(split_list(raw));
        }
        let install_env = parse_install_env(&env_entries)?;

        let mut extra_watches = file.watch.extra.clone();
        if let Some(raw) = &args.extra_watches {
            extra_watches.extend(split_list(raw));
        }

        let mut cfg = Config::new(package, workdir);
        cfg.program_args = args.program_args.clone();
        cfg.build_tags = args.tags.clone().or(file.build.tags);
        cfg.timings = args.timings || file.build.timings.unwrap_or(false);
        cfg.race = args.race || file.build.race.unwrap_or(false);
        cfg.install_env = install_env;
        cfg.extra_watches = extra_watches;
        cfg.dry_run = args.dry_run;

        Ok(cfg)
    }
}

/// Split a comma-separated flag value, dropping empty segments.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse `KEY=VALUE` entries. The value may be empty or contain `=`.
pub fn parse_install_env(entries: &[String]) -> Result<Vec<(String, String)>> {
    entries
        .iter()
        .map(|entry| match entry.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_string(), value.to_string()))
            }
            _ => Err(RewatchError::Config(format!(
                "invalid installenv entry '{entry}' (expected KEY=VALUE)"
            ))),
        })
        .collect()
}

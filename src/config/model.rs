// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Quiet period after the last change before a build fires.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(200);

/// Config file picked up from the working dir when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "Rewatch.toml";

/// Optional on-disk configuration.
///
/// ```toml
/// [build]
/// tags = "dev"
/// race = true
/// timings = true
/// env = ["CGO_ENABLED=0"]
///
/// [watch]
/// extra = ["templates/*.html"]
/// ```
///
/// Every section is optional; command-line flags take precedence.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub build: BuildSection,

    #[serde(default)]
    pub watch: WatchSection,
}

/// `[build]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildSection {
    /// Build tags, same format as `--tags`.
    #[serde(default)]
    pub tags: Option<String>,

    #[serde(default)]
    pub race: Option<bool>,

    #[serde(default)]
    pub timings: Option<bool>,

    /// `KEY=VALUE` entries appended to the build environment.
    #[serde(default)]
    pub env: Vec<String>,
}

/// `[watch]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchSection {
    /// Glob patterns that are always watched, same as `--extra-watches`.
    #[serde(default)]
    pub extra: Vec<String>,
}

/// Fully resolved configuration, constructed once at startup and handed to
/// every component.
#[derive(Debug, Clone)]
pub struct Config {
    /// Import path of the command being developed.
    pub package: String,
    /// Arguments passed to the program on each start.
    pub program_args: Vec<String>,
    pub build_tags: Option<String>,
    pub timings: bool,
    pub race: bool,
    /// Extra environment for the build command, in order.
    pub install_env: Vec<(String, String)>,
    /// Absolute working directory for discovery, builds and the program.
    pub workdir: PathBuf,
    pub extra_watches: Vec<String>,
    /// The toolchain driver (`go`).
    pub build_tool: String,
    /// Extension (without dot) of source files worth watching.
    pub source_extension: String,
    pub quiet_period: Duration,
    pub dry_run: bool,
}

impl Config {
    /// Defaults for everything except the package and working dir.
    pub fn new(package: impl Into<String>, workdir: impl Into<PathBuf>) -> Self {
        Self {
            package: package.into(),
            program_args: Vec::new(),
            build_tags: None,
            timings: false,
            race: false,
            install_env: Vec::new(),
            workdir: workdir.into(),
            extra_watches: Vec::new(),
            build_tool: "go".to_string(),
            source_extension: "go".to_string(),
            quiet_period: DEFAULT_QUIET_PERIOD,
            dry_run: false,
        }
    }
}

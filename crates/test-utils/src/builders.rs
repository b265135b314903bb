#![allow(dead_code)]

use std::path::PathBuf;

use rewatch::config::ConfigFile;
use rewatch::resolve::Unit;

/// Builder for a set of units rooted at one command, to simplify resolver
/// and dry-run test setup.
///
/// Directories default to `<root_dir>/<id>`.
pub struct UnitGraphBuilder {
    root_dir: PathBuf,
    units: Vec<Unit>,
}

impl UnitGraphBuilder {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            units: Vec::new(),
        }
    }

    fn dir_for(&self, id: &str) -> PathBuf {
        self.root_dir.join(id)
    }

    /// An executable unit installed to `/bin/<last id segment>`.
    pub fn command(mut self, id: &str, imports: &[&str]) -> Self {
        let name = id.rsplit('/').next().unwrap_or(id);
        let unit = Unit::new(id, self.dir_for(id))
            .with_imports(imports.iter().copied())
            .with_files(["main.go"])
            .command(PathBuf::from("/bin").join(name));
        self.units.push(unit);
        self
    }

    pub fn library(mut self, id: &str, imports: &[&str]) -> Self {
        let unit = Unit::new(id, self.dir_for(id))
            .with_imports(imports.iter().copied())
            .with_files(["lib.go"]);
        self.units.push(unit);
        self
    }

    /// A standard-library unit.
    pub fn foundation(mut self, id: &str, imports: &[&str]) -> Self {
        let unit = Unit::new(id, PathBuf::from("/goroot/src").join(id))
            .with_imports(imports.iter().copied())
            .foundation();
        self.units.push(unit);
        self
    }

    /// A library placed in an explicit directory.
    pub fn library_in(mut self, id: &str, dir: impl Into<PathBuf>, imports: &[&str]) -> Self {
        let unit = Unit::new(id, dir).with_imports(imports.iter().copied());
        self.units.push(unit);
        self
    }

    pub fn build(self) -> Vec<Unit> {
        self.units
    }
}

/// Builder for `ConfigFile`.
#[derive(Default)]
pub struct ConfigFileBuilder {
    config: ConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tags(mut self, tags: &str) -> Self {
        self.config.build.tags = Some(tags.to_string());
        self
    }

    pub fn with_race(mut self, race: bool) -> Self {
        self.config.build.race = Some(race);
        self
    }

    pub fn with_timings(mut self, timings: bool) -> Self {
        self.config.build.timings = Some(timings);
        self
    }

    pub fn with_env(mut self, entry: &str) -> Self {
        self.config.build.env.push(entry.to_string());
        self
    }

    pub fn with_extra_watch(mut self, pattern: &str) -> Self {
        self.config.watch.extra.push(pattern.to_string());
        self
    }

    pub fn build(self) -> ConfigFile {
        self.config
    }
}


// src/resolve/go_list.rs

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::process::Stdio;

use serde::Deserialize;
use tokio::process::Command;
use tracing::trace;

use crate::config::Config;
use crate::errors::{Result, RewatchError};
use crate::resolve::unit::{Unit, UnitSource};

/// Loads units by running `go list -json <id>` in the working directory.
#[derive(Debug, Clone)]
pub struct GoListSource {
    tool: String,
    workdir: PathBuf,
    tags: Option<String>,
}

impl GoListSource {
    pub fn new(tool: impl Into<String>, workdir: impl Into<PathBuf>, tags: Option<String>) -> Self {
        Self {
            tool: tool.into(),
            workdir: workdir.into(),
            tags,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(&cfg.build_tool, &cfg.workdir, cfg.build_tags.clone())
    }

    fn command(&self, id: &str) -> Command {
        let mut cmd = Command::new(&self.tool);
        cmd.arg("list").arg("-json");
        if let Some(tags) = &self.tags {
            cmd.arg(format!("-tags={tags}"));
        }
        cmd.arg(id)
            .current_dir(&self.workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }

    async fn load_unit(&self, id: &str) -> Result<Unit> {
        let output = self
            .command(id)
            .output()
            .await
            .map_err(|e| RewatchError::Resolve {
                package: id.to_string(),
                reason: format!("failed to run `{} list`: {e}", self.tool),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RewatchError::PackageNotFound(format!(
                "{id}: {}",
                stderr.trim()
            )));
        }

        trace!(package = %id, bytes = output.stdout.len(), "go list output");
        parse_package(&output.stdout)
    }
}

impl UnitSource for GoListSource {
    fn load<'a>(&'a self, id: &'a str) -> Pin<Box<dyn Future<Output = Result<Unit>> + Send + 'a>> {
        Box::pin(self.load_unit(id))
    }
}

/// The subset of `go list -json` output we care about.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GoPackage {
    import_path: String,
    dir: PathBuf,
    #[serde(default)]
    name: String,
    #[serde(default)]
    go_files: Vec<String>,
    #[serde(default)]
    cgo_files: Vec<String>,
    #[serde(default)]
    imports: Vec<String>,
    #[serde(default)]
    goroot: bool,
    #[serde(default)]
    standard: bool,
    #[serde(default)]
    target: Option<PathBuf>,
}

/// Parse a single package object emitted by `go list -json`.
pub fn parse_package(json: &[u8]) -> Result<Unit> {
    let pkg: GoPackage = serde_json::from_slice(json)?;

    let mut files = pkg.go_files;
    files.extend(pkg.cgo_files);

    Ok(Unit {
        id: pkg.import_path,
        dir: pkg.dir,
        files,
        imports: pkg.imports,
        foundation: pkg.goroot || pkg.standard,
        command: pkg.name == "main",
        target: pkg.target,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_command_package() {
        let json = br#"{
            "Dir": "/src/app/cmd/server",
            "ImportPath": "example.com/app/cmd/server",
            "Name": "main",
            "Target": "/home/u/go/bin/server",
            "Root": "/src/app",
            "GoFiles": ["main.go", "flags.go"],
            "CgoFiles": ["sys.go"],
            "Imports": ["C", "example.com/app/internal/store", "fmt"],
            "Deps": ["fmt"]
        }"#;

        let unit = parse_package(json).unwrap();
        assert_eq!(unit.id, "example.com/app/cmd/server");
        assert_eq!(unit.dir, PathBuf::from("/src/app/cmd/server"));
        assert_eq!(unit.files, vec!["main.go", "flags.go", "sys.go"]);
        assert_eq!(unit.imports.len(), 3);
        assert!(unit.command);
        assert!(!unit.foundation);
        assert_eq!(unit.target, Some(PathBuf::from("/home/u/go/bin/server")));
    }

    #[test]
    fn standard_library_is_foundation() {
        let json = br#"{
            "Dir": "/usr/local/go/src/fmt",
            "ImportPath": "fmt",
            "Name": "fmt",
            "Goroot": true,
            "Standard": true,
            "GoFiles": ["print.go"],
            "Imports": ["errors", "io"]
        }"#;

        let unit = parse_package(json).unwrap();
        assert!(unit.foundation);
        assert!(!unit.command);
        assert_eq!(unit.target, None);
    }

    #[test]
    fn malformed_output_is_an_error() {
        let err = parse_package(b"not json").unwrap_err();
        assert!(matches!(err, RewatchError::Json(_)));
    }
}

// src/exec/build.rs

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::process::Command;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::exec::status::StatusLine;

/// Result of one build attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOutcome {
    pub success: bool,
    pub duration: Duration,
}

/// Trait abstracting how the program gets built.
///
/// Production code uses [`GoInstall`]; tests provide a scripted fake.
pub trait Builder: Send {
    /// Run one build to completion. Failures are reported in the outcome,
    /// never as an error: a broken build must not stop the watch loop.
    fn build(&mut self) -> Pin<Box<dyn Future<Output = BuildOutcome> + Send + '_>>;
}

/// Builds by running `go install` on the root package.
#[derive(Debug, Clone)]
pub struct GoInstall {
    tool: String,
    package: String,
    tags: Option<String>,
    race: bool,
    workdir: PathBuf,
    env: Vec<(String, String)>,
    timings: bool,
    successes: usize,
    status: StatusLine,
}

impl GoInstall {
    /// `package` is the resolved import path of the root.
    pub fn new(cfg: &Config, package: impl Into<String>) -> Self {
        Self {
            tool: cfg.build_tool.clone(),
            package: package.into(),
            tags: cfg.build_tags.clone(),
            race: cfg.race,
            workdir: cfg.workdir.clone(),
            env: cfg.install_env.clone(),
            timings: cfg.timings,
            successes: 0,
            status: StatusLine::new(),
        }
    }

    /// Arguments passed to the build tool.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec!["install".to_string()];
        if let Some(tags) = &self.tags {
            args.push(format!("-tags={tags}"));
        }
        if self.race {
            args.push("-race".to_string());
        }
        args.push(self.package.clone());
        args
    }

    /// The full command line, for logs and `--dry-run`.
    pub fn command_line(&self) -> Vec<String> {
        let mut line = vec![self.tool.clone()];
        line.extend(self.args());
        line
    }

    pub fn env(&self) -> &[(String, String)] {
        &self.env
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.tool);
        cmd.args(self.args())
            .current_dir(&self.workdir)
            .envs(self.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        cmd
    }

    async fn run(&mut self) -> BuildOutcome {
        self.status.building();
        debug!(cmd = ?self.command_line(), env = ?self.env, "running build");

        let start = Instant::now();
        let result = self.command().status().await;
        let duration = start.elapsed();

        let success = match result {
            Ok(status) if status.success() => {
                let word = if self.successes == 0 { "starting" } else { "restarting" };
                self.successes += 1;
                self.status.succeeded(word);
                info!(package = %self.package, "build succeeded; {word}");
                if self.timings {
                    info!("compilation took {:?}", duration);
                }
                true
            }
            Ok(status) => {
                self.status.failed("compilation failed");
                warn!(code = ?status.code(), "compilation failed");
                false
            }
            Err(err) => {
                self.status.failed("compilation failed");
                error!(tool = %self.tool, error = %err, "failed to run build command");
                false
            }
        };

        BuildOutcome { success, duration }
    }
}

impl Builder for GoInstall {
    fn build(&mut self) -> Pin<Box<dyn Future<Output = BuildOutcome> + Send + '_>> {
        Box::pin(self.run())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::new("./cmd/app", "/w")
    }

    #[test]
    fn plain_install_command() {
        let build = GoInstall::new(&config(), "example.com/app/cmd/app");
        assert_eq!(
            build.command_line(),
            vec!["go", "install", "example.com/app/cmd/app"]
        );
    }

    #[test]
    fn tags_and_race_are_forwarded() {
        let mut cfg = config();
        cfg.build_tags = Some("dev,sqlite".to_string());
        cfg.race = true;
        cfg.install_env = vec![("CGO_ENABLED".to_string(), "1".to_string())];

        let build = GoInstall::new(&cfg, "example.com/app/cmd/app");
        assert_eq!(
            build.args(),
            vec!["install", "-tags=dev,sqlite", "-race", "example.com/app/cmd/app"]
        );
        assert_eq!(build.env(), &[("CGO_ENABLED".to_string(), "1".to_string())]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn aborting_a_build_kills_the_build_tool() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().to_path_buf();
        // `sh install <pkg>` runs this file as a script.
        std::fs::write(
            dir.join("install"),
            "echo started > started\nsleep 0.5\necho finished > finished\n",
        )
        .unwrap();

        let mut cfg = Config::new("example.com/app", &dir);
        cfg.build_tool = "sh".to_string();
        let mut build = GoInstall::new(&cfg, "example.com/app");
        let task = tokio::spawn(async move { build.build().await });

        for _ in 0..100 {
            if dir.join("started").exists() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert!(dir.join("started").exists(), "build tool never started");

        task.abort();
        let _ = task.await;
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(!dir.join("finished").exists(), "build tool outlived its build");
    }
}

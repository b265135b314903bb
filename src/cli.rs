// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `rewatch`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "rewatch",
    version,
    about = "Rebuild and restart a Go command whenever one of its source dependencies changes.",
    long_about = None
)]
pub struct CliArgs {
    /// Import path of the command to build, watch and run.
    #[arg(value_name = "PACKAGE")]
    pub package: String,

    /// Arguments passed through to the program on every start.
    #[arg(
        value_name = "ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub program_args: Vec<String>,

    /// Build tags forwarded verbatim to `go install -tags=...`.
    #[arg(long, value_name = "TAGS")]
    pub tags: Option<String>,

    /// Verbose output (watch, resolve, build and restart details).
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Log how long each compilation took.
    #[arg(long)]
    pub timings: bool,

    /// Build with the Go race detector.
    #[arg(long)]
    pub race: bool,

    /// Env vars to pass to `go install` (comma-separated: A=B,C=D).
    #[arg(long, value_name = "K=V,...")]
    pub installenv: Option<String>,

    /// Working dir to locate the main package and run `go install`.
    #[arg(long, value_name = "DIR")]
    pub workdir: Option<String>,

    /// Comma-separated path match patterns to also watch, in addition to the
    /// transitive dependencies of the package.
    ///
    /// Relative patterns are resolved against the working dir (`--workdir`),
    /// not the directory rewatch was started from.
    #[arg(long = "extra-watches", value_name = "GLOB,...")]
    pub extra_watches: Option<String>,

    /// Path to an optional config file (TOML).
    ///
    /// Default: `Rewatch.toml` in the working dir, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `-v`, `REWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve dependencies and print the watch plan, but don't build or run.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_args_are_forwarded_verbatim() {
        let args = CliArgs::try_parse_from([
            "rewatch",
            "-v",
            "--race",
            "--tags",
            "dev sqlite",
            "example.com/cmd/server",
            "--",
            "-listen",
            ":8080",
        ])
        .unwrap();

        assert!(args.verbose);
        assert!(args.race);
        assert_eq!(args.tags.as_deref(), Some("dev sqlite"));
        assert_eq!(args.package, "example.com/cmd/server");
        assert_eq!(args.program_args, vec!["-listen", ":8080"]);
    }

    #[test]
    fn list_flags_are_kept_raw() {
        let args = CliArgs::try_parse_from([
            "rewatch",
            "--installenv",
            "CGO_ENABLED=0,GOOS=linux",
            "--extra-watches",
            "templates/*.html,static/*.css",
            "./cmd/app",
        ])
        .unwrap();

        assert_eq!(args.installenv.as_deref(), Some("CGO_ENABLED=0,GOOS=linux"));
        assert_eq!(
            args.extra_watches.as_deref(),
            Some("templates/*.html,static/*.css")
        );
        assert!(args.program_args.is_empty());
    }
}

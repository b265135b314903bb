mod common;

use std::fs;

use common::{canonical, init_tracing};
use rewatch::cli::CliArgs;
use rewatch::config::{Config, DEFAULT_CONFIG_FILE, load_config};
use rewatch::errors::RewatchError;
use rewatch_test_utils::builders::ConfigFileBuilder;

fn args_in(workdir: &std::path::Path) -> CliArgs {
    CliArgs {
        package: "./cmd/server".to_string(),
        workdir: Some(workdir.display().to_string()),
        ..CliArgs::default()
    }
}

#[test]
fn implicit_config_file_in_workdir_is_used() {
    init_tracing();
    let tmp = tempfile::tempdir().unwrap();
    let workdir = canonical(&tmp);
    fs::write(
        workdir.join(DEFAULT_CONFIG_FILE),
        r#"
[build]
tags = "integration"
race = true
env = ["CGO_ENABLED=0"]

[watch]
extra = ["templates/*.tmpl"]
"#,
    )
    .unwrap();

    let cfg = load_config(&args_in(&workdir)).unwrap();

    assert_eq!(cfg.workdir, workdir);
    assert_eq!(cfg.build_tags.as_deref(), Some("integration"));
    assert!(cfg.race);
    assert!(!cfg.timings);
    assert_eq!(
        cfg.install_env,
        vec![("CGO_ENABLED".to_string(), "0".to_string())]
    );
    assert_eq!(cfg.extra_watches, vec!["templates/*.tmpl"]);
}

#[test]
fn explicit_config_path_is_merged_under_cli_flags() {
    let tmp = tempfile::tempdir().unwrap();
    let workdir = canonical(&tmp);
    let path = workdir.join("custom.toml");
    fs::write(&path, "[build]\ntags = \"file\"\nenv = [\"A=1\"]\n").unwrap();

    let mut args = args_in(&workdir);
    args.config = Some(path.display().to_string());
    args.tags = Some("cli".to_string());
    args.installenv = Some("B=2".to_string());

    let cfg = load_config(&args).unwrap();
    assert_eq!(cfg.build_tags.as_deref(), Some("cli"));
    assert_eq!(
        cfg.install_env,
        vec![
            ("A".to_string(), "1".to_string()),
            ("B".to_string(), "2".to_string()),
        ]
    );
}

#[test]
fn no_config_file_means_defaults() {
    let tmp = tempfile::tempdir().unwrap();
    let workdir = canonical(&tmp);

    let cfg = load_config(&args_in(&workdir)).unwrap();
    assert_eq!(cfg.build_tags, None);
    assert!(cfg.install_env.is_empty());
    assert!(cfg.extra_watches.is_empty());
    assert_eq!(cfg.build_tool, "go");
    assert_eq!(cfg.source_extension, "go");
}

#[test]
fn unknown_keys_are_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let workdir = canonical(&tmp);
    fs::write(workdir.join(DEFAULT_CONFIG_FILE), "[build]\nlinker = \"gold\"\n").unwrap();

    let err = load_config(&args_in(&workdir)).unwrap_err();
    assert!(matches!(err, RewatchError::Toml(_)), "got {err:?}");
}

#[test]
fn missing_explicit_config_is_an_error() {
    let tmp = tempfile::tempdir().unwrap();
    let workdir = canonical(&tmp);
    let mut args = args_in(&workdir);
    args.config = Some(workdir.join("nope.toml").display().to_string());

    let err = load_config(&args).unwrap_err();
    assert!(matches!(err, RewatchError::Io(_)), "got {err:?}");
}

#[test]
fn workdir_must_exist() {
    let tmp = tempfile::tempdir().unwrap();
    let missing = canonical(&tmp).join("missing");

    let err = load_config(&args_in(&missing)).unwrap_err();
    assert!(matches!(err, RewatchError::Config(msg) if msg.contains("not a directory")));
}

#[test]
fn file_values_fill_in_unset_flags() {
    let file = ConfigFileBuilder::new()
        .with_tags("dev")
        .with_timings(true)
        .with_env("GOFLAGS=-mod=mod")
        .with_extra_watch("static/**")
        .build();
    let mut args = CliArgs {
        package: "example.com/app".to_string(),
        ..CliArgs::default()
    };
    args.extra_watches = Some("migrations/*.sql".to_string());

    let cfg = Config::from_sources(&args, Some(file), "/srv/app".into()).unwrap();
    assert_eq!(cfg.build_tags.as_deref(), Some("dev"));
    assert!(cfg.timings);
    assert!(!cfg.race);
    assert_eq!(cfg.extra_watches, vec!["static/**", "migrations/*.sql"]);
    assert_eq!(
        cfg.install_env,
        vec![("GOFLAGS".to_string(), "-mod=mod".to_string())]
    );
}

// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod resolve;
pub mod watch;

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::cli::CliArgs;
use crate::config::Config;
use crate::config::loader::load_config;
use crate::engine::{TRIGGER_CHANNEL_CAPACITY, Trigger, run_trigger_queue, spawn_signal_listener};
use crate::exec::{GoInstall, ProgramSpec, configure_color, spawn_supervisor};
use crate::fs::{FileSystem, RealFileSystem};
use crate::resolve::{GoListSource, Resolution, UnitSource, resolve, skipped_imports};
use crate::watch::{ExtraPathSet, SourceFilter, expand_patterns, spawn_watcher};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - dependency discovery
/// - file watcher
/// - debounced build queue
/// - process supervisor
/// - termination signals
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_config(&args)?;
    debug!(?cfg, "configuration loaded");

    let source: Arc<dyn UnitSource> = Arc::new(GoListSource::from_config(&cfg));
    let resolution = resolve(source, &cfg.package).await?;
    let binary = resolution.binary_path()?;

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let extra = expand_patterns(fs.as_ref(), &cfg.extra_watches, &cfg.workdir)?;

    let builder = GoInstall::new(&cfg, resolution.root.id.clone());

    if cfg.dry_run {
        print_dry_run(&cfg, &resolution, &extra, &builder);
        return Ok(());
    }

    configure_color();
    let (supervisor, mut supervisor_task) =
        spawn_supervisor(ProgramSpec::new(binary, cfg.program_args.clone()));
    let _signals = spawn_signal_listener(supervisor.clone())?;

    let (trigger_tx, trigger_rx) = mpsc::channel::<Trigger>(TRIGGER_CHANNEL_CAPACITY);

    let filter = SourceFilter::new(cfg.source_extension.clone(), extra);
    let mut watcher = match spawn_watcher(&resolution.watch_dirs(), filter, fs, trigger_tx.clone()) {
        Ok(w) => w,
        Err(err) => {
            supervisor.shutdown().await;
            return Err(err.into());
        }
    };

    // First build runs without waiting for a change.
    trigger_tx.send(Trigger::Startup).await?;
    drop(trigger_tx);

    let queue = tokio::spawn(run_trigger_queue(
        trigger_rx,
        builder,
        supervisor.clone(),
        cfg.quiet_period,
    ));

    info!(package = %resolution.root.id, "watching for changes");

    let outcome: Result<()> = tokio::select! {
        _ = &mut supervisor_task => Ok(()),
        res = watcher.wait() => match res {
            Ok(()) => {
                // Watcher stopped on its own; keep serving until shutdown.
                let _ = (&mut supervisor_task).await;
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "file watching failed; stopping");
                supervisor.shutdown().await;
                let _ = (&mut supervisor_task).await;
                Err(err.into())
            }
        },
    };

    queue.abort();
    outcome
}

/// Print what would be watched and built, without running anything.
fn print_dry_run(cfg: &Config, resolution: &Resolution, extra: &ExtraPathSet, builder: &GoInstall) {
    println!("rewatch dry-run");
    println!("  package: {}", resolution.root.id);
    println!("  workdir: {}", cfg.workdir.display());
    println!("  build:   {}", builder.command_line().join(" "));
    for (key, value) in builder.env() {
        println!("  env:     {key}={value}");
    }
    if let Ok(binary) = resolution.binary_path() {
        let mut run_line = vec![binary.display().to_string()];
        run_line.extend(cfg.program_args.iter().cloned());
        println!("  run:     {}", run_line.join(" "));
    }
    println!();

    let graph = resolution.graph();
    let foundation = resolution.foundation_units().count();
    println!(
        "units ({} discovered, {} foundation):",
        graph.len(),
        foundation
    );
    for id in graph.dependency_order() {
        let Some(unit) = resolution.units.iter().find(|u| u.id == id) else {
            continue;
        };
        if unit.foundation {
            continue;
        }
        println!("  - {id}");
        println!("      dir: {}", unit.dir.display());
        let deps: Vec<&str> = graph
            .dependencies_of(id)
            .into_iter()
            .filter(|dep| {
                resolution
                    .units
                    .iter()
                    .any(|u| u.id == *dep && !u.foundation)
            })
            .collect();
        if !deps.is_empty() {
            println!("      imports: {deps:?}");
        }
    }

    let skipped = skipped_imports(&resolution.units);
    if !skipped.is_empty() {
        println!();
        println!("skipped imports: {skipped:?}");
    }

    println!();
    println!("watch dirs ({}):", resolution.watch_dirs().len());
    for dir in resolution.watch_dirs() {
        println!("  - {}", dir.display());
    }
    if !extra.is_empty() {
        println!("extra paths ({}):", extra.len());
        for path in extra.iter() {
            println!("  - {}", path.display());
        }
    }

    debug!("dry-run complete (no execution)");
}

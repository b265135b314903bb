#![cfg(unix)]

mod common;

use std::path::Path;
use std::time::Duration;

use common::{init_tracing, with_timeout};
use rewatch::engine::spawn_signal_listener;
use rewatch::exec::{ProcessState, ProgramSpec, spawn_supervisor};

/// A shell program that logs its start and its graceful stop on SIGINT.
fn logging_program(log: &Path) -> ProgramSpec {
    let script = format!(
        "trap 'echo stop $$ >> {log}; exit 0' INT; echo start $$ >> {log}; \
         while true; do sleep 0.05; done",
        log = log.display()
    );
    ProgramSpec::new("sh", vec!["-c".to_string(), script])
}

fn read_log(log: &Path) -> Vec<String> {
    std::fs::read_to_string(log)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

async fn wait_for_lines(log: &Path, n: usize) -> Vec<String> {
    with_timeout(async {
        loop {
            let lines = read_log(log);
            if lines.len() >= n {
                return lines;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
}

#[tokio::test]
async fn restart_stops_the_old_process_before_starting_the_new_one() {
    init_tracing();

    let tmp = tempfile::tempdir().unwrap();
    let log = tmp.path().join("events.log");
    let (handle, task) = spawn_supervisor(logging_program(&log));
    let mut state = handle.subscribe();

    assert_eq!(handle.state(), ProcessState::NoProcess);

    assert!(handle.restart().await);
    let first = wait_for_lines(&log, 1).await;
    assert!(matches!(handle.state(), ProcessState::Running { .. }));

    assert!(handle.restart().await);
    let lines = wait_for_lines(&log, 3).await;

    let first_pid = first[0].trim_start_matches("start ").to_string();
    assert_eq!(lines[0], format!("start {first_pid}"));
    assert_eq!(lines[1], format!("stop {first_pid}"));
    assert!(lines[2].starts_with("start "));
    assert_ne!(lines[2], lines[0], "a new process was started");

    with_timeout(state.wait_for(|s| matches!(s, ProcessState::Running { .. })))
        .await
        .unwrap();

    assert!(handle.shutdown().await);
    with_timeout(task).await.unwrap();

    let lines = read_log(&log);
    assert_eq!(lines.len(), 4);
    assert!(lines[3].starts_with("stop "));
    assert_eq!(handle.state(), ProcessState::NoProcess);
}

#[tokio::test]
async fn shutdown_without_a_process_returns_immediately() {
    let tmp = tempfile::tempdir().unwrap();
    let (handle, task) = spawn_supervisor(logging_program(&tmp.path().join("unused.log")));

    assert!(handle.shutdown().await);
    with_timeout(task).await.unwrap();

    assert!(!handle.restart().await, "supervisor no longer accepts requests");
}

#[tokio::test]
async fn exited_programs_are_replaced_without_signalling() {
    let (handle, task) = spawn_supervisor(ProgramSpec::new(
        "sh",
        vec!["-c".to_string(), "exit 3".to_string()],
    ));

    assert!(handle.restart().await);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(handle.restart().await);
    assert!(handle.shutdown().await);

    with_timeout(task).await.unwrap();
    assert_eq!(handle.state(), ProcessState::NoProcess);
}

#[tokio::test]
async fn program_arguments_are_passed_through() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("args.txt");
    let script = format!("printf '%s\\n' \"$@\" > {}", out.display());
    let program = ProgramSpec::new(
        "sh",
        vec![
            "-c".to_string(),
            script,
            "prog".to_string(),
            "--port".to_string(),
            "8080".to_string(),
        ],
    );

    let (handle, task) = spawn_supervisor(program);
    assert!(handle.restart().await);

    let lines = wait_for_lines(&out, 2).await;
    assert_eq!(lines, vec!["--port", "8080"]);

    assert!(handle.shutdown().await);
    with_timeout(task).await.unwrap();
}

#[tokio::test]
async fn hangup_stops_the_program_gracefully() {
    use nix::sys::signal::{Signal, raise};

    init_tracing();

    let tmp = tempfile::tempdir().unwrap();
    let log = tmp.path().join("events.log");
    let (handle, task) = spawn_supervisor(logging_program(&log));
    let listener = spawn_signal_listener(handle.clone()).unwrap();

    assert!(handle.restart().await);
    let started = wait_for_lines(&log, 1).await;
    let pid = started[0].trim_start_matches("start ").to_string();

    raise(Signal::SIGHUP).unwrap();

    with_timeout(listener).await.unwrap();
    with_timeout(task).await.unwrap();

    assert_eq!(read_log(&log), vec![format!("start {pid}"), format!("stop {pid}")]);
    assert_eq!(handle.state(), ProcessState::NoProcess);
}

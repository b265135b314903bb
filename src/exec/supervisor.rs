// src/exec/supervisor.rs

//! Lifecycle of the program being developed.
//!
//! A single actor task owns the child process. Other tasks talk to it
//! through a [`SupervisorHandle`]: requests travel over a capacity-1 channel
//! and the current [`ProcessState`] is published on a watch channel.

use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::{Child, Command};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// What the supervisor should do next. Both variants stop the current
/// process first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorRequest {
    Restart,
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    NoProcess,
    Running { pid: u32 },
    Stopping,
}

/// The binary to run and its arguments.
#[derive(Debug, Clone)]
pub struct ProgramSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl ProgramSpec {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

/// Cloneable client side of the supervisor actor.
#[derive(Debug, Clone)]
pub struct SupervisorHandle {
    tx: mpsc::Sender<SupervisorRequest>,
    state: watch::Receiver<ProcessState>,
}

impl SupervisorHandle {
    /// Ask for the program to be (re)started. Returns false if the
    /// supervisor has already stopped.
    pub async fn restart(&self) -> bool {
        self.tx.send(SupervisorRequest::Restart).await.is_ok()
    }

    /// Ask the supervisor to stop the program and exit.
    pub async fn shutdown(&self) -> bool {
        self.tx.send(SupervisorRequest::Shutdown).await.is_ok()
    }

    pub fn state(&self) -> ProcessState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ProcessState> {
        self.state.clone()
    }

    /// A handle with no actor behind it; the caller receives the requests.
    pub fn detached() -> (Self, mpsc::Receiver<SupervisorRequest>) {
        let (tx, rx) = mpsc::channel(1);
        let (_state_tx, state) = watch::channel(ProcessState::NoProcess);
        (Self { tx, state }, rx)
    }
}

/// Spawn the supervisor actor. No process runs until the first restart.
///
/// The task ends after a shutdown request, or once every handle is dropped.
/// In both cases the current process is stopped first.
pub fn spawn_supervisor(spec: ProgramSpec) -> (SupervisorHandle, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(1);
    let (state_tx, state) = watch::channel(ProcessState::NoProcess);

    let actor = Supervisor {
        spec,
        child: None,
        state: state_tx,
        starts: 0,
    };
    let task = tokio::spawn(actor.run(rx));

    (SupervisorHandle { tx, state }, task)
}

struct Supervisor {
    spec: ProgramSpec,
    child: Option<Child>,
    state: watch::Sender<ProcessState>,
    starts: usize,
}

impl Supervisor {
    async fn run(mut self, mut rx: mpsc::Receiver<SupervisorRequest>) {
        while let Some(request) = rx.recv().await {
            debug!(?request, "supervisor request");
            self.stop_current().await;
            match request {
                SupervisorRequest::Shutdown => {
                    info!("supervisor shutting down");
                    return;
                }
                SupervisorRequest::Restart => self.start(),
            }
        }

        debug!("all supervisor handles dropped");
        self.stop_current().await;
    }

    fn start(&mut self) {
        let mut cmd = Command::new(&self.spec.program);
        cmd.args(&self.spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        match cmd.spawn() {
            Ok(child) => {
                self.starts += 1;
                let pid = child.id().unwrap_or_default();
                info!(
                    program = %self.spec.program.display(),
                    pid,
                    start = self.starts,
                    "program started"
                );
                self.child = Some(child);
                self.state.send_replace(ProcessState::Running { pid });
            }
            Err(err) => {
                error!(
                    program = %self.spec.program.display(),
                    error = %err,
                    "failed to start program"
                );
                self.state.send_replace(ProcessState::NoProcess);
            }
        }
    }

    /// Interrupt the current process, if any, and wait for it to exit.
    async fn stop_current(&mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };
        self.state.send_replace(ProcessState::Stopping);

        match child.try_wait() {
            Ok(Some(status)) => debug!(%status, "program had already exited"),
            _ => {
                interrupt(&mut child);
                match child.wait().await {
                    Ok(status) => debug!(%status, "program stopped"),
                    Err(err) => warn!(error = %err, "failed waiting for program to exit"),
                }
            }
        }

        self.state.send_replace(ProcessState::NoProcess);
    }
}

/// Send SIGINT, falling back to a hard kill when it cannot be delivered.
#[cfg(unix)]
fn interrupt(child: &mut Child) {
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;

    let Some(pid) = child.id().and_then(|id| i32::try_from(id).ok()) else {
        return;
    };
    if let Err(err) = kill(Pid::from_raw(pid), Signal::SIGINT) {
        warn!(pid, error = %err, "SIGINT failed; killing program");
        force_kill(child);
    }
}

#[cfg(not(unix))]
fn interrupt(child: &mut Child) {
    force_kill(child);
}

fn force_kill(child: &mut Child) {
    if let Err(err) = child.start_kill() {
        warn!(error = %err, "failed to kill program");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn detached_handle_forwards_requests() {
        let (handle, mut rx) = SupervisorHandle::detached();
        assert!(handle.restart().await);
        assert_eq!(rx.recv().await, Some(SupervisorRequest::Restart));
        assert_eq!(handle.state(), ProcessState::NoProcess);

        drop(rx);
        assert!(!handle.shutdown().await);
    }

    #[tokio::test]
    async fn unstartable_program_leaves_no_process() {
        let (handle, task) = spawn_supervisor(ProgramSpec::new(
            "/nonexistent/rewatch-test-binary",
            Vec::new(),
        ));
        assert!(handle.restart().await);
        assert!(handle.shutdown().await);
        task.await.unwrap();
        assert_eq!(handle.state(), ProcessState::NoProcess);
    }
}

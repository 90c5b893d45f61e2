// src/display/server.rs

//! Process handling shared by the Xvfb and Xephyr backends.
//!
//! `ServerProcess` owns at most one child. The child stays bound after it
//! exits (stopped, killed or crashed) until `wait()` reaps it, so liveness is
//! checked with a no-op signal plus a non-reaping `waitid`, never with
//! `try_wait`.

use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::Duration;

use log::{debug, trace, warn};
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;

use crate::config::DisplayOptions;
use crate::error::{DisplayError, Result};
use crate::os::{is_display_in_use, is_display_ready, socket_path};

/// Time a freshly spawned server gets to fail before we call it started.
pub const STARTUP_GRACE: Duration = Duration::from_millis(500);

/// Delay between readiness probes.
pub const READY_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// How long `Drop` waits for a signalled server before leaving it unreaped.
const DROP_REAP_ATTEMPTS: u32 = 50;
const DROP_REAP_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug)]
pub struct ServerProcess {
    options: DisplayOptions,
    child: Option<Child>,
}

impl ServerProcess {
    pub fn new(options: DisplayOptions) -> Self {
        ServerProcess {
            options,
            child: None,
        }
    }

    pub fn options(&self) -> &DisplayOptions {
        &self.options
    }

    pub fn display(&self) -> u32 {
        self.options.display
    }

    /// PID of the bound child, reaped or not.
    pub fn child_id(&self) -> Option<u32> {
        self.child.as_ref().map(Child::id)
    }

    fn pid(&self) -> Option<Pid> {
        self.child_id().map(|id| Pid::from_raw(id as i32))
    }

    pub fn ensure_stopped(&self) -> Result<()> {
        if self.is_running() {
            return Err(DisplayError::AlreadyRunning);
        }
        Ok(())
    }

    pub fn ensure_display_free(&self) -> Result<()> {
        let display = self.options.display;
        if is_display_in_use(&self.options.socket_dir, display) {
            return Err(DisplayError::DisplayInUse {
                display,
                path: socket_path(&self.options.socket_dir, display),
            });
        }
        Ok(())
    }

    /// Spawns `command` and checks it is still alive after the grace period.
    ///
    /// Callers run their own preconditions (`ensure_stopped`, host checks,
    /// `ensure_display_free`) first.
    pub fn launch(&mut self, mut command: Command) -> Result<()> {
        self.reap_stale();

        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        let program = command.get_program().to_string_lossy().into_owned();
        debug!(
            "Spawning {} with args {:?}",
            program,
            command.get_args().collect::<Vec<_>>()
        );

        let child = command
            .spawn()
            .map_err(|source| DisplayError::Spawn { program, source })?;
        debug!("Spawned display server :{} with PID {}", self.display(), child.id());
        self.child = Some(child);

        thread::sleep(STARTUP_GRACE);
        if !self.is_running() {
            debug!("Display server :{} exited during startup", self.display());
            return Err(DisplayError::Crashed);
        }

        if self.options.set_env {
            // Process-wide and never cleared on stop; last writer wins.
            let name = self.options.display_name();
            debug!("Publishing DISPLAY={}", name);
            std::env::set_var("DISPLAY", name);
        }
        Ok(())
    }

    /// Drops a bound child that has already exited so a new one can be bound.
    fn reap_stale(&mut self) {
        let Some(child) = self.child.as_mut() else {
            return;
        };
        match child.try_wait() {
            Ok(Some(status)) => {
                debug!("Reaped stale display server {}: {}", child.id(), status);
                self.child = None;
            }
            Ok(None) => {}
            Err(e) => {
                warn!("Failed to reap stale display server {}: {}", child.id(), e);
                self.child = None;
            }
        }
    }

    fn signal(&self, signal: Signal) -> Result<()> {
        let pid = match self.pid() {
            Some(pid) if self.is_running() => pid,
            _ => return Err(DisplayError::NotRunning),
        };
        debug!("Sending {} to display server {}", signal, pid);
        kill(pid, Some(signal)).map_err(|source| DisplayError::Signal {
            pid: pid.as_raw(),
            source,
        })
    }

    pub fn stop(&self) -> Result<()> {
        self.signal(Signal::SIGTERM)
    }

    pub fn kill(&self) -> Result<()> {
        self.signal(Signal::SIGKILL)
    }

    pub fn wait(&mut self) -> Result<ExitStatus> {
        let child = self.child.as_mut().ok_or(DisplayError::NotRunning)?;
        let status = child.wait().map_err(DisplayError::Wait)?;
        debug!("Display server {} exited: {}", child.id(), status);
        self.child = None;
        Ok(status)
    }

    pub fn is_running(&self) -> bool {
        let Some(pid) = self.pid() else {
            return false;
        };
        if kill(pid, None::<Signal>).is_err() {
            return false;
        }
        !has_exited(pid)
    }

    pub fn is_ready(&self) -> Result<bool> {
        is_display_ready(&self.options.probe, self.options.display)
    }

    pub fn wait_until_ready(&self, timeout_secs: u64) -> Result<()> {
        if !self.is_running() {
            return Err(DisplayError::NotRunning);
        }
        poll_until_ready(timeout_secs, READY_POLL_INTERVAL, || self.is_ready())
    }
}

/// A zombie still accepts signal 0, so ask the kernel whether `pid` has
/// exited without consuming its status.
#[cfg(any(target_os = "linux", target_os = "android"))]
fn has_exited(pid: Pid) -> bool {
    use nix::sys::wait::{waitid, Id, WaitPidFlag, WaitStatus};

    let flags = WaitPidFlag::WEXITED | WaitPidFlag::WNOHANG | WaitPidFlag::WNOWAIT;
    match waitid(Id::Pid(pid), flags) {
        Ok(WaitStatus::StillAlive) => false,
        Ok(status) => {
            trace!("Display server {} has exited: {:?}", pid, status);
            true
        }
        Err(e) => {
            trace!("waitid on {} failed: {}", pid, e);
            true
        }
    }
}

/// No portable non-reaping wait here, so an exited but unreaped server still
/// counts as running: `is_running` stays true until `wait()`, and a server
/// that dies during the startup grace is not reported as `Crashed`.
#[cfg(not(any(target_os = "linux", target_os = "android")))]
fn has_exited(pid: Pid) -> bool {
    trace!("Cannot tell whether {} has exited on this platform", pid);
    false
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PollState {
    Polling { elapsed: u64 },
    Ready,
    TimedOut,
}

/// Readiness loop. `timeout_secs == 0` never times out: the elapsed counter
/// only advances when a timeout is set. Probe errors end the loop at once.
pub(crate) fn poll_until_ready<F>(
    timeout_secs: u64,
    interval: Duration,
    mut probe: F,
) -> Result<()>
where
    F: FnMut() -> Result<bool>,
{
    let mut state = PollState::Polling { elapsed: 0 };
    loop {
        state = match state {
            PollState::Ready => return Ok(()),
            PollState::TimedOut => return Err(DisplayError::Timeout(timeout_secs)),
            PollState::Polling { elapsed } if timeout_secs != 0 && elapsed >= timeout_secs => {
                PollState::TimedOut
            }
            PollState::Polling { elapsed } => {
                if probe()? {
                    PollState::Ready
                } else {
                    thread::sleep(interval);
                    let elapsed = if timeout_secs == 0 { elapsed } else { elapsed + 1 };
                    trace!("Display not ready yet ({}s of {}s)", elapsed, timeout_secs);
                    PollState::Polling { elapsed }
                }
            }
        };
    }
}

impl Drop for ServerProcess {
    fn drop(&mut self) {
        let Some(child) = self.child.as_mut() else {
            return;
        };
        let pid = Pid::from_raw(child.id() as i32);
        match child.try_wait() {
            Ok(Some(status)) => {
                debug!("ServerProcess drop: reaped display server {}: {}", pid, status);
            }
            Ok(None) => {
                debug!("ServerProcess drop: display server {} still alive, sending SIGTERM", pid);
                if let Err(e) = kill(pid, Some(Signal::SIGTERM)) {
                    warn!("ServerProcess drop: failed to send SIGTERM to {}: {}", pid, e);
                    return;
                }
                for _ in 0..DROP_REAP_ATTEMPTS {
                    match child.try_wait() {
                        Ok(Some(status)) => {
                            debug!("ServerProcess drop: reaped display server {}: {}", pid, status);
                            return;
                        }
                        Ok(None) => thread::sleep(DROP_REAP_INTERVAL),
                        Err(e) => {
                            warn!("ServerProcess drop: failed to reap {}: {}", pid, e);
                            return;
                        }
                    }
                }
                warn!(
                    "ServerProcess drop: display server {} ignored SIGTERM, leaving it unreaped",
                    pid
                );
            }
            Err(e) => {
                warn!("ServerProcess drop: failed to check display server {}: {}", pid, e);
            }
        }
    }
}

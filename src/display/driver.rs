// src/display/driver.rs
//! `VirtualDisplay` trait - the lifecycle contract every display backend follows.
//!
//! ## Lifecycle
//! 1. Construct with `DisplayOptions` (defaults substituted, no process yet)
//! 2. `start()` - spawn the server and confirm it survived the grace period
//! 3. `wait_until_ready()` - optional, polls the readiness probe
//! 4. `stop()` or `kill()` - request termination, returns immediately
//! 5. `wait()` - reap the process; exactly once per started process
//!
//! Control operations are not synchronised. Wrap a backend in a `Mutex` if it
//! is shared between threads, otherwise two `start()` calls can both pass the
//! already-running check.

use std::process::ExitStatus;

use crate::error::{DisplayError, Result};

pub trait VirtualDisplay {
    /// Starts the server.
    ///
    /// Fails with `AlreadyRunning` while a previous server is alive,
    /// `DisplayInUse` when the display number already has a socket, and
    /// `Crashed` when the process exits within the startup grace period.
    fn start(&mut self) -> Result<()>;

    /// Sends SIGTERM. Does not wait for the process to exit.
    fn stop(&self) -> Result<()>;

    /// Sends SIGKILL. Does not wait for the process to exit.
    fn kill(&self) -> Result<()>;

    /// Blocks until the server exits and reaps it.
    ///
    /// The exit status is returned as-is; a server that ended because of
    /// `stop()` is not an error. Returns `NotRunning` if there is no unreaped
    /// process.
    fn wait(&mut self) -> Result<ExitStatus>;

    /// PID of the bound server process until it is reaped.
    fn pid(&self) -> Option<u32>;

    /// Non-blocking liveness check. Never reaps.
    fn is_running(&self) -> bool;

    /// Runs the readiness probe once against this display.
    fn is_ready(&self) -> Result<bool>;

    /// Polls `is_ready` once a second until it succeeds.
    ///
    /// A `timeout_secs` of zero waits without bound. Liveness is only
    /// checked on entry, so a server that dies while polling keeps reporting
    /// not-ready until the timeout instead of `NotRunning`.
    fn wait_until_ready(&self, timeout_secs: u64) -> Result<()>;

    /// Whether the server opens a window on the host display.
    fn is_visible(&self) -> bool;

    /// Executables that must be on `PATH` for this backend to work.
    fn dependencies(&self) -> Vec<String>;

    /// Short backend name, e.g. `"xvfb"`.
    fn backend_name(&self) -> &'static str;

    /// The display number this backend was constructed with.
    fn display(&self) -> u32;

    fn display_name(&self) -> String {
        format!(":{}", self.display())
    }

    /// Resolves every dependency, collecting all failures.
    fn has_dependencies(&self) -> (bool, Vec<DisplayError>) {
        crate::os::has_dependencies(self.dependencies())
    }
}

// src/display/mod.rs
//! Display server backends behind a common lifecycle trait.
//!
//! - VirtualDisplay: the lifecycle contract (start, stop, wait, readiness)
//! - ServerProcess: child process handling shared by every backend
//! - drivers: Xvfb (headless) and Xephyr (nested in a host display)
//! - AnyDisplay / start_display: pick a backend from a visibility flag

pub mod driver;
pub mod drivers;
pub mod server;


use std::process::ExitStatus;

pub use driver::VirtualDisplay;
pub use drivers::{Xephyr, Xvfb};
pub use server::{ServerProcess, READY_POLL_INTERVAL, STARTUP_GRACE};

use crate::config::DisplayOptions;
use crate::error::{DisplayError, Result};

/// One of the supported backends.
#[derive(Debug)]
pub enum AnyDisplay {
    Headless(Xvfb),
    Nested(Xephyr),
}

impl AnyDisplay {
    /// A windowed Xephyr when `visible`, otherwise a headless Xvfb. Not started.
    pub fn new(visible: bool, options: DisplayOptions) -> Self {
        if visible {
            AnyDisplay::Nested(Xephyr::new(options))
        } else {
            AnyDisplay::Headless(Xvfb::new(options))
        }
    }
}

/// Builds the backend matching `visible` and starts it.
///
/// On failure the backend is dropped; a server that crashed during startup is
/// reaped at that point.
pub fn start_display(visible: bool, options: DisplayOptions) -> Result<AnyDisplay> {
    let mut display = AnyDisplay::new(visible, options);
    log::debug!(
        "Starting {} on {}",
        display.backend_name(),
        display.display_name()
    );
    display.start()?;
    Ok(display)
}

macro_rules! dispatch {
    ($self:expr, $inner:ident => $body:expr) => {
        match $self {
            AnyDisplay::Headless($inner) => $body,
            AnyDisplay::Nested($inner) => $body,
        }
    };
}

impl VirtualDisplay for AnyDisplay {
    fn start(&mut self) -> Result<()> {
        dispatch!(self, d => d.start())
    }

    fn stop(&self) -> Result<()> {
        dispatch!(self, d => d.stop())
    }

    fn kill(&self) -> Result<()> {
        dispatch!(self, d => d.kill())
    }

    fn wait(&mut self) -> Result<ExitStatus> {
        dispatch!(self, d => d.wait())
    }

    fn pid(&self) -> Option<u32> {
        dispatch!(self, d => d.pid())
    }

    fn is_running(&self) -> bool {
        dispatch!(self, d => d.is_running())
    }

    fn is_ready(&self) -> Result<bool> {
        dispatch!(self, d => d.is_ready())
    }

    fn wait_until_ready(&self, timeout_secs: u64) -> Result<()> {
        dispatch!(self, d => d.wait_until_ready(timeout_secs))
    }

    fn is_visible(&self) -> bool {
        dispatch!(self, d => d.is_visible())
    }

    fn dependencies(&self) -> Vec<String> {
        dispatch!(self, d => d.dependencies())
    }

    fn backend_name(&self) -> &'static str {
        dispatch!(self, d => d.backend_name())
    }

    fn display(&self) -> u32 {
        dispatch!(self, d => d.display())
    }

    fn has_dependencies(&self) -> (bool, Vec<DisplayError>) {
        dispatch!(self, d => d.has_dependencies())
    }
}

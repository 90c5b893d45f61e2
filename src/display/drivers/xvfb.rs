//! Headless backend: an X server rendering into an off-screen framebuffer.

use std::process::{Command, ExitStatus};

use crate::config::DisplayOptions;
use crate::display::driver::VirtualDisplay;
use crate::display::server::ServerProcess;
use crate::error::Result;

pub const XVFB_EXECUTABLE: &str = "Xvfb";

#[derive(Debug)]
pub struct Xvfb {
    server: ServerProcess,
}

impl Xvfb {
    pub fn new(options: DisplayOptions) -> Self {
        Xvfb {
            server: ServerProcess::new(options.with_defaults()),
        }
    }

    pub fn options(&self) -> &DisplayOptions {
        self.server.options()
    }

    fn executable(&self) -> &str {
        self.options()
            .executable
            .as_deref()
            .unwrap_or(XVFB_EXECUTABLE)
    }

    /// `Xvfb :<n> -screen 0 <w>x<h>x<depth> <args...>`
    pub fn command(&self) -> Command {
        let options = self.options();
        let mut command = Command::new(self.executable());
        command
            .arg(options.display_name())
            .arg("-screen")
            .arg("0")
            .arg(format!(
                "{}x{}x{}",
                options.width, options.height, options.color_depth
            ))
            .args(&options.args);
        command
    }
}

impl VirtualDisplay for Xvfb {
    fn start(&mut self) -> Result<()> {
        self.server.ensure_stopped()?;
        self.server.ensure_display_free()?;
        let command = self.command();
        self.server.launch(command)
    }

    fn stop(&self) -> Result<()> {
        self.server.stop()
    }

    fn kill(&self) -> Result<()> {
        self.server.kill()
    }

    fn wait(&mut self) -> Result<ExitStatus> {
        self.server.wait()
    }

    fn pid(&self) -> Option<u32> {
        self.server.child_id()
    }

    fn is_running(&self) -> bool {
        self.server.is_running()
    }

    fn is_ready(&self) -> Result<bool> {
        self.server.is_ready()
    }

    fn wait_until_ready(&self, timeout_secs: u64) -> Result<()> {
        self.server.wait_until_ready(timeout_secs)
    }

    fn is_visible(&self) -> bool {
        false
    }

    fn dependencies(&self) -> Vec<String> {
        vec![self.executable().to_string(), self.options().probe.clone()]
    }

    fn backend_name(&self) -> &'static str {
        "xvfb"
    }

    fn display(&self) -> u32 {
        self.server.display()
    }
}

//! Nested backend: an X server shown as a window on an existing host display.

use std::process::{Command, ExitStatus};

use crate::config::DisplayOptions;
use crate::display::driver::VirtualDisplay;
use crate::display::server::ServerProcess;
use crate::error::{DisplayError, Result};
use crate::os::is_display_in_use;

pub const XEPHYR_EXECUTABLE: &str = "Xephyr";

#[derive(Debug)]
pub struct Xephyr {
    server: ServerProcess,
}

impl Xephyr {
    pub fn new(options: DisplayOptions) -> Self {
        Xephyr {
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
            .unwrap_or(XEPHYR_EXECUTABLE)
    }

    /// `Xephyr :<n> -screen <w>x<h> <args...>` with `DISPLAY` pointing at the host.
    pub fn command(&self) -> Command {
        let options = self.options();
        let mut command = Command::new(self.executable());
        command
            .arg(options.display_name())
            .arg("-screen")
            .arg(format!("{}x{}", options.width, options.height))
            .args(&options.args)
            .env("DISPLAY", format!(":{}", options.host_display));
        command
    }
}

impl VirtualDisplay for Xephyr {
    fn start(&mut self) -> Result<()> {
        self.server.ensure_stopped()?;

        let options = self.options();
        if !is_display_in_use(&options.socket_dir, options.host_display) {
            return Err(DisplayError::NoHostDisplay(options.host_display));
        }

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
        true
    }

    fn dependencies(&self) -> Vec<String> {
        vec![self.executable().to_string(), self.options().probe.clone()]
    }

    fn backend_name(&self) -> &'static str {
        "xephyr"
    }

    fn display(&self) -> u32 {
        self.server.display()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::scratch_dir;
    use std::ffi::OsStr;

    #[test_log::test]
    fn command_targets_host_display() {
        let xephyr = Xephyr::new(DisplayOptions {
            host_display: 99,
            args: vec!["-resizeable".into()],
            ..DisplayOptions::new(88)
        });
        let command = xephyr.command();
        assert_eq!(command.get_program(), "Xephyr");
        let args: Vec<_> = command.get_args().collect();
        assert_eq!(args, [":88", "-screen", "1280x720", "-resizeable"]);
        let display_env = command
            .get_envs()
            .find(|(key, _)| *key == OsStr::new("DISPLAY"))
            .and_then(|(_, value)| value);
        assert_eq!(display_env, Some(OsStr::new(":99")));
    }

    #[test_log::test]
    fn start_without_host_fails() {
        let dir = scratch_dir("xephyr-no-host");
        let mut xephyr = Xephyr::new(DisplayOptions {
            host_display: 61,
            socket_dir: dir,
            ..DisplayOptions::new(62)
        });
        match xephyr.start() {
            Err(DisplayError::NoHostDisplay(61)) => {}
            other => panic!("expected NoHostDisplay, got {:?}", other),
        }
        assert!(!xephyr.is_running());
    }

    #[test_log::test]
    fn missing_host_is_checked_before_own_display() {
        let dir = scratch_dir("xephyr-host-order");
        std::fs::write(dir.join("X64"), b"").unwrap();
        let mut xephyr = Xephyr::new(DisplayOptions {
            host_display: 63,
            socket_dir: dir,
            ..DisplayOptions::new(64)
        });
        assert!(matches!(xephyr.start(), Err(DisplayError::NoHostDisplay(63))));
    }

    #[test_log::test]
    fn static_traits() {
        let xephyr = Xephyr::new(DisplayOptions::new(4));
        assert!(xephyr.is_visible());
        assert_eq!(xephyr.backend_name(), "xephyr");
        assert_eq!(xephyr.dependencies(), ["Xephyr", "xdpyinfo"]);
    }
}

// src/os/probe.rs

use std::process::{Command, Stdio};

use crate::error::{DisplayError, Result};

/// Default diagnostic tool used to ask a server whether it accepts clients.
pub const DEFAULT_PROBE: &str = "xdpyinfo";

/// Runs `probe` against `:display` and classifies its exit.
///
/// * exit status zero: the display is ready.
/// * any other exit: not ready yet, which is not an error.
/// * the probe could not be launched at all: `DisplayError::Probe`. A missing
///   probe must never look like a display that is still coming up.
pub fn is_display_ready(probe: &str, display: u32) -> Result<bool> {
    let status = Command::new(probe)
        .env("DISPLAY", format!(":{}", display))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|source| DisplayError::Probe {
            program: probe.to_string(),
            source,
        })?;

    log::trace!("Probe {} on :{} exited with {}", probe, display, status);
    Ok(status.success())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::serial;

    #[test_log::test]
    fn zero_exit_is_ready() {
        let _guard = serial();
        assert!(is_display_ready("true", 99).unwrap());
    }

    #[test_log::test]
    fn nonzero_exit_is_not_ready() {
        let _guard = serial();
        assert!(!is_display_ready("false", 99).unwrap());
    }

    #[test_log::test]
    fn launch_failure_is_an_error() {
        let _guard = serial();
        match is_display_ready("xdisplay-no-such-probe", 99) {
            Err(DisplayError::Probe { program, .. }) => {
                assert_eq!(program, "xdisplay-no-such-probe")
            }
            other => panic!("expected probe error, got {:?}", other),
        }
    }

    #[test_log::test]
    fn readiness_check_targets_the_display() {
        let _guard = serial();
        let script = crate::test_support::write_script(
            "probe-display",
            "#!/bin/sh\n[ \"$DISPLAY\" = \":57\" ]\n",
        );
        let probe = script.to_str().unwrap();
        assert!(is_display_ready(probe, 57).unwrap());
        assert!(!is_display_ready(probe, 58).unwrap());
    }
}

// tests/support/mod.rs
//
// Helpers for tests that drive real X servers.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use xdisplay::os::{is_display_in_use, X11_SOCKET_DIR};
use xdisplay::VirtualDisplay;

static X_SERVERS: Mutex<()> = Mutex::new(());

/// Tests share display numbers, so only one runs at a time.
pub fn exclusive() -> MutexGuard<'static, ()> {
    X_SERVERS.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Logs why a backend can't be exercised here and returns false, or true if it can.
pub fn can_run(display: &impl VirtualDisplay) -> bool {
    let (ok, errors) = display.has_dependencies();
    if !ok {
        log::warn!("{} dependencies are missing, skipping:", display.backend_name());
        for err in errors {
            log::warn!("  {}", err);
        }
        return false;
    }
    if is_display_in_use(Path::new(X11_SOCKET_DIR), display.display()) {
        log::warn!(
            "{} is already taken on this host, skipping",
            display.display_name()
        );
        return false;
    }
    true
}

/// Stops a started display and checks it went away cleanly.
pub fn stop_and_reap(display: &mut impl VirtualDisplay) {
    if let Err(e) = display.stop() {
        panic!("stopping {} returned an error: {}", display.backend_name(), e);
    }
    if let Err(e) = display.wait() {
        panic!("{} did not quit peacefully: {}", display.backend_name(), e);
    }
    assert!(
        !display.is_running(),
        "{} is still detected as running after stop",
        display.backend_name()
    );
}

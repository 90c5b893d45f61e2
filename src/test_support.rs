// src/test_support.rs
//
// Shared helpers for unit tests that spawn processes.

#![cfg(test)]

use once_cell::sync::Lazy;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

static SERIAL: Mutex<()> = Mutex::new(());

/// Serialises tests that fork or touch `DISPLAY`.
///
/// Writing a script while another thread forks can leave the script's write
/// descriptor open in the child and make exec fail with ETXTBSY, so every
/// test that spawns or writes scripts holds this guard.
pub fn serial() -> MutexGuard<'static, ()> {
    SERIAL.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Returns an empty directory unique to this test process and `name`.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("xdisplay-{}-{}", std::process::id(), name));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("failed to create scratch dir");
    dir
}

/// Writes an executable shell script and returns its path.
pub fn write_script(name: &str, body: &str) -> PathBuf {
    let path = scratch_dir(&format!("script-{}", name)).join(name);
    std::fs::write(&path, body).expect("failed to write script");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("failed to chmod script");
    path
}

static FAKE_SERVER: Lazy<String> = Lazy::new(|| {
    write_script("fake-server", "#!/bin/sh\nexec sleep 30\n")
        .to_string_lossy()
        .into_owned()
});

/// Stand-in for an X server: ignores its arguments and sleeps until signalled.
pub fn fake_server() -> String {
    FAKE_SERVER.clone()
}

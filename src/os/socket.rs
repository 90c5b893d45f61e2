// src/os/socket.rs

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Directory where X servers create their listening sockets.
pub const X11_SOCKET_DIR: &str = "/tmp/.X11-unix";

/// Path of the socket a server on `display` creates inside `socket_dir`.
pub fn socket_path(socket_dir: &Path, display: u32) -> PathBuf {
    socket_dir.join(format!("X{}", display))
}

/// Checks if a display number is taken by looking for its socket.
///
/// Anything other than "not found" counts as in use: an unreadable socket
/// directory must not make us start a second server on the same number.
pub fn is_display_in_use(socket_dir: &Path, display: u32) -> bool {
    let path = socket_path(socket_dir, display);
    match std::fs::symlink_metadata(&path) {
        Ok(_) => true,
        Err(e) if e.kind() == ErrorKind::NotFound => false,
        Err(e) => {
            log::debug!(
                "Treating display :{} as in use, stat of {} failed: {}",
                display,
                path.display(),
                e
            );
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::scratch_dir;

    #[test_log::test]
    fn socket_path_uses_x_prefix() {
        let path = socket_path(Path::new(X11_SOCKET_DIR), 99);
        assert_eq!(path, PathBuf::from("/tmp/.X11-unix/X99"));
    }

    #[test_log::test]
    fn display_in_use_follows_socket_presence() {
        let dir = scratch_dir("socket-presence");
        assert!(!is_display_in_use(&dir, 42));

        std::fs::write(socket_path(&dir, 42), b"").unwrap();
        assert!(is_display_in_use(&dir, 42));
        assert!(!is_display_in_use(&dir, 43));
    }

    #[test_log::test]
    fn missing_socket_dir_means_free() {
        let dir = scratch_dir("socket-missing").join("does-not-exist");
        assert!(!is_display_in_use(&dir, 0));
    }
}

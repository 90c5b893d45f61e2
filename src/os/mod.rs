// src/os/mod.rs
//
// Host-side helpers: X socket lookup, PATH resolution and the xdpyinfo probe.
// These know nothing about a running server; the display module builds on them.

pub mod deps;
pub mod probe;
pub mod socket;

pub use deps::has_dependencies;
pub use probe::is_display_ready;
pub use socket::{is_display_in_use, socket_path, X11_SOCKET_DIR};

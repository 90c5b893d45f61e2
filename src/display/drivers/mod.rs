// src/display/drivers/mod.rs
//! Concrete display server backends.

pub mod xephyr;
pub mod xvfb;

pub use xephyr::Xephyr;
pub use xvfb::Xvfb;

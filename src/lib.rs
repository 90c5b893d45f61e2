// src/lib.rs

//! Lifecycle management for virtual X display servers.
//!
//! Two backends are provided: [`Xvfb`], a headless server, and [`Xephyr`], a
//! server shown as a window on an existing host display. Both implement
//! [`VirtualDisplay`]; [`start_display`] picks one from a visibility flag.
//!
//! ```no_run
//! use xdisplay::{start_display, DisplayOptions, VirtualDisplay};
//!
//! let mut display = start_display(false, DisplayOptions::new(99))?;
//! display.wait_until_ready(15)?;
//! // ... run GUI clients against :99 ...
//! display.stop()?;
//! display.wait()?;
//! # Ok::<(), xdisplay::DisplayError>(())
//! ```

pub mod config;
pub mod display;
pub mod error;
pub mod os;

#[cfg(test)]
mod test_support;

pub use config::{Config, DisplayOptions, CONFIG};
pub use display::{start_display, AnyDisplay, VirtualDisplay, Xephyr, Xvfb};
pub use error::{DisplayError, Result};

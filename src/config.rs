// src/config.rs

//! Configuration for display servers and for the `xdisplay` binary.
//!
//! `DisplayOptions` is what a backend is constructed from. `Config` wraps it
//! with the binary's own settings and is loaded once into [`CONFIG`] from the
//! JSON file named by `XDISPLAY_CONFIG`. Every field has a default, so partial
//! files are fine.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::os::probe::DEFAULT_PROBE;
use crate::os::socket::X11_SOCKET_DIR;

/// Environment variable naming the JSON config file for the binary.
pub const CONFIG_ENV_VAR: &str = "XDISPLAY_CONFIG";

pub const DEFAULT_WIDTH: u32 = 1280;
pub const DEFAULT_HEIGHT: u32 = 720;
pub const DEFAULT_COLOR_DEPTH: u32 = 24;

/// Options shared by both display backends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayOptions {
    /// Display number the server listens on (`:<display>`).
    pub display: u32,
    /// Screen width in pixels. Zero selects the default geometry.
    pub width: u32,
    /// Screen height in pixels. Zero selects the default geometry.
    pub height: u32,
    /// Bits per pixel. Only used by Xvfb.
    pub color_depth: u32,
    /// Display Xephyr opens its window on. Only used by Xephyr.
    pub host_display: u32,
    /// Appended verbatim to the server command line.
    pub args: Vec<String>,
    /// Publish `DISPLAY=:<display>` process-wide after a successful start.
    pub set_env: bool,
    /// Where servers create their `X<n>` sockets.
    pub socket_dir: PathBuf,
    /// Overrides the server executable (`Xvfb` / `Xephyr`).
    pub executable: Option<String>,
    /// Readiness probe executable.
    pub probe: String,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        DisplayOptions {
            display: 99,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            color_depth: DEFAULT_COLOR_DEPTH,
            host_display: 0,
            args: Vec::new(),
            set_env: false,
            socket_dir: PathBuf::from(X11_SOCKET_DIR),
            executable: None,
            probe: DEFAULT_PROBE.to_string(),
        }
    }
}

impl DisplayOptions {
    /// Default options for display number `display`.
    pub fn new(display: u32) -> Self {
        DisplayOptions {
            display,
            ..Default::default()
        }
    }

    /// Substitutes defaults for zero geometry and color depth.
    ///
    /// Width and height are replaced together: a half-specified geometry is
    /// treated as unset.
    pub fn with_defaults(mut self) -> Self {
        if self.width == 0 || self.height == 0 {
            self.width = DEFAULT_WIDTH;
            self.height = DEFAULT_HEIGHT;
        }
        if self.color_depth == 0 {
            self.color_depth = DEFAULT_COLOR_DEPTH;
        }
        self
    }

    /// `:<display>`, the conventional X display name.
    pub fn display_name(&self) -> String {
        format!(":{}", self.display)
    }
}

/// Settings for the `xdisplay` binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Run Xephyr in a window instead of a headless Xvfb.
    pub visible: bool,
    /// Seconds to wait for the server to accept clients. Zero waits forever.
    pub ready_timeout_secs: u64,
    pub display: DisplayOptions,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            visible: false,
            ready_timeout_secs: 15,
            display: DisplayOptions::default(),
        }
    }
}

impl Config {
    /// Reads a config file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Loads the file named by `XDISPLAY_CONFIG`, falling back to defaults.
    pub fn load_or_default() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV_VAR) else {
            log::debug!("{} not set, using default config", CONFIG_ENV_VAR);
            return Self::default();
        };
        match Self::load(Path::new(&path)) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{:#}. Using default config.", e);
                Self::default()
            }
        }
    }
}

/// Process-wide configuration, loaded on first access.
pub static CONFIG: Lazy<Config> = Lazy::new(Config::load_or_default);

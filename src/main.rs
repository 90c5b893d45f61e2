// src/main.rs

use anyhow::{bail, Context};
use clap::{value_parser, Arg, ArgAction, Command};
use log::{info, warn};
use nix::sys::signal::{SigSet, Signal};
use std::path::PathBuf;

use xdisplay::{AnyDisplay, Config, VirtualDisplay, CONFIG};

/// Runs a display server until SIGINT or SIGTERM, printing its name once ready.
fn main() -> anyhow::Result<()> {
    // Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let matches = Command::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(
            Arg::new("display")
                .value_name("DISPLAY")
                .help("Display number to start the server on")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            Arg::new("visible")
                .long("visible")
                .help("Open a nested Xephyr window instead of a headless Xvfb")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .value_name("SECONDS")
                .help("Seconds to wait for the server to accept clients, 0 waits forever")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .help("JSON config file, overrides XDISPLAY_CONFIG")
                .value_parser(value_parser!(PathBuf)),
        )
        .get_matches();

    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => Config::load(path)?,
        None => (*CONFIG).clone(),
    };
    if let Some(display) = matches.get_one::<u32>("display") {
        config.display.display = *display;
    }
    if matches.get_flag("visible") {
        config.visible = true;
    }
    if let Some(timeout) = matches.get_one::<u64>("timeout") {
        config.ready_timeout_secs = *timeout;
    }

    // Blocked before spawning; std resets the mask in children.
    let mut signals = SigSet::empty();
    signals.add(Signal::SIGINT);
    signals.add(Signal::SIGTERM);
    signals
        .thread_block()
        .context("Failed to block termination signals")?;

    let mut display = AnyDisplay::new(config.visible, config.display);

    let (ok, missing) = display.has_dependencies();
    if !ok {
        for err in &missing {
            warn!("{}", err);
        }
        bail!(
            "{} is missing {} required executable(s)",
            display.backend_name(),
            missing.len()
        );
    }

    display.start().with_context(|| {
        format!(
            "Failed to start {} on {}",
            display.backend_name(),
            display.display_name()
        )
    })?;
    info!(
        "Started {} on {} (PID {:?})",
        display.backend_name(),
        display.display_name(),
        display.pid()
    );

    if let Err(e) = display.wait_until_ready(config.ready_timeout_secs) {
        if display.kill().is_ok() {
            let _ = display.wait();
        }
        return Err(e)
            .with_context(|| format!("{} did not become ready", display.display_name()));
    }
    info!("{} is ready", display.display_name());
    println!("{}", display.display_name());

    let signal = signals
        .wait()
        .context("Failed waiting for a termination signal")?;
    info!("Received {}, stopping {}", signal, display.display_name());

    display
        .stop()
        .with_context(|| format!("Failed to stop {}", display.display_name()))?;
    let status = display
        .wait()
        .with_context(|| format!("Failed to reap {}", display.display_name()))?;
    info!("{} exited: {}", display.backend_name(), status);

    Ok(())
}

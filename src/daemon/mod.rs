//! Daemon module for ltr_hotkeyd.
//!
//! The daemon connects to the display server and the tracking engine,
//! grabs the configured hotkeys and runs until a Quit hotkey or a
//! termination signal. Grabs and the engine session are always released
//! on the way out.

mod event_loop;
mod init;

use std::time::Duration;

use tracing::{info, warn};

use crate::cli::Cli;
use crate::config::{self, HotkeyConfig};
use crate::dispatch::{ActionDispatcher, DaemonState};
use crate::display::DisplayServer;
use crate::display::x11::X11Display;
use crate::engine::{LinuxtrackClient, ReadinessPolicy, TrackingEngine, wait_until_ready};
use crate::error::DaemonError;
use crate::grab::GrabManager;

pub use event_loop::{DEFAULT_IDLE_INTERVAL, EventLoop};
pub use init::{init_logging, install_signal_handlers};

/// Timing knobs for a daemon session.
#[derive(Debug, Clone, Copy)]
pub struct DaemonOptions {
    pub readiness: ReadinessPolicy,
    pub idle_interval: Duration,
}

impl Default for DaemonOptions {
    fn default() -> Self {
        Self {
            readiness: ReadinessPolicy::default(),
            idle_interval: DEFAULT_IDLE_INTERVAL,
        }
    }
}

/// Run the hotkey daemon.
///
/// This is the main entry point. Any error returned is fatal and happens
/// before hotkeys are active.
pub fn run(cli: &Cli) -> Result<(), DaemonError> {
    init::init_logging(cli.verbose);
    for arg in &cli.ignored {
        warn!(arg = %arg, "Ignoring unrecognized argument");
    }
    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting global hotkey daemon"
    );

    let config = HotkeyConfig::load();
    for warning in config::validate_config(&config) {
        warn!("Config validation: {} - {}", warning.field, warning.message);
    }

    let mut state = DaemonState::new();
    init::install_signal_handlers(&state.shutdown_flag())?;

    let mut display = X11Display::connect()?;
    let mut engine = LinuxtrackClient::load()?;

    serve(
        &mut display,
        &mut engine,
        config,
        &mut state,
        &DaemonOptions::default(),
    )
}

/// Run a session against already-connected backends.
///
/// Initializes the engine, grabs the hotkeys, runs the event loop and
/// tears down exactly once. An engine init failure is returned before any
/// key is grabbed.
pub fn serve(
    display: &mut dyn DisplayServer,
    engine: &mut dyn TrackingEngine,
    config: HotkeyConfig,
    state: &mut DaemonState,
    options: &DaemonOptions,
) -> Result<(), DaemonError> {
    let initial = engine.init()?;
    let backend = display.name();
    info!(backend, state = %initial, "Connected to tracking engine");

    let ready = wait_until_ready(&*engine, &options.readiness);
    if !ready.is_tracking() {
        warn!("Tracker not running ({})", engine.explain(ready));
        warn!("Hotkeys will work once tracking starts.");
    }

    let mut registry = config.into_registry();
    let mut grabs = GrabManager::new();
    let summary = grabs.grab_all(&mut *display, &mut registry);
    if summary.resolved == 0 {
        warn!("No hotkey could be resolved; only signals will stop the daemon");
    }
    // Same-keysym pairs were already reported by config validation.
    for (winner, hidden) in registry.shadowed() {
        if winner.key != hidden.key {
            warn!(
                "'{}' ({}) is on the same key as '{}' ({}). Only {} will trigger.",
                hidden.accelerator(),
                hidden.display_name(),
                winner.accelerator(),
                winner.display_name(),
                winner.display_name()
            );
        }
    }

    info!("Ready. Hotkeys active.");
    for entry in registry.iter().filter(|e| e.is_active()) {
        info!(
            "  {:<13} {}",
            entry.binding.display_name(),
            entry.binding.accelerator()
        );
    }

    let result = {
        let mut dispatcher = ActionDispatcher::new(&mut *engine);
        EventLoop::new(&mut *display, &registry)
            .with_idle_interval(options.idle_interval)
            .run(&mut dispatcher, state)
    };

    info!("Shutting down...");
    grabs.release_all(&mut *display);
    if let Err(e) = engine.shutdown() {
        warn!("Engine shutdown failed: {}", e);
    }

    result.map(|_| ()).map_err(DaemonError::from)
}

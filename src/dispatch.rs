//! Turns matched hotkeys into tracking-engine calls.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use crate::engine::TrackingEngine;
use crate::hotkey::Action;

/// The daemon's own view of whether tracking is paused.
///
/// Only toggled by hotkeys; changes made in the tracker GUI are not seen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PauseState {
    #[default]
    Running,
    Paused,
}

/// Mutable daemon state shared by the event loop and the dispatcher.
#[derive(Debug, Default)]
pub struct DaemonState {
    shutdown: Arc<AtomicBool>,
    pause: PauseState,
}

impl DaemonState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an existing flag, typically one also set by signal handlers.
    pub fn with_shutdown_flag(shutdown: Arc<AtomicBool>) -> Self {
        Self {
            shutdown,
            pause: PauseState::Running,
        }
    }

    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    pub fn pause_state(&self) -> PauseState {
        self.pause
    }
}

/// Executes actions against a tracking engine.
pub struct ActionDispatcher<'a> {
    engine: &'a mut dyn TrackingEngine,
}

impl<'a> ActionDispatcher<'a> {
    pub fn new(engine: &'a mut dyn TrackingEngine) -> Self {
        Self { engine }
    }

    /// Perform one action.
    ///
    /// Engine failures are logged and otherwise ignored. The pause shadow
    /// flips even when the engine call fails, so the next press retries
    /// the opposite call.
    pub fn dispatch(&mut self, action: Action, state: &mut DaemonState) {
        match action {
            Action::Recenter => {
                debug!("Recentering");
                if let Err(e) = self.engine.recenter() {
                    debug!("Recenter failed: {}", e);
                }
            }
            Action::TogglePause => match state.pause {
                PauseState::Running => {
                    debug!("Pausing tracking");
                    if let Err(e) = self.engine.suspend() {
                        debug!("Suspend failed: {}", e);
                    }
                    state.pause = PauseState::Paused;
                }
                PauseState::Paused => {
                    debug!("Resuming tracking");
                    if let Err(e) = self.engine.wakeup() {
                        debug!("Wakeup failed: {}", e);
                    }
                    state.pause = PauseState::Running;
                }
            },
            Action::Quit => {
                debug!("Quit hotkey pressed");
                state.request_shutdown();
            }
        }
    }
}

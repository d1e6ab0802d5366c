//! Tracking-engine client abstraction.
//!
//! The daemon controls head tracking through a small client API. The
//! engine itself runs elsewhere (ltr_gui or ltr_server1); this module only
//! defines the calls the daemon makes and the states it can observe.

pub mod linuxtrack;

use std::fmt;
use std::time::Duration;

use crate::error::EngineError;

pub use linuxtrack::LinuxtrackClient;

/// State reported by the tracking engine.
///
/// Negative raw values are error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingState {
    Initializing,
    Running,
    Paused,
    Stopped,
    NotInitialized,
    SymbolLookup,
    NoConfig,
    NotFound,
    ProcessingFrame,
    Unknown(i32),
}

impl TrackingState {
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => TrackingState::Initializing,
            1 => TrackingState::Running,
            2 => TrackingState::Paused,
            3 => TrackingState::Stopped,
            -1 => TrackingState::NotInitialized,
            -2 => TrackingState::SymbolLookup,
            -3 => TrackingState::NoConfig,
            -4 => TrackingState::NotFound,
            -5 => TrackingState::ProcessingFrame,
            other => TrackingState::Unknown(other),
        }
    }

    pub fn is_error(&self) -> bool {
        match self {
            TrackingState::NotInitialized
            | TrackingState::SymbolLookup
            | TrackingState::NoConfig
            | TrackingState::NotFound
            | TrackingState::ProcessingFrame => true,
            TrackingState::Unknown(raw) => *raw < 0,
            _ => false,
        }
    }

    /// Whether the engine is delivering (or holding) poses.
    pub fn is_tracking(&self) -> bool {
        matches!(self, TrackingState::Running | TrackingState::Paused)
    }

    /// Human-readable explanation of the state.
    pub fn explain(&self) -> &'static str {
        match self {
            TrackingState::Initializing => "Linuxtrack is initializing.",
            TrackingState::Running => "Linuxtrack is running.",
            TrackingState::Paused => "Linuxtrack is paused.",
            TrackingState::Stopped => "Linuxtrack is stopped.",
            TrackingState::NotInitialized => {
                "Linuxtrack function was called without proper initialization."
            }
            TrackingState::SymbolLookup => {
                "Internal error (couldn't find function symbols in the Linuxtrack library)."
            }
            TrackingState::NoConfig => {
                "Linuxtrack config not found. If you have Linuxtrack installed, start ltr_gui, \
                 set up your tracking device and save the preferences."
            }
            TrackingState::NotFound => {
                "Linuxtrack was removed or relocated. If you relocated it, run ltr_gui from \
                 the new location, save preferences and try again."
            }
            TrackingState::ProcessingFrame => "Internal error (frame processing failed).",
            TrackingState::Unknown(_) => "Unknown tracking state.",
        }
    }
}

impl fmt::Display for TrackingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.explain())
    }
}

/// Calls the daemon makes against the tracking engine.
///
/// `init` precedes every other call and `shutdown` is the last one.
pub trait TrackingEngine {
    /// Connect to the engine. An error state is returned as `Err`.
    fn init(&mut self) -> Result<TrackingState, EngineError>;

    fn shutdown(&mut self) -> Result<(), EngineError>;

    /// Poll the current state. The engine never pushes updates.
    fn get_tracking_state(&self) -> TrackingState;

    fn recenter(&mut self) -> Result<(), EngineError>;

    fn suspend(&mut self) -> Result<(), EngineError>;

    fn wakeup(&mut self) -> Result<(), EngineError>;

    fn explain(&self, state: TrackingState) -> String {
        state.explain().to_string()
    }
}

/// How long to wait for the engine to start tracking at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessPolicy {
    pub attempts: u32,
    pub interval: Duration,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            attempts: 50,
            interval: Duration::from_millis(100),
        }
    }
}

/// Poll the engine until it is running or paused, or attempts run out.
///
/// The engine is polled at most `attempts` times (at least once), with
/// `interval` between polls. Returns the last observed state; the caller
/// decides whether to continue in degraded mode.
pub fn wait_until_ready(engine: &dyn TrackingEngine, policy: &ReadinessPolicy) -> TrackingState {
    let mut state = engine.get_tracking_state();
    for attempt in 1..policy.attempts {
        if state.is_tracking() {
            break;
        }
        tracing::trace!(attempt, %state, "Waiting for tracker");
        std::thread::sleep(policy.interval);
        state = engine.get_tracking_state();
    }
    state
}

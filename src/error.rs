//! Domain-specific error types for ltr_hotkeyd.
//!
//! Each subsystem gets its own error enum so callers can decide which
//! failures are fatal (display connection, engine init) and which only
//! disable a single binding or grab.

use thiserror::Error;

use crate::engine::TrackingState;

/// Errors produced while parsing an accelerator string such as `Ctrl+F12`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The accelerator string was empty or contained only separators.
    #[error("Empty key sequence")]
    Empty,

    /// The accelerator string exceeded the accepted length.
    #[error("Key sequence is too long ({len} bytes, maximum {max})")]
    TooLong { len: usize, max: usize },

    /// The key designator did not name any known key.
    #[error("Unknown key name '{0}'")]
    UnknownKey(String),
}

/// Errors talking to the display server.
#[derive(Error, Debug)]
pub enum DisplayError {
    /// Could not open a connection to the display server.
    #[error("Cannot open X display: {0}")]
    ConnectFailed(String),

    /// The connection broke while sending a request or reading an event.
    #[error("X connection error: {0}")]
    Connection(String),

    /// The server rejected a key grab (usually already grabbed elsewhere).
    #[error("Grab of keycode {keycode} with modifiers {modifiers:#x} rejected: {reason}")]
    GrabRejected {
        keycode: u8,
        modifiers: u16,
        reason: String,
    },

    /// Waiting on the connection file descriptor failed.
    #[error("Failed to wait for X events: {0}")]
    Poll(#[source] std::io::Error),
}

/// Errors from the tracking-engine client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The engine client library could not be loaded.
    #[error("Cannot load tracking library: {0}")]
    LibraryNotFound(String),

    /// A required entry point was missing from the client library.
    #[error("Tracking library is missing symbol '{0}'")]
    MissingSymbol(&'static str),

    /// Initialization reported an error state.
    #[error("Cannot initialize Linuxtrack: {}", .0.explain())]
    InitFailed(TrackingState),

    /// A control call returned a non-zero status.
    #[error("Engine call '{call}' failed with status {code}")]
    CallFailed { call: &'static str, code: i32 },
}

/// Fatal daemon startup errors.
///
/// These map to exit code 1.
#[derive(Error, Debug)]
pub enum DaemonError {
    /// No display server connection.
    #[error("{0}")]
    Display(#[from] DisplayError),

    /// The tracking engine could not be initialized.
    #[error("{0}")]
    Engine(#[from] EngineError),

    /// Signal handlers could not be installed.
    #[error("Failed to install signal handler: {0}")]
    Signal(#[source] std::io::Error),
}

impl DaemonError {
    /// Remediation hint printed after the error message.
    pub fn remediation(&self) -> Option<&'static str> {
        match self {
            DaemonError::Display(DisplayError::ConnectFailed(_)) => {
                Some("Wayland is not supported. Use X11 or XWayland.")
            }
            DaemonError::Engine(_) => {
                Some("Make sure ltr_gui is running or ltr_server1 is active.")
            }
            _ => None,
        }
    }
}

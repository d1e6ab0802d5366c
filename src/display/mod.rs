//! Display server abstraction for global key grabs.
//!
//! The daemon only needs a handful of operations from the display server:
//! key-code lookup, grabbing and releasing keys on the root window, and
//! reading key presses. [`x11::X11Display`] implements them over the X11
//! protocol; tests use a scripted mock.

pub mod x11;

use std::fmt;
use std::time::Duration;

use crate::error::DisplayError;
use crate::hotkey::{Modifier, ModifierSet, SymbolicKey};

/// A key press as reported by the display server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawKeyEvent {
    /// Physical key-code.
    pub keycode: u8,
    /// Modifier state, including lock-key bits.
    pub state: u16,
}

/// Events the daemon cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayEvent {
    KeyPress(RawKeyEvent),
    /// Anything else; ignored by the event loop.
    Other,
}

/// Native modifier bits of the connected display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModifierLayout {
    pub shift: u16,
    pub caps_lock: u16,
    pub control: u16,
    pub alt: u16,
    pub super_key: u16,
    pub num_lock: u16,
}

impl Default for ModifierLayout {
    /// The conventional X11 assignment: Alt on Mod1, NumLock on Mod2,
    /// Super on Mod4.
    fn default() -> Self {
        Self {
            shift: 1 << 0,
            caps_lock: 1 << 1,
            control: 1 << 2,
            alt: 1 << 3,
            num_lock: 1 << 4,
            super_key: 1 << 6,
        }
    }
}

impl ModifierLayout {
    /// Native bits for a modifier set.
    pub fn native_bits(&self, modifiers: ModifierSet) -> u16 {
        modifiers.iter().fold(0, |bits, m| {
            bits | match m {
                Modifier::Control => self.control,
                Modifier::Shift => self.shift,
                Modifier::Alt => self.alt,
                Modifier::Super => self.super_key,
            }
        })
    }

    /// Extra bits for each lock-key state a grab must cover:
    /// none, NumLock, CapsLock, both.
    pub fn lock_permutations(&self) -> [u16; 4] {
        [
            0,
            self.num_lock,
            self.caps_lock,
            self.num_lock | self.caps_lock,
        ]
    }

    /// Drop the lock-key bits and Shift from an event's modifier state.
    pub fn mask_event_state(&self, state: u16) -> u16 {
        state & !(self.num_lock | self.caps_lock | self.shift)
    }
}

/// Operations the daemon needs from a display server.
///
/// All calls happen on the daemon's single thread.
pub trait DisplayServer {
    /// Resolve a symbolic key to a native key-code.
    fn keycode_for(&self, key: SymbolicKey) -> Option<u8>;

    /// Native modifier bits for this display.
    fn modifier_layout(&self) -> ModifierLayout;

    /// Register a global grab for one key-code and exact modifier mask.
    fn grab_key(&mut self, keycode: u8, modifiers: u16) -> Result<(), DisplayError>;

    /// Release all grabs on a key-code, whatever the modifiers.
    fn ungrab_key(&mut self, keycode: u8) -> Result<(), DisplayError>;

    /// Wait up to `timeout` for the next event.
    ///
    /// Returns `Ok(None)` when nothing arrived in time.
    fn next_event(&mut self, timeout: Duration) -> Result<Option<DisplayEvent>, DisplayError>;

    /// Get the display backend name for logging/debugging.
    fn name(&self) -> &'static str;
}

impl fmt::Debug for dyn DisplayServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DisplayServer({})", self.name())
    }
}

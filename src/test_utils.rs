//! Test utilities and mock factories.
//!
//! Scripted stand-ins for the display server and the tracking engine.
//! Only compiled in test builds.

use std::cell::Cell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::display::{DisplayEvent, DisplayServer, ModifierLayout, RawKeyEvent};
use crate::engine::{TrackingEngine, TrackingState};
use crate::error::{DisplayError, EngineError};
use crate::hotkey::SymbolicKey;
use crate::hotkey::keysym::Keysym;

/// Idle polls a drained [`MockDisplay`] tolerates before failing.
const IDLE_LIMIT: usize = 8;

/// A display server that replays scripted events and records grabs.
#[derive(Debug, Default)]
pub struct MockDisplay {
    keycodes: HashMap<Keysym, u8>,
    layout: ModifierLayout,
    events: VecDeque<DisplayEvent>,
    grabs: Vec<(u8, u16)>,
    ungrabs: Vec<u8>,
    rejected: HashSet<(u8, u16)>,
    idle_polls: usize,
    signal_when_idle: Option<Arc<AtomicBool>>,
}

impl MockDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(mut self, keysym: Keysym, keycode: u8) -> Self {
        self.keycodes.insert(keysym, keycode);
        self
    }

    pub fn with_layout(mut self, layout: ModifierLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Make the server refuse one exact grab.
    pub fn reject_grab(mut self, keycode: u8, modifiers: u16) -> Self {
        self.rejected.insert((keycode, modifiers));
        self
    }

    /// Set `flag` the first time the event script runs dry, like a
    /// termination signal arriving while the daemon waits.
    pub fn signal_when_idle(mut self, flag: Arc<AtomicBool>) -> Self {
        self.signal_when_idle = Some(flag);
        self
    }

    pub fn push_key(&mut self, keycode: u8, state: u16) {
        self.events
            .push_back(DisplayEvent::KeyPress(RawKeyEvent { keycode, state }));
    }

    pub fn push_event(&mut self, event: DisplayEvent) {
        self.events.push_back(event);
    }

    /// Accepted grab masks for a key-code, in request order.
    pub fn grabs_for(&self, keycode: u8) -> Vec<u16> {
        self.grabs
            .iter()
            .filter(|(code, _)| *code == keycode)
            .map(|(_, mods)| *mods)
            .collect()
    }

    pub fn ungrabs(&self) -> &[u8] {
        &self.ungrabs
    }

    /// Grabs not yet released.
    pub fn active_grabs(&self) -> Vec<(u8, u16)> {
        self.grabs
            .iter()
            .filter(|(code, _)| !self.ungrabs.contains(code))
            .copied()
            .collect()
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }
}

impl DisplayServer for MockDisplay {
    fn keycode_for(&self, key: SymbolicKey) -> Option<u8> {
        self.keycodes.get(&key.keysym()).copied()
    }

    fn modifier_layout(&self) -> ModifierLayout {
        self.layout
    }

    fn grab_key(&mut self, keycode: u8, modifiers: u16) -> Result<(), DisplayError> {
        if self.rejected.contains(&(keycode, modifiers)) {
            return Err(DisplayError::GrabRejected {
                keycode,
                modifiers,
                reason: "BadAccess".to_string(),
            });
        }
        self.grabs.push((keycode, modifiers));
        Ok(())
    }

    fn ungrab_key(&mut self, keycode: u8) -> Result<(), DisplayError> {
        self.ungrabs.push(keycode);
        Ok(())
    }

    fn next_event(&mut self, _timeout: Duration) -> Result<Option<DisplayEvent>, DisplayError> {
        if let Some(event) = self.events.pop_front() {
            return Ok(Some(event));
        }

        if let Some(flag) = &self.signal_when_idle {
            flag.store(true, Ordering::SeqCst);
        }
        self.idle_polls += 1;
        if self.idle_polls > IDLE_LIMIT {
            return Err(DisplayError::Connection(
                "mock event script exhausted".to_string(),
            ));
        }
        Ok(None)
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Engine calls recorded by [`MockEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineCall {
    Init,
    Shutdown,
    Recenter,
    Suspend,
    Wakeup,
}

/// A tracking engine that replays scripted states and records calls.
#[derive(Debug)]
pub struct MockEngine {
    states: Vec<TrackingState>,
    polls: Cell<usize>,
    calls: Vec<EngineCall>,
    init_result: Result<TrackingState, EngineError>,
    failing_calls: bool,
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEngine {
    /// An engine that is already running.
    pub fn new() -> Self {
        Self::with_states(&[TrackingState::Running])
    }

    /// Report `states` in order, then keep repeating the last one.
    pub fn with_states(states: &[TrackingState]) -> Self {
        Self {
            states: states.to_vec(),
            polls: Cell::new(0),
            calls: Vec::new(),
            init_result: Ok(TrackingState::Initializing),
            failing_calls: false,
        }
    }

    /// Make `init` fail with the given state.
    pub fn failing_init(mut self, state: TrackingState) -> Self {
        self.init_result = Err(EngineError::InitFailed(state));
        self
    }

    /// Make recenter, suspend and wakeup return an error.
    pub fn with_failing_calls(mut self) -> Self {
        self.failing_calls = true;
        self
    }

    pub fn calls(&self) -> &[EngineCall] {
        &self.calls
    }

    pub fn count(&self, call: EngineCall) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }

    pub fn state_polls(&self) -> usize {
        self.polls.get()
    }

    fn record(&mut self, call: EngineCall, name: &'static str) -> Result<(), EngineError> {
        self.calls.push(call);
        if self.failing_calls {
            return Err(EngineError::CallFailed { call: name, code: -1 });
        }
        Ok(())
    }
}

impl TrackingEngine for MockEngine {
    fn init(&mut self) -> Result<TrackingState, EngineError> {
        self.calls.push(EngineCall::Init);
        self.init_result.clone()
    }

    fn shutdown(&mut self) -> Result<(), EngineError> {
        self.calls.push(EngineCall::Shutdown);
        Ok(())
    }

    fn get_tracking_state(&self) -> TrackingState {
        let index = self.polls.get();
        self.polls.set(index + 1);
        self.states
            .get(index)
            .or(self.states.last())
            .copied()
            .unwrap_or(TrackingState::Stopped)
    }

    fn recenter(&mut self) -> Result<(), EngineError> {
        self.record(EngineCall::Recenter, "recenter")
    }

    fn suspend(&mut self) -> Result<(), EngineError> {
        self.record(EngineCall::Suspend, "suspend")
    }

    fn wakeup(&mut self) -> Result<(), EngineError> {
        self.record(EngineCall::Wakeup, "wakeup")
    }
}

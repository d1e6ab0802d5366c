//! The daemon's single-threaded event loop.

use std::time::Duration;

use tracing::{debug, trace};

use crate::dispatch::{ActionDispatcher, DaemonState};
use crate::display::{DisplayEvent, DisplayServer, RawKeyEvent};
use crate::error::DisplayError;
use crate::hotkey::{Action, HotkeyRegistry};

/// Longest wait for an event before re-checking the shutdown flag.
pub const DEFAULT_IDLE_INTERVAL: Duration = Duration::from_millis(50);

/// Reads key presses and dispatches matching hotkeys until shutdown.
pub struct EventLoop<'a> {
    display: &'a mut dyn DisplayServer,
    registry: &'a HotkeyRegistry,
    idle_interval: Duration,
}

impl<'a> EventLoop<'a> {
    pub fn new(display: &'a mut dyn DisplayServer, registry: &'a HotkeyRegistry) -> Self {
        Self {
            display,
            registry,
            idle_interval: DEFAULT_IDLE_INTERVAL,
        }
    }

    pub fn with_idle_interval(mut self, idle_interval: Duration) -> Self {
        self.idle_interval = idle_interval;
        self
    }

    /// Run until a shutdown is requested by signal or by the Quit hotkey.
    ///
    /// Returns the number of actions dispatched. Teardown is left to the
    /// caller.
    pub fn run(
        &mut self,
        dispatcher: &mut ActionDispatcher<'_>,
        state: &mut DaemonState,
    ) -> Result<usize, DisplayError> {
        let mut dispatched = 0;

        while !state.is_shutdown_requested() {
            let Some(event) = self.display.next_event(self.idle_interval)? else {
                continue;
            };

            match event {
                DisplayEvent::KeyPress(key) => {
                    if let Some(action) = self.match_key(key) {
                        dispatcher.dispatch(action, state);
                        dispatched += 1;
                    }
                }
                DisplayEvent::Other => trace!("Ignoring non-key event"),
            }
        }

        debug!(dispatched, "Event loop finished");
        Ok(dispatched)
    }

    fn match_key(&self, key: RawKeyEvent) -> Option<Action> {
        let masked = self.display.modifier_layout().mask_event_state(key.state);
        let binding = self.registry.lookup(key.keycode, masked)?;
        debug!(
            hotkey = binding.display_name(),
            keycode = key.keycode,
            state = format_args!("{:#x}", key.state),
            "Hotkey pressed"
        );
        Some(binding.action)
    }
}

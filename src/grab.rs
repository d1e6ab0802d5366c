//! Global key grab management.
//!
//! Every binding is grabbed four times, once per NumLock/CapsLock
//! combination, so a hotkey fires whatever the lock keys are doing.
//! Grabs are a system-wide resource: everything grabbed here must be
//! released before the process exits or the key stays dead for other
//! applications.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::display::DisplayServer;
use crate::hotkey::HotkeyRegistry;

/// Outcome of registering all bindings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GrabSummary {
    /// Bindings whose key resolved to a key-code.
    pub resolved: usize,
    /// Individual grab requests accepted by the server.
    pub grabs_ok: usize,
    /// Individual grab requests rejected by the server.
    pub grabs_failed: usize,
}

/// Tracks which key-codes hold at least one grab.
#[derive(Debug, Default)]
pub struct GrabManager {
    grabbed: BTreeSet<u8>,
}

impl GrabManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve every binding and grab it with each lock-key permutation.
    ///
    /// Unresolvable keys and rejected grabs are logged and skipped.
    pub fn grab_all(
        &mut self,
        display: &mut dyn DisplayServer,
        registry: &mut HotkeyRegistry,
    ) -> GrabSummary {
        let layout = display.modifier_layout();
        let mut summary = GrabSummary::default();

        for entry in registry.iter_mut() {
            let binding = &entry.binding;
            let Some(keycode) = display.keycode_for(binding.key) else {
                warn!(
                    hotkey = binding.display_name(),
                    key = %binding.key,
                    "No keycode for keysym, hotkey disabled"
                );
                continue;
            };

            entry.keycode = Some(keycode);
            entry.match_modifiers = layout.native_bits(binding.modifiers.for_matching());
            summary.resolved += 1;

            let base = layout.native_bits(binding.modifiers);
            for (variant, lock_bits) in layout.lock_permutations().into_iter().enumerate() {
                match display.grab_key(keycode, base | lock_bits) {
                    Ok(()) => {
                        debug!(
                            hotkey = binding.display_name(),
                            keycode, variant, "Grabbed"
                        );
                        self.grabbed.insert(keycode);
                        summary.grabs_ok += 1;
                    }
                    Err(e) => {
                        warn!(
                            hotkey = binding.display_name(),
                            variant,
                            "Grab failed, binding may conflict with another application: {}",
                            e
                        );
                        summary.grabs_failed += 1;
                    }
                }
            }
        }

        summary
    }

    /// Release every grabbed key-code. Calling this again is a no-op.
    ///
    /// Returns the number of key-codes released.
    pub fn release_all(&mut self, display: &mut dyn DisplayServer) -> usize {
        let grabbed = std::mem::take(&mut self.grabbed);
        for &keycode in &grabbed {
            if let Err(e) = display.ungrab_key(keycode) {
                warn!(keycode, "Failed to release grab: {}", e);
            }
        }
        if !grabbed.is_empty() {
            debug!(count = grabbed.len(), "Released key grabs");
        }
        grabbed.len()
    }

    /// Key-codes currently holding a grab.
    pub fn grabbed_keycodes(&self) -> impl Iterator<Item = u8> + '_ {
        self.grabbed.iter().copied()
    }

    pub fn has_grabs(&self) -> bool {
        !self.grabbed.is_empty()
    }
}

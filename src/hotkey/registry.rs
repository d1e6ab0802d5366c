//! Ordered table of hotkey bindings.
//!
//! The registry is built once from the loaded configuration. The grab
//! manager later attaches a native key-code to every binding it could
//! resolve; bindings without a key-code never match.

use super::{Action, HotkeyBinding};

/// A binding plus the native data needed to match key presses against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredHotkey {
    pub binding: HotkeyBinding,
    /// Native key-code, once resolved by the grab manager.
    pub keycode: Option<u8>,
    /// Native modifier bits compared at match time (Shift excluded).
    pub match_modifiers: u16,
}

impl RegisteredHotkey {
    pub fn is_active(&self) -> bool {
        self.keycode.is_some()
    }
}

/// Hotkey bindings in slot order.
#[derive(Debug, Clone, Default)]
pub struct HotkeyRegistry {
    entries: Vec<RegisteredHotkey>,
}

impl HotkeyRegistry {
    pub fn new(bindings: impl IntoIterator<Item = HotkeyBinding>) -> Self {
        let entries = bindings
            .into_iter()
            .map(|binding| RegisteredHotkey {
                binding,
                keycode: None,
                match_modifiers: 0,
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredHotkey> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut RegisteredHotkey> {
        self.entries.iter_mut()
    }

    /// Binding for the given action slot.
    pub fn binding(&self, action: Action) -> Option<&HotkeyBinding> {
        self.entries
            .iter()
            .map(|e| &e.binding)
            .find(|b| b.action == action)
    }

    /// Find the first active binding matching a key press.
    ///
    /// `masked_modifiers` must already have the lock bits and Shift removed.
    pub fn lookup(&self, keycode: u8, masked_modifiers: u16) -> Option<&HotkeyBinding> {
        self.entries
            .iter()
            .find(|e| e.keycode == Some(keycode) && e.match_modifiers == masked_modifiers)
            .map(|e| &e.binding)
    }

    /// Number of bindings with a resolved key-code.
    pub fn active_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_active()).count()
    }

    /// Active bindings hidden by an earlier binding on the same key-code
    /// and match mask, as `(winner, shadowed)` pairs.
    ///
    /// Unlike config validation this compares native key-codes, so it also
    /// catches distinct keysyms that live on one physical key.
    pub fn shadowed(&self) -> Vec<(&HotkeyBinding, &HotkeyBinding)> {
        let mut pairs = Vec::new();
        for (i, later) in self.entries.iter().enumerate() {
            if !later.is_active() {
                continue;
            }
            if let Some(earlier) = self.entries[..i].iter().find(|earlier| {
                earlier.keycode == later.keycode && earlier.match_modifiers == later.match_modifiers
            }) {
                pairs.push((&earlier.binding, &later.binding));
            }
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hotkey::{Modifier, ModifierSet, SymbolicKey, keysym};

    fn registry_with_codes() -> HotkeyRegistry {
        let mut registry = HotkeyRegistry::new(Action::ALL.map(Action::default_binding));
        for entry in registry.iter_mut() {
            entry.keycode = match entry.binding.key.keysym() {
                keysym::XK_F12 => Some(96),
                keysym::XK_PAUSE => Some(127),
                _ => None,
            };
            if entry.binding.modifiers.contains(Modifier::Control) {
                entry.match_modifiers = 0x4;
            }
        }
        registry
    }

    #[test]
    fn test_lookup_by_keycode_and_modifiers() {
        let registry = registry_with_codes();
        assert_eq!(registry.lookup(96, 0).unwrap().action, Action::Recenter);
        assert_eq!(registry.lookup(96, 0x4).unwrap().action, Action::Quit);
        assert_eq!(registry.lookup(127, 0).unwrap().action, Action::TogglePause);
        assert!(registry.lookup(127, 0x8).is_none());
        assert!(registry.lookup(10, 0).is_none());
    }

    #[test]
    fn test_first_match_wins() {
        let mut registry = HotkeyRegistry::new([
            HotkeyBinding::new(SymbolicKey(keysym::XK_F12), ModifierSet::empty(), Action::Recenter),
            HotkeyBinding::new(SymbolicKey(keysym::XK_F12), ModifierSet::empty(), Action::Quit),
        ]);
        for entry in registry.iter_mut() {
            entry.keycode = Some(96);
        }
        assert_eq!(registry.lookup(96, 0).unwrap().action, Action::Recenter);
    }

    #[test]
    fn test_shadowed_by_shared_keycode() {
        let mut registry = HotkeyRegistry::new([
            HotkeyBinding::new(SymbolicKey(0x61), ModifierSet::empty(), Action::Recenter),
            HotkeyBinding::new(SymbolicKey(0x41), ModifierSet::empty(), Action::TogglePause),
            Action::Quit.default_binding(),
        ]);
        for entry in registry.iter_mut() {
            entry.keycode = Some(if entry.binding.action == Action::Quit { 96 } else { 38 });
        }

        let shadowed = registry.shadowed();
        assert_eq!(shadowed.len(), 1);
        assert_eq!(shadowed[0].0.action, Action::Recenter);
        assert_eq!(shadowed[0].1.action, Action::TogglePause);
    }

    #[test]
    fn test_default_registry_has_no_shadowing() {
        assert!(registry_with_codes().shadowed().is_empty());
    }

    #[test]
    fn test_unresolved_binding_never_matches() {
        let registry = HotkeyRegistry::new([Action::Recenter.default_binding()]);
        assert_eq!(registry.active_count(), 0);
        assert!(registry.lookup(0, 0).is_none());
    }

    #[test]
    fn test_binding_by_action() {
        let registry = registry_with_codes();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.active_count(), 3);
        assert_eq!(
            registry.binding(Action::Quit).unwrap().modifiers,
            ModifierSet::empty().with(Modifier::Control)
        );
    }
}

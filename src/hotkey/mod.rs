//! Hotkey data model: keys, modifier sets, actions and bindings.
//!
//! Bindings are platform independent. Keys are identified by X keysym
//! (layout independent); the mapping to physical key-codes happens later
//! in the grab manager.

pub mod keysym;
pub mod parser;
pub mod registry;

use std::fmt;

pub use keysym::Keysym;
pub use parser::parse_key_sequence;
pub use registry::{HotkeyRegistry, RegisteredHotkey};

/// A keyboard modifier that can be part of an accelerator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Control,
    Shift,
    Alt,
    Super,
}

impl Modifier {
    /// All modifiers in canonical display order.
    pub const ALL: [Modifier; 4] = [
        Modifier::Control,
        Modifier::Alt,
        Modifier::Shift,
        Modifier::Super,
    ];

    fn bit(self) -> u8 {
        match self {
            Modifier::Control => 1 << 0,
            Modifier::Shift => 1 << 1,
            Modifier::Alt => 1 << 2,
            Modifier::Super => 1 << 3,
        }
    }

    /// Match an accelerator token against the modifier aliases.
    pub fn from_alias(token: &str) -> Option<Self> {
        let lower = token.to_ascii_lowercase();
        match lower.as_str() {
            "ctrl" | "control" => Some(Modifier::Control),
            "shift" => Some(Modifier::Shift),
            "alt" => Some(Modifier::Alt),
            "meta" | "super" => Some(Modifier::Super),
            _ => None,
        }
    }

    /// Token used when rendering an accelerator.
    pub fn display_name(self) -> &'static str {
        match self {
            Modifier::Control => "Ctrl",
            Modifier::Shift => "Shift",
            Modifier::Alt => "Alt",
            Modifier::Super => "Meta",
        }
    }
}

/// A set of modifiers. Only membership matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModifierSet(u8);

impl ModifierSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn with(mut self, modifier: Modifier) -> Self {
        self.insert(modifier);
        self
    }

    pub fn insert(&mut self, modifier: Modifier) {
        self.0 |= modifier.bit();
    }

    pub fn remove(&mut self, modifier: Modifier) {
        self.0 &= !modifier.bit();
    }

    pub fn contains(&self, modifier: Modifier) -> bool {
        self.0 & modifier.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterate members in canonical display order.
    pub fn iter(&self) -> impl Iterator<Item = Modifier> + '_ {
        Modifier::ALL.into_iter().filter(|m| self.contains(*m))
    }

    /// The subset that participates in hotkey matching.
    ///
    /// Shift is never compared when matching a key press.
    pub fn for_matching(&self) -> Self {
        let mut set = *self;
        set.remove(Modifier::Shift);
        set
    }
}

impl FromIterator<Modifier> for ModifierSet {
    fn from_iter<I: IntoIterator<Item = Modifier>>(iter: I) -> Self {
        iter.into_iter()
            .fold(ModifierSet::empty(), |set, m| set.with(m))
    }
}

/// A layout-independent key identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolicKey(pub Keysym);

impl SymbolicKey {
    pub fn keysym(&self) -> Keysym {
        self.0
    }
}

impl fmt::Display for SymbolicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match keysym::name(self.0) {
            Some(name) => f.write_str(name),
            None => write!(f, "0x{:x}", self.0),
        }
    }
}

/// The fixed set of daemon actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Recenter,
    TogglePause,
    Quit,
}

impl Action {
    /// Slot order, which is also the match priority order.
    pub const ALL: [Action; 3] = [Action::Recenter, Action::TogglePause, Action::Quit];

    /// Human-readable name used in logs.
    pub fn display_name(self) -> &'static str {
        match self {
            Action::Recenter => "Recenter",
            Action::TogglePause => "Toggle Pause",
            Action::Quit => "Quit Daemon",
        }
    }

    /// Key of this slot in the configuration file.
    pub fn config_key(self) -> &'static str {
        match self {
            Action::Recenter => "recenter_key",
            Action::TogglePause => "pause_key",
            Action::Quit => "quit_key",
        }
    }

    pub fn from_config_key(key: &str) -> Option<Self> {
        Action::ALL.into_iter().find(|a| a.config_key() == key)
    }

    /// Compiled-in binding for this slot.
    pub fn default_binding(self) -> HotkeyBinding {
        match self {
            Action::Recenter => HotkeyBinding::new(
                SymbolicKey(keysym::XK_F12),
                ModifierSet::empty(),
                self,
            ),
            Action::TogglePause => HotkeyBinding::new(
                SymbolicKey(keysym::XK_PAUSE),
                ModifierSet::empty(),
                self,
            ),
            Action::Quit => HotkeyBinding::new(
                SymbolicKey(keysym::XK_F12),
                ModifierSet::empty().with(Modifier::Control),
                self,
            ),
        }
    }
}

/// A key plus modifiers bound to an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotkeyBinding {
    pub key: SymbolicKey,
    pub modifiers: ModifierSet,
    pub action: Action,
}

impl HotkeyBinding {
    pub fn new(key: SymbolicKey, modifiers: ModifierSet, action: Action) -> Self {
        Self {
            key,
            modifiers,
            action,
        }
    }

    pub fn display_name(&self) -> &'static str {
        self.action.display_name()
    }

    /// Canonical accelerator string, e.g. `Ctrl+Shift+F12`.
    ///
    /// Parsing the result yields the same key and modifiers.
    pub fn accelerator(&self) -> String {
        let mut parts: Vec<String> = self
            .modifiers
            .iter()
            .map(|m| m.display_name().to_string())
            .collect();
        parts.push(self.key.to_string());
        parts.join("+")
    }
}

impl fmt::Display for HotkeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.display_name(), self.accelerator())
    }
}

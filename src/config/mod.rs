//! Hotkey configuration.
//!
//! The configuration GUI stores one accelerator per action in
//! `~/.config/linuxtrack/ltr_hotkey_gui.conf` as plain `key=value` lines.
//! The daemon reads the file once at startup. Anything it cannot use is
//! skipped and the compiled-in default for that slot stays in place.

mod validation;

pub use validation::{ValidationWarning, validate_config};

use std::path::{Path, PathBuf};

use crate::hotkey::{Action, HotkeyBinding, HotkeyRegistry, parse_key_sequence};

/// Name of the configuration file inside the Linuxtrack config directory.
pub const CONFIG_FILE_NAME: &str = "ltr_hotkey_gui.conf";

/// Get the Linuxtrack config directory path.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("linuxtrack"))
}

/// Full path of the hotkey configuration file.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join(CONFIG_FILE_NAME))
}

/// The three hotkey slots, in match priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotkeyConfig {
    bindings: [HotkeyBinding; 3],
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            bindings: Action::ALL.map(Action::default_binding),
        }
    }
}

impl HotkeyConfig {
    /// Load from the per-user config file, falling back to defaults.
    pub fn load() -> Self {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => {
                tracing::debug!("Config directory not found, using defaults");
                Self::default()
            }
        }
    }

    /// Load from an explicit path.
    ///
    /// A missing or unreadable file yields the defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => {
                tracing::debug!("Loading config from {:?}", path);
                Self::parse(&content)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to read config file at {:?}: {}, using defaults",
                    path,
                    e
                );
                Self::default()
            }
        }
    }

    /// Apply every usable `key=value` line on top of the defaults.
    pub fn parse(content: &str) -> Self {
        let mut config = Self::default();

        for line in content.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let (key, value) = (key.trim(), value.trim());

            let Some(action) = Action::from_config_key(key) else {
                continue;
            };

            match parse_key_sequence(value) {
                Ok((key, modifiers)) => {
                    let binding = HotkeyBinding::new(key, modifiers, action);
                    tracing::debug!(
                        slot = action.config_key(),
                        accelerator = %binding.accelerator(),
                        keysym = format_args!("{:#x}", key.keysym()),
                        "Configured hotkey"
                    );
                    config.set(binding);
                }
                Err(e) => {
                    tracing::warn!(
                        slot = action.config_key(),
                        value,
                        "Ignoring hotkey: {}",
                        e
                    );
                }
            }
        }

        config
    }

    fn slot(action: Action) -> usize {
        match action {
            Action::Recenter => 0,
            Action::TogglePause => 1,
            Action::Quit => 2,
        }
    }

    /// Binding currently held by a slot.
    pub fn binding(&self, action: Action) -> &HotkeyBinding {
        &self.bindings[Self::slot(action)]
    }

    /// Overwrite the slot named by the binding's action.
    pub fn set(&mut self, binding: HotkeyBinding) {
        let slot = Self::slot(binding.action);
        self.bindings[slot] = binding;
    }

    pub fn bindings(&self) -> &[HotkeyBinding] {
        &self.bindings
    }

    /// Build the registry used by the event loop.
    pub fn into_registry(self) -> HotkeyRegistry {
        HotkeyRegistry::new(self.bindings)
    }
}

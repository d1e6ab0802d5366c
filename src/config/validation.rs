//! Configuration validation utilities.
//!
//! Produces warnings for bindings that load fine but will not behave the
//! way the user probably expects. None of these prevent startup.

use super::HotkeyConfig;
use crate::hotkey::Modifier;

/// Non-fatal validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    /// The config key that has an issue.
    pub field: String,
    /// A description of the issue.
    pub message: String,
}

/// Validate the loaded hotkeys, returning warnings for non-fatal issues.
///
/// This function checks for:
/// - Two slots that cannot be told apart when a key is pressed
/// - Bindings that rely on Shift, which is ignored when matching
///
/// Keys are compared by keysym. Distinct keysyms on one physical key
/// (such as `a` and `A`) are only detectable once key-codes are known;
/// see [`HotkeyRegistry::shadowed`](crate::hotkey::HotkeyRegistry::shadowed).
pub fn validate_config(config: &HotkeyConfig) -> Vec<ValidationWarning> {
    let mut warnings = vec![];
    let bindings = config.bindings();

    for (i, later) in bindings.iter().enumerate() {
        if let Some(earlier) = bindings[..i].iter().find(|earlier| {
            earlier.key == later.key
                && earlier.modifiers.for_matching() == later.modifiers.for_matching()
        }) {
            warnings.push(ValidationWarning {
                field: later.action.config_key().to_string(),
                message: format!(
                    "'{}' is indistinguishable from {} ('{}'). Only {} will trigger.",
                    later.accelerator(),
                    earlier.action.config_key(),
                    earlier.accelerator(),
                    earlier.action.display_name()
                ),
            });
        }
    }

    for binding in bindings {
        if binding.modifiers.contains(Modifier::Shift) {
            warnings.push(ValidationWarning {
                field: binding.action.config_key().to_string(),
                message: format!(
                    "'{}' uses Shift, which is ignored when matching key presses.",
                    binding.accelerator()
                ),
            });
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        let warnings = validate_config(&HotkeyConfig::default());
        // Default config should have no warnings
        assert!(warnings.is_empty(), "Warnings: {:?}", warnings);
    }

    #[test]
    fn test_validate_duplicate_bindings() {
        let config = HotkeyConfig::parse("pause_key=F12\n");
        let warnings = validate_config(&config);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field, "pause_key");
        assert!(warnings[0].message.contains("recenter_key"));
    }

    #[test]
    fn test_validate_shift_only_difference_is_duplicate() {
        let config = HotkeyConfig::parse("quit_key=Shift+F12\n");
        let warnings = validate_config(&config);
        assert!(
            warnings
                .iter()
                .any(|w| w.field == "quit_key" && w.message.contains("indistinguishable"))
        );
        assert!(
            warnings
                .iter()
                .any(|w| w.field == "quit_key" && w.message.contains("Shift"))
        );
    }

    #[test]
    fn test_validate_shift_with_other_modifier() {
        let config = HotkeyConfig::parse("quit_key=Ctrl+Shift+F12\n");
        let warnings = validate_config(&config);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field, "quit_key");
        assert!(warnings[0].message.contains("Shift"));
    }
}

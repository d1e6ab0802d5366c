//! Accelerator string parsing.
//!
//! Accelerators are written the way the configuration GUI stores them:
//! `+`-joined tokens such as `Ctrl+Shift+F12`. Modifier aliases add to the
//! modifier set; the **last** token is always taken as the key, even when it
//! is itself a modifier alias.

use super::keysym::{self, Keysym};
use super::{Modifier, ModifierSet, SymbolicKey};
use crate::error::ParseError;

/// Longest accepted accelerator string, in bytes.
pub const MAX_SEQUENCE_LEN: usize = 255;

/// Friendly key names accepted case-insensitively.
const NAMED_KEYS: &[(&str, Keysym)] = &[
    ("F1", keysym::XK_F1),
    ("F2", keysym::XK_F1 + 1),
    ("F3", keysym::XK_F1 + 2),
    ("F4", keysym::XK_F1 + 3),
    ("F5", keysym::XK_F1 + 4),
    ("F6", keysym::XK_F1 + 5),
    ("F7", keysym::XK_F1 + 6),
    ("F8", keysym::XK_F1 + 7),
    ("F9", keysym::XK_F1 + 8),
    ("F10", keysym::XK_F1 + 9),
    ("F11", keysym::XK_F1 + 10),
    ("F12", keysym::XK_F12),
    ("Pause", keysym::XK_PAUSE),
    ("Scroll_Lock", keysym::XK_SCROLL_LOCK),
    ("ScrollLock", keysym::XK_SCROLL_LOCK),
    ("Print", keysym::XK_PRINT),
    ("SysReq", keysym::XK_PRINT),
    ("Insert", keysym::XK_INSERT),
    ("Ins", keysym::XK_INSERT),
    ("Delete", keysym::XK_DELETE),
    ("Del", keysym::XK_DELETE),
    ("Home", keysym::XK_HOME),
    ("End", keysym::XK_END),
    ("Page_Up", keysym::XK_PAGE_UP),
    ("PgUp", keysym::XK_PAGE_UP),
    ("Page_Down", keysym::XK_PAGE_DOWN),
    ("PgDown", keysym::XK_PAGE_DOWN),
    ("Space", keysym::XK_SPACE),
    ("Escape", keysym::XK_ESCAPE),
    ("Esc", keysym::XK_ESCAPE),
    ("Return", keysym::XK_RETURN),
    ("Enter", keysym::XK_RETURN),
    ("Tab", keysym::XK_TAB),
    ("Backspace", keysym::XK_BACKSPACE),
];

/// Parse an accelerator string into a key and modifier set.
pub fn parse_key_sequence(sequence: &str) -> Result<(SymbolicKey, ModifierSet), ParseError> {
    if sequence.len() > MAX_SEQUENCE_LEN {
        return Err(ParseError::TooLong {
            len: sequence.len(),
            max: MAX_SEQUENCE_LEN,
        });
    }

    let mut modifiers = ModifierSet::empty();
    let mut last_token = None;

    for token in sequence.split('+').map(str::trim).filter(|t| !t.is_empty()) {
        if let Some(modifier) = Modifier::from_alias(token) {
            modifiers.insert(modifier);
        }
        last_token = Some(token);
    }

    let key_token = last_token.ok_or(ParseError::Empty)?;
    let keysym =
        resolve_key_name(key_token).ok_or_else(|| ParseError::UnknownKey(key_token.to_string()))?;

    Ok((SymbolicKey(keysym), modifiers))
}

/// Resolve a key token to a keysym.
///
/// Tries the friendly-name table, then single characters (as written, then
/// lowercased), then the raw X keysym name.
pub fn resolve_key_name(token: &str) -> Option<Keysym> {
    if let Some(&(_, value)) = NAMED_KEYS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(token))
    {
        return Some(value);
    }

    let mut chars = token.chars();
    if let (Some(c), None) = (chars.next(), chars.next())
        && c.is_ascii()
    {
        return keysym::from_name(token)
            .or_else(|| keysym::from_name(&c.to_ascii_lowercase().to_string()));
    }

    keysym::from_name(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hotkey::keysym::{XK_F12, XK_PAGE_UP, XK_PAUSE, XK_SPACE};
    use crate::hotkey::{Action, HotkeyBinding};

    fn mods(list: &[Modifier]) -> ModifierSet {
        list.iter().copied().collect()
    }

    #[test]
    fn test_parse_plain_key() {
        let (key, m) = parse_key_sequence("F12").unwrap();
        assert_eq!(key, SymbolicKey(XK_F12));
        assert!(m.is_empty());
    }

    #[test]
    fn test_parse_modifiers_case_insensitive() {
        let (key, m) = parse_key_sequence("ctrl+SHIFT+f12").unwrap();
        assert_eq!(key, SymbolicKey(XK_F12));
        assert_eq!(m, mods(&[Modifier::Control, Modifier::Shift]));

        let (_, m) = parse_key_sequence("Control+Alt+Meta+Pause").unwrap();
        assert_eq!(m, mods(&[Modifier::Control, Modifier::Alt, Modifier::Super]));
    }

    #[test]
    fn test_parse_trims_tokens() {
        let (key, m) = parse_key_sequence("  Ctrl +  Pause ").unwrap();
        assert_eq!(key, SymbolicKey(XK_PAUSE));
        assert_eq!(m, mods(&[Modifier::Control]));
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(parse_key_sequence("PgUp").unwrap().0, SymbolicKey(XK_PAGE_UP));
        assert_eq!(parse_key_sequence("prior").unwrap_err(), ParseError::UnknownKey("prior".into()));
        assert_eq!(parse_key_sequence("Prior").unwrap().0, SymbolicKey(XK_PAGE_UP));
        assert_eq!(parse_key_sequence("space").unwrap().0, SymbolicKey(XK_SPACE));
        assert_eq!(
            parse_key_sequence("SysReq").unwrap().0,
            parse_key_sequence("Print").unwrap().0
        );
    }

    #[test]
    fn test_parse_single_character() {
        assert_eq!(parse_key_sequence("Ctrl+a").unwrap().0, SymbolicKey(0x61));
        assert_eq!(parse_key_sequence("Ctrl+A").unwrap().0, SymbolicKey(0x41));
        assert_eq!(parse_key_sequence("5").unwrap().0, SymbolicKey(0x35));
        assert!(parse_key_sequence("Ctrl+;").is_err());
    }

    #[test]
    fn test_parse_raw_keysym_name() {
        assert_eq!(parse_key_sequence("Alt+KP_Enter").unwrap().0, SymbolicKey(0xff8d));
        assert_eq!(parse_key_sequence("semicolon").unwrap().0, SymbolicKey(0x3b));
    }

    #[test]
    fn test_last_token_is_always_the_key() {
        assert_eq!(
            parse_key_sequence("F12+Ctrl"),
            Err(ParseError::UnknownKey("Ctrl".into()))
        );
        // A lone modifier is treated as the key and does not resolve.
        assert!(parse_key_sequence("Shift").is_err());
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_key_sequence(""), Err(ParseError::Empty));
        assert_eq!(parse_key_sequence(" + + "), Err(ParseError::Empty));
        assert_eq!(
            parse_key_sequence("Ctrl+Nonsense"),
            Err(ParseError::UnknownKey("Nonsense".into()))
        );
        let long = format!("Ctrl+{}", "x".repeat(300));
        assert!(matches!(
            parse_key_sequence(&long),
            Err(ParseError::TooLong { max: MAX_SEQUENCE_LEN, .. })
        ));
    }

    #[test]
    fn test_parse_is_deterministic() {
        for seq in ["Ctrl+Shift+F12", "alt+meta+x", "Pause"] {
            assert_eq!(parse_key_sequence(seq), parse_key_sequence(seq));
        }
    }

    #[test]
    fn test_accelerator_round_trip() {
        let cases = [
            "Ctrl+Shift+F12",
            "Alt+Meta+Page_Down",
            "Shift+a",
            "Ctrl+A",
            "space",
            "Ctrl+Alt+Shift+Meta+KP_Add",
            "0x1008ff13",
        ];
        for seq in cases {
            let (key, modifiers) = parse_key_sequence(seq).unwrap();
            let binding = HotkeyBinding::new(key, modifiers, Action::Recenter);
            let reparsed = parse_key_sequence(&binding.accelerator()).unwrap();
            assert_eq!(reparsed, (key, modifiers), "round trip of {seq}");
        }
    }
}

//! X11 keysym names and values.
//!
//! x11rb speaks raw keysym numbers only, so the name table that Xlib
//! exposes through `XStringToKeysym` lives here. Values are from
//! `X11/keysymdef.h`. Lookups are case-sensitive, like Xlib's.

/// An X keysym value.
pub type Keysym = u32;

pub const XK_BACKSPACE: Keysym = 0xff08;
pub const XK_TAB: Keysym = 0xff09;
pub const XK_RETURN: Keysym = 0xff0d;
pub const XK_PAUSE: Keysym = 0xff13;
pub const XK_SCROLL_LOCK: Keysym = 0xff14;
pub const XK_ESCAPE: Keysym = 0xff1b;
pub const XK_HOME: Keysym = 0xff50;
pub const XK_PAGE_UP: Keysym = 0xff55;
pub const XK_PAGE_DOWN: Keysym = 0xff56;
pub const XK_END: Keysym = 0xff57;
pub const XK_PRINT: Keysym = 0xff61;
pub const XK_INSERT: Keysym = 0xff63;
pub const XK_NUM_LOCK: Keysym = 0xff7f;
pub const XK_F1: Keysym = 0xffbe;
pub const XK_F12: Keysym = 0xffc9;
pub const XK_DELETE: Keysym = 0xffff;
pub const XK_SPACE: Keysym = 0x0020;

/// Single-character keysyms whose name is the character itself.
const ALNUM: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Printable ASCII punctuation. The keysym value equals the code point.
const PUNCTUATION: &[(&str, Keysym)] = &[
    ("space", 0x20),
    ("exclam", 0x21),
    ("quotedbl", 0x22),
    ("numbersign", 0x23),
    ("dollar", 0x24),
    ("percent", 0x25),
    ("ampersand", 0x26),
    ("apostrophe", 0x27),
    ("parenleft", 0x28),
    ("parenright", 0x29),
    ("asterisk", 0x2a),
    ("plus", 0x2b),
    ("comma", 0x2c),
    ("minus", 0x2d),
    ("period", 0x2e),
    ("slash", 0x2f),
    ("colon", 0x3a),
    ("semicolon", 0x3b),
    ("less", 0x3c),
    ("equal", 0x3d),
    ("greater", 0x3e),
    ("question", 0x3f),
    ("at", 0x40),
    ("bracketleft", 0x5b),
    ("backslash", 0x5c),
    ("bracketright", 0x5d),
    ("asciicircum", 0x5e),
    ("underscore", 0x5f),
    ("grave", 0x60),
    ("braceleft", 0x7b),
    ("bar", 0x7c),
    ("braceright", 0x7d),
    ("asciitilde", 0x7e),
];

/// Function, editing, keypad and modifier keysyms.
///
/// When several names share a value the first one is canonical.
const SPECIAL: &[(&str, Keysym)] = &[
    ("BackSpace", XK_BACKSPACE),
    ("Tab", XK_TAB),
    ("Linefeed", 0xff0a),
    ("Clear", 0xff0b),
    ("Return", XK_RETURN),
    ("Pause", XK_PAUSE),
    ("Scroll_Lock", XK_SCROLL_LOCK),
    ("Sys_Req", 0xff15),
    ("Escape", XK_ESCAPE),
    ("Delete", XK_DELETE),
    ("Home", XK_HOME),
    ("Left", 0xff51),
    ("Up", 0xff52),
    ("Right", 0xff53),
    ("Down", 0xff54),
    ("Page_Up", XK_PAGE_UP),
    ("Prior", XK_PAGE_UP),
    ("Page_Down", XK_PAGE_DOWN),
    ("Next", XK_PAGE_DOWN),
    ("End", XK_END),
    ("Begin", 0xff58),
    ("Select", 0xff60),
    ("Print", XK_PRINT),
    ("Execute", 0xff62),
    ("Insert", XK_INSERT),
    ("Undo", 0xff65),
    ("Redo", 0xff66),
    ("Menu", 0xff67),
    ("Find", 0xff68),
    ("Cancel", 0xff69),
    ("Help", 0xff6a),
    ("Break", 0xff6b),
    ("Mode_switch", 0xff7e),
    ("Num_Lock", XK_NUM_LOCK),
    ("KP_Space", 0xff80),
    ("KP_Tab", 0xff89),
    ("KP_Enter", 0xff8d),
    ("KP_Home", 0xff95),
    ("KP_Left", 0xff96),
    ("KP_Up", 0xff97),
    ("KP_Right", 0xff98),
    ("KP_Down", 0xff99),
    ("KP_Page_Up", 0xff9a),
    ("KP_Prior", 0xff9a),
    ("KP_Page_Down", 0xff9b),
    ("KP_Next", 0xff9b),
    ("KP_End", 0xff9c),
    ("KP_Begin", 0xff9d),
    ("KP_Insert", 0xff9e),
    ("KP_Delete", 0xff9f),
    ("KP_Multiply", 0xffaa),
    ("KP_Add", 0xffab),
    ("KP_Separator", 0xffac),
    ("KP_Subtract", 0xffad),
    ("KP_Decimal", 0xffae),
    ("KP_Divide", 0xffaf),
    ("KP_0", 0xffb0),
    ("KP_1", 0xffb1),
    ("KP_2", 0xffb2),
    ("KP_3", 0xffb3),
    ("KP_4", 0xffb4),
    ("KP_5", 0xffb5),
    ("KP_6", 0xffb6),
    ("KP_7", 0xffb7),
    ("KP_8", 0xffb8),
    ("KP_9", 0xffb9),
    ("KP_Equal", 0xffbd),
    ("F1", XK_F1),
    ("F2", 0xffbf),
    ("F3", 0xffc0),
    ("F4", 0xffc1),
    ("F5", 0xffc2),
    ("F6", 0xffc3),
    ("F7", 0xffc4),
    ("F8", 0xffc5),
    ("F9", 0xffc6),
    ("F10", 0xffc7),
    ("F11", 0xffc8),
    ("F12", XK_F12),
    ("F13", 0xffca),
    ("F14", 0xffcb),
    ("F15", 0xffcc),
    ("F16", 0xffcd),
    ("F17", 0xffce),
    ("F18", 0xffcf),
    ("F19", 0xffd0),
    ("F20", 0xffd1),
    ("F21", 0xffd2),
    ("F22", 0xffd3),
    ("F23", 0xffd4),
    ("F24", 0xffd5),
    ("Shift_L", 0xffe1),
    ("Shift_R", 0xffe2),
    ("Control_L", 0xffe3),
    ("Control_R", 0xffe4),
    ("Caps_Lock", 0xffe5),
    ("Shift_Lock", 0xffe6),
    ("Meta_L", 0xffe7),
    ("Meta_R", 0xffe8),
    ("Alt_L", 0xffe9),
    ("Alt_R", 0xffea),
    ("Super_L", 0xffeb),
    ("Super_R", 0xffec),
    ("Hyper_L", 0xffed),
    ("Hyper_R", 0xffee),
    ("ISO_Level3_Shift", 0xfe03),
];

/// Look up a keysym by its X name.
///
/// Also accepts the `0x`-prefixed hexadecimal form that Xlib understands.
pub fn from_name(name: &str) -> Option<Keysym> {
    if name.len() == 1 && ALNUM.contains(name) {
        return name.bytes().next().map(Keysym::from);
    }

    if let Some(&(_, value)) = PUNCTUATION
        .iter()
        .chain(SPECIAL.iter())
        .find(|(n, _)| *n == name)
    {
        return Some(value);
    }

    name.strip_prefix("0x")
        .and_then(|hex| Keysym::from_str_radix(hex, 16).ok())
        .filter(|&value| value != 0)
}

/// Canonical X name for a keysym, if it is in the table.
pub fn name(keysym: Keysym) -> Option<&'static str> {
    if let Some(c) = char::from_u32(keysym)
        && c.is_ascii_alphanumeric()
    {
        let idx = ALNUM.find(c)?;
        return Some(&ALNUM[idx..idx + 1]);
    }

    PUNCTUATION
        .iter()
        .chain(SPECIAL.iter())
        .find(|(_, v)| *v == keysym)
        .map(|(n, _)| *n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_alphanumeric() {
        assert_eq!(from_name("a"), Some(0x61));
        assert_eq!(from_name("A"), Some(0x41));
        assert_eq!(from_name("7"), Some(0x37));
    }

    #[test]
    fn test_from_name_is_case_sensitive() {
        assert_eq!(from_name("F12"), Some(XK_F12));
        assert_eq!(from_name("f12"), None);
        assert_eq!(from_name("Page_Up"), Some(XK_PAGE_UP));
        assert_eq!(from_name("Prior"), Some(XK_PAGE_UP));
    }

    #[test]
    fn test_from_name_punctuation_needs_x_name() {
        assert_eq!(from_name("semicolon"), Some(0x3b));
        assert_eq!(from_name(";"), None);
    }

    #[test]
    fn test_from_name_hex() {
        assert_eq!(from_name("0xffc9"), Some(XK_F12));
        assert_eq!(from_name("0x0"), None);
        assert_eq!(from_name("0xzz"), None);
    }

    #[test]
    fn test_canonical_name() {
        assert_eq!(name(XK_F12), Some("F12"));
        assert_eq!(name(XK_PAGE_UP), Some("Page_Up"));
        assert_eq!(name(0x71), Some("q"));
        assert_eq!(name(XK_SPACE), Some("space"));
        assert_eq!(name(0x1234_5678), None);
    }

    #[test]
    fn test_every_special_name_resolves_back() {
        for (n, v) in SPECIAL.iter().chain(PUNCTUATION.iter()) {
            assert_eq!(from_name(n), Some(*v), "name {n}");
        }
    }
}

//! X11 implementation of [`DisplayServer`].
//!
//! Grabs are registered on the root window with `GrabKey`; key presses are
//! read from the connection. Waiting for events blocks in `poll(2)` on the
//! connection socket instead of sleeping between checks.

use std::os::fd::{AsRawFd, RawFd};
use std::time::Duration;

use x11rb::connection::Connection;
use x11rb::errors::{ConnectionError, ReplyError};
use x11rb::protocol::Event;
use x11rb::protocol::xproto::{ConnectionExt as _, GrabMode, ModMask, Window};
use x11rb::rust_connection::RustConnection;

use super::{DisplayEvent, DisplayServer, ModifierLayout, RawKeyEvent};
use crate::error::DisplayError;
use crate::hotkey::SymbolicKey;
use crate::hotkey::keysym::{self, Keysym};

const XK_ALT_L: Keysym = 0xffe9;
const XK_SUPER_L: Keysym = 0xffeb;

impl From<ConnectionError> for DisplayError {
    fn from(err: ConnectionError) -> Self {
        DisplayError::Connection(err.to_string())
    }
}

impl From<ReplyError> for DisplayError {
    fn from(err: ReplyError) -> Self {
        DisplayError::Connection(err.to_string())
    }
}

/// Snapshot of the server's key-code to keysym table.
#[derive(Debug, Clone, Default)]
pub struct KeyboardMap {
    min_keycode: u8,
    keysyms_per_keycode: usize,
    keysyms: Vec<Keysym>,
}

impl KeyboardMap {
    pub fn new(min_keycode: u8, keysyms_per_keycode: u8, keysyms: Vec<Keysym>) -> Self {
        Self {
            min_keycode,
            keysyms_per_keycode: usize::from(keysyms_per_keycode),
            keysyms,
        }
    }

    fn fetch(conn: &RustConnection) -> Result<Self, DisplayError> {
        let setup = conn.setup();
        let (min, max) = (setup.min_keycode, setup.max_keycode);
        if max < min {
            return Ok(Self::default());
        }

        let reply = conn.get_keyboard_mapping(min, max - min + 1)?.reply()?;
        Ok(Self::new(min, reply.keysyms_per_keycode, reply.keysyms))
    }

    /// Key-code producing `keysym`, scanning column 0 of every key-code
    /// before column 1, as `XKeysymToKeycode` does.
    pub fn keycode_for(&self, keysym: Keysym) -> Option<u8> {
        let per = self.keysyms_per_keycode;
        if per == 0 {
            return None;
        }

        let rows = self.keysyms.len() / per;
        let index = (0..per).find_map(|column| {
            (0..rows).find(|row| self.keysyms[row * per + column] == keysym)
        })?;
        u8::try_from(index)
            .ok()
            .and_then(|i| self.min_keycode.checked_add(i))
    }
}

impl ModifierLayout {
    /// Derive the layout from the server's modifier mapping.
    ///
    /// `keycodes` holds eight rows (Shift, Lock, Control, Mod1..Mod5) of
    /// `keycodes_per_modifier` entries each. NumLock, Alt and Super keep
    /// their conventional bits when their keys are not mapped.
    pub fn from_modifier_mapping(
        keycodes_per_modifier: usize,
        keycodes: &[u8],
        keymap: &KeyboardMap,
    ) -> Self {
        let mut layout = ModifierLayout::default();
        if keycodes_per_modifier == 0 {
            return layout;
        }

        let row_of = |keysym: Keysym| -> Option<u16> {
            let code = keymap.keycode_for(keysym)?;
            keycodes
                .chunks(keycodes_per_modifier)
                .take(8)
                .position(|row| row.contains(&code))
                .map(|row| 1 << row)
        };

        if let Some(bit) = row_of(keysym::XK_NUM_LOCK) {
            layout.num_lock = bit;
        }
        if let Some(bit) = row_of(XK_ALT_L) {
            layout.alt = bit;
        }
        if let Some(bit) = row_of(XK_SUPER_L) {
            layout.super_key = bit;
        }
        layout
    }

    fn fetch(conn: &RustConnection, keymap: &KeyboardMap) -> Result<Self, DisplayError> {
        let reply = conn.get_modifier_mapping()?.reply()?;
        Ok(Self::from_modifier_mapping(
            usize::from(reply.keycodes_per_modifier()),
            &reply.keycodes,
            keymap,
        ))
    }
}

/// A connection to the X server plus the data needed for grabs.
pub struct X11Display {
    conn: RustConnection,
    root: Window,
    keymap: KeyboardMap,
    layout: ModifierLayout,
}

impl X11Display {
    /// Connect to the display named by `$DISPLAY`.
    pub fn connect() -> Result<Self, DisplayError> {
        let (conn, screen_num) =
            x11rb::connect(None).map_err(|e| DisplayError::ConnectFailed(e.to_string()))?;
        let root = conn
            .setup()
            .roots
            .get(screen_num)
            .map(|screen| screen.root)
            .ok_or_else(|| DisplayError::ConnectFailed(format!("no screen {screen_num}")))?;

        let keymap = KeyboardMap::fetch(&conn)?;
        let layout = ModifierLayout::fetch(&conn, &keymap)?;

        tracing::debug!(
            screen = screen_num,
            num_lock = format_args!("{:#x}", layout.num_lock),
            alt = format_args!("{:#x}", layout.alt),
            super_key = format_args!("{:#x}", layout.super_key),
            "Connected to X11 display"
        );

        Ok(Self {
            conn,
            root,
            keymap,
            layout,
        })
    }

    fn raw_fd(&self) -> RawFd {
        self.conn.stream().as_raw_fd()
    }
}

impl DisplayServer for X11Display {
    fn keycode_for(&self, key: SymbolicKey) -> Option<u8> {
        self.keymap.keycode_for(key.keysym())
    }

    fn modifier_layout(&self) -> ModifierLayout {
        self.layout
    }

    fn grab_key(&mut self, keycode: u8, modifiers: u16) -> Result<(), DisplayError> {
        let cookie = self.conn.grab_key(
            true,
            self.root,
            ModMask::from(modifiers),
            keycode,
            GrabMode::ASYNC,
            GrabMode::ASYNC,
        )?;

        cookie.check().map_err(|e| DisplayError::GrabRejected {
            keycode,
            modifiers,
            reason: e.to_string(),
        })
    }

    fn ungrab_key(&mut self, keycode: u8) -> Result<(), DisplayError> {
        self.conn.ungrab_key(keycode, self.root, ModMask::ANY)?;
        self.conn.flush()?;
        Ok(())
    }

    fn next_event(&mut self, timeout: Duration) -> Result<Option<DisplayEvent>, DisplayError> {
        if let Some(event) = self.conn.poll_for_event()? {
            return Ok(Some(convert_event(event)));
        }

        self.conn.flush()?;
        if !wait_readable(self.raw_fd(), timeout)? {
            return Ok(None);
        }

        Ok(self.conn.poll_for_event()?.map(convert_event))
    }

    fn name(&self) -> &'static str {
        "X11"
    }
}

fn convert_event(event: Event) -> DisplayEvent {
    match event {
        Event::KeyPress(ev) => DisplayEvent::KeyPress(RawKeyEvent {
            keycode: ev.detail,
            state: u16::from(ev.state),
        }),
        Event::Error(e) => {
            tracing::debug!("X11 error event: {:?}", e);
            DisplayEvent::Other
        }
        _ => DisplayEvent::Other,
    }
}

/// Block until `fd` is readable or the timeout expires.
///
/// An interrupting signal counts as a timeout so the caller can re-check
/// its shutdown flag.
fn wait_readable(fd: RawFd, timeout: Duration) -> Result<bool, DisplayError> {
    let mut pfd = libc::pollfd {
        fd,
        events: libc::POLLIN,
        revents: 0,
    };
    let millis = libc::c_int::try_from(timeout.as_millis()).unwrap_or(libc::c_int::MAX);

    // SAFETY: `pfd` is a valid, exclusively borrowed pollfd and nfds is 1.
    let rc = unsafe { libc::poll(&mut pfd, 1, millis) };
    if rc < 0 {
        let err = std::io::Error::last_os_error();
        if err.kind() == std::io::ErrorKind::Interrupted {
            return Ok(false);
        }
        return Err(DisplayError::Poll(err));
    }
    Ok(rc > 0)
}

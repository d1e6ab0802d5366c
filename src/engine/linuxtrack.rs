//! Linuxtrack client loaded at runtime.
//!
//! The Linuxtrack client library is resolved with `dlopen` so the daemon
//! starts (and can explain what is wrong) even when Linuxtrack is missing
//! or installed under a non-standard prefix.

use std::ffi::{CStr, CString, c_char, c_int, c_void};
use std::path::{Path, PathBuf};

use super::{TrackingEngine, TrackingState};
use crate::error::EngineError;

/// Environment variable overriding the library location.
pub const LIBRARY_ENV: &str = "LINUXTRACK_LIB";

/// Preferences file written by ltr_gui, next to the hotkey config.
pub const PREFS_FILE_NAME: &str = "linuxtrack1.conf";

const LIBRARY_NAME: &str = "liblinuxtrack.so.0";

/// Library directory relative to the recorded prefix (the binary directory).
const PREFIX_LIBRARY_DIR: &str = "../lib/linuxtrack";

const LIBRARY_DIRS: &[&str] = &[
    "/usr/lib/linuxtrack",
    "/usr/local/lib/linuxtrack",
    "/opt/linuxtrack/lib/linuxtrack",
];

type InitFn = unsafe extern "C" fn(*const c_char) -> c_int;
type CallFn = unsafe extern "C" fn() -> c_int;

/// Full path of the Linuxtrack preferences file.
pub fn prefs_path() -> Option<PathBuf> {
    crate::config::config_dir().map(|p| p.join(PREFS_FILE_NAME))
}

/// Installation prefix recorded under `[Global]` as `Prefix`.
///
/// The file is INI-style; section and key names are case-sensitive and
/// values may be quoted.
pub fn install_prefix(prefs: &str) -> Option<PathBuf> {
    let mut in_global = false;
    for line in prefs.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if let Some(section) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            in_global = section.trim() == "Global";
            continue;
        }
        if !in_global {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        if key.trim() != "Prefix" {
            continue;
        }
        let value = value.trim().trim_matches('"').trim();
        if !value.is_empty() {
            return Some(PathBuf::from(value));
        }
    }
    None
}

/// Read the installation prefix from a preferences file.
///
/// A missing or unreadable file yields `None`.
pub fn install_prefix_from(path: &Path) -> Option<PathBuf> {
    match std::fs::read_to_string(path) {
        Ok(content) => install_prefix(&content),
        Err(e) => {
            tracing::debug!("No Linuxtrack preferences at {:?}: {}", path, e);
            None
        }
    }
}

/// Client library path under an installation prefix.
pub fn library_path_for_prefix(prefix: &Path) -> PathBuf {
    prefix.join(PREFIX_LIBRARY_DIR).join(LIBRARY_NAME)
}

/// Locations tried, in order, when loading the client library.
pub fn library_candidates() -> Vec<String> {
    let prefix = prefs_path().and_then(|path| install_prefix_from(&path));
    let env = std::env::var(LIBRARY_ENV).ok();
    candidates_with(env.as_deref(), prefix.as_deref())
}

/// `$LINUXTRACK_LIB`, then the recorded prefix, then the bare soname for
/// the dynamic linker's own search, then well-known directories.
fn candidates_with(env: Option<&str>, prefix: Option<&Path>) -> Vec<String> {
    let mut candidates = Vec::new();
    if let Some(path) = env.filter(|p| !p.is_empty()) {
        candidates.push(path.to_string());
    }
    if let Some(prefix) = prefix {
        candidates.push(library_path_for_prefix(prefix).to_string_lossy().into_owned());
    }
    candidates.push(LIBRARY_NAME.to_string());
    candidates.extend(
        LIBRARY_DIRS
            .iter()
            .map(|dir| format!("{dir}/{LIBRARY_NAME}")),
    );
    candidates
}

/// Handle to a loaded Linuxtrack client library.
pub struct LinuxtrackClient {
    handle: *mut c_void,
    path: String,
    init: InitFn,
    shutdown: CallFn,
    get_tracking_state: CallFn,
    recenter: CallFn,
    suspend: CallFn,
    wakeup: CallFn,
}

impl LinuxtrackClient {
    /// Load the first library candidate that opens and exports every entry point.
    pub fn load() -> Result<Self, EngineError> {
        let mut last_error = String::from("no candidates");
        for candidate in library_candidates() {
            match Self::open(&candidate) {
                Ok(client) => {
                    tracing::debug!(path = client.path(), "Loaded Linuxtrack client library");
                    return Ok(client);
                }
                Err(EngineError::LibraryNotFound(reason)) => {
                    tracing::trace!(candidate, %reason, "Library candidate rejected");
                    last_error = reason;
                }
                Err(e) => return Err(e),
            }
        }
        Err(EngineError::LibraryNotFound(last_error))
    }

    /// Open a specific library path.
    pub fn open(path: &str) -> Result<Self, EngineError> {
        let c_path =
            CString::new(path).map_err(|_| EngineError::LibraryNotFound(path.to_string()))?;

        // SAFETY: `c_path` is a valid NUL-terminated string for the duration of the call.
        let handle = unsafe { libc::dlopen(c_path.as_ptr(), libc::RTLD_NOW | libc::RTLD_LOCAL) };
        if handle.is_null() {
            return Err(EngineError::LibraryNotFound(last_dl_error()));
        }

        match Self::resolve(handle, path) {
            Ok(client) => Ok(client),
            Err(e) => {
                // SAFETY: `handle` came from a successful dlopen and is not used afterwards.
                unsafe { libc::dlclose(handle) };
                Err(e)
            }
        }
    }

    fn resolve(handle: *mut c_void, path: &str) -> Result<Self, EngineError> {
        let init = symbol(handle, c"ltr_init", "ltr_init")?;
        // SAFETY: every exported `ltr_*` entry point has the C signature named by
        // the target type; a non-null dlsym result is a valid function address.
        unsafe {
            Ok(Self {
                handle,
                path: path.to_string(),
                init: std::mem::transmute::<*mut c_void, InitFn>(init),
                shutdown: call_fn(symbol(handle, c"ltr_shutdown", "ltr_shutdown")?),
                get_tracking_state: call_fn(symbol(
                    handle,
                    c"ltr_get_tracking_state",
                    "ltr_get_tracking_state",
                )?),
                recenter: call_fn(symbol(handle, c"ltr_recenter", "ltr_recenter")?),
                suspend: call_fn(symbol(handle, c"ltr_suspend", "ltr_suspend")?),
                wakeup: call_fn(symbol(handle, c"ltr_wakeup", "ltr_wakeup")?),
            })
        }
    }

    /// Path the library was loaded from.
    pub fn path(&self) -> &str {
        &self.path
    }

    fn call(&self, name: &'static str, f: CallFn) -> Result<(), EngineError> {
        // SAFETY: `f` was resolved from the library held open by `self.handle`.
        let code = unsafe { f() };
        if code == 0 {
            Ok(())
        } else {
            Err(EngineError::CallFailed { call: name, code })
        }
    }
}

impl TrackingEngine for LinuxtrackClient {
    fn init(&mut self) -> Result<TrackingState, EngineError> {
        // SAFETY: a null section name selects the default profile.
        let raw = unsafe { (self.init)(std::ptr::null()) };
        let state = TrackingState::from_raw(raw);
        if state.is_error() {
            return Err(EngineError::InitFailed(state));
        }
        Ok(state)
    }

    fn shutdown(&mut self) -> Result<(), EngineError> {
        self.call("shutdown", self.shutdown)
    }

    fn get_tracking_state(&self) -> TrackingState {
        // SAFETY: resolved from the library held open by `self.handle`.
        TrackingState::from_raw(unsafe { (self.get_tracking_state)() })
    }

    fn recenter(&mut self) -> Result<(), EngineError> {
        self.call("recenter", self.recenter)
    }

    fn suspend(&mut self) -> Result<(), EngineError> {
        self.call("suspend", self.suspend)
    }

    fn wakeup(&mut self) -> Result<(), EngineError> {
        self.call("wakeup", self.wakeup)
    }
}

impl Drop for LinuxtrackClient {
    fn drop(&mut self) {
        // SAFETY: the handle is valid and none of the resolved functions are
        // reachable after drop.
        unsafe { libc::dlclose(self.handle) };
    }
}

fn symbol(
    handle: *mut c_void,
    c_name: &CStr,
    name: &'static str,
) -> Result<*mut c_void, EngineError> {
    // SAFETY: `handle` is a live dlopen handle and `c_name` is NUL-terminated.
    let ptr = unsafe { libc::dlsym(handle, c_name.as_ptr()) };
    if ptr.is_null() {
        return Err(EngineError::MissingSymbol(name));
    }
    Ok(ptr)
}

/// # Safety
/// `ptr` must be the address of a function with the `CallFn` signature.
unsafe fn call_fn(ptr: *mut c_void) -> CallFn {
    // SAFETY: guaranteed by the caller.
    unsafe { std::mem::transmute::<*mut c_void, CallFn>(ptr) }
}

fn last_dl_error() -> String {
    // SAFETY: dlerror returns either null or a NUL-terminated string owned by libc.
    let err = unsafe { libc::dlerror() };
    if err.is_null() {
        return "unknown dlopen error".to_string();
    }
    // SAFETY: checked non-null above; copied out before any further dl* call.
    unsafe { CStr::from_ptr(err) }.to_string_lossy().into_owned()
}

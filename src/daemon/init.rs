//! Daemon initialization functions.
//!
//! Handles setting up logging and termination signals.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use signal_hook::consts::{SIGINT, SIGTERM};
use tracing::debug;

use crate::error::DaemonError;

/// Default filter; `--verbose` raises it to debug.
fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "ltr_hotkeyd=debug"
    } else {
        "ltr_hotkeyd=info"
    }
}

/// Initialize the tracing subscriber for logging.
pub fn init_logging(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    // RUST_LOG wins over the verbosity flag
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    // try_init: a second call (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(filter)
        .try_init();
}

/// Route SIGINT and SIGTERM into the shutdown flag.
///
/// The handlers only store to the flag; all teardown happens on the main
/// thread once the event loop notices it.
pub fn install_signal_handlers(shutdown: &Arc<AtomicBool>) -> Result<(), DaemonError> {
    for signal in [SIGINT, SIGTERM] {
        signal_hook::flag::register(signal, Arc::clone(shutdown)).map_err(DaemonError::Signal)?;
    }
    debug!("Installed SIGINT/SIGTERM handlers");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_follows_verbosity() {
        assert_eq!(default_filter(false), "ltr_hotkeyd=info");
        assert_eq!(default_filter(true), "ltr_hotkeyd=debug");
    }

    #[test]
    fn test_sigterm_sets_shutdown_flag() {
        use std::sync::atomic::Ordering;

        let flag = Arc::new(AtomicBool::new(false));
        install_signal_handlers(&flag).unwrap();

        signal_hook::low_level::raise(SIGTERM).unwrap();
        assert!(flag.load(Ordering::SeqCst));
    }

    #[test]
    fn test_init_logging_twice_is_harmless() {
        init_logging(false);
        init_logging(true);
    }
}

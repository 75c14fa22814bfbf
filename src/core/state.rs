//! Process-wide interrupt state.
//!
//! The only global flag in the crate: `SHUTDOWN` is set by the Ctrl+C handler
//! and polled by the invoker and by `Cmd` while a child process runs.

use std::sync::atomic::{AtomicBool, Ordering};

/// Shutdown has been requested (Ctrl+C received)
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Setup the global Ctrl+C handler. Call once at program start
///
/// - First Ctrl+C: sets the SHUTDOWN flag, the running phase aborts and
///   cleans up its temporary state on the way out
/// - Second Ctrl+C: exits immediately
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        if SHUTDOWN.swap(true, Ordering::SeqCst) {
            std::process::exit(130);
        }
        crate::log!("abort"; "interrupt received, stopping...");
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Check if shutdown has been requested
///
/// Uses Relaxed ordering - worst case one more file is processed before stopping
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shutdown_defaults_off() {
        assert!(!is_shutdown());
    }
}

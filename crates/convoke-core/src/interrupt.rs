//! Process-wide interrupt and termination flags.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);
static TERMINATE: AtomicBool = AtomicBool::new(false);
static RESTORE_HOOK: OnceLock<Box<dyn Fn() + Send + Sync>> = OnceLock::new();

#[derive(Debug)]
pub struct InterruptedError;

impl std::fmt::Display for InterruptedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Interrupted")
    }
}

impl std::error::Error for InterruptedError {}

/// Initializes the Ctrl+C handler.
///
/// The handler sets an interrupt flag only; the frame loop polls it and
/// quits. SIGTERM and SIGHUP set the terminate flag.
///
/// Registration failures are logged and otherwise ignored: the TUI still
/// sees Ctrl+C as a key event in raw mode.
pub fn init() {
    if let Err(e) = ctrlc::set_handler(trigger_ctrl_c) {
        tracing::warn!("failed to install Ctrl+C handler: {e}");
    }

    #[cfg(unix)]
    {
        use signal_hook::consts::{SIGHUP, SIGTERM};

        for signal in [SIGTERM, SIGHUP] {
            // SAFETY: The closure only sets an AtomicBool, which is async-signal-safe.
            let registered = unsafe {
                signal_hook::low_level::register(signal, || {
                    TERMINATE.store(true, Ordering::SeqCst);
                })
            };
            if let Err(e) = registered {
                tracing::warn!(signal, "failed to register signal handler: {e}");
            }
        }
    }
}

/// Triggers an interrupt via Ctrl+C, force-exiting on a second Ctrl+C.
pub fn trigger_ctrl_c() {
    if INTERRUPTED.swap(true, Ordering::SeqCst) {
        // Second interrupt - force exit.
        // Restore terminal first since process::exit() bypasses Drop handlers.
        if let Some(hook) = RESTORE_HOOK.get() {
            hook();
        }
        std::process::exit(130);
    }
}

/// Checks if an interrupt has been requested.
pub fn is_interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

/// Checks if a terminate signal (SIGTERM/SIGHUP) was received.
pub fn should_terminate() -> bool {
    TERMINATE.load(Ordering::SeqCst)
}

/// Resets the interrupt flag.
pub fn reset() {
    INTERRUPTED.store(false, Ordering::SeqCst);
}

/// Registers a restore hook called on the second Ctrl+C before exit.
///
/// Used by the TUI to restore terminal state.
pub fn set_restore_hook<F>(hook: F)
where
    F: Fn() + Send + Sync + 'static,
{
    let _ = RESTORE_HOOK.set(Box::new(hook));
}

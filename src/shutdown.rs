//! Cancellation shared between the signal handlers and the frame loop.
//!
//! The signal handlers are the only writers (plus the emulator window's close
//! button); the frame loop polls between iterations.

use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use signal_hook::consts::{SIGINT, SIGTERM};

const NO_SIGNAL: usize = 0;

#[derive(Debug, Clone, Default)]
pub struct ShutdownToken {
    cancelled: Arc<AtomicBool>,
    signal: Arc<AtomicUsize>,
}

impl ShutdownToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route SIGINT and SIGTERM into this token.
    /// Repeated signals only set the flag again; cleanup stays with the frame loop's owner.
    pub fn register_signals(&self) -> io::Result<()> {
        for sig in [SIGINT, SIGTERM] {
            signal_hook::flag::register_usize(sig, Arc::clone(&self.signal), sig as usize)?;
            signal_hook::flag::register(sig, Arc::clone(&self.cancelled))?;
        }
        Ok(())
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// The last signal delivered, if cancellation came from one
    pub fn received_signal(&self) -> Option<i32> {
        match self.signal.load(Ordering::SeqCst) {
            NO_SIGNAL => None,
            sig => Some(sig as i32),
        }
    }
}

/// Human-readable name for the signals we handle
pub fn signal_name(signum: i32) -> String {
    match signum {
        SIGINT => "SIGINT".to_string(),
        SIGTERM => "SIGTERM".to_string(),
        other => format!("signal {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_is_shared_between_clones() {
        let token = ShutdownToken::new();
        let observer = token.clone();
        assert!(!observer.is_cancelled());
        token.cancel();
        assert!(observer.is_cancelled());
        assert_eq!(observer.received_signal(), None);
    }

    #[test]
    fn test_repeated_signal_keeps_process_alive() {
        let token = ShutdownToken::new();
        token.register_signals().unwrap();

        signal_hook::low_level::raise(SIGTERM).unwrap();
        assert!(token.is_cancelled());
        assert_eq!(token.received_signal(), Some(SIGTERM));

        signal_hook::low_level::raise(SIGTERM).unwrap();
        assert!(token.is_cancelled());
        assert_eq!(token.received_signal(), Some(SIGTERM));
    }

    #[test]
    fn test_signal_names() {
        assert_eq!(signal_name(SIGINT), "SIGINT");
        assert_eq!(signal_name(SIGTERM), "SIGTERM");
        assert_eq!(signal_name(99), "signal 99");
    }
}

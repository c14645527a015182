//! Single-flight guard for scheduled jobs
//!
//! A trigger arriving while a run is in progress is dropped, not queued.
//! The guard is an atomic compare-and-swap (Idle -> Running) paired with an
//! RAII token, so the flag clears on every exit path including errors and
//! panics. The brief race between two triggers both observing idle is
//! tolerated: the guarded jobs are idempotent on re-run.

use std::sync::atomic::{AtomicBool, Ordering};

/// Idle/Running flag admitting one run at a time
#[derive(Debug, Default)]
pub struct SingleFlight {
    running: AtomicBool,
}

impl SingleFlight {
    /// Create an idle flag
    pub const fn new() -> Self {
        Self {
            running: AtomicBool::new(false),
        }
    }

    /// Try to transition Idle -> Running.
    ///
    /// Returns a token on success; dropping the token transitions back to
    /// Idle. Returns `None` while another run holds the token.
    pub fn try_begin(&self) -> Option<RunToken<'_>> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(RunToken {
            flag: &self.running,
        })
    }

    /// True while a run holds the token
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

/// Token held for the duration of one run
#[derive(Debug)]
pub struct RunToken<'a> {
    flag: &'a AtomicBool,
}

impl Drop for RunToken<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_trigger_is_dropped_while_running() {
        let flag = SingleFlight::new();
        let token = flag.try_begin().expect("first trigger should run");
        assert!(flag.is_running());
        assert!(flag.try_begin().is_none());
        drop(token);
        assert!(!flag.is_running());
        assert!(flag.try_begin().is_some());
    }

    #[test]
    fn token_clears_the_flag_on_panic_unwind() {
        let flag = SingleFlight::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _token = flag.try_begin().unwrap();
            panic!("cycle failed");
        }));
        assert!(result.is_err());
        assert!(!flag.is_running());
    }
}

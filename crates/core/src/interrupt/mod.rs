use std::{
    sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError},
    time::{Duration, Instant},
};

use crate::Result;

/// Shared flag raised when the operator interrupts the show.
///
/// Waits performed through [`Interrupt::sleep`] wake up as soon as the flag
/// is raised, so cleanup never has to sit out the rest of a long cue.
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    shared: Arc<(Mutex<bool>, Condvar)>,
}

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a handle that is raised by the process Ctrl-C (SIGINT)
    /// handler. Only one such handler may be installed per process.
    ///
    /// A second Ctrl-C while the first is still being handled exits the
    /// process with status 130, so a run stuck in blocking IO can always be
    /// ended.
    pub fn install_ctrlc() -> Result<Self> {
        let interrupt = Self::new();
        let handler = interrupt.clone();
        ctrlc::set_handler(move || {
            if handler.trigger() {
                tracing::info!("interrupt received");
            } else {
                tracing::warn!("second interrupt received, exiting");
                std::process::exit(130);
            }
        })?;
        Ok(interrupt)
    }

    /// Raises the flag and wakes any sleeper. Returns `false` if the flag
    /// was already raised.
    pub fn trigger(&self) -> bool {
        let (flag, wake) = &*self.shared;
        let first = !std::mem::replace(&mut *lock(flag), true);
        wake.notify_all();
        first
    }

    pub fn is_triggered(&self) -> bool {
        *lock(&self.shared.0)
    }

    /// Blocks for `duration`. Returns `false` if the interrupt fired before
    /// the time was up.
    ///
    /// A duration too large to represent as a deadline waits until the
    /// interrupt fires.
    pub fn sleep(&self, duration: Duration) -> bool {
        let (flag, wake) = &*self.shared;
        let Some(deadline) = Instant::now().checked_add(duration) else {
            let _triggered = wake
                .wait_while(lock(flag), |triggered| !*triggered)
                .unwrap_or_else(PoisonError::into_inner);
            return false;
        };
        let mut triggered = lock(flag);

        while !*triggered {
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            triggered = wake
                .wait_timeout(triggered, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
        false
    }
}

fn lock(flag: &Mutex<bool>) -> MutexGuard<'_, bool> {
    flag.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn sleeps_for_requested_duration() {
        let interrupt = Interrupt::new();
        let started = Instant::now();

        assert!(interrupt.sleep(Duration::from_millis(150)));
        assert!(started.elapsed() >= Duration::from_millis(150));
    }

    #[test]
    fn trigger_wakes_a_sleeper() {
        let interrupt = Interrupt::new();
        let remote = interrupt.clone();
        let started = Instant::now();

        let trigger = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            remote.trigger();
        });

        assert!(!interrupt.sleep(Duration::from_secs(10)));
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(interrupt.is_triggered());
        trigger.join().unwrap();
    }

    #[test]
    fn sleep_after_trigger_returns_immediately() {
        let interrupt = Interrupt::new();
        interrupt.trigger();
        assert!(!interrupt.sleep(Duration::from_secs(10)));
    }

    #[test]
    fn second_trigger_reports_flag_already_raised() {
        let interrupt = Interrupt::new();
        assert!(interrupt.trigger());
        assert!(!interrupt.trigger());
        assert!(interrupt.clone().is_triggered());
    }

    #[test]
    fn unrepresentable_sleep_waits_for_trigger() {
        let interrupt = Interrupt::new();
        let remote = interrupt.clone();

        let trigger = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            remote.trigger();
        });

        assert!(!interrupt.sleep(Duration::MAX));
        trigger.join().unwrap();
    }

    #[test]
    fn zero_sleep_completes() {
        assert!(Interrupt::new().sleep(Duration::ZERO));
    }
}

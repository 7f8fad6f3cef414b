//! Wall-clock delays.
//!
//! Both the work step and the tick interval block the single thread. Going
//! through [`Pause`] lets tests run whole simulations without sleeping.

use std::time::Duration;

pub trait Pause {
    fn pause(&mut self, duration: Duration);
}

/// Blocks the current thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadPause;

impl Pause for ThreadPause {
    fn pause(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Returns immediately, keeping a tally of the time it was asked to wait.
#[derive(Debug, Default, Clone)]
pub struct NoPause {
    calls: usize,
    total: Duration,
}

impl NoPause {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls
    }

    pub fn total(&self) -> Duration {
        self.total
    }
}

impl Pause for NoPause {
    fn pause(&mut self, duration: Duration) {
        self.calls += 1;
        self.total += duration;
    }
}

impl<P: Pause + ?Sized> Pause for &mut P {
    fn pause(&mut self, duration: Duration) {
        (**self).pause(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_pause_accumulates() {
        let mut pause = NoPause::new();
        pause.pause(Duration::from_millis(200));
        pause.pause(Duration::from_millis(50));
        assert_eq!(pause.calls(), 2);
        assert_eq!(pause.total(), Duration::from_millis(250));
    }

    #[test]
    fn thread_pause_waits_at_least_the_duration() {
        let started = std::time::Instant::now();
        ThreadPause.pause(Duration::from_millis(5));
        assert!(started.elapsed() >= Duration::from_millis(5));
    }
}

//! Wall-clock timing of solver phases.

use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct InnerTimer {
    start: Option<Instant>,
    elapsed: Duration,
}

impl InnerTimer {
    fn start(&mut self) {
        self.start = Some(Instant::now());
    }

    fn stop(&mut self) {
        if let Some(instant) = self.start.take() {
            self.elapsed += instant.elapsed();
        }
    }
}

/// A flat collection of named phase timers.  Repeated start/stop cycles
/// on the same key accumulate.
#[derive(Debug, Default)]
pub struct Timers {
    timers: HashMap<&'static str, InnerTimer>,
}

impl Timers {
    pub fn reset(&mut self) {
        self.timers.clear();
    }

    pub fn start(&mut self, key: &'static str) {
        self.timers.entry(key).or_default().start();
    }

    pub fn stop(&mut self, key: &'static str) {
        if let Some(t) = self.timers.get_mut(key) {
            t.stop();
        }
    }

    /// Accumulated time on one phase, in seconds.  Zero for unknown keys.
    pub fn elapsed(&self, key: &'static str) -> f64 {
        self.timers
            .get(key)
            .map_or(0f64, |t| t.elapsed.as_secs_f64())
    }

    /// Total accumulated time across all phases, in seconds.
    pub fn total_time(&self) -> f64 {
        self.timers
            .values()
            .fold(Duration::ZERO, |acc, t| acc + t.elapsed)
            .as_secs_f64()
    }
}

macro_rules! timeit {
    ($timer:ident => $key:literal; $($tt:tt)+) => {
        $timer.start($key);
        $(
            $tt
        )+
        $timer.stop($key);
    }
}
pub(crate) use timeit;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_across_restarts() {
        let mut timers = Timers::default();
        timers.start("phase");
        timers.stop("phase");
        let once = timers.elapsed("phase");
        timers.start("phase");
        timers.stop("phase");
        assert!(timers.elapsed("phase") >= once);
    }

    #[test]
    fn test_unknown_key_is_zero() {
        let timers = Timers::default();
        assert_eq!(timers.elapsed("nope"), 0f64);
    }

    #[test]
    fn test_timeit_macro() {
        let mut timers = Timers::default();
        let mut x = 0;
        timeit! {timers => "work"; {
            x += 1;
        }}
        assert_eq!(x, 1);
        assert!(timers.total_time() >= 0f64);
    }
}

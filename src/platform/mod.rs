//! Platform abstraction layer
//!
//! The simulation only ever sees time and buttons through these traits:
//! - `Clock`: monotonic milliseconds plus a blocking sleep
//! - `InputSource`: level-triggered button state, sampled once per tick

use std::time::{Duration, Instant};

/// Physical buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Jump,
    Duck,
    Start,
}

/// Level-triggered button state
pub trait InputSource {
    fn is_pressed(&mut self, button: Button) -> bool;
}

/// Monotonic millisecond time source
pub trait Clock {
    fn now_ms(&self) -> u64;
    /// Block for `ms` milliseconds
    fn sleep_ms(&mut self, ms: u64);
}

/// Wall clock backed by `Instant`, starting at zero
#[derive(Debug, Clone)]
pub struct SystemClock {
    start: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    fn sleep_ms(&mut self, ms: u64) {
        std::thread::sleep(Duration::from_millis(ms));
    }
}

/// Clock that only moves when told to; sleeping advances it instantly
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: u64,
    /// Total time spent in `sleep_ms`
    pub slept_ms: u64,
}

impl ManualClock {
    pub fn new(now: u64) -> Self {
        Self { now, slept_ms: 0 }
    }

    pub fn advance(&mut self, ms: u64) {
        self.now += ms;
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now
    }

    fn sleep_ms(&mut self, ms: u64) {
        self.now += ms;
        self.slept_ms += ms;
    }
}

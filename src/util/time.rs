//! Tick pacing for the simulation thread

use std::time::{Duration, Instant};

/// Ticks per second requested by default
pub const DEFAULT_TICK_RATE: u32 = 120;

/// Longest delta handed to the simulation after a stall (seconds)
pub const MAX_TICK_DELTA: f32 = 0.25;

/// Fixed-rate pacer that reports the real elapsed time per tick
#[derive(Debug, Clone)]
pub struct TickClock {
    period: Duration,
    last: Instant,
    next: Instant,
}

impl TickClock {
    pub fn new(tick_rate: u32) -> Self {
        let period = Duration::from_secs_f64(1.0 / tick_rate.max(1) as f64);
        let now = Instant::now();
        Self {
            period,
            last: now,
            next: now + period,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Block until the next tick is due and return the measured delta in
    /// seconds. Ticks that were missed are skipped, not replayed.
    pub fn wait(&mut self) -> f32 {
        let now = Instant::now();
        if self.next > now {
            std::thread::sleep(self.next - now);
        }

        let now = Instant::now();
        let delta = now.duration_since(self.last).as_secs_f32();
        self.last = now;

        self.next += self.period;
        if self.next < now {
            self.next = now + self.period;
        }

        delta.min(MAX_TICK_DELTA)
    }
}

/// A simple timer for measuring durations
#[derive(Debug, Clone)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn elapsed_micros(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

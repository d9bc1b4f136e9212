// Timer policies for coalescing bursts of events.
// Callers pass `now` explicitly so the timing is testable without sleeping.

use std::time::{Duration, Instant};

// ──────────────────────────────────────────────
// Throttle (leading edge)
// ──────────────────────────────────────────────

/// Lets at most one event through per `interval`. The first event after a
/// quiet period fires immediately.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last_fired: Option<Instant>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fired: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns true and records `now` if the interval has elapsed since the last firing.
    pub fn try_fire(&mut self, now: Instant) -> bool {
        match self.last_fired {
            Some(last) if now.duration_since(last) < self.interval => false,
            _ => {
                self.last_fired = Some(now);
                true
            }
        }
    }

    pub fn reset(&mut self) {
        self.last_fired = None;
    }
}

// ──────────────────────────────────────────────
// Debounce (trailing edge)
// ──────────────────────────────────────────────

/// Fires once, `window` after the most recent `schedule` call.
/// Every new `schedule` pushes the deadline back.
#[derive(Debug, Clone)]
pub struct Debounce {
    window: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    pub fn new(window: Duration) -> Self {
        Self { window, deadline: None }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// True exactly once when `now` has reached the deadline.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

//! Periodic ticker used for fire-while-held auto-repeat.
//!
//! ## Usage
//!
//! 1) [`RepeatTimer::start`] with an interval, the current time and a tick callback.
//! 2) Call [`RepeatTimer::advance`] from the host's timer context; it invokes the
//!    callback once for every interval boundary crossed since the last call.
//! 3) [`RepeatTimer::stop`] drops the callback. Nothing fires after it returns.
//!
//! ```
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use std::sync::Arc;
//! use std::time::Duration;
//! use presskit_core::{RepeatTimer, Timestamp};
//!
//! let ticks = Arc::new(AtomicU32::new(0));
//! let counter = Arc::clone(&ticks);
//!
//! let mut timer = RepeatTimer::new();
//! timer.start(Duration::from_millis(100), Timestamp::ZERO, move || {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//! timer.advance(Timestamp::from_millis(250));
//! assert_eq!(ticks.load(Ordering::SeqCst), 2);
//!
//! timer.stop();
//! timer.advance(Timestamp::from_millis(1000));
//! assert_eq!(ticks.load(Ordering::SeqCst), 2);
//! ```

use crate::time::Timestamp;
use std::fmt;
use std::time::Duration;

/// Callback invoked on every tick.
pub type TickCallback = Box<dyn FnMut() + Send>;

/// A cancellable periodic ticker with a fixed interval.
///
/// One timer is meant to live as long as its owner and be started and
/// stopped repeatedly rather than recreated.
#[derive(Default)]
pub struct RepeatTimer {
    /// Interval between ticks
    interval: Duration,
    /// When the current run started
    started_at: Option<Timestamp>,
    /// Due time of the next tick
    next_tick: Option<Timestamp>,
    /// Number of ticks fired in the current run
    tick_count: u64,
    on_tick: Option<TickCallback>,
}

impl RepeatTimer {
    /// Create an inactive timer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start ticking every `interval` from `now`.
    ///
    /// Does nothing if the timer is already active. A zero interval starts
    /// the timer but never ticks.
    pub fn start<F>(&mut self, interval: Duration, now: Timestamp, on_tick: F)
    where
        F: FnMut() + Send + 'static,
    {
        if self.is_active() {
            return;
        }
        self.interval = interval;
        self.started_at = Some(now);
        self.next_tick = (!interval.is_zero()).then(|| now + interval);
        self.tick_count = 0;
        self.on_tick = Some(Box::new(on_tick));
    }

    /// Stop the timer. Idempotent.
    pub fn stop(&mut self) {
        self.started_at = None;
        self.next_tick = None;
        self.on_tick = None;
    }

    /// Check if the timer is running.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.started_at.is_some()
    }

    /// Time since the current run started, or `None` when inactive.
    #[must_use]
    pub fn elapsed(&self, now: Timestamp) -> Option<Duration> {
        self.started_at.map(|start| now - start)
    }

    /// Configured interval of the current (or last) run.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Ticks fired since the current run started.
    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Due time of the next tick, if any.
    #[must_use]
    pub const fn next_tick(&self) -> Option<Timestamp> {
        self.next_tick
    }

    /// Fire every tick due at or before `now` and return how many fired.
    pub fn advance(&mut self, now: Timestamp) -> u32 {
        let mut fired = 0;
        while let Some(due) = self.next_tick {
            if due > now {
                break;
            }
            self.next_tick = Some(due + self.interval);
            self.tick_count += 1;
            fired += 1;
            if let Some(on_tick) = self.on_tick.as_mut() {
                on_tick();
            }
        }
        fired
    }
}

impl fmt::Debug for RepeatTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepeatTimer")
            .field("interval", &self.interval)
            .field("started_at", &self.started_at)
            .field("next_tick", &self.next_tick)
            .field("tick_count", &self.tick_count)
            .field("has_callback", &self.on_tick.is_some())
            .finish()
    }
}

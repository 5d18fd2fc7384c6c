#![forbid(unsafe_code)]

//! Rate limiting for scroll-driven recomputation.
//!
//! Browsers can deliver dozens of scroll events per rendered frame. Without
//! coalescing, every one of them would trigger a full visibility pass.
//!
//! This module provides three primitives, all driven by a host clock so they
//! behave identically under test:
//! - [`FrameThrottle`]: at most one pending execution per rendering frame;
//!   later requests overwrite the pending value (latest wins).
//! - [`Throttle`]: leading edge, fires at most once per fixed interval.
//! - [`Debounce`]: trailing edge, fires once after input settles.
//!
//! # Usage
//!
//! ```
//! use folio_runtime::rate_limit::FrameThrottle;
//!
//! let mut throttle = FrameThrottle::new();
//! assert!(throttle.request(10.0));  // schedules a frame
//! assert!(!throttle.request(20.0)); // coalesced into the pending frame
//! assert_eq!(throttle.run_frame(), Some(20.0));
//! assert_eq!(throttle.run_frame(), None);
//! ```

use std::time::Duration;

/// Frame-aligned coalescer.
///
/// `request` returns `true` only for the call that scheduled a new frame, so
/// the host knows when to ask for one (`requestAnimationFrame`). Every later
/// request before the frame runs is folded into it.
#[derive(Debug, Clone)]
pub struct FrameThrottle<T> {
    pending: Option<T>,
    /// Requests folded into an already-pending frame.
    coalesced: u64,
    /// Frames that actually ran.
    executed: u64,
}

impl<T> FrameThrottle<T> {
    /// Create an idle throttle.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: None,
            coalesced: 0,
            executed: 0,
        }
    }

    /// Record `value` for the next frame.
    ///
    /// Returns `true` if this call scheduled the frame, `false` if a frame
    /// was already pending and `value` replaced its payload.
    pub fn request(&mut self, value: T) -> bool {
        let scheduled = self.pending.is_none();
        if !scheduled {
            self.coalesced = self.coalesced.saturating_add(1);
        }
        self.pending = Some(value);
        scheduled
    }

    /// `true` while a frame is scheduled and has not run.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the pending payload for this frame, if any.
    pub fn run_frame(&mut self) -> Option<T> {
        let value = self.pending.take()?;
        self.executed = self.executed.saturating_add(1);
        Some(value)
    }

    /// Drop the pending frame without running it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    #[must_use]
    pub const fn coalesced(&self) -> u64 {
        self.coalesced
    }

    #[must_use]
    pub const fn executed(&self) -> u64 {
        self.executed
    }
}

impl<T> Default for FrameThrottle<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Leading-edge throttle: fire at most once per `interval`.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    window_start: Option<Duration>,
}

impl Throttle {
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            window_start: None,
        }
    }

    /// Returns `true` if the call at `now` should fire.
    pub fn call(&mut self, now: Duration) -> bool {
        let open = match self.window_start {
            None => true,
            Some(start) => now >= start.saturating_add(self.interval),
        };
        if open {
            self.window_start = Some(now);
        }
        open
    }

    /// Forget the current window.
    pub fn reset(&mut self) {
        self.window_start = None;
    }

    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }
}

/// Trailing-edge debounce: fire once, `wait` after the last call.
#[derive(Debug, Clone)]
pub struct Debounce<T> {
    wait: Duration,
    pending: Option<(Duration, T)>,
}

impl<T> Debounce<T> {
    #[must_use]
    pub const fn new(wait: Duration) -> Self {
        Self {
            wait,
            pending: None,
        }
    }

    /// Record a call at `now`, replacing any pending value and restarting
    /// the quiet period.
    pub fn call(&mut self, now: Duration, value: T) {
        self.pending = Some((now.saturating_add(self.wait), value));
    }

    /// Fire if the quiet period has elapsed by `now`.
    pub fn poll(&mut self, now: Duration) -> Option<T> {
        let due = matches!(&self.pending, Some((deadline, _)) if now >= *deadline);
        if due {
            self.pending.take().map(|(_, v)| v)
        } else {
            None
        }
    }

    /// When the pending call will fire, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<Duration> {
        self.pending.as_ref().map(|(d, _)| *d)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

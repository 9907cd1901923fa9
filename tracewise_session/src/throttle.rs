// Copyright 2026 the Tracewise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coalescing of progress scans during a drag.

use std::time::{Duration, Instant};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Pending {
    due: Instant,
    generation: u64,
}

/// At most one pending progress scan, due one interval after it was requested.
///
/// Each pending scan remembers the session generation it was requested under
/// so the session can tell a scan for the current glyph from a stale one.
#[derive(Clone, Debug)]
pub struct ProgressThrottle {
    interval: Duration,
    pending: Option<Pending>,
}

impl ProgressThrottle {
    /// Creates an idle throttle.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            pending: None,
        }
    }

    /// Requests a scan for `generation`.
    ///
    /// Coalesces with a scan already pending for the same generation and
    /// replaces one left over from an older generation. Returns `true` if a new
    /// scan was scheduled.
    pub fn schedule(&mut self, now: Instant, generation: u64) -> bool {
        if self.pending.is_some_and(|p| p.generation == generation) {
            return false;
        }
        self.pending = Some(Pending {
            due: now + self.interval,
            generation,
        });
        true
    }

    /// Takes the pending scan if it is due at `now`, returning its generation.
    pub fn take_due(&mut self, now: Instant) -> Option<u64> {
        let pending = self.pending.filter(|p| p.due <= now)?;
        self.pending = None;
        Some(pending.generation)
    }

    /// Drops any pending scan.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// When the pending scan is due, for hosts that drive [`poll`](crate::TracingSession::poll) from a timer.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|p| p.due)
    }

    /// The coalescing interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn requests_coalesce_until_due() {
        let t0 = Instant::now();
        let mut throttle = ProgressThrottle::new(100 * MS);
        assert!(throttle.schedule(t0, 1));
        assert!(!throttle.schedule(t0 + 30 * MS, 1));
        assert!(!throttle.schedule(t0 + 60 * MS, 1));
        assert_eq!(throttle.deadline(), Some(t0 + 100 * MS));

        assert_eq!(throttle.take_due(t0 + 99 * MS), None);
        assert_eq!(throttle.take_due(t0 + 100 * MS), Some(1));
        assert_eq!(throttle.take_due(t0 + 500 * MS), None);
        assert!(throttle.schedule(t0 + 120 * MS, 1));
        assert_eq!(throttle.deadline(), Some(t0 + 220 * MS));
    }

    #[test]
    fn newer_generation_replaces_pending_scan() {
        let t0 = Instant::now();
        let mut throttle = ProgressThrottle::new(100 * MS);
        throttle.schedule(t0, 1);
        assert!(throttle.schedule(t0 + 50 * MS, 2));
        assert_eq!(throttle.take_due(t0 + 100 * MS), None);
        assert_eq!(throttle.take_due(t0 + 150 * MS), Some(2));
    }

    #[test]
    fn cancel_drops_pending_scan() {
        let t0 = Instant::now();
        let mut throttle = ProgressThrottle::new(100 * MS);
        throttle.schedule(t0, 7);
        throttle.cancel();
        assert_eq!(throttle.deadline(), None);
        assert_eq!(throttle.take_due(t0 + 200 * MS), None);
    }
}

//! Conversion from monotonic instants to seconds since the Unix epoch.

use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Pairs one monotonic instant with the wall-clock time at which it was taken.
///
/// Every other instant of the run is placed on the wall clock relative to that
/// pair, so reported timestamps stay mutually consistent even if the system
/// clock is adjusted mid-run.
#[derive(Debug, Clone, Copy)]
pub struct RunClock {
    origin: Instant,
    origin_epoch_secs: f64,
}

impl RunClock {
    pub fn start() -> Self {
        Self::anchored(Instant::now(), SystemTime::now())
    }

    pub fn anchored(origin: Instant, wall: SystemTime) -> Self {
        let origin_epoch_secs = wall
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or_default();
        Self {
            origin,
            origin_epoch_secs,
        }
    }

    pub fn origin(&self) -> Instant {
        self.origin
    }

    /// Seconds since the epoch for `at`.
    pub fn epoch_seconds(&self, at: Instant) -> f64 {
        match at.checked_duration_since(self.origin) {
            Some(after) => self.origin_epoch_secs + after.as_secs_f64(),
            None => self.origin_epoch_secs - self.origin.duration_since(at).as_secs_f64(),
        }
    }
}

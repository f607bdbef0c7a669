//! Clock Module
//!
//! Time source consumed by the store.
//!
//! The store never reads wall-clock time on its own. It asks its `Clock`
//! for the current `Instant`, which lets tests drive expiration by hand
//! and lets embedders plug in logical or scaled time.

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// A point in time, in whole seconds
///
/// Only ordering and addition of a TTL offset matter to the store; the
/// epoch is whatever the clock that produced it says it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Instant(i64);

impl Instant {
    /// Create an instant from raw seconds
    pub const fn from_secs(secs: i64) -> Self {
        Self(secs)
    }

    /// Raw seconds value
    pub const fn as_secs(self) -> i64 {
        self.0
    }

    /// Add a TTL offset, clamping at `i64::MAX`
    pub fn saturating_add_secs(self, secs: u32) -> Self {
        Self(self.0.saturating_add(i64::from(secs)))
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// Source of the current time
pub trait Clock {
    /// Current time according to this clock
    fn now(&self) -> Instant;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

// =============================================================================
// SystemClock
// =============================================================================

/// Wall clock: seconds since the UNIX epoch
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        // A system clock set before 1970 reads as the epoch itself
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Instant(i64::try_from(secs).unwrap_or(i64::MAX))
    }
}

// =============================================================================
// ManualClock
// =============================================================================

/// Clock that only moves when told to
///
/// Clones share the same time cell: hand one clone to the store and keep
/// another to advance time from the outside.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicI64>,
}

impl ManualClock {
    /// Create a manual clock starting at `start`
    pub fn new(start: Instant) -> Self {
        Self {
            now: Arc::new(AtomicI64::new(start.as_secs())),
        }
    }

    /// Move time forward by `secs`, returning the new time
    pub fn advance(&self, secs: u32) -> Instant {
        let delta = i64::from(secs);
        let previous = self
            .now
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |t| {
                Some(t.saturating_add(delta))
            })
            .unwrap_or_else(|t| t);
        Instant(previous.saturating_add(delta))
    }

    /// Jump to an arbitrary instant (may move backwards)
    pub fn set(&self, instant: Instant) {
        self.now.store(instant.as_secs(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        Instant(self.now.load(Ordering::SeqCst))
    }
}

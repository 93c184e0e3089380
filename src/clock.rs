//! Time sources for gesture timing.
//!
//! Detectors work in seconds as `f64`. Live capture uses [`SystemClock`];
//! recorded landmark streams and tests drive a [`ManualClock`] so that sample
//! timestamps and detector "now" agree exactly.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Timestamp in seconds
pub type Timestamp = f64;

/// A source of the current time in seconds
pub trait Clock: Send + Sync {
    /// Current time in seconds
    fn now(&self) -> Timestamp;
}

/// Clock handle shared between an analyzer and its owner
pub type SharedClock = Arc<dyn Clock>;

/// Monotonic wall clock measured from its creation
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    #[must_use]
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }

    /// Create a shared handle to a new system clock
    #[must_use]
    pub fn shared() -> SharedClock {
        Arc::new(Self::new())
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    bits: AtomicU64,
}

impl ManualClock {
    /// Create a manual clock reading `start` seconds
    #[must_use]
    pub fn new(start: Timestamp) -> Self {
        Self {
            bits: AtomicU64::new(start.to_bits()),
        }
    }

    /// Create a shared manual clock
    #[must_use]
    pub fn shared(start: Timestamp) -> Arc<Self> {
        Arc::new(Self::new(start))
    }

    /// Jump to an absolute time. Moving backwards is allowed.
    pub fn set(&self, time: Timestamp) {
        self.bits.store(time.to_bits(), Ordering::SeqCst);
    }

    /// Move forward by `dt` seconds
    pub fn advance(&self, dt: f64) {
        self.set(self.now() + dt);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        f64::from_bits(self.bits.load(Ordering::SeqCst))
    }
}

//! Time handling for the sampling loop
//!
//! The core works in integer milliseconds. Samples arrive stamped by the
//! ingest layer, so the only thing the core needs from a clock is a
//! monotone `now` for the live daemon and a controllable one for tests.

/// Timestamp in milliseconds since the Unix epoch (or since an arbitrary
/// origin for replayed data; only differences matter to the core).
pub type Timestamp = u64;

/// Source of timestamps for live ingestion
pub trait TimeSource {
    /// Get the current timestamp in milliseconds
    fn now(&self) -> Timestamp;
}

/// Wall-clock time source (requires std)
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTime;

#[cfg(feature = "std")]
impl TimeSource for SystemTime {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime as StdSystemTime, UNIX_EPOCH};

        StdSystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }
}

/// Fixed time source for tests
#[derive(Debug, Clone)]
pub struct FixedTime {
    timestamp: Timestamp,
}

impl FixedTime {
    /// Create a source pinned at `timestamp`
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }

    /// Pin the source to a new timestamp
    pub fn set(&mut self, timestamp: Timestamp) {
        self.timestamp = timestamp;
    }

    /// Advance the source by `ms` milliseconds
    pub fn advance(&mut self, ms: u64) {
        self.timestamp += ms;
    }
}

impl TimeSource for FixedTime {
    fn now(&self) -> Timestamp {
        self.timestamp
    }
}

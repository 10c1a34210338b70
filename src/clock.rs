//! Time source for claim issuance and expiry.
//!
//! Issuers read the clock once to stamp a default `date_expires`; verifiers
//! read it once per token. Nothing else in the crate calls `Utc::now()`
//! directly, so the whole issue/verify lifecycle can be replayed under a
//! [`MockClock`].

use chrono::{DateTime, Duration, Utc};

/// Source of the current instant for issuing and checking claims.
pub trait Clock: Send + Sync {
    /// Get the current UTC time.
    fn now_utc(&self) -> DateTime<Utc>;

    /// Instant a claim issued now with the given lifetime expires at.
    ///
    /// `None` when the result falls outside the representable calendar.
    fn expiry_after(&self, lifetime: Duration) -> Option<DateTime<Utc>> {
        self.now_utc().checked_add_signed(lifetime)
    }
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a chosen instant, moved only by [`MockClock::advance`].
#[cfg(any(test, feature = "test-seams"))]
#[derive(Debug, Clone)]
pub struct MockClock {
    now: DateTime<Utc>,
}

#[cfg(any(test, feature = "test-seams"))]
impl MockClock {
    /// Freeze the clock at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// Freeze the clock at an RFC 3339 instant, e.g. "2025-01-01T00:00:00Z".
    pub fn from_rfc3339(s: &str) -> Result<Self, chrono::ParseError> {
        Ok(Self {
            now: DateTime::parse_from_rfc3339(s)?.with_timezone(&Utc),
        })
    }

    /// Move the clock forward (or back, for a negative duration).
    pub fn advance(&mut self, duration: Duration) {
        self.now += duration;
    }
}

#[cfg(any(test, feature = "test-seams"))]
impl Clock for MockClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.now
    }
}

//! Brute-force lockout over a code's failure counters.

use chrono::{DateTime, Duration, Utc};

/// Consecutive failures that trigger a lock.
pub const LOCKOUT_THRESHOLD: i32 = 5;

/// Lock window in seconds once the threshold is reached.
pub const LOCKOUT_WINDOW_SECS: i64 = 1800;

/// Rate-limit counters colocated on the code record.
///
/// Pure value object: deciding whether a code is locked and what the
/// counters become after a failure or success never touches the store.
/// The store applies the results via its conditional-write path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Lockout {
    pub failed_attempts: i32,
    pub locked_until: Option<DateTime<Utc>>,
}

impl Lockout {
    /// True iff a lock window is set and still in the future.
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.locked_until.is_some_and(|until| until > now)
    }

    /// Counters after one more failed comparison.
    ///
    /// Reaching the threshold opens a lock window starting at `now`.
    pub fn after_failure(self, now: DateTime<Utc>) -> Self {
        let failed_attempts = self.failed_attempts + 1;
        let locked_until = if failed_attempts >= LOCKOUT_THRESHOLD {
            Some(now + Duration::seconds(LOCKOUT_WINDOW_SECS))
        } else {
            self.locked_until
        };
        Self {
            failed_attempts,
            locked_until,
        }
    }

    /// Counters after a successful comparison: both fields removed.
    pub fn after_success(self) -> Self {
        Self::default()
    }
}

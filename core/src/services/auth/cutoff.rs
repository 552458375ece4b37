//! Daily cutoff policy for one-time-code expiry.
//!
//! Codes do not live for a fixed duration; they all die at the same
//! wall-clock hour each day. A code requested one minute before the cutoff
//! is valid for one minute, a code requested one minute after it is valid
//! for almost a day.

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};

/// Computes the next daily cutoff instant for a deployment's wall clock
///
/// Pure function of its argument: the policy never reads the system clock
/// itself, which keeps expiry arithmetic testable at exact instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CutoffPolicy {
    cutoff_hour: u32,
    offset_seconds: i64,
}

impl CutoffPolicy {
    /// Create a policy for the given local cutoff hour and UTC offset
    ///
    /// Out-of-range inputs are clamped into the valid hour (0-23) and
    /// offset (-12..=+14 hours) ranges rather than rejected.
    pub fn new(cutoff_hour: u32, utc_offset_hours: i32) -> Self {
        Self {
            cutoff_hour: cutoff_hour.min(23),
            offset_seconds: i64::from(utc_offset_hours.clamp(-12, 14)) * 3600,
        }
    }

    /// The local hour of day at which codes expire
    pub fn cutoff_hour(&self) -> u32 {
        self.cutoff_hour
    }

    /// The first cutoff instant strictly after `now`
    ///
    /// Returns today's cutoff if `now` is before it in deployment-local
    /// terms, otherwise tomorrow's. At exactly the cutoff instant the next
    /// day's cutoff is returned, so a freshly issued code always has a
    /// strictly future expiry.
    pub fn next_cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let offset = Duration::seconds(self.offset_seconds);
        let local_now = (now + offset).naive_utc();

        let cutoff_time =
            NaiveTime::from_hms_opt(self.cutoff_hour, 0, 0).unwrap_or(NaiveTime::MIN);
        let today_cutoff = local_now.date().and_time(cutoff_time);

        let local_cutoff = if local_now < today_cutoff {
            today_cutoff
        } else {
            today_cutoff + Duration::days(1)
        };

        Utc.from_utc_datetime(&(local_cutoff - offset))
    }
}

impl Default for CutoffPolicy {
    fn default() -> Self {
        let auth = td_shared::config::AuthConfig::default();
        Self::new(auth.cutoff_hour, auth.utc_offset_hours)
    }
}

//! Periodic event calculator
//!
//! Pure time arithmetic for the rotating timers and the daily reset header.
//! An event anchored at `anchor` with period `period_days` occurs at every
//! `anchor + k * period_days` (k >= 0). Occurrence steps are computed with
//! integer division so an anchor arbitrarily far in the past costs the same
//! as a recent one.
//!
//! Boundary conventions, fixed here so every caller agrees:
//! - `next_occurrence` is strictly after `now` (an occurrence happening at
//!   exactly `now` reports the following one).
//! - A presence window is inclusive at its start and exclusive at its end:
//!   `[occurrence, occurrence + presence_hours)`.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::Serialize;

use crate::catalog::RotatingTimer;

/// Smallest `anchor + k * period_days` (k >= 0) strictly greater than `now`
///
/// `period_days` must be positive; the catalog rejects anything else before
/// this runs.
pub fn next_occurrence(
    anchor: DateTime<Utc>,
    period_days: i64,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    assert!(period_days > 0, "period_days must be positive");
    if now < anchor {
        return anchor;
    }
    let period_secs = period_days * 86_400;
    let elapsed = (now - anchor).num_seconds();
    let k = elapsed.div_euclid(period_secs) + 1;
    anchor + Duration::seconds(k * period_secs)
}

/// The occurrence at or before `now`: one period before the next one
pub fn last_occurrence(
    anchor: DateTime<Utc>,
    period_days: i64,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    next_occurrence(anchor, period_days, now) - Duration::days(period_days)
}

/// True iff `now` falls inside the presence window of the latest occurrence
pub fn is_present(
    anchor: DateTime<Utc>,
    period_days: i64,
    presence_hours: i64,
    now: DateTime<Utc>,
) -> bool {
    let opened = last_occurrence(anchor, period_days, now);
    let closes = opened + Duration::hours(presence_hours);
    opened <= now && now < closes
}

/// Whole days and hours remaining until `target`, clamped at zero
///
/// The clamp guards against clock skew rendering a negative countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Countdown {
    pub days: i64,
    pub hours: i64,
}

pub fn countdown(now: DateTime<Utc>, target: DateTime<Utc>) -> Countdown {
    if target <= now {
        return Countdown { days: 0, hours: 0 };
    }
    let secs = (target - now).num_seconds();
    Countdown {
        days: secs / 86_400,
        hours: (secs % 86_400) / 3_600,
    }
}

/// Next UTC midnight strictly after `now` (the daily reset boundary)
pub fn next_daily_reset(now: DateTime<Utc>) -> DateTime<Utc> {
    (now + Duration::days(1))
        .date_naive()
        .and_time(NaiveTime::MIN)
        .and_utc()
}

/// Fractional hours until the daily reset, for the header line
pub fn hours_until_daily_reset(now: DateTime<Utc>) -> f64 {
    (next_daily_reset(now) - now).num_seconds() as f64 / 3_600.0
}

/// Snapshot of one rotating timer's schedule at a given instant
#[derive(Debug, Clone, Serialize)]
pub struct TimerReading {
    pub id: String,
    pub present: bool,
    pub next: DateTime<Utc>,
    pub countdown: Countdown,
}

/// Compute the current reading for a rotating timer
pub fn read_timer(timer: &RotatingTimer, now: DateTime<Utc>) -> TimerReading {
    let next = next_occurrence(timer.anchor, timer.period_days, now);
    TimerReading {
        id: timer.id.clone(),
        present: is_present(timer.anchor, timer.period_days, timer.presence_hours, now),
        next,
        countdown: countdown(now, next),
    }
}

//! Reset reconciliation
//!
//! Decides, from the persisted last-reconciled timestamp and the current
//! time, which tiers of completion flags must be cleared. The daily boundary
//! is "the UTC date changed", not "24 hours elapsed", so the reset lands at a
//! fixed wall-clock instant no matter how long the process slept, and
//! repeated polling within the same day is a no-op. The weekly reset
//! piggybacks on the daily check: a week boundary is detected only when a day
//! boundary is detected on the designated reset weekday, which keeps the
//! ledger down to a single field.
//!
//! Rotating timers are never touched here; their cycles do not align with
//! day or week boundaries.

use chrono::{DateTime, Datelike, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// Default weekly reset boundary
pub const DEFAULT_WEEKLY_RESET_DAY: Weekday = Weekday::Sun;

/// Persisted reconciliation watermark
///
/// `None` means the tracker has never reconciled (first run), which is
/// treated explicitly as "reset required".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetLedger {
    pub last_reconciled: Option<DateTime<Utc>>,
}

impl ResetLedger {
    pub fn new(last_reconciled: Option<DateTime<Utc>>) -> Self {
        Self { last_reconciled }
    }

    /// Advance the watermark after applying reset actions
    pub fn advance(&mut self, now: DateTime<Utc>) {
        self.last_reconciled = Some(now);
    }
}

/// What the caller must clear after a reconcile pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResetActions {
    pub clear_daily: bool,
    pub clear_weekly: bool,
}

impl ResetActions {
    pub fn any(&self) -> bool {
        self.clear_daily || self.clear_weekly
    }
}

/// Pure boundary check: which tiers crossed their reset since the ledger
///
/// The caller is responsible for applying the actions to the state store and
/// advancing the ledger afterwards; reconcile itself has no hidden state.
pub fn reconcile(ledger: &ResetLedger, now: DateTime<Utc>, reset_day: Weekday) -> ResetActions {
    let clear_daily = match ledger.last_reconciled {
        None => true,
        Some(last) => last.date_naive() < now.date_naive(),
    };
    let clear_weekly = clear_daily && now.weekday() == reset_day;
    ResetActions {
        clear_daily,
        clear_weekly,
    }
}

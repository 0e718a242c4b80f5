//! Tracker facade
//!
//! Composition root tying the catalog, state store, and reset ledger
//! together behind the command surface the CLI and TUI bind to. The tracker
//! owns all mutable state explicitly; presentation pulls a render model on
//! each tick instead of being pushed into.

use chrono::{DateTime, Utc, Weekday};
use serde::Serialize;

use crate::catalog::{Catalog, Tier, TierGroup};
use crate::config::Config;
use crate::error::Result;
use crate::reconcile::{self, ResetActions, ResetLedger};
use crate::schedule::{self, Countdown};
use crate::state::{Row, TaskStore};
use crate::storage::Storage;

/// The assembled checklist core
pub struct Tracker {
    catalog: Catalog,
    store: TaskStore,
    ledger: ResetLedger,
    reset_weekday: Weekday,
}

impl Tracker {
    /// Load configuration and persisted state from storage
    pub fn open(storage: &Storage) -> Result<Self> {
        let config = Config::load_from_storage(storage)?;
        Self::with_config(storage, &config)
    }

    /// Assemble a tracker from an explicit configuration
    pub fn with_config(storage: &Storage, config: &Config) -> Result<Self> {
        let catalog = match config.timer_overrides() {
            Some(timers) => Catalog::with_timers(timers),
            None => Catalog::builtin(),
        };
        catalog.validate()?;

        let mut store = TaskStore::new(&catalog);
        let ledger = store.apply_snapshot(&storage.load_snapshot());

        Ok(Self {
            catalog,
            store,
            ledger,
            reset_weekday: config.reset_weekday()?,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn ledger(&self) -> &ResetLedger {
        &self.ledger
    }

    // =========================================================================
    // Command surface
    // =========================================================================

    pub fn toggle_visibility(&mut self, id: &str) -> Result<bool> {
        self.store.toggle_visibility(id)
    }

    pub fn set_visible(&mut self, id: &str, visible: bool) -> Result<()> {
        self.store.set_visible(id, visible)
    }

    pub fn toggle_selection(&mut self, id: &str) -> Result<bool> {
        self.store.toggle_selection(id)
    }

    /// Complete every visible selected task; returns the committed ids
    pub fn complete_checked(&mut self) -> Vec<String> {
        self.store.commit_selected()
    }

    /// Complete one task by id; returns false when the task is hidden
    pub fn complete_task(&mut self, id: &str) -> Result<bool> {
        self.store.complete(id)
    }

    /// Manual reset of all visible tasks
    pub fn reset_all(&mut self) {
        self.store.reset_all_visible();
    }

    /// Explicit tier reset, as the simulate buttons did in the original
    pub fn simulate_tier_reset(&mut self, group: TierGroup) {
        self.store.reset_group(&self.catalog, group);
    }

    /// Run the reconciler for `now` and apply whatever it decides
    ///
    /// Idempotent under repeated polling: once the ledger is advanced,
    /// calling again with the same `now` is a no-op. The rotating timers are
    /// never cleared here.
    pub fn tick(&mut self, now: DateTime<Utc>) -> ResetActions {
        let actions = reconcile::reconcile(&self.ledger, now, self.reset_weekday);
        if actions.clear_daily {
            self.store.reset_group(&self.catalog, TierGroup::Daily);
        }
        if actions.clear_weekly {
            self.store.reset_group(&self.catalog, TierGroup::Weekly);
        }
        if actions.any() {
            self.ledger.advance(now);
        }
        actions
    }

    /// Persist the snapshot (visibility, completion, ledger)
    pub fn save(&self, storage: &Storage) -> Result<()> {
        storage.save_snapshot(&self.store.snapshot(&self.ledger))
    }

    // =========================================================================
    // Render model
    // =========================================================================

    /// Pull-based render data for any presentation layer
    pub fn render_model(&self, now: DateTime<Utc>) -> RenderModel {
        RenderModel {
            generated_at: now,
            hours_to_daily_reset: schedule::hours_until_daily_reset(now),
            daily_actionable: self
                .store
                .actionable_count(self.catalog.tier_ids(Tier::Daily)),
            weekly_actionable: self
                .store
                .actionable_count(self.catalog.tier_ids(Tier::Weekly)),
            daily: self.tier_views(Tier::Daily),
            weekly: self.tier_views(Tier::Weekly),
            timers: self.timer_views(now),
        }
    }

    fn tier_views(&self, tier: Tier) -> Vec<SectionView> {
        self.catalog
            .sections(tier)
            .iter()
            .map(|section| SectionView {
                title: section.title.to_string(),
                rows: self
                    .store
                    .actionable_rows(section)
                    .map(RowView::from)
                    .collect(),
            })
            .collect()
    }

    fn timer_views(&self, now: DateTime<Utc>) -> Vec<TimerView> {
        self.catalog
            .timers()
            .iter()
            .filter_map(|timer| {
                let state = self.store.get(&timer.id).ok()?;
                if !state.visible {
                    return None;
                }
                let reading = schedule::read_timer(timer, now);
                Some(TimerView {
                    id: timer.id.clone(),
                    present: reading.present,
                    has_presence: timer.presence_hours > 0,
                    next: reading.next,
                    countdown: reading.countdown,
                    completed: state.completed,
                    selected: state.selected,
                })
            })
            .collect()
    }
}

/// Everything a presentation layer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct RenderModel {
    pub generated_at: DateTime<Utc>,
    pub hours_to_daily_reset: f64,
    pub daily_actionable: usize,
    pub weekly_actionable: usize,
    pub daily: Vec<SectionView>,
    pub weekly: Vec<SectionView>,
    pub timers: Vec<TimerView>,
}

/// One tier section with its actionable rows
#[derive(Debug, Clone, Serialize)]
pub struct SectionView {
    pub title: String,
    pub rows: Vec<RowView>,
}

/// Serializable form of a checklist row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowView {
    Task { id: String, selected: bool },
    Break,
}

impl From<Row> for RowView {
    fn from(row: Row) -> Self {
        match row {
            Row::Task { id, selected } => RowView::Task {
                id: id.to_string(),
                selected,
            },
            Row::Break => RowView::Break,
        }
    }
}

/// One visible rotating timer with its live reading
#[derive(Debug, Clone, Serialize)]
pub struct TimerView {
    pub id: String,
    pub present: bool,
    pub has_presence: bool,
    pub next: DateTime<Utc>,
    pub countdown: Countdown,
    pub completed: bool,
    pub selected: bool,
}

impl TimerView {
    /// Render the timer the way the original tracker labeled it
    ///
    /// Timers with a presence window say "Returns in" whether or not the
    /// event is currently present; plain reset cycles say "Next in".
    pub fn label(&self) -> String {
        let countdown = format!("{}d {}h", self.countdown.days, self.countdown.hours);
        let mut line = if self.present {
            format!("{} - Present (Returns in {countdown})", self.id)
        } else if self.has_presence {
            format!("{} (Returns in {countdown})", self.id)
        } else {
            format!("{} (Next in {countdown})", self.id)
        };
        if self.completed {
            line.push_str(" \u{2714}");
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn open_fresh(temp: &TempDir) -> (Storage, Tracker) {
        let storage = Storage::new(temp.path().to_path_buf());
        let tracker = Tracker::open(&storage).expect("open tracker");
        (storage, tracker)
    }

    #[test]
    fn first_tick_resets_and_advances_ledger() {
        let temp = TempDir::new().unwrap();
        let (_, mut tracker) = open_fresh(&temp);

        let now = utc(2025, 1, 8, 12, 0);
        let first = tracker.tick(now);
        assert!(first.clear_daily);
        assert_eq!(tracker.ledger().last_reconciled, Some(now));

        let second = tracker.tick(now);
        assert!(!second.any());
    }

    #[test]
    fn weekly_clear_restores_weekly_tasks() {
        let temp = TempDir::new().unwrap();
        let (_, mut tracker) = open_fresh(&temp);
        tracker.tick(utc(2025, 1, 11, 12, 0));

        tracker.toggle_selection("Archon Hunt").unwrap();
        tracker.toggle_selection("Baro Ki'Teer").unwrap();
        assert_eq!(
            tracker.complete_checked(),
            vec!["Archon Hunt".to_string(), "Baro Ki'Teer".to_string()]
        );

        // Saturday -> Sunday boundary clears daily and weekly tiers, but the
        // rotating timer keeps its mark.
        let actions = tracker.tick(utc(2025, 1, 12, 0, 5));
        assert!(actions.clear_weekly);

        let model = tracker.render_model(utc(2025, 1, 12, 0, 5));
        let weekly_quests = &model.weekly[1];
        assert!(weekly_quests.rows.iter().any(|row| matches!(
            row,
            RowView::Task { id, .. } if id == "Archon Hunt"
        )));
        let baro = model
            .timers
            .iter()
            .find(|t| t.id == "Baro Ki'Teer")
            .expect("baro view");
        assert!(baro.completed);
    }

    #[test]
    fn state_survives_reopen() {
        let temp = TempDir::new().unwrap();
        let (storage, mut tracker) = open_fresh(&temp);
        tracker.tick(utc(2025, 1, 8, 12, 0));

        tracker.toggle_selection("Sortie").unwrap();
        tracker.complete_checked();
        tracker.set_visible("Conclave", false).unwrap();
        tracker.save(&storage).unwrap();

        let reopened = Tracker::open(&storage).unwrap();
        let model = reopened.render_model(utc(2025, 1, 8, 13, 0));
        let daily_quests = &model.daily[0];
        assert!(!daily_quests.rows.iter().any(|row| matches!(
            row,
            RowView::Task { id, .. } if id == "Sortie"
        )));
        let reputation = &model.daily[1];
        assert!(!reputation.rows.iter().any(|row| matches!(
            row,
            RowView::Task { id, .. } if id == "Conclave"
        )));
        // Same day: reopening must not clear the completion again.
        assert_eq!(
            reopened.ledger().last_reconciled,
            Some(utc(2025, 1, 8, 12, 0))
        );
    }

    #[test]
    fn simulate_resets_one_group() {
        let temp = TempDir::new().unwrap();
        let (_, mut tracker) = open_fresh(&temp);
        tracker.tick(utc(2025, 1, 8, 12, 0));

        for id in ["Sortie", "Archon Hunt"] {
            tracker.toggle_selection(id).unwrap();
        }
        tracker.complete_checked();

        tracker.simulate_tier_reset(TierGroup::Weekly);
        let model = tracker.render_model(utc(2025, 1, 8, 13, 0));
        assert!(model.weekly[1].rows.iter().any(|row| matches!(
            row,
            RowView::Task { id, .. } if id == "Archon Hunt"
        )));
        assert!(!model.daily[0].rows.iter().any(|row| matches!(
            row,
            RowView::Task { id, .. } if id == "Sortie"
        )));
    }

    #[test]
    fn hidden_timers_leave_the_render_model() {
        let temp = TempDir::new().unwrap();
        let (_, mut tracker) = open_fresh(&temp);
        tracker.toggle_visibility("Coda Weapon Reset").unwrap();

        let model = tracker.render_model(utc(2025, 7, 11, 14, 0));
        assert_eq!(model.timers.len(), 2);
        let baro = model.timers.iter().find(|t| t.id == "Baro Ki'Teer").unwrap();
        assert!(baro.present);
        assert_eq!(baro.next, utc(2025, 7, 25, 13, 0));
    }

    #[test]
    fn actionable_counts_track_completion() {
        let temp = TempDir::new().unwrap();
        let (_, mut tracker) = open_fresh(&temp);
        tracker.tick(utc(2025, 1, 8, 12, 0));

        let before = tracker.render_model(utc(2025, 1, 8, 12, 0));
        tracker.toggle_selection("Sortie").unwrap();
        tracker.complete_checked();
        let after = tracker.render_model(utc(2025, 1, 8, 12, 1));

        assert_eq!(after.daily_actionable, before.daily_actionable - 1);
        assert_eq!(after.weekly_actionable, before.weekly_actionable);
    }

    #[test]
    fn timer_labels_match_original_text() {
        let temp = TempDir::new().unwrap();
        let (_, mut tracker) = open_fresh(&temp);

        // During Baro's 48h presence window.
        let model = tracker.render_model(utc(2025, 7, 11, 14, 0));
        let baro = model.timers.iter().find(|t| t.id == "Baro Ki'Teer").unwrap();
        assert_eq!(baro.label(), "Baro Ki'Teer - Present (Returns in 13d 23h)");

        // After the window, with a completion mark. Baro keeps "Returns in"
        // even while away; the plain cycles say "Next in".
        tracker.toggle_selection("Baro Ki'Teer").unwrap();
        tracker.complete_checked();
        let model = tracker.render_model(utc(2025, 7, 14, 0, 0));
        let baro = model.timers.iter().find(|t| t.id == "Baro Ki'Teer").unwrap();
        assert_eq!(
            baro.label(),
            "Baro Ki'Teer (Returns in 11d 13h) \u{2714}"
        );
        let tenet = model
            .timers
            .iter()
            .find(|t| t.id == "Tenet Weapon Reset")
            .unwrap();
        assert_eq!(tenet.label(), "Tenet Weapon Reset (Next in 1d 0h)");
    }

    #[test]
    fn unknown_id_surfaces_error() {
        let temp = TempDir::new().unwrap();
        let (_, mut tracker) = open_fresh(&temp);
        assert!(tracker.toggle_selection("Not A Task").is_err());
    }
}

//! Task state store
//!
//! In-memory mapping of task id to per-period state, with snapshot load/save.
//! Three flags per task:
//!
//! - `visible`: opt-in display filter, user-controlled, persisted.
//! - `completed`: done for the current period; persisted; cleared at tier
//!   reset boundaries or by explicit reset actions.
//! - `selected`: checked in the UI right now, pending a commit. Transient:
//!   never persisted, always false after a load.
//!
//! A task that is visible and not completed is "actionable" and shows up in
//! the rendered checklist.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{is_break, Catalog, Section, TierGroup};
use crate::error::{Error, Result};
use crate::reconcile::ResetLedger;

/// Per-task flags for the current period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskState {
    pub visible: bool,
    pub completed: bool,
    pub selected: bool,
}

impl Default for TaskState {
    fn default() -> Self {
        Self {
            visible: true,
            completed: false,
            selected: false,
        }
    }
}

/// One row of a rendered actionable list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row {
    Task { id: &'static str, selected: bool },
    Break,
}

/// State store for every catalog task and rotating timer
///
/// The id set is fixed at construction from the catalog; entries are never
/// added or removed afterwards.
#[derive(Debug, Clone)]
pub struct TaskStore {
    states: HashMap<String, TaskState>,
}

impl TaskStore {
    /// Create a store with default state for every id in the catalog
    pub fn new(catalog: &Catalog) -> Self {
        Self::from_ids(catalog.all_ids())
    }

    /// Create a store over an explicit id set
    pub fn from_ids<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            states: ids
                .into_iter()
                .map(|id| (id.to_string(), TaskState::default()))
                .collect(),
        }
    }

    fn entry_mut(&mut self, id: &str) -> Result<&mut TaskState> {
        self.states
            .get_mut(id)
            .ok_or_else(|| Error::UnknownTask(id.to_string()))
    }

    /// Current state for an id
    pub fn get(&self, id: &str) -> Result<TaskState> {
        self.states
            .get(id)
            .copied()
            .ok_or_else(|| Error::UnknownTask(id.to_string()))
    }

    pub fn set_visible(&mut self, id: &str, visible: bool) -> Result<()> {
        self.entry_mut(id)?.visible = visible;
        Ok(())
    }

    pub fn set_selected(&mut self, id: &str, selected: bool) -> Result<()> {
        self.entry_mut(id)?.selected = selected;
        Ok(())
    }

    /// Flip the visibility filter; returns the new value
    pub fn toggle_visibility(&mut self, id: &str) -> Result<bool> {
        let state = self.entry_mut(id)?;
        state.visible = !state.visible;
        Ok(state.visible)
    }

    /// Flip the transient selection; returns the new value
    pub fn toggle_selection(&mut self, id: &str) -> Result<bool> {
        let state = self.entry_mut(id)?;
        state.selected = !state.selected;
        Ok(state.selected)
    }

    /// Complete every visible, selected task; clears the selections
    ///
    /// Selection is a separate, explicit signal from visibility: only tasks
    /// the user checked get committed, never "everything on screen".
    /// Returns the committed ids, sorted.
    pub fn commit_selected(&mut self) -> Vec<String> {
        let mut committed = Vec::new();
        for (id, state) in self.states.iter_mut() {
            if state.visible && state.selected {
                state.completed = true;
                state.selected = false;
                committed.push(id.clone());
            }
        }
        committed.sort();
        committed
    }

    /// Mark one task completed directly, bypassing selection
    ///
    /// Hidden tasks are skipped: returns false without touching them, so a
    /// completion can never be parked on a task the user cannot see.
    pub fn complete(&mut self, id: &str) -> Result<bool> {
        let state = self.entry_mut(id)?;
        if !state.visible {
            return Ok(false);
        }
        state.completed = true;
        state.selected = false;
        Ok(true)
    }

    /// Manual full reset: un-complete all visible tasks, drop all selections
    pub fn reset_all_visible(&mut self) {
        for state in self.states.values_mut() {
            if state.visible {
                state.completed = false;
            }
            state.selected = false;
        }
    }

    /// Clear completion and selection for exactly one tier group
    ///
    /// Used by the reconciler at reset boundaries and by the simulate
    /// commands.
    pub fn reset_group(&mut self, catalog: &Catalog, group: TierGroup) {
        for id in catalog.group_ids(group) {
            if let Some(state) = self.states.get_mut(id) {
                state.completed = false;
                state.selected = false;
            }
        }
    }

    /// Count of actionable tasks (visible and not completed) in an id set
    pub fn actionable_count<'a>(&self, ids: impl IntoIterator<Item = &'a str>) -> usize {
        ids.into_iter()
            .filter(|id| {
                self.states
                    .get(*id)
                    .map(|s| s.visible && !s.completed)
                    .unwrap_or(false)
            })
            .count()
    }

    /// Lazy, restartable walk of a section's actionable rows
    ///
    /// Preserves catalog order, drops hidden and completed tasks, and emits
    /// break markers only between runs of tasks: never leading, never
    /// trailing, never doubled.
    pub fn actionable_rows<'a>(&'a self, section: &Section) -> ActionableRows<'a> {
        ActionableRows {
            store: self,
            entries: section.entries.iter(),
            pending_break: false,
            emitted_any: false,
            queued: None,
        }
    }
}

/// Iterator returned by [`TaskStore::actionable_rows`]
pub struct ActionableRows<'a> {
    store: &'a TaskStore,
    entries: std::slice::Iter<'static, &'static str>,
    pending_break: bool,
    emitted_any: bool,
    queued: Option<Row>,
}

impl Iterator for ActionableRows<'_> {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        if let Some(row) = self.queued.take() {
            return Some(row);
        }
        for entry in self.entries.by_ref() {
            if is_break(entry) {
                // Suppressed unless at least one task precedes it; collapsed
                // runs of markers become a single pending break.
                if self.emitted_any {
                    self.pending_break = true;
                }
                continue;
            }
            let Some(state) = self.store.states.get(*entry) else {
                continue;
            };
            if !state.visible || state.completed {
                continue;
            }
            let row = Row::Task {
                id: entry,
                selected: state.selected,
            };
            self.emitted_any = true;
            if self.pending_break {
                self.pending_break = false;
                self.queued = Some(row);
                return Some(Row::Break);
            }
            return Some(row);
        }
        None
    }
}

/// Persisted form of the store plus the reconciliation ledger
///
/// Field names match the original state file so existing snapshots load
/// unchanged. `selected` is deliberately absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateSnapshot {
    #[serde(default)]
    pub visibility_settings: BTreeMap<String, bool>,
    #[serde(default)]
    pub checked_tasks: BTreeMap<String, bool>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub last_reset_check: Option<DateTime<Utc>>,
}

/// An unparseable timestamp means "never reconciled", not a lost snapshot
///
/// Only the watermark degrades; visibility and completion in the same file
/// must survive.
fn lenient_timestamp<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.parse::<DateTime<Utc>>().ok()))
}

impl TaskStore {
    /// Capture `visible`/`completed` for every id, plus the ledger
    pub fn snapshot(&self, ledger: &ResetLedger) -> StateSnapshot {
        let mut snapshot = StateSnapshot {
            last_reset_check: ledger.last_reconciled,
            ..Default::default()
        };
        for (id, state) in &self.states {
            snapshot.visibility_settings.insert(id.clone(), state.visible);
            snapshot.checked_tasks.insert(id.clone(), state.completed);
        }
        snapshot
    }

    /// Overlay persisted values onto the store; returns the loaded ledger
    ///
    /// Ids not in the catalog are ignored (a stale snapshot from an older
    /// catalog must not poison the store). All selections reset to false.
    pub fn apply_snapshot(&mut self, snapshot: &StateSnapshot) -> ResetLedger {
        for (id, visible) in &snapshot.visibility_settings {
            if let Some(state) = self.states.get_mut(id) {
                state.visible = *visible;
            }
        }
        for (id, completed) in &snapshot.checked_tasks {
            if let Some(state) = self.states.get_mut(id) {
                state.completed = *completed;
            }
        }
        for state in self.states.values_mut() {
            state.selected = false;
        }
        ResetLedger::new(snapshot.last_reset_check)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const TEST_SECTION: Section = Section {
        title: "Test",
        entries: &["A", "---", "B", "---", "---", "C"],
    };

    fn test_store() -> TaskStore {
        TaskStore::from_ids(["A", "B", "C"])
    }

    fn rows(store: &TaskStore) -> Vec<Row> {
        store.actionable_rows(&TEST_SECTION).collect()
    }

    #[test]
    fn defaults_are_actionable() {
        let store = test_store();
        assert_eq!(
            rows(&store),
            vec![
                Row::Task { id: "A", selected: false },
                Row::Break,
                Row::Task { id: "B", selected: false },
                Row::Break,
                Row::Task { id: "C", selected: false },
            ]
        );
    }

    #[test]
    fn leading_break_suppressed_and_doubles_collapsed() {
        let mut store = test_store();
        store.set_selected("A", true).unwrap();
        let committed = store.commit_selected();
        assert_eq!(committed, vec!["A".to_string()]);

        // A completed: its trailing break must not lead the list, and the
        // doubled marker between B and C collapses to one.
        assert_eq!(
            rows(&store),
            vec![
                Row::Task { id: "B", selected: false },
                Row::Break,
                Row::Task { id: "C", selected: false },
            ]
        );
    }

    #[test]
    fn hidden_tasks_are_omitted() {
        let mut store = test_store();
        store.set_visible("B", false).unwrap();
        store.set_visible("C", false).unwrap();
        assert_eq!(rows(&store), vec![Row::Task { id: "A", selected: false }]);
    }

    #[test]
    fn empty_when_everything_done() {
        let mut store = test_store();
        for id in ["A", "B", "C"] {
            store.set_selected(id, true).unwrap();
        }
        store.commit_selected();
        assert!(rows(&store).is_empty());
    }

    #[test]
    fn commit_skips_hidden_and_unselected() {
        let mut store = test_store();
        store.set_selected("A", true).unwrap();
        store.set_selected("B", true).unwrap();
        store.set_visible("B", false).unwrap();

        let committed = store.commit_selected();
        assert_eq!(committed, vec!["A".to_string()]);
        assert!(store.get("A").unwrap().completed);
        assert!(!store.get("A").unwrap().selected);
        // Hidden task keeps its selection untouched but uncommitted.
        assert!(!store.get("B").unwrap().completed);
    }

    #[test]
    fn direct_complete_skips_hidden() {
        let mut store = test_store();
        store.set_visible("B", false).unwrap();

        assert!(store.complete("A").unwrap());
        assert!(!store.complete("B").unwrap());
        assert!(store.get("A").unwrap().completed);
        assert!(!store.get("B").unwrap().completed);
        assert!(store.complete("D").is_err());
    }

    #[test]
    fn committed_ids_stay_out_until_reset() {
        let catalog = Catalog::builtin();
        let mut store = TaskStore::new(&catalog);
        store.set_selected("Sortie", true).unwrap();
        store.commit_selected();

        let daily = catalog.sections(crate::catalog::Tier::Daily)[0];
        assert!(rows_contain(&store, &daily, "Tribute"));
        assert!(!rows_contain(&store, &daily, "Sortie"));

        store.reset_group(&catalog, TierGroup::Daily);
        assert!(rows_contain(&store, &daily, "Sortie"));
    }

    fn rows_contain(store: &TaskStore, section: &Section, id: &str) -> bool {
        store
            .actionable_rows(section)
            .any(|row| matches!(row, Row::Task { id: row_id, .. } if row_id == id))
    }

    #[test]
    fn reset_all_visible_spares_hidden_completion() {
        let mut store = test_store();
        store.set_selected("A", true).unwrap();
        store.set_selected("B", true).unwrap();
        store.commit_selected();
        store.set_visible("B", false).unwrap();
        store.set_selected("C", true).unwrap();

        store.reset_all_visible();
        assert!(!store.get("A").unwrap().completed);
        // Hidden tasks are left alone by the manual reset.
        assert!(store.get("B").unwrap().completed);
        assert!(!store.get("C").unwrap().selected);
    }

    #[test]
    fn reset_group_touches_only_its_tier() {
        let catalog = Catalog::builtin();
        let mut store = TaskStore::new(&catalog);
        for id in ["Sortie", "Archon Hunt", "Baro Ki'Teer"] {
            store.set_selected(id, true).unwrap();
        }
        store.commit_selected();

        store.reset_group(&catalog, TierGroup::Daily);
        assert!(!store.get("Sortie").unwrap().completed);
        assert!(store.get("Archon Hunt").unwrap().completed);
        assert!(store.get("Baro Ki'Teer").unwrap().completed);

        store.reset_group(&catalog, TierGroup::Timers);
        assert!(!store.get("Baro Ki'Teer").unwrap().completed);
    }

    #[test]
    fn unknown_ids_fail_fast() {
        let mut store = test_store();
        assert!(matches!(
            store.set_visible("D", true),
            Err(Error::UnknownTask(_))
        ));
        assert!(matches!(store.get("---"), Err(Error::UnknownTask(_))));
    }

    #[test]
    fn snapshot_round_trips_visible_and_completed() {
        let mut store = test_store();
        store.set_visible("A", false).unwrap();
        store.set_selected("B", true).unwrap();
        store.commit_selected();
        store.set_selected("C", true).unwrap();

        let now = Utc.with_ymd_and_hms(2025, 1, 12, 0, 5, 0).unwrap();
        let ledger = ResetLedger::new(Some(now));
        let snapshot = store.snapshot(&ledger);

        let mut restored = test_store();
        let loaded_ledger = restored.apply_snapshot(&snapshot);

        assert_eq!(loaded_ledger, ledger);
        assert_eq!(restored.get("A").unwrap().visible, false);
        assert_eq!(restored.get("B").unwrap().completed, true);
        // Selection is transient: not part of the snapshot.
        assert_eq!(restored.get("C").unwrap().selected, false);
        assert_eq!(restored.get("A").unwrap(), store.get("A").unwrap());
    }

    #[test]
    fn snapshot_ignores_stale_ids() {
        let mut snapshot = StateSnapshot::default();
        snapshot.checked_tasks.insert("Removed Task".to_string(), true);
        snapshot.visibility_settings.insert("A".to_string(), false);

        let mut store = test_store();
        store.apply_snapshot(&snapshot);
        assert!(!store.get("A").unwrap().visible);
        assert!(store.get("Removed Task").is_err());
    }

    #[test]
    fn bad_reset_timestamp_degrades_to_none() {
        let snapshot: StateSnapshot = serde_json::from_str(
            r#"{"checked_tasks": {"A": true}, "visibility_settings": {"B": false}, "last_reset_check": "not-a-date"}"#,
        )
        .unwrap();
        assert!(snapshot.last_reset_check.is_none());
        assert_eq!(snapshot.checked_tasks.get("A"), Some(&true));
        assert_eq!(snapshot.visibility_settings.get("B"), Some(&false));
    }

    #[test]
    fn json_field_names_match_original_state_file() {
        let store = test_store();
        let ledger = ResetLedger::default();
        let json = serde_json::to_value(store.snapshot(&ledger)).unwrap();
        assert!(json.get("visibility_settings").is_some());
        assert!(json.get("checked_tasks").is_some());
        assert!(json.get("last_reset_check").is_some());
        assert!(json.get("selected").is_none());
    }
}

//! Static task catalog
//!
//! Defines the task universe: daily and weekly tiers grouped into named
//! sections, plus the rotating vendor timers that run on their own cycles.
//! Section entries may contain the literal `---` break marker, which requests
//! a visual separator in rendered lists. A break is never a task: it carries
//! no state and must never be looked up in the state store.

use chrono::{DateTime, TimeZone, Utc};

use crate::error::{Error, Result};

/// Literal marker for a visual break in a section's task list
pub const BREAK: &str = "---";

/// True if a section entry is the break marker rather than a task id
pub fn is_break(entry: &str) -> bool {
    entry == BREAK
}

/// Reset cadence tier for catalog tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Daily,
    Weekly,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Daily => "daily",
            Tier::Weekly => "weekly",
        }
    }
}

/// Group addressed by tier-level reset operations
///
/// Extends [`Tier`] with the rotating timers, which share completion state
/// semantics but are never cleared by the automatic reconciler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierGroup {
    Daily,
    Weekly,
    Timers,
}

impl TierGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            TierGroup::Daily => "daily",
            TierGroup::Weekly => "weekly",
            TierGroup::Timers => "timers",
        }
    }
}

impl std::str::FromStr for TierGroup {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "day" | "daily" => Ok(TierGroup::Daily),
            "week" | "weekly" => Ok(TierGroup::Weekly),
            "timers" | "timer" => Ok(TierGroup::Timers),
            other => Err(Error::InvalidArgument(format!(
                "invalid tier '{other}' (expected day|week|timers)"
            ))),
        }
    }
}

/// Named, ordered run of tasks within a tier
#[derive(Debug, Clone, Copy)]
pub struct Section {
    pub title: &'static str,
    pub entries: &'static [&'static str],
}

impl Section {
    /// Task ids in this section, skipping break markers
    pub fn task_ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().copied().filter(|e| !is_break(e))
    }
}

const DAILY_SECTIONS: &[Section] = &[
    Section {
        title: "Quests",
        entries: &[
            "Tribute",
            "Sortie",
            "KIM",
            "Syndicate Missions",
            "Steel Path Incursions",
        ],
    },
    Section {
        title: "Reputation",
        entries: &[
            "Ostron",
            "Quills",
            BREAK,
            "Solaris",
            "Ventkids",
            "Solaris Vox",
            BREAK,
            "Entrati",
            "Necraloid",
            "Cavia",
            BREAK,
            "Holdfasts",
            BREAK,
            "Hex",
            BREAK,
            "Cephalon Simaris",
            "Conclave",
        ],
    },
    Section {
        title: "Vendor",
        entries: &["Acrithis - Arcanes"],
    },
];

const WEEKLY_SECTIONS: &[Section] = &[
    Section {
        title: "Vendors",
        entries: &[
            "Iron Wake",
            "Teshin",
            "Maroo",
            "Nora",
            "Bird 3",
            "Acrithis - Riven/Forma/Adapter",
            "Archimedean Yonta - Kuva",
        ],
    },
    Section {
        title: "Quests",
        entries: &[
            "Archon Hunt",
            BREAK,
            "Deep Archimedea",
            "Temporal Archimedea",
            "Netracell",
            BREAK,
            "Circuit",
            "SP Circuit",
            BREAK,
            "Hex Calendar",
            "Kahl",
            "Helminth Invigoration",
        ],
    },
];

/// An event with its own periodic cycle, independent of day/week boundaries
///
/// Occurrences fall at `anchor + k * period_days`. When `presence_hours` is
/// nonzero the event is considered present for that many hours after each
/// occurrence (e.g. a visiting vendor who stays for two days).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotatingTimer {
    pub id: String,
    pub anchor: DateTime<Utc>,
    pub period_days: i64,
    pub presence_hours: i64,
}

impl RotatingTimer {
    pub fn new(
        id: impl Into<String>,
        anchor: DateTime<Utc>,
        period_days: i64,
        presence_hours: i64,
    ) -> Self {
        Self {
            id: id.into(),
            anchor,
            period_days,
            presence_hours,
        }
    }

    /// Reject malformed definitions before the calculator ever runs
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "timer id cannot be empty".to_string(),
            ));
        }
        if is_break(&self.id) {
            return Err(Error::InvalidConfig(format!(
                "timer id cannot be the break marker '{BREAK}'"
            )));
        }
        if self.period_days <= 0 {
            return Err(Error::InvalidConfig(format!(
                "timer '{}': period_days must be > 0 (got {})",
                self.id, self.period_days
            )));
        }
        if self.presence_hours < 0 {
            return Err(Error::InvalidConfig(format!(
                "timer '{}': presence_hours cannot be negative (got {})",
                self.id, self.presence_hours
            )));
        }
        // A presence window must end before the next occurrence begins.
        if self.presence_hours >= self.period_days * 24 {
            return Err(Error::InvalidConfig(format!(
                "timer '{}': presence_hours ({}) must be shorter than the period ({} days)",
                self.id, self.presence_hours, self.period_days
            )));
        }
        Ok(())
    }
}

/// The full task universe: tier sections plus rotating timers
#[derive(Debug, Clone)]
pub struct Catalog {
    timers: Vec<RotatingTimer>,
}

impl Catalog {
    /// The built-in catalog with the reference timer schedule
    pub fn builtin() -> Self {
        Self {
            timers: default_timers(),
        }
    }

    /// Built-in sections with a custom rotating timer table
    pub fn with_timers(timers: Vec<RotatingTimer>) -> Self {
        Self { timers }
    }

    /// Sections for a tier, in display order
    pub fn sections(&self, tier: Tier) -> &'static [Section] {
        match tier {
            Tier::Daily => DAILY_SECTIONS,
            Tier::Weekly => WEEKLY_SECTIONS,
        }
    }

    /// All task ids in a tier, in catalog order
    pub fn tier_ids(&self, tier: Tier) -> impl Iterator<Item = &'static str> + '_ {
        self.sections(tier).iter().flat_map(|s| s.task_ids())
    }

    pub fn timers(&self) -> &[RotatingTimer] {
        &self.timers
    }

    pub fn timer(&self, id: &str) -> Option<&RotatingTimer> {
        self.timers.iter().find(|t| t.id == id)
    }

    pub fn timer_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.timers.iter().map(|t| t.id.as_str())
    }

    /// Every id that carries state: tier tasks first, then timers
    pub fn all_ids(&self) -> impl Iterator<Item = &str> + '_ {
        // The static tier ids are reborrowed at self's lifetime so they chain
        // with the owned timer ids.
        self.tier_ids(Tier::Daily)
            .chain(self.tier_ids(Tier::Weekly))
            .map(|id| -> &str { id })
            .chain(self.timer_ids())
    }

    /// True if the id names a catalog task or rotating timer
    pub fn contains(&self, id: &str) -> bool {
        self.all_ids().any(|known| known == id)
    }

    /// Ids addressed by a tier-level reset
    pub fn group_ids<'a>(&'a self, group: TierGroup) -> Box<dyn Iterator<Item = &'a str> + 'a> {
        match group {
            TierGroup::Daily => Box::new(self.tier_ids(Tier::Daily).map(|id| -> &str { id })),
            TierGroup::Weekly => Box::new(self.tier_ids(Tier::Weekly).map(|id| -> &str { id })),
            TierGroup::Timers => Box::new(self.timer_ids()),
        }
    }

    /// Validate the whole catalog: unique non-empty ids, well-formed timers
    pub fn validate(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for id in self.all_ids() {
            if id.trim().is_empty() {
                return Err(Error::InvalidConfig(
                    "catalog contains an empty task id".to_string(),
                ));
            }
            if !seen.insert(id) {
                return Err(Error::InvalidConfig(format!(
                    "duplicate task id '{id}' in catalog"
                )));
            }
        }
        for timer in &self.timers {
            timer.validate()?;
        }
        Ok(())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// The reference rotating timer schedule
fn default_timers() -> Vec<RotatingTimer> {
    vec![
        RotatingTimer::new(
            "Tenet Weapon Reset",
            Utc.with_ymd_and_hms(2025, 7, 3, 0, 0, 0).unwrap(),
            4,
            0,
        ),
        RotatingTimer::new(
            "Coda Weapon Reset",
            Utc.with_ymd_and_hms(2025, 7, 5, 0, 0, 0).unwrap(),
            4,
            0,
        ),
        RotatingTimer::new(
            "Baro Ki'Teer",
            Utc.with_ymd_and_hms(2025, 7, 11, 13, 0, 0).unwrap(),
            14,
            48,
        ),
    ]
}

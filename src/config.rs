//! Planner configuration.
//!
//! Every field has a default, so a partial JSON document (or `{}`) is a
//! valid configuration.

use chrono::{Local, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Default upper bound on containers per ship.
pub const MAX_CONTAINERS: i64 = 5000;

/// Default arrival date format.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Default arrival time format (24-hour clock).
pub const TIME_FORMAT: &str = "%H:%M";

/// Moment at which every berth is initially free.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Baseline {
    /// Midnight of the current local day, evaluated when a run starts.
    #[default]
    StartOfToday,
    /// A fixed timestamp.
    At(NaiveDateTime),
    /// The earliest arrival among the ships being scheduled.
    EarliestArrival,
}

impl Baseline {
    /// Resolves the baseline for a run whose earliest arrival is `earliest`.
    pub fn resolve(&self, earliest: Option<NaiveDateTime>) -> NaiveDateTime {
        match self {
            Baseline::StartOfToday => start_of_today(),
            Baseline::At(ts) => *ts,
            Baseline::EarliestArrival => earliest.unwrap_or_else(start_of_today),
        }
    }
}

fn start_of_today() -> NaiveDateTime {
    Local::now().date_naive().and_time(NaiveTime::MIN)
}

/// What happens to a ship record that fails normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidShipPolicy {
    /// Drop the ship, keep going, and report it with the schedule.
    #[default]
    SkipAndReport,
    /// Abort the whole run on the first invalid ship.
    Strict,
}

/// How the earliest-free berth is located.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BerthSelection {
    /// Linear scan over all berths, O(b) per ship.
    #[default]
    Linear,
    /// Binary heap keyed by `(free_at, index)`, O(log b) per ship.
    Heap,
}

/// Configuration for a [`BerthPlanner`](crate::scheduler::BerthPlanner).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Initial free time of every berth.
    pub baseline: Baseline,
    /// Handling of invalid ship records.
    pub invalid_ships: InvalidShipPolicy,
    /// Berth selection strategy.
    pub berth_selection: BerthSelection,
    /// Container counts above this are clamped. Values outside
    /// `[0, MAX_CONTAINERS]` are pulled back into that range when applied.
    pub max_containers: i64,
    /// `chrono` format for the arrival date field.
    pub date_format: String,
    /// `chrono` format for the arrival time field.
    pub time_format: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            baseline: Baseline::default(),
            invalid_ships: InvalidShipPolicy::default(),
            berth_selection: BerthSelection::default(),
            max_containers: MAX_CONTAINERS,
            date_format: DATE_FORMAT.to_string(),
            time_format: TIME_FORMAT.to_string(),
        }
    }
}

impl PlannerConfig {
    /// Sets the berth baseline.
    pub fn with_baseline(mut self, baseline: Baseline) -> Self {
        self.baseline = baseline;
        self
    }

    /// Sets the invalid ship policy.
    pub fn with_invalid_ships(mut self, policy: InvalidShipPolicy) -> Self {
        self.invalid_ships = policy;
        self
    }

    /// Sets the berth selection strategy.
    pub fn with_berth_selection(mut self, selection: BerthSelection) -> Self {
        self.berth_selection = selection;
        self
    }

    /// Sets the container clamp, bounded to `[0, MAX_CONTAINERS]`.
    pub fn with_max_containers(mut self, max_containers: i64) -> Self {
        self.max_containers = max_containers.clamp(0, MAX_CONTAINERS);
        self
    }

    /// Sets the arrival date and time formats.
    pub fn with_formats(
        mut self,
        date_format: impl Into<String>,
        time_format: impl Into<String>,
    ) -> Self {
        self.date_format = date_format.into();
        self.time_format = time_format.into();
        self
    }
}

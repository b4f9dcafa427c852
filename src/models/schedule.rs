//! Schedule (solution) model.
//!
//! A schedule is the ordered list of berth assignments produced by one
//! planning run, plus the ships that were rejected during normalization.
//! Entries are kept in processing order (by arrival), not input order.

use std::collections::BTreeMap;

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use super::berth::berth_label;
use super::ship::{delta_to_hours, ShipRequest};
use crate::normalizer::RejectedShip;

/// Timestamp format used in display rows.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A ship-berth-time assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Ship name.
    pub ship_name: String,
    /// Assigned berth (0-based).
    pub berth_index: usize,
    /// Ship arrival.
    pub arrival: NaiveDateTime,
    /// Service start.
    pub start: NaiveDateTime,
    /// Service end.
    pub end: NaiveDateTime,
    /// Containers handled (clamped).
    pub container_count: i64,
    /// Containers per hour.
    pub crane_capacity: i64,
    /// Service time in hours.
    pub service_hours: f64,
}

impl ScheduleEntry {
    /// Creates an entry for `ship` on `berth_index` starting at `start`.
    pub fn new(ship: &ShipRequest, berth_index: usize, start: NaiveDateTime) -> Self {
        Self {
            ship_name: ship.name.clone(),
            berth_index,
            arrival: ship.arrival,
            start,
            end: start + ship.service_duration(),
            container_count: ship.container_count,
            crane_capacity: ship.crane_capacity,
            service_hours: ship.service_hours,
        }
    }

    /// 1-based berth label.
    pub fn berth_label(&self) -> String {
        berth_label(self.berth_index)
    }

    /// Occupied span (end - start).
    #[inline]
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Time spent waiting for a berth (start - arrival).
    #[inline]
    pub fn waiting(&self) -> TimeDelta {
        self.start - self.arrival
    }

    /// Time from arrival to end of service.
    #[inline]
    pub fn turnaround(&self) -> TimeDelta {
        self.end - self.arrival
    }

    /// Waiting time in hours.
    pub fn waiting_hours(&self) -> f64 {
        delta_to_hours(self.waiting())
    }

    /// Whether two entries occupy the same berth at the same time.
    ///
    /// Intervals are half-open, so back-to-back service does not overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.berth_index == other.berth_index && self.start < other.end && other.start < self.end
    }

    /// Formatted row for a result table.
    pub fn to_row(&self) -> ScheduleRow {
        ScheduleRow {
            ship: self.ship_name.clone(),
            berth: self.berth_label(),
            start: self.start.format(DISPLAY_FORMAT).to_string(),
            end: self.end.format(DISPLAY_FORMAT).to_string(),
            containers: self.container_count,
            crane_capacity: format!("{}/hr", self.crane_capacity),
            duration: format!("{:.1} hrs", self.service_hours),
        }
    }
}

/// Pre-formatted entry for tables and timeline bars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// Ship name.
    pub ship: String,
    /// 1-based berth label, e.g. `Berth 1`.
    pub berth: String,
    /// Service start, `YYYY-MM-DD HH:MM`.
    pub start: String,
    /// Service end, `YYYY-MM-DD HH:MM`.
    pub end: String,
    /// Containers handled (clamped).
    pub containers: i64,
    /// Crane rate, e.g. `30/hr`.
    pub crane_capacity: String,
    /// Service time, e.g. `3.3 hrs`.
    pub duration: String,
}

/// Result of a planning run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Assignments in processing (arrival) order.
    pub entries: Vec<ScheduleEntry>,
    /// Ships dropped during normalization. Not serialized.
    #[serde(skip)]
    pub rejected: Vec<RejectedShip>,
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a schedule from entries.
    pub fn from_entries(entries: Vec<ScheduleEntry>) -> Self {
        Self {
            entries,
            rejected: Vec::new(),
        }
    }

    /// Attaches rejected ships.
    pub fn with_rejected(mut self, rejected: Vec<RejectedShip>) -> Self {
        self.rejected = rejected;
        self
    }

    /// Adds an entry.
    pub fn add_entry(&mut self, entry: ScheduleEntry) {
        self.entries.push(entry);
    }

    /// Whether every submitted ship was scheduled.
    pub fn is_complete(&self) -> bool {
        self.rejected.is_empty()
    }

    /// Latest end time across all entries.
    pub fn makespan(&self) -> Option<NaiveDateTime> {
        self.entries.iter().map(|e| e.end).max()
    }

    /// Earliest arrival across all entries.
    pub fn first_arrival(&self) -> Option<NaiveDateTime> {
        self.entries.iter().map(|e| e.arrival).min()
    }

    /// Finds the entry for a ship.
    pub fn entry_for_ship(&self, ship_name: &str) -> Option<&ScheduleEntry> {
        self.entries.iter().find(|e| e.ship_name == ship_name)
    }

    /// Entries on one berth, in start order.
    pub fn entries_for_berth(&self, berth_index: usize) -> Vec<&ScheduleEntry> {
        self.entries
            .iter()
            .filter(|e| e.berth_index == berth_index)
            .collect()
    }

    /// Entries grouped by berth, berths in index order.
    ///
    /// Only berths that received at least one ship appear.
    pub fn timeline(&self) -> BTreeMap<usize, Vec<&ScheduleEntry>> {
        let mut lanes: BTreeMap<usize, Vec<&ScheduleEntry>> = BTreeMap::new();
        for e in &self.entries {
            lanes.entry(e.berth_index).or_default().push(e);
        }
        lanes
    }

    /// Table rows in entry order.
    pub fn rows(&self) -> Vec<ScheduleRow> {
        self.entries.iter().map(ScheduleEntry::to_row).collect()
    }

    /// Total busy hours on one berth.
    pub fn busy_hours(&self, berth_index: usize) -> f64 {
        self.entries_for_berth(berth_index)
            .iter()
            .map(|e| delta_to_hours(e.duration()))
            .sum()
    }

    /// Number of entries.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

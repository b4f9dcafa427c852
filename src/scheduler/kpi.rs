//! Schedule quality metrics (KPIs).
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan | Latest end of service |
//! | Waiting | start - arrival, per ship |
//! | Turnaround | end - arrival, per ship |
//! | Utilization | busy time / (makespan - first arrival), per berth |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use crate::models::{delta_to_hours, Schedule};

/// Berth plan performance indicators.
///
/// All durations are in hours.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleKpi {
    /// Latest end of service. `None` for an empty schedule.
    pub makespan: Option<NaiveDateTime>,
    /// Hours from the first arrival to the makespan.
    pub horizon_hours: f64,
    /// Sum of waiting time across ships.
    pub total_waiting_hours: f64,
    /// Mean waiting time.
    pub avg_waiting_hours: f64,
    /// Longest single wait.
    pub max_waiting_hours: f64,
    /// Mean time from arrival to end of service.
    pub avg_turnaround_hours: f64,
    /// Containers handled across all ships.
    pub total_containers: i64,
    /// Per-berth utilization over the horizon (0.0..1.0).
    pub utilization_by_berth: BTreeMap<usize, f64>,
    /// Ships handled per berth.
    pub ships_by_berth: BTreeMap<usize, usize>,
    /// Mean utilization over all `berth_count` berths, idle ones included.
    pub avg_utilization: f64,
}

impl ScheduleKpi {
    /// Computes KPIs for a schedule run on `berth_count` berths.
    ///
    /// Berths that received no ship count as 0% utilized.
    pub fn calculate(schedule: &Schedule, berth_count: usize) -> Self {
        let makespan = schedule.makespan();
        let horizon_hours = match (schedule.first_arrival(), makespan) {
            (Some(first), Some(last)) => delta_to_hours(last - first),
            _ => 0.0,
        };

        let mut total_waiting = 0.0;
        let mut max_waiting: f64 = 0.0;
        let mut total_turnaround = 0.0;
        let mut total_containers = 0;
        let mut busy_by_berth: BTreeMap<usize, f64> = BTreeMap::new();
        let mut ships_by_berth: BTreeMap<usize, usize> = BTreeMap::new();

        for e in &schedule.entries {
            let waiting = e.waiting_hours();
            total_waiting += waiting;
            max_waiting = max_waiting.max(waiting);
            total_turnaround += delta_to_hours(e.turnaround());
            total_containers += e.container_count;
            *busy_by_berth.entry(e.berth_index).or_insert(0.0) += delta_to_hours(e.duration());
            *ships_by_berth.entry(e.berth_index).or_insert(0) += 1;
        }

        let utilization_by_berth: BTreeMap<usize, f64> = if horizon_hours > 0.0 {
            busy_by_berth
                .into_iter()
                .map(|(berth, busy)| (berth, busy / horizon_hours))
                .collect()
        } else {
            BTreeMap::new()
        };

        let berth_count = berth_count.max(1);
        let avg_utilization = utilization_by_berth.values().sum::<f64>() / berth_count as f64;

        let n = schedule.entry_count();
        let (avg_waiting_hours, avg_turnaround_hours) = if n == 0 {
            (0.0, 0.0)
        } else {
            (total_waiting / n as f64, total_turnaround / n as f64)
        };

        Self {
            makespan,
            horizon_hours,
            total_waiting_hours: total_waiting,
            avg_waiting_hours,
            max_waiting_hours: max_waiting,
            avg_turnaround_hours,
            total_containers,
            utilization_by_berth,
            ships_by_berth,
            avg_utilization,
        }
    }

    /// Whether the plan keeps every wait within `max_waiting_hours` and
    /// reaches `min_utilization` on average.
    pub fn meets_thresholds(&self, max_waiting_hours: f64, min_utilization: f64) -> bool {
        self.max_waiting_hours <= max_waiting_hours && self.avg_utilization >= min_utilization
    }
}

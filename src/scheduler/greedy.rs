//! Greedy earliest-free-berth scheduler.
//!
//! # Algorithm
//!
//! 1. Clamp the berth count to at least one.
//! 2. Stable-sort ships by arrival (equal arrivals keep input order).
//! 3. Start every berth free at the same baseline.
//! 4. For each ship, take the berth that frees up first (lowest index on
//!    ties), start at `max(arrival, free_at)`, and hold the berth for the
//!    ship's service duration.
//!
//! This is list scheduling with release times on identical parallel
//! machines. It is not optimal, but adding berths never delays the
//! last completion.
//!
//! # Complexity
//! O(n log n + n * b) with [`BerthTracker`], O(n log n + n log b) with
//! [`BerthQueue`], where n = ships and b = berths.
//!
//! # Reference
//! Graham (1969), "Bounds on Multiprocessing Timing Anomalies"

use chrono::{NaiveDateTime, TimeDelta};
use tracing::{debug, info, warn};

use crate::config::{Baseline, BerthSelection, PlannerConfig};
use crate::error::{PlanError, Result};
use crate::models::{
    BerthPool, BerthQueue, BerthTracker, RawShip, Schedule, ScheduleEntry, ShipRequest,
};
use crate::normalizer::Normalizer;
use crate::validation::validate_schedule_with;

/// Input container for a planning run.
#[derive(Debug, Clone, Default)]
pub struct PlanRequest {
    /// Requested berth count. Values below one are clamped to one.
    pub berth_count: i64,
    /// Raw ship records, in the order the user entered them.
    pub ships: Vec<RawShip>,
}

impl PlanRequest {
    /// Creates an empty request for `berth_count` berths.
    pub fn new(berth_count: i64) -> Self {
        Self {
            berth_count,
            ships: Vec::new(),
        }
    }

    /// Adds a ship.
    pub fn with_ship(mut self, ship: RawShip) -> Self {
        self.ships.push(ship);
        self
    }

    /// Adds several ships.
    pub fn with_ships(mut self, ships: impl IntoIterator<Item = RawShip>) -> Self {
        self.ships.extend(ships);
        self
    }
}

/// Clamps a requested berth count to at least one berth.
pub fn clamp_berth_count(requested: i64) -> usize {
    usize::try_from(requested).unwrap_or(0).max(1)
}

/// Ship indices in arrival order; equal arrivals keep input order.
pub fn arrival_order(ships: &[ShipRequest]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..ships.len()).collect();
    // `sort_by_key` is stable
    indices.sort_by_key(|&i| ships[i].arrival);
    indices
}

/// Runs the greedy assignment on a prepared berth pool.
///
/// The pool decides which berth is earliest; the loop itself never fails.
/// An empty pool yields no entries.
pub fn assign<P: BerthPool>(pool: &mut P, ships: &[ShipRequest]) -> Vec<ScheduleEntry> {
    let mut entries = Vec::with_capacity(ships.len());

    for idx in arrival_order(ships) {
        let ship = &ships[idx];
        let Some(berth) = pool.earliest_berth() else {
            break;
        };

        let start = ship.arrival.max(berth.free_at);
        let entry = ScheduleEntry::new(ship, berth.index, start);
        pool.mark_busy(berth.index, entry.end);

        debug!(
            ship = %ship.name,
            berth = berth.index,
            start = %entry.start,
            end = %entry.end,
            "assigned"
        );
        entries.push(entry);
    }

    entries
}

/// Greedy scheduler over validated ships.
///
/// # Example
///
/// ```
/// use berth_planner::models::ShipRequest;
/// use berth_planner::scheduler::GreedyScheduler;
/// use chrono::NaiveDate;
///
/// let day = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
/// let ships = vec![
///     ShipRequest::try_new("A", day.and_hms_opt(8, 0, 0).unwrap(), 100, 50).unwrap(),
///     ShipRequest::try_new("B", day.and_hms_opt(9, 0, 0).unwrap(), 100, 50).unwrap(),
/// ];
///
/// let scheduler = GreedyScheduler::new().with_baseline_at(day.and_hms_opt(0, 0, 0).unwrap());
/// let entries = scheduler.schedule(1, &ships);
/// assert_eq!(entries[1].start, day.and_hms_opt(10, 0, 0).unwrap());
/// ```
#[derive(Debug, Clone, Default)]
pub struct GreedyScheduler {
    baseline: Baseline,
    selection: BerthSelection,
}

impl GreedyScheduler {
    /// Creates a scheduler with the default baseline and linear selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scheduler from planner configuration.
    pub fn from_config(config: &PlannerConfig) -> Self {
        Self {
            baseline: config.baseline,
            selection: config.berth_selection,
        }
    }

    /// Sets the berth baseline.
    pub fn with_baseline(mut self, baseline: Baseline) -> Self {
        self.baseline = baseline;
        self
    }

    /// Fixes the berth baseline to `ts`.
    pub fn with_baseline_at(self, ts: NaiveDateTime) -> Self {
        self.with_baseline(Baseline::At(ts))
    }

    /// Sets the berth selection strategy.
    pub fn with_selection(mut self, selection: BerthSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Latest moment any berth can stay busy until, or `None` if that lies
    /// past the last representable date.
    ///
    /// No berth is ever busy past `max(baseline, last arrival)` plus the sum
    /// of all service durations, whatever the berth count.
    pub fn horizon(&self, ships: &[ShipRequest]) -> Option<NaiveDateTime> {
        let baseline = self.baseline.resolve(ships.iter().map(|s| s.arrival).min());
        let latest = ships.iter().map(|s| s.arrival).max().map_or(baseline, |t| t.max(baseline));
        let total = ships
            .iter()
            .try_fold(TimeDelta::zero(), |acc, s| acc.checked_add(&s.service_duration()))?;
        latest.checked_add_signed(total)
    }

    /// Schedules `ships` on `berth_count` berths (zero is treated as one).
    ///
    /// Entries come back in arrival order.
    ///
    /// # Panics
    /// If an end time lies past the last representable date; check
    /// [`GreedyScheduler::horizon`] first when the baseline is untrusted.
    pub fn schedule(&self, berth_count: usize, ships: &[ShipRequest]) -> Vec<ScheduleEntry> {
        let berth_count = berth_count.max(1);
        let earliest = ships.iter().map(|s| s.arrival).min();
        let baseline = self.baseline.resolve(earliest);

        if let Some(first) = earliest.filter(|&t| t < baseline) {
            warn!(
                %baseline,
                earliest_arrival = %first,
                "ships arrive before the berth baseline; their service starts at the baseline"
            );
        }

        match self.selection {
            BerthSelection::Linear => assign(&mut BerthTracker::new(berth_count, baseline), ships),
            BerthSelection::Heap => assign(&mut BerthQueue::new(berth_count, baseline), ships),
        }
    }
}

/// Normalize-then-schedule pipeline.
///
/// Holds only configuration; every call builds its own berth pool, so one
/// planner can serve concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct BerthPlanner {
    config: PlannerConfig,
}

impl BerthPlanner {
    /// Creates a planner.
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// Planner configuration.
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Normalizes the raw ships and schedules the valid ones.
    ///
    /// # Errors
    /// - [`PlanError::InvalidShip`] under the strict policy
    /// - [`PlanError::NoValidShips`] when nothing is left to schedule
    /// - [`PlanError::HorizonOverflow`] when berths would stay busy past the
    ///   last representable date
    pub fn plan(&self, request: &PlanRequest) -> Result<Schedule> {
        let batch = Normalizer::from_config(&self.config)
            .normalize_batch(&request.ships, self.config.invalid_ships)?;

        if batch.ships.is_empty() {
            return Err(PlanError::NoValidShips {
                rejected: batch.rejected,
            });
        }

        // Resolve once so the horizon check and the run share a baseline
        let baseline = self
            .config
            .baseline
            .resolve(batch.ships.iter().map(|s| s.arrival).min());
        let scheduler = GreedyScheduler::from_config(&self.config).with_baseline_at(baseline);
        if scheduler.horizon(&batch.ships).is_none() {
            return Err(PlanError::HorizonOverflow { baseline });
        }

        let berth_count = clamp_berth_count(request.berth_count);
        let entries = scheduler.schedule(berth_count, &batch.ships);
        let schedule = Schedule::from_entries(entries).with_rejected(batch.rejected);
        debug_assert!(
            validate_schedule_with(&schedule, berth_count, self.config.max_containers).is_ok()
        );

        info!(
            berths = berth_count,
            scheduled = schedule.entry_count(),
            rejected = schedule.rejected.len(),
            makespan = ?schedule.makespan(),
            "berth plan complete"
        );
        Ok(schedule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InvalidShipPolicy;
    use crate::error::ShipError;
    use crate::validation::validate_schedule;
    use chrono::{NaiveDate, TimeDelta};
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};
    use tracing_test::traced_test;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        day().and_hms_opt(h, m, 0).unwrap()
    }

    fn ship(name: &str, arrival: NaiveDateTime, containers: i64, crane: i64) -> ShipRequest {
        ShipRequest::try_new(name, arrival, containers, crane).unwrap()
    }

    fn scheduler() -> GreedyScheduler {
        GreedyScheduler::new().with_baseline_at(at(0, 0))
    }

    fn planner() -> BerthPlanner {
        BerthPlanner::new(PlannerConfig::default().with_baseline(Baseline::At(at(0, 0))))
    }

    fn two_ships() -> Vec<ShipRequest> {
        vec![
            ship("A", at(8, 0), 100, 50),
            ship("B", at(9, 0), 100, 50),
        ]
    }

    fn random_fleet(rng: &mut SmallRng, n: usize) -> Vec<ShipRequest> {
        (0..n)
            .map(|i| {
                let arrival = at(0, 0) + TimeDelta::minutes(rng.random_range(0..3 * 24 * 60));
                let containers = rng.random_range(0..8000);
                let crane = rng.random_range(1..120);
                ship(&format!("S{i}"), arrival, containers, crane)
            })
            .collect()
    }

    #[test]
    fn test_single_berth_waits() {
        let entries = scheduler().schedule(1, &two_ships());
        assert_eq!(entries[0].ship_name, "A");
        assert_eq!((entries[0].start, entries[0].end), (at(8, 0), at(10, 0)));
        assert_eq!(entries[1].ship_name, "B");
        assert_eq!((entries[1].start, entries[1].end), (at(10, 0), at(12, 0)));
    }

    #[test]
    fn test_two_berths_parallel() {
        let entries = scheduler().schedule(2, &two_ships());
        assert_eq!(entries[0].berth_index, 0);
        assert_eq!((entries[0].start, entries[0].end), (at(8, 0), at(10, 0)));
        assert_eq!(entries[1].berth_index, 1);
        assert_eq!((entries[1].start, entries[1].end), (at(9, 0), at(11, 0)));
    }

    #[test]
    fn test_zero_berths_clamped() {
        let entries = scheduler().schedule(0, &two_ships());
        assert!(entries.iter().all(|e| e.berth_index == 0));
        assert_eq!(entries[1].start, at(10, 0));

        assert_eq!(clamp_berth_count(0), 1);
        assert_eq!(clamp_berth_count(-4), 1);
        assert_eq!(clamp_berth_count(3), 3);
    }

    #[test]
    fn test_sorted_by_arrival() {
        let ships = vec![
            ship("late", at(14, 0), 50, 50),
            ship("early", at(6, 0), 50, 50),
            ship("mid", at(10, 0), 50, 50),
        ];
        let entries = scheduler().schedule(3, &ships);
        let names: Vec<_> = entries.iter().map(|e| e.ship_name.as_str()).collect();
        assert_eq!(names, vec!["early", "mid", "late"]);
    }

    #[test]
    fn test_date_orders_before_time() {
        let next_day = day().succ_opt().unwrap().and_hms_opt(1, 0, 0).unwrap();
        let ships = vec![ship("tomorrow", next_day, 50, 50), ship("today", at(23, 0), 50, 50)];
        let entries = scheduler().schedule(1, &ships);
        assert_eq!(entries[0].ship_name, "today");
    }

    #[test]
    fn test_equal_arrivals_keep_input_order() {
        let ships = vec![ship("X", at(8, 0), 100, 50), ship("Y", at(8, 0), 100, 50)];
        let entries = scheduler().schedule(1, &ships);
        assert_eq!(entries[0].ship_name, "X");
        assert_eq!(entries[0].start, at(8, 0));
        assert_eq!(entries[1].ship_name, "Y");
        assert_eq!(entries[1].start, at(10, 0));

        let reversed = vec![ships[1].clone(), ships[0].clone()];
        let entries = scheduler().schedule(1, &reversed);
        assert_eq!(entries[0].ship_name, "Y");
    }

    #[test]
    fn test_tie_goes_to_lowest_berth() {
        // Both berths free at 10:00 when C arrives
        let ships = vec![
            ship("A", at(8, 0), 100, 50),
            ship("B", at(8, 0), 100, 50),
            ship("C", at(11, 0), 100, 50),
        ];
        let entries = scheduler().schedule(2, &ships);
        assert_eq!(entries[2].berth_index, 0);
    }

    #[test]
    fn test_reuses_first_freed_berth() {
        let ships = vec![
            ship("long", at(8, 0), 500, 50),  // berth 0 until 18:00
            ship("short", at(8, 0), 50, 50),  // berth 1 until 09:00
            ship("next", at(8, 30), 100, 50), // waits for berth 1
        ];
        let entries = scheduler().schedule(2, &ships);
        assert_eq!(entries[2].berth_index, 1);
        assert_eq!(entries[2].start, at(9, 0));
        assert_eq!(entries[2].end, at(11, 0));
    }

    #[test]
    fn test_fractional_duration() {
        let entries = scheduler().schedule(1, &[ship("A", at(8, 0), 100, 30)]);
        assert_eq!(entries[0].end, at(11, 20));
    }

    #[test]
    fn test_empty_ships() {
        assert!(scheduler().schedule(3, &[]).is_empty());
    }

    #[test]
    fn test_assign_on_empty_pool() {
        let mut pool = BerthTracker::new(0, at(0, 0));
        assert!(assign(&mut pool, &two_ships()).is_empty());
    }

    #[test]
    fn test_heap_matches_linear() {
        let mut rng = SmallRng::seed_from_u64(7);
        for berths in 1..6 {
            let fleet = random_fleet(&mut rng, 40);
            let linear = scheduler().schedule(berths, &fleet);
            let heap = scheduler()
                .with_selection(BerthSelection::Heap)
                .schedule(berths, &fleet);
            assert_eq!(linear, heap, "berths={berths}");
        }
    }

    #[test]
    fn test_random_fleets_are_valid() {
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..20 {
            let n = rng.random_range(1..30);
            let berths = rng.random_range(1..5);
            let fleet = random_fleet(&mut rng, n);
            let schedule = Schedule::from_entries(scheduler().schedule(berths, &fleet));

            assert_eq!(schedule.entry_count(), fleet.len());
            for s in &fleet {
                assert_eq!(
                    schedule.entries.iter().filter(|e| e.ship_name == s.name).count(),
                    1
                );
            }
            for e in &schedule.entries {
                assert!(e.container_count <= 5000);
                assert!(e.service_hours >= 1.0);
            }
            assert!(validate_schedule(&schedule, berths).is_ok());
        }
    }

    #[test]
    fn test_start_respects_berth_free_time() {
        let mut rng = SmallRng::seed_from_u64(3);
        let fleet = random_fleet(&mut rng, 25);
        let entries = scheduler().schedule(2, &fleet);

        let mut free_at = [at(0, 0); 2];
        for e in &entries {
            assert!(e.start >= e.arrival);
            assert!(e.start >= free_at[e.berth_index]);
            free_at[e.berth_index] = e.end;
        }
    }

    #[test]
    fn test_more_berths_never_later() {
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..10 {
            let fleet = random_fleet(&mut rng, 30);
            let mut previous: Option<NaiveDateTime> = None;
            for berths in 1..8 {
                let makespan = Schedule::from_entries(scheduler().schedule(berths, &fleet))
                    .makespan()
                    .unwrap();
                if let Some(prev) = previous {
                    assert!(makespan <= prev, "berths={berths}");
                }
                previous = Some(makespan);
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let mut rng = SmallRng::seed_from_u64(5);
        let fleet = random_fleet(&mut rng, 30);
        assert_eq!(scheduler().schedule(3, &fleet), scheduler().schedule(3, &fleet));
    }

    #[traced_test]
    #[test]
    fn test_arrival_before_baseline() {
        let scheduler = GreedyScheduler::new().with_baseline_at(at(6, 0));
        let entries = scheduler.schedule(1, &[ship("A", at(4, 0), 100, 50)]);
        assert_eq!(entries[0].start, at(6, 0));
        assert!(logs_contain("arrive before the berth baseline"));
    }

    #[test]
    fn test_earliest_arrival_baseline() {
        let scheduler = GreedyScheduler::new().with_baseline(Baseline::EarliestArrival);
        let entries = scheduler.schedule(2, &two_ships());
        assert_eq!(entries[0].start, at(8, 0));
        assert_eq!(entries[1].start, at(9, 0));
    }

    #[test]
    fn test_plan_scenarios() {
        let request = PlanRequest::new(2).with_ships([
            RawShip::new("A", "2025-03-01", "08:00", 100, 50),
            RawShip::new("B", "2025-03-01", "09:00", 100, 50),
        ]);
        let schedule = planner().plan(&request).unwrap();
        assert!(schedule.is_complete());
        assert_eq!(schedule.entry_for_ship("B").unwrap().berth_index, 1);
        assert_eq!(schedule.makespan(), Some(at(11, 0)));
    }

    #[test]
    fn test_plan_negative_berths() {
        let request = PlanRequest::new(-2).with_ships([
            RawShip::new("A", "2025-03-01", "08:00", 100, 50),
            RawShip::new("B", "2025-03-01", "09:00", 100, 50),
        ]);
        let schedule = planner().plan(&request).unwrap();
        assert_eq!(schedule.entries[1].start, at(10, 0));
    }

    #[test]
    fn test_plan_clamps_containers() {
        let request =
            PlanRequest::new(1).with_ship(RawShip::new("Big", "2025-03-01", "00:00", 10_000, 50));
        let schedule = planner().plan(&request).unwrap();
        let e = &schedule.entries[0];
        assert_eq!(e.container_count, 5000);
        assert!((e.service_hours - 100.0).abs() < 1e-12);
        assert_eq!(e.end, at(0, 0) + TimeDelta::hours(100));
    }

    #[traced_test]
    #[test]
    fn test_plan_drops_zero_capacity() {
        let request = PlanRequest::new(1).with_ships([
            RawShip::new("A", "2025-03-01", "08:00", 100, 50),
            RawShip::new("Broken", "2025-03-01", "08:00", 100, 0),
        ]);
        let schedule = planner().plan(&request).unwrap();
        assert_eq!(schedule.entry_count(), 1);
        assert!(schedule.entry_for_ship("Broken").is_none());
        assert_eq!(schedule.rejected[0].error, ShipError::InvalidCapacity(0));
        assert!(!schedule.is_complete());
        assert!(logs_contain("berth plan complete"));
    }

    #[test]
    fn test_plan_strict_aborts() {
        let planner = BerthPlanner::new(
            PlannerConfig::default()
                .with_baseline(Baseline::At(at(0, 0)))
                .with_invalid_ships(InvalidShipPolicy::Strict),
        );
        let request = PlanRequest::new(1).with_ships([
            RawShip::new("A", "2025-03-01", "08:00", 100, 50),
            RawShip::new("Broken", "2025-03-01", "08:00", 100, 0),
        ]);
        let err = planner.plan(&request).unwrap_err();
        assert!(matches!(err, PlanError::InvalidShip { position: 1, .. }));
    }

    #[test]
    fn test_plan_no_valid_ships() {
        let err = planner().plan(&PlanRequest::new(2)).unwrap_err();
        assert_eq!(err, PlanError::NoValidShips { rejected: vec![] });

        let request = PlanRequest::new(2).with_ships([
            RawShip::new("A", "2025-13-01", "08:00", 100, 50),
            RawShip::new("B", "2025-03-01", "08:00", 100, -1),
        ]);
        match planner().plan(&request).unwrap_err() {
            PlanError::NoValidShips { rejected } => assert_eq!(rejected.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_horizon_bounds_every_end() {
        let mut rng = SmallRng::seed_from_u64(19);
        let fleet = random_fleet(&mut rng, 20);
        let horizon = scheduler().horizon(&fleet).unwrap();
        for berths in 1..4 {
            let makespan = Schedule::from_entries(scheduler().schedule(berths, &fleet))
                .makespan()
                .unwrap();
            assert!(makespan <= horizon, "berths={berths}");
        }
        assert_eq!(scheduler().horizon(&[]), Some(at(0, 0)));
    }

    #[test]
    fn test_plan_far_future_dates() {
        let request = PlanRequest::new(1).with_ships([
            RawShip::new("A", "2025-03-01", "08:00", 100, 50),
            RawShip::new("Far", "+262142-12-31", "23:00", 100, 50),
            RawShip::new("Last", "9999-12-31", "23:00", 5000, 1),
        ]);
        let schedule = planner().plan(&request).unwrap();
        assert_eq!(schedule.entry_count(), 2);
        assert_eq!(
            schedule.rejected[0].error,
            ShipError::YearOutOfRange("+262142-12-31".into())
        );
        assert_eq!(
            schedule.entry_for_ship("Last").unwrap().end,
            NaiveDate::from_ymd_opt(9999, 12, 31).unwrap().and_hms_opt(23, 0, 0).unwrap()
                + TimeDelta::hours(5000)
        );
    }

    #[test]
    fn test_plan_baseline_past_date_range() {
        let late = NaiveDate::MAX.and_hms_opt(0, 0, 0).unwrap();
        let planner = BerthPlanner::new(PlannerConfig::default().with_baseline(Baseline::At(late)));
        let request =
            PlanRequest::new(1).with_ship(RawShip::new("A", "2025-03-01", "08:00", 5000, 50));
        assert_eq!(
            planner.plan(&request).unwrap_err(),
            PlanError::HorizonOverflow { baseline: late }
        );
    }

    #[test]
    fn test_plan_configured_limit_capped() {
        let config: PlannerConfig = serde_json::from_str(
            r#"{"max_containers": 10000, "baseline": {"at": "2025-03-01T00:00:00"}}"#,
        )
        .unwrap();
        let request =
            PlanRequest::new(1).with_ship(RawShip::new("Big", "2025-03-01", "00:00", 8000, 50));
        let schedule = BerthPlanner::new(config).plan(&request).unwrap();
        assert_eq!(schedule.entries[0].container_count, 5000);
        assert!(validate_schedule(&schedule, 1).is_ok());
    }

    #[test]
    fn test_planner_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<BerthPlanner>();
    }
}

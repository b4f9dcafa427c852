//! Greedy berth scheduler and KPI evaluation.
//!
//! # Algorithm
//!
//! `GreedyScheduler` assigns ships in arrival order to whichever berth
//! frees up first. It is a fast baseline, not an optimal solver.
//! `BerthPlanner` wraps it with normalization of raw ship records.
//!
//! # KPI
//!
//! `ScheduleKpi` computes makespan, waiting and turnaround times, and
//! per-berth utilization.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 5
//! - Baker & Trietsch (2019), "Principles of Sequencing and Scheduling"

mod greedy;
mod kpi;

pub use greedy::{
    arrival_order, assign, clamp_berth_count, BerthPlanner, GreedyScheduler, PlanRequest,
};
pub use kpi::ScheduleKpi;

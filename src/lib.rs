//! Multi-berth port planning.
//!
//! Turns raw ship requests into a berth schedule: each ship is normalized
//! into a service duration, ships are ordered by arrival, and every ship is
//! placed on whichever berth frees up first.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `RawShip`, `ShipRequest`, `BerthState`,
//!   `ScheduleEntry`, `Schedule`, `ScheduleRow`
//! - **`normalizer`**: Raw field parsing and service duration derivation
//! - **`scheduler`**: Greedy earliest-free-berth scheduler and KPIs
//! - **`validation`**: Schedule integrity checks (overlaps, bounds, durations)
//! - **`config`**: Planner configuration (baseline, invalid ship policy)
//!
//! # Example
//!
//! ```
//! use berth_planner::config::{Baseline, PlannerConfig};
//! use berth_planner::models::RawShip;
//! use berth_planner::scheduler::{BerthPlanner, PlanRequest};
//!
//! let request = PlanRequest::new(2)
//!     .with_ship(RawShip::new("A", "2025-03-01", "08:00", 100, 50))
//!     .with_ship(RawShip::new("B", "2025-03-01", "09:00", 100, 50));
//!
//! let planner = BerthPlanner::new(
//!     PlannerConfig::default().with_baseline(Baseline::EarliestArrival),
//! );
//! let schedule = planner.plan(&request).unwrap();
//! assert_eq!(schedule.entry_count(), 2);
//! assert_eq!(schedule.entries[1].berth_label(), "Berth 2");
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 5
//! - Graham (1969), "Bounds on Multiprocessing Timing Anomalies"

pub mod config;
pub mod error;
pub mod models;
pub mod normalizer;
pub mod scheduler;
pub mod validation;

pub use error::{PlanError, Result, ShipError};

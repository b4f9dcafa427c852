//! Schedule integrity checks.
//!
//! Verifies the guarantees a consumer of a [`Schedule`] may rely on
//! without re-checking:
//! - Every entry sits on an existing berth
//! - `start <= end` and `start >= arrival`
//! - `end - start` matches the service duration
//! - Container counts stay within the clamp
//! - Entries on the same berth never overlap
//!
//! All violations are collected rather than stopping at the first.

use crate::config::MAX_CONTAINERS;
use crate::models::{delta_to_hours, Schedule};

/// Tolerance when comparing a span with its service hours (1 ms).
const DURATION_TOLERANCE_HOURS: f64 = 1.0 / 3_600_000.0;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Entry references a berth index outside the run.
    BerthOutOfRange,
    /// Entry ends before it starts.
    InvertedInterval,
    /// Service starts before the ship arrives.
    StartBeforeArrival,
    /// Occupied span differs from the service duration.
    DurationMismatch,
    /// Container count outside `[0, max_containers]` (never above 5000).
    ContainerBound,
    /// Two entries share a berth at the same time.
    Overlap,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a schedule produced for `berth_count` berths with the default
/// container clamp.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_schedule(schedule: &Schedule, berth_count: usize) -> ValidationResult {
    validate_schedule_with(schedule, berth_count, MAX_CONTAINERS)
}

/// Same as [`validate_schedule`] for a custom container clamp.
pub fn validate_schedule_with(
    schedule: &Schedule,
    berth_count: usize,
    max_containers: i64,
) -> ValidationResult {
    let mut errors = Vec::new();
    let berth_count = berth_count.max(1);

    for e in &schedule.entries {
        if e.berth_index >= berth_count {
            errors.push(ValidationError::new(
                ValidationErrorKind::BerthOutOfRange,
                format!(
                    "Ship '{}' assigned to berth {} of {}",
                    e.ship_name, e.berth_index, berth_count
                ),
            ));
        }

        if e.end < e.start {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvertedInterval,
                format!("Ship '{}' ends at {} before it starts at {}", e.ship_name, e.end, e.start),
            ));
        }

        if e.start < e.arrival {
            errors.push(ValidationError::new(
                ValidationErrorKind::StartBeforeArrival,
                format!(
                    "Ship '{}' starts at {} before arriving at {}",
                    e.ship_name, e.start, e.arrival
                ),
            ));
        }

        let span = delta_to_hours(e.duration());
        if (span - e.service_hours).abs() > DURATION_TOLERANCE_HOURS {
            errors.push(ValidationError::new(
                ValidationErrorKind::DurationMismatch,
                format!(
                    "Ship '{}' occupies {:.4}h but needs {:.4}h",
                    e.ship_name, span, e.service_hours
                ),
            ));
        }

        if !(0..=max_containers.clamp(0, MAX_CONTAINERS)).contains(&e.container_count) {
            errors.push(ValidationError::new(
                ValidationErrorKind::ContainerBound,
                format!("Ship '{}' has {} containers", e.ship_name, e.container_count),
            ));
        }
    }

    // Overlaps: sort each berth lane by start and compare neighbours
    for (berth, mut lane) in schedule.timeline() {
        lane.sort_by_key(|e| e.start);
        for pair in lane.windows(2) {
            if pair[0].overlaps(pair[1]) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::Overlap,
                    format!(
                        "Ships '{}' and '{}' overlap on berth {}",
                        pair[0].ship_name, pair[1].ship_name, berth
                    ),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

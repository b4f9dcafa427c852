//! Ship request models.
//!
//! A [`RawShip`] is what the presentation layer collects from the user;
//! a [`ShipRequest`] is the validated form the scheduler consumes.

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::config::MAX_CONTAINERS;
use crate::error::ShipError;

/// Minimum service time of any ship (hours).
pub const MIN_SERVICE_HOURS: f64 = 1.0;

const MICROS_PER_HOUR: f64 = 3_600_000_000.0;

/// Unvalidated ship fields as entered by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawShip {
    /// Ship name.
    pub name: String,
    /// Arrival date, e.g. `2025-03-01`.
    pub arrival_date: String,
    /// Arrival time of day, e.g. `08:00`.
    pub arrival_time: String,
    /// Containers to handle.
    pub container_count: i64,
    /// Containers handled per hour.
    pub crane_capacity: i64,
}

impl RawShip {
    /// Creates a raw ship record.
    pub fn new(
        name: impl Into<String>,
        arrival_date: impl Into<String>,
        arrival_time: impl Into<String>,
        container_count: i64,
        crane_capacity: i64,
    ) -> Self {
        Self {
            name: name.into(),
            arrival_date: arrival_date.into(),
            arrival_time: arrival_time.into(),
            container_count,
            crane_capacity,
        }
    }
}

/// A validated ship ready for scheduling.
///
/// # Invariants
/// - `name` is not blank
/// - `0 <= container_count <= max_containers <= 5000`
/// - `crane_capacity > 0`
/// - `service_hours >= 1.0`
/// - `arrival + service_duration()` is a representable timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipRequest {
    /// Ship name.
    pub name: String,
    /// Combined arrival date and time.
    pub arrival: NaiveDateTime,
    /// Containers to handle (clamped).
    pub container_count: i64,
    /// Containers handled per hour.
    pub crane_capacity: i64,
    /// Derived service time in hours.
    pub service_hours: f64,
}

impl ShipRequest {
    /// Validates the fields and derives the service duration, clamping the
    /// container count to [`MAX_CONTAINERS`].
    pub fn try_new(
        name: impl Into<String>,
        arrival: NaiveDateTime,
        container_count: i64,
        crane_capacity: i64,
    ) -> Result<Self, ShipError> {
        Self::try_new_clamped(name, arrival, container_count, crane_capacity, MAX_CONTAINERS)
    }

    /// Same as [`ShipRequest::try_new`] with an explicit container clamp.
    ///
    /// The clamp itself never exceeds [`MAX_CONTAINERS`].
    pub fn try_new_clamped(
        name: impl Into<String>,
        arrival: NaiveDateTime,
        container_count: i64,
        crane_capacity: i64,
        max_containers: i64,
    ) -> Result<Self, ShipError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ShipError::EmptyName);
        }
        if container_count < 0 {
            return Err(ShipError::NegativeContainers(container_count));
        }
        if crane_capacity <= 0 {
            return Err(ShipError::InvalidCapacity(crane_capacity));
        }

        let container_count = container_count.min(max_containers.clamp(0, MAX_CONTAINERS));
        let service_hours = service_hours(container_count, crane_capacity);
        if arrival
            .checked_add_signed(hours_to_delta(service_hours))
            .is_none()
        {
            return Err(ShipError::EndOutOfRange {
                arrival,
                service_hours,
            });
        }

        Ok(Self {
            name,
            arrival,
            container_count,
            crane_capacity,
            service_hours,
        })
    }

    /// Service time as a time span.
    #[inline]
    pub fn service_duration(&self) -> TimeDelta {
        hours_to_delta(self.service_hours)
    }
}

/// `max(1, containers / capacity)` in hours.
///
/// `capacity` must be positive.
pub fn service_hours(container_count: i64, crane_capacity: i64) -> f64 {
    (container_count as f64 / crane_capacity as f64).max(MIN_SERVICE_HOURS)
}

/// Converts fractional hours to a span, rounded to the microsecond.
pub fn hours_to_delta(hours: f64) -> TimeDelta {
    TimeDelta::microseconds((hours * MICROS_PER_HOUR).round() as i64)
}

/// Converts a span back to fractional hours.
pub fn delta_to_hours(delta: TimeDelta) -> f64 {
    match delta.num_microseconds() {
        Some(us) => us as f64 / MICROS_PER_HOUR,
        None => delta.num_seconds() as f64 / 3600.0,
    }
}

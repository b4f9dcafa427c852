//! Ship request normalization.
//!
//! Turns raw user fields into validated [`ShipRequest`]s:
//! - Parses arrival date and time into one timestamp, accepting only
//!   unsigned four-digit years (0001-9999)
//! - Rejects blank names, negative container counts and non-positive
//!   crane capacities
//! - Clamps container counts to the configured maximum
//! - Derives the service duration, never below one hour
//!
//! Batch normalization either skips and reports invalid ships or aborts on
//! the first one, depending on [`InvalidShipPolicy`].

use std::ops::RangeInclusive;

use chrono::{Datelike, NaiveDate, NaiveTime};
use tracing::warn;

use crate::config::{InvalidShipPolicy, PlannerConfig, DATE_FORMAT, MAX_CONTAINERS, TIME_FORMAT};
use crate::error::{ArrivalField, PlanError, ShipError};
use crate::models::{RawShip, ShipRequest};

/// Calendar years an arrival may fall in.
const YEAR_RANGE: RangeInclusive<i32> = 1..=9999;

/// A ship dropped during batch normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedShip {
    /// 0-based position in the submitted batch.
    pub position: usize,
    /// Ship name as submitted.
    pub name: String,
    /// Why it was rejected.
    pub error: ShipError,
}

/// Output of [`Normalizer::normalize_batch`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedBatch {
    /// Valid ships, in input order.
    pub ships: Vec<ShipRequest>,
    /// Invalid ships, in input order.
    pub rejected: Vec<RejectedShip>,
}

/// Raw-field parser and validator.
#[derive(Debug, Clone)]
pub struct Normalizer {
    max_containers: i64,
    date_format: String,
    time_format: String,
}

impl Normalizer {
    /// Creates a normalizer with default formats and container limit.
    pub fn new() -> Self {
        Self {
            max_containers: MAX_CONTAINERS,
            date_format: DATE_FORMAT.to_string(),
            time_format: TIME_FORMAT.to_string(),
        }
    }

    /// Creates a normalizer using the formats and limit from `config`.
    pub fn from_config(config: &PlannerConfig) -> Self {
        Self {
            max_containers: config.max_containers,
            date_format: config.date_format.clone(),
            time_format: config.time_format.clone(),
        }
    }

    /// Validates one raw ship.
    ///
    /// Leading and trailing whitespace around the date and time is ignored.
    pub fn normalize(&self, raw: &RawShip) -> Result<ShipRequest, ShipError> {
        if raw.name.trim().is_empty() {
            return Err(ShipError::EmptyName);
        }

        let date_str = raw.arrival_date.trim();
        let date = NaiveDate::parse_from_str(date_str, &self.date_format).map_err(|source| {
            ShipError::Parse {
                field: ArrivalField::Date,
                value: date_str.to_string(),
                source,
            }
        })?;
        // chrono's `%Y` also takes signed and extended years
        if date_str.contains('+') || !YEAR_RANGE.contains(&date.year()) {
            return Err(ShipError::YearOutOfRange(date_str.to_string()));
        }

        let time_str = raw.arrival_time.trim();
        let time = NaiveTime::parse_from_str(time_str, &self.time_format).map_err(|source| {
            ShipError::Parse {
                field: ArrivalField::Time,
                value: time_str.to_string(),
                source,
            }
        })?;

        ShipRequest::try_new_clamped(
            raw.name.clone(),
            date.and_time(time),
            raw.container_count,
            raw.crane_capacity,
            self.max_containers,
        )
    }

    /// Validates a batch under `policy`.
    ///
    /// # Errors
    /// - [`PlanError::InvalidShip`] for the first invalid ship under
    ///   [`InvalidShipPolicy::Strict`]
    pub fn normalize_batch(
        &self,
        raws: &[RawShip],
        policy: InvalidShipPolicy,
    ) -> Result<NormalizedBatch, PlanError> {
        let mut batch = NormalizedBatch::default();

        for (position, raw) in raws.iter().enumerate() {
            match self.normalize(raw) {
                Ok(ship) => batch.ships.push(ship),
                Err(error) => match policy {
                    InvalidShipPolicy::Strict => {
                        return Err(PlanError::InvalidShip {
                            position,
                            name: raw.name.clone(),
                            source: error,
                        });
                    }
                    InvalidShipPolicy::SkipAndReport => {
                        warn!(position, ship = %raw.name, %error, "skipping invalid ship");
                        batch.rejected.push(RejectedShip {
                            position,
                            name: raw.name.clone(),
                            error,
                        });
                    }
                },
            }
        }

        Ok(batch)
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

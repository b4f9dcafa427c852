//! Error types for ship normalization and planning runs.

use thiserror::Error;

use crate::normalizer::RejectedShip;

/// Which raw arrival field failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrivalField {
    /// Calendar date (`YYYY-MM-DD`).
    Date,
    /// Time of day (`HH:MM`, 24-hour).
    Time,
}

impl std::fmt::Display for ArrivalField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArrivalField::Date => write!(f, "arrival date"),
            ArrivalField::Time => write!(f, "arrival time"),
        }
    }
}

/// Why a single ship record could not be normalized.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShipError {
    #[error("invalid {field} '{value}': {source}")]
    Parse {
        field: ArrivalField,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("crane capacity must be positive, got {0}")]
    InvalidCapacity(i64),

    #[error("container count must not be negative, got {0}")]
    NegativeContainers(i64),

    #[error("ship name must not be empty")]
    EmptyName,

    /// Signed, extended or zero years are not accepted.
    #[error("arrival date '{0}' must use a four-digit year between 0001 and 9999")]
    YearOutOfRange(String),

    #[error("service of {service_hours:.1} hrs from {arrival} ends past the last representable date")]
    EndOutOfRange {
        arrival: chrono::NaiveDateTime,
        service_hours: f64,
    },
}

/// Top-level failure of a planning run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    /// Nothing was left to schedule after normalization.
    #[error("no valid ships to schedule ({} rejected)", .rejected.len())]
    NoValidShips { rejected: Vec<RejectedShip> },

    /// Berths would stay busy past the last representable date.
    #[error("schedule starting at {baseline} runs past the last representable date")]
    HorizonOverflow { baseline: chrono::NaiveDateTime },

    /// Raised under the strict policy for the first invalid ship.
    #[error("ship #{position} '{name}' is invalid: {source}")]
    InvalidShip {
        position: usize,
        name: String,
        #[source]
        source: ShipError,
    },
}

pub type Result<T> = std::result::Result<T, PlanError>;

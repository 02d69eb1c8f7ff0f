/// Error types for the workout tracker
///
/// Validation and geolocation failures are user-visible; registry integrity
/// errors are logged and absorbed by the app; persistence failures never
/// escape the storage adapter as anything but a warning.

use crate::workout::{ActivityKind, WorkoutId};
use std::fmt;

/// Numeric form field a validation error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Distance,
    Duration,
    Cadence,
    ElevationGain,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Distance => "Distance",
            Field::Duration => "Duration",
            Field::Cadence => "Cadence",
            Field::ElevationGain => "Elevation gain",
        };
        f.write_str(name)
    }
}

/// Rejected numeric input
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must be a number (got {raw:?})")]
    NotANumber { field: Field, raw: String },

    #[error("{0} must be a finite number")]
    NotFinite(Field),

    #[error("{0} must be a positive number")]
    NotPositive(Field),

    #[error("{} is out of range for this distance and duration", .0.metric_label())]
    MetricOverflow(ActivityKind),
}

impl ValidationError {
    /// Input field that failed validation; `None` for a derived metric
    pub fn field(&self) -> Option<Field> {
        match self {
            ValidationError::NotANumber { field, .. } => Some(*field),
            ValidationError::NotFinite(field) | ValidationError::NotPositive(field) => Some(*field),
            ValidationError::MetricOverflow(_) => None,
        }
    }
}

/// Geolocation request failure
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeolocationError {
    #[error("Location permission denied")]
    Denied,

    #[error("Location unavailable: {0}")]
    Unavailable(String),
}

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Couldn't get your location: {0}")]
    Geolocation(#[from] GeolocationError),

    #[error("Workout not found: {0}")]
    NotFound(WorkoutId),

    #[error("Duplicate workout id: {0}")]
    DuplicateId(WorkoutId),

    #[error("Form is not open")]
    FormNotArmed,

    #[error("Map is not initialized")]
    MapNotReady,

    #[error("Failed to read stored workouts: {0}")]
    PersistenceRead(String),

    #[error("Failed to save workouts: {0}")]
    PersistenceWrite(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Result type alias for app operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Core workout type definitions
///
/// A workout is a running or cycling activity pinned to the coordinate the
/// user clicked. The activity-specific payload is a tagged enum so the
/// persisted `type` discriminant and the in-memory shape are the same thing.

use crate::error::{Field, ValidationError};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque workout identifier
///
/// Join key between the registry entry, its list row and its map marker.
/// Stored as a string so ids written by older clients still load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkoutId(String);

impl WorkoutId {
    /// Generate a fresh random id
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WorkoutId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for WorkoutId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for WorkoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Latitude/longitude pair, persisted as `[lat, lng]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coords {
    pub lat: f64,
    pub lng: f64,
}

impl Coords {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<[f64; 2]> for Coords {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<Coords> for [f64; 2] {
    fn from(coords: Coords) -> Self {
        [coords.lat, coords.lng]
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lat, self.lng)
    }
}

/// Kind of activity, without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    #[default]
    Running,
    Cycling,
}

impl ActivityKind {
    /// Capitalized label used in descriptions
    pub fn label(self) -> &'static str {
        match self {
            ActivityKind::Running => "Running",
            ActivityKind::Cycling => "Cycling",
        }
    }

    /// Lowercase name used in CSS classes and the persisted discriminant
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityKind::Running => "running",
            ActivityKind::Cycling => "cycling",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            ActivityKind::Running => "🏃‍♂️",
            ActivityKind::Cycling => "🚴‍♀️",
        }
    }

    /// Name of the derived metric (pace or speed)
    pub fn metric_label(self) -> &'static str {
        match self {
            ActivityKind::Running => "Pace",
            ActivityKind::Cycling => "Speed",
        }
    }

    /// The other kind
    pub fn toggled(self) -> Self {
        match self {
            ActivityKind::Running => ActivityKind::Cycling,
            ActivityKind::Cycling => ActivityKind::Running,
        }
    }
}

/// Activity-specific fields and derived metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Activity {
    /// Cadence in steps/min, pace in min/km
    Running { cadence: f64, pace: f64 },
    /// Elevation gain in meters, speed in km/h
    Cycling {
        #[serde(rename = "elevationGain")]
        elevation_gain: f64,
        speed: f64,
    },
}

impl Activity {
    pub fn kind(&self) -> ActivityKind {
        match self {
            Activity::Running { .. } => ActivityKind::Running,
            Activity::Cycling { .. } => ActivityKind::Cycling,
        }
    }
}

/// Partial update applied on edit
///
/// Fields that do not belong to the workout's kind are ignored, so a running
/// workout never gains an elevation and a cycling one never gains a cadence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutPatch {
    pub distance: Option<f64>,
    pub duration: Option<f64>,
    pub cadence: Option<f64>,
    pub elevation_gain: Option<f64>,
}

/// A recorded activity tied to a map coordinate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    id: WorkoutId,
    coords: Coords,
    /// Kilometers
    distance: f64,
    /// Minutes
    duration: f64,
    date: DateTime<Utc>,
    description: String,
    #[serde(default)]
    clicks: u32,
    #[serde(flatten)]
    activity: Activity,
}

/// Check that a value is finite and strictly positive
pub fn validate_metric(field: Field, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite(field));
    }
    if value <= 0.0 {
        return Err(ValidationError::NotPositive(field));
    }
    Ok(value)
}

/// Pace in min/km (running) or speed in km/h (cycling)
pub fn derived_metric(kind: ActivityKind, distance: f64, duration: f64) -> Result<f64, ValidationError> {
    let value = match kind {
        ActivityKind::Running => duration / distance,
        ActivityKind::Cycling => distance / (duration / 60.0),
    };
    if !value.is_finite() {
        return Err(ValidationError::MetricOverflow(kind));
    }
    Ok(value)
}

impl Workout {
    /// Create a running workout at `coords`
    pub fn running(
        coords: Coords,
        distance: f64,
        duration: f64,
        cadence: f64,
    ) -> Result<Self, ValidationError> {
        let cadence = validate_metric(Field::Cadence, cadence)?;
        Self::build(coords, distance, duration, Activity::Running { cadence, pace: 0.0 })
    }

    /// Create a cycling workout at `coords`
    pub fn cycling(
        coords: Coords,
        distance: f64,
        duration: f64,
        elevation_gain: f64,
    ) -> Result<Self, ValidationError> {
        let elevation_gain = validate_metric(Field::ElevationGain, elevation_gain)?;
        Self::build(
            coords,
            distance,
            duration,
            Activity::Cycling { elevation_gain, speed: 0.0 },
        )
    }

    fn build(
        coords: Coords,
        distance: f64,
        duration: f64,
        activity: Activity,
    ) -> Result<Self, ValidationError> {
        let distance = validate_metric(Field::Distance, distance)?;
        let duration = validate_metric(Field::Duration, duration)?;

        let mut workout = Self {
            id: WorkoutId::generate(),
            coords,
            distance,
            duration,
            date: Utc::now(),
            description: String::new(),
            clicks: 0,
            activity,
        };
        workout.recompute_metrics()?;
        workout.description = workout.describe();
        Ok(workout)
    }

    /// Refresh pace (running) or speed (cycling) from distance and duration
    ///
    /// A metric that overflows to a non-finite value is rejected and the
    /// stored one is left as is.
    pub fn recompute_metrics(&mut self) -> Result<(), ValidationError> {
        let value = derived_metric(self.kind(), self.distance, self.duration)?;
        match &mut self.activity {
            Activity::Running { pace, .. } => *pace = value,
            Activity::Cycling { speed, .. } => *speed = value,
        }
        Ok(())
    }

    /// Label of the form "Running on April 14", in local time
    pub fn describe(&self) -> String {
        let local = self.date.with_timezone(&Local);
        format!("{} on {}", self.kind().label(), local.format("%B %-d"))
    }

    /// Merge a patch into this workout and recompute derived metrics
    ///
    /// Every supplied value is validated before anything is written, so a
    /// rejected patch leaves the workout untouched. The description is a
    /// creation-time label and is left as is.
    pub fn apply(&mut self, patch: &WorkoutPatch) -> Result<(), ValidationError> {
        let distance = patch
            .distance
            .map(|v| validate_metric(Field::Distance, v))
            .transpose()?;
        let duration = patch
            .duration
            .map(|v| validate_metric(Field::Duration, v))
            .transpose()?;

        let metric = match &self.activity {
            Activity::Running { .. } => patch
                .cadence
                .map(|v| validate_metric(Field::Cadence, v))
                .transpose()?,
            Activity::Cycling { .. } => patch
                .elevation_gain
                .map(|v| validate_metric(Field::ElevationGain, v))
                .transpose()?,
        };

        derived_metric(
            self.kind(),
            distance.unwrap_or(self.distance),
            duration.unwrap_or(self.duration),
        )?;

        if let Some(distance) = distance {
            self.distance = distance;
        }
        if let Some(duration) = duration {
            self.duration = duration;
        }
        if let Some(value) = metric {
            match &mut self.activity {
                Activity::Running { cadence, .. } => *cadence = value,
                Activity::Cycling { elevation_gain, .. } => *elevation_gain = value,
            }
        }

        self.recompute_metrics()
    }

    /// Re-check the numeric invariants (used for records read back from storage)
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_metric(Field::Distance, self.distance)?;
        validate_metric(Field::Duration, self.duration)?;
        match self.activity {
            Activity::Running { cadence, .. } => validate_metric(Field::Cadence, cadence)?,
            Activity::Cycling { elevation_gain, .. } => {
                validate_metric(Field::ElevationGain, elevation_gain)?
            }
        };
        Ok(())
    }

    /// Count a re-selection from the list
    pub fn click(&mut self) {
        self.clicks += 1;
    }

    pub fn id(&self) -> &WorkoutId {
        &self.id
    }

    pub fn coords(&self) -> Coords {
        self.coords
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn clicks(&self) -> u32 {
        self.clicks
    }

    pub fn activity(&self) -> &Activity {
        &self.activity
    }

    pub fn kind(&self) -> ActivityKind {
        self.activity.kind()
    }

    /// Minutes per kilometer, running only
    pub fn pace(&self) -> Option<f64> {
        match self.activity {
            Activity::Running { pace, .. } => Some(pace),
            Activity::Cycling { .. } => None,
        }
    }

    /// Kilometers per hour, cycling only
    pub fn speed(&self) -> Option<f64> {
        match self.activity {
            Activity::Cycling { speed, .. } => Some(speed),
            Activity::Running { .. } => None,
        }
    }

    pub fn cadence(&self) -> Option<f64> {
        match self.activity {
            Activity::Running { cadence, .. } => Some(cadence),
            Activity::Cycling { .. } => None,
        }
    }

    pub fn elevation_gain(&self) -> Option<f64> {
        match self.activity {
            Activity::Cycling { elevation_gain, .. } => Some(elevation_gain),
            Activity::Running { .. } => None,
        }
    }
}

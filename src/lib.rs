/// Mapty: map-based running and cycling workout tracker
///
/// The user clicks a point on the map, fills a small form, and the tracker
/// records a running or cycling workout pinned to that point, persists it,
/// and shows it both as a list row and as a map marker.

// Core configuration and setup
pub mod config;

// Error types shared by every layer
pub mod error;

// Workout model, in-memory registry and persistence slot
pub mod workout;

// Map surface, geolocation and marker binding
pub mod map;

// Form controller and list renderer
pub mod ui;

// App wiring and event dispatch
pub mod app;

// Re-export commonly used types for external consumers
pub use app::{create_app, start_app, App, HeadlessApp, UiEvent};
pub use error::{AppError, Result};
pub use workout::{Activity, ActivityKind, Coords, Workout, WorkoutId, WorkoutPatch};

/// Workout layer
///
/// - Type definitions (Workout, Activity, Coords, WorkoutId)
/// - In-memory registry, the session's single source of truth
/// - SQLite persistence slot with sqlx

// Core workout types and derived metrics
pub mod types;

// Ordered in-memory collection
pub mod registry;

// Persistence adapter for the registry snapshot
pub mod storage;

pub use registry::WorkoutRegistry;
pub use storage::WorkoutStorage;
pub use types::{Activity, ActivityKind, Coords, Workout, WorkoutId, WorkoutPatch};

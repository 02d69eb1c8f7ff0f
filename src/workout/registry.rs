/// In-memory workout registry
///
/// Ordered, insertion-ordered collection of workouts and the single source of
/// truth for the session. The storage adapter and the list renderer only ever
/// see a read-only slice or a full replacement.

use crate::error::{AppError, Result};
use crate::workout::types::{Workout, WorkoutId, WorkoutPatch};
use std::collections::HashSet;

/// Ordered workout collection with unique ids
#[derive(Debug, Default, Clone)]
pub struct WorkoutRegistry {
    workouts: Vec<Workout>,
}

impl WorkoutRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a workout
    ///
    /// Ids are generated at creation, so a duplicate here is an integrity bug
    /// in the caller; the registry refuses it instead of holding two entries.
    pub fn add(&mut self, workout: Workout) -> Result<&Workout> {
        if self.position(workout.id()).is_some() {
            return Err(AppError::DuplicateId(workout.id().clone()));
        }

        tracing::info!("Added {} workout: {}", workout.kind().as_str(), workout.id());
        self.workouts.push(workout);
        let last = self.workouts.len() - 1;
        Ok(&self.workouts[last])
    }

    pub fn find_by_id(&self, id: &WorkoutId) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id() == id)
    }

    /// Merge a patch into the workout with `id` and recompute its metrics
    pub fn update(&mut self, id: &WorkoutId, patch: &WorkoutPatch) -> Result<&Workout> {
        let index = self
            .position(id)
            .ok_or_else(|| AppError::NotFound(id.clone()))?;

        let workout = &mut self.workouts[index];
        workout.apply(patch)?;

        tracing::info!("Updated workout: {}", id);
        Ok(&*workout)
    }

    /// Count a re-selection of the workout with `id`
    pub fn record_click(&mut self, id: &WorkoutId) -> Result<&Workout> {
        let index = self
            .position(id)
            .ok_or_else(|| AppError::NotFound(id.clone()))?;

        let workout = &mut self.workouts[index];
        workout.click();
        Ok(&*workout)
    }

    /// Remove the workout with `id`, returning it for marker and row cleanup
    pub fn remove(&mut self, id: &WorkoutId) -> Result<Workout> {
        let index = self
            .position(id)
            .ok_or_else(|| AppError::NotFound(id.clone()))?;

        let removed = self.workouts.remove(index);
        tracing::info!("Removed workout from registry: {}", id);
        Ok(removed)
    }

    /// All workouts in insertion order
    pub fn all(&self) -> &[Workout] {
        &self.workouts
    }

    /// Replace the whole collection (restore from storage, reset)
    ///
    /// Later entries repeating an earlier id are dropped.
    pub fn replace_all(&mut self, workouts: Vec<Workout>) {
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(workouts.len());

        for workout in workouts {
            if seen.insert(workout.id().clone()) {
                kept.push(workout);
            } else {
                tracing::warn!("Dropping workout with duplicate id: {}", workout.id());
            }
        }

        self.workouts = kept;
        tracing::info!("Workout registry now holds {} workouts", self.workouts.len());
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }

    fn position(&self, id: &WorkoutId) -> Option<usize> {
        self.workouts.iter().position(|w| w.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workout::types::Coords;

    fn run(distance: f64) -> Workout {
        Workout::running(Coords::new(51.5, -0.12), distance, 25.0, 150.0).unwrap()
    }

    fn ride() -> Workout {
        Workout::cycling(Coords::new(40.4, -3.7), 30.0, 60.0, 400.0).unwrap()
    }

    #[test]
    fn test_add_keeps_insertion_order() {
        let mut registry = WorkoutRegistry::new();
        let a = run(5.0);
        let b = ride();
        let ids = vec![a.id().clone(), b.id().clone()];

        registry.add(a).unwrap();
        registry.add(b).unwrap();

        let stored: Vec<_> = registry.all().iter().map(|w| w.id().clone()).collect();
        assert_eq!(stored, ids);
    }

    #[test]
    fn test_add_rejects_duplicate_id() {
        let mut registry = WorkoutRegistry::new();
        let a = run(5.0);
        registry.add(a.clone()).unwrap();

        assert!(matches!(registry.add(a), Err(AppError::DuplicateId(_))));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_then_find_is_not_found() {
        let mut registry = WorkoutRegistry::new();
        let a = run(5.0);
        let id = a.id().clone();
        registry.add(a).unwrap();
        registry.add(ride()).unwrap();

        let removed = registry.remove(&id).unwrap();
        assert_eq!(removed.id(), &id);
        assert_eq!(registry.len(), 1);
        assert!(registry.find_by_id(&id).is_none());
        assert!(matches!(registry.remove(&id), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_update_unknown_id_is_not_found() {
        let mut registry = WorkoutRegistry::new();
        let result = registry.update(&WorkoutId::from("missing"), &WorkoutPatch::default());
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_update_running_never_gains_elevation() {
        let mut registry = WorkoutRegistry::new();
        let a = run(5.0);
        let id = a.id().clone();
        registry.add(a).unwrap();

        let patch = WorkoutPatch {
            distance: Some(10.0),
            elevation_gain: Some(250.0),
            ..Default::default()
        };
        let updated = registry.update(&id, &patch).unwrap();
        assert_eq!(updated.elevation_gain(), None);
        assert!((updated.pace().unwrap() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_update_is_rejected() {
        let mut registry = WorkoutRegistry::new();
        let a = run(5.0);
        let id = a.id().clone();
        registry.add(a).unwrap();

        let patch = WorkoutPatch {
            duration: Some(0.0),
            ..Default::default()
        };
        assert!(matches!(
            registry.update(&id, &patch),
            Err(AppError::Validation(_))
        ));
        assert_eq!(registry.find_by_id(&id).unwrap().duration(), 25.0);
    }

    #[test]
    fn test_record_click_increments_counter() {
        let mut registry = WorkoutRegistry::new();
        let a = run(5.0);
        let id = a.id().clone();
        registry.add(a).unwrap();

        registry.record_click(&id).unwrap();
        registry.record_click(&id).unwrap();
        assert_eq!(registry.find_by_id(&id).unwrap().clicks(), 2);
    }

    #[test]
    fn test_replace_all_drops_repeated_ids() {
        let mut registry = WorkoutRegistry::new();
        registry.add(run(1.0)).unwrap();

        let a = run(5.0);
        registry.replace_all(vec![a.clone(), ride(), a]);
        assert_eq!(registry.len(), 2);

        registry.replace_all(Vec::new());
        assert!(registry.is_empty());
    }
}

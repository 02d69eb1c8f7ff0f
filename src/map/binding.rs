/// Binding between workouts and map markers
///
/// Keeps the workout id -> marker handle mapping. The mapping is never
/// persisted; it is rebuilt from the registry every time the map comes up.

use crate::error::{AppError, Result};
use crate::map::surface::{MapSurface, MarkerHandle, Popup};
use crate::workout::{Coords, Workout, WorkoutId};
use std::collections::HashMap;

/// Current view of an initialized map
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub center: Coords,
    pub zoom: u8,
}

/// Marker layer manager for one map surface
#[derive(Debug)]
pub struct MapBinding<M: MapSurface> {
    surface: M,
    /// Set once geolocation resolved and the view was initialized
    view: Option<MapView>,
    markers: HashMap<WorkoutId, MarkerHandle>,
}

impl<M: MapSurface> MapBinding<M> {
    pub fn new(surface: M) -> Self {
        Self {
            surface,
            view: None,
            markers: HashMap::new(),
        }
    }

    /// Center the map and add the tile layer
    pub fn initialize(
        &mut self,
        center: Coords,
        zoom: u8,
        tile_url: &str,
        attribution: &str,
    ) -> MapView {
        self.surface.set_view(center, zoom, false);
        self.surface.add_tile_layer(tile_url, attribution);

        let view = MapView { center, zoom };
        self.view = Some(view);

        tracing::info!("🗺️ Map initialized at {} (zoom {})", center, zoom);
        view
    }

    pub fn is_ready(&self) -> bool {
        self.view.is_some()
    }

    pub fn view(&self) -> Option<MapView> {
        self.view
    }

    /// Accept a click from the map surface
    ///
    /// Clicks that arrive before the map is initialized are ignored.
    pub fn map_clicked(&self, coords: Coords) -> Result<Coords> {
        if !self.is_ready() {
            tracing::debug!("Ignoring map click at {}: map not initialized", coords);
            return Err(AppError::MapNotReady);
        }
        Ok(coords)
    }

    /// Place the marker for `workout`, replacing any marker it already has
    pub fn render_marker(&mut self, workout: &Workout) -> Result<MarkerHandle> {
        if !self.is_ready() {
            return Err(AppError::MapNotReady);
        }

        self.remove_marker(workout.id());

        let handle = self
            .surface
            .add_marker(workout.coords(), &Popup::for_workout(workout));
        self.markers.insert(workout.id().clone(), handle);

        tracing::debug!("📍 Marker {:?} placed for workout {}", handle, workout.id());
        Ok(handle)
    }

    /// Render markers for every workout (after the map comes up)
    pub fn replay<'a>(&mut self, workouts: impl IntoIterator<Item = &'a Workout>) -> Result<usize> {
        let mut count = 0;
        for workout in workouts {
            self.render_marker(workout)?;
            count += 1;
        }
        Ok(count)
    }

    /// Remove the marker bound to `id`, if any
    pub fn remove_marker(&mut self, id: &WorkoutId) -> Option<MarkerHandle> {
        let handle = self.markers.remove(id)?;
        self.surface.remove_layer(handle);
        Some(handle)
    }

    /// Remove every marker layer on the surface
    pub fn clear_markers(&mut self) {
        for handle in self.surface.layers() {
            self.surface.remove_layer(handle);
        }
        self.markers.clear();
    }

    /// Move the view to `coords`
    pub fn recenter(&mut self, coords: Coords, zoom: u8, animate: bool) -> Result<()> {
        if !self.is_ready() {
            return Err(AppError::MapNotReady);
        }

        self.surface.set_view(coords, zoom, animate);
        self.view = Some(MapView { center: coords, zoom });
        Ok(())
    }

    pub fn marker_for(&self, id: &WorkoutId) -> Option<MarkerHandle> {
        self.markers.get(id).copied()
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn surface(&self) -> &M {
        &self.surface
    }
}

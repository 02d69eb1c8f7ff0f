/// Headless map and geolocation hosts
///
/// Record what the tracker asked the map to do instead of drawing it, and
/// report a fixed location. Used by the binary and by tests.

use crate::error::GeolocationError;
use crate::map::surface::{Geolocator, MapSurface, MarkerHandle, Popup};
use crate::workout::Coords;
use std::collections::BTreeMap;

/// Marker as placed on the headless map
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedMarker {
    pub coords: Coords,
    pub popup: Popup,
}

/// In-memory map surface
#[derive(Debug, Default)]
pub struct HeadlessMap {
    view: Option<(Coords, u8)>,
    animated_moves: usize,
    tile_layers: Vec<(String, String)>,
    markers: BTreeMap<MarkerHandle, PlacedMarker>,
    next_handle: u64,
}

impl HeadlessMap {
    /// Current center and zoom
    pub fn view(&self) -> Option<(Coords, u8)> {
        self.view
    }

    /// Number of animated view changes (recenter on a selected workout)
    pub fn animated_moves(&self) -> usize {
        self.animated_moves
    }

    pub fn tile_layers(&self) -> &[(String, String)] {
        &self.tile_layers
    }

    pub fn markers(&self) -> &BTreeMap<MarkerHandle, PlacedMarker> {
        &self.markers
    }

    pub fn marker(&self, handle: MarkerHandle) -> Option<&PlacedMarker> {
        self.markers.get(&handle)
    }
}

impl MapSurface for HeadlessMap {
    fn set_view(&mut self, center: Coords, zoom: u8, animate: bool) {
        tracing::debug!("set_view {} zoom={} animate={}", center, zoom, animate);
        if animate {
            self.animated_moves += 1;
        }
        self.view = Some((center, zoom));
    }

    fn add_tile_layer(&mut self, url_template: &str, attribution: &str) {
        self.tile_layers
            .push((url_template.to_string(), attribution.to_string()));
    }

    fn add_marker(&mut self, coords: Coords, popup: &Popup) -> MarkerHandle {
        self.next_handle += 1;
        let handle = MarkerHandle(self.next_handle);
        tracing::debug!("marker {:?} at {}: {}", handle, coords, popup.content);
        self.markers.insert(
            handle,
            PlacedMarker {
                coords,
                popup: popup.clone(),
            },
        );
        handle
    }

    fn remove_layer(&mut self, handle: MarkerHandle) {
        self.markers.remove(&handle);
    }

    fn layers(&self) -> Vec<MarkerHandle> {
        self.markers.keys().copied().collect()
    }
}

/// Geolocator that always reports the same coordinate
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coords);

impl Geolocator for FixedLocation {
    async fn current_position(&self) -> Result<Coords, GeolocationError> {
        Ok(self.0)
    }
}

/// Geolocator whose permission request is always refused
#[derive(Debug, Clone, Copy, Default)]
pub struct DeniedLocation;

impl Geolocator for DeniedLocation {
    async fn current_position(&self) -> Result<Coords, GeolocationError> {
        Err(GeolocationError::Denied)
    }
}

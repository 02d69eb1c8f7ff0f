/// Host-side map and geolocation capabilities
///
/// The tile-rendering map and the geolocation service belong to the host.
/// The tracker only needs the handful of calls below.

use crate::error::GeolocationError;
use crate::workout::{Coords, Workout};
use std::future::Future;

/// Opaque handle of a marker layer placed on the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerHandle(pub u64);

/// Popup bound to a workout marker
#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    /// HTML content ("<icon> <description>")
    pub content: String,
    /// CSS class, e.g. "running-popup"
    pub class_name: String,
    pub max_width: u32,
    pub min_width: u32,
    /// Keep the popup open when another one opens
    pub auto_close: bool,
    /// Keep the popup open when the map is clicked
    pub close_on_click: bool,
}

impl Popup {
    pub fn for_workout(workout: &Workout) -> Self {
        let kind = workout.kind();
        Self {
            content: format!("{} {}", kind.icon(), workout.description()),
            class_name: format!("{}-popup", kind.as_str()),
            max_width: 250,
            min_width: 100,
            auto_close: false,
            close_on_click: false,
        }
    }
}

/// Map collaborator
///
/// Click events are delivered by the host as
/// [`UiEvent::MapClicked`](crate::app::UiEvent::MapClicked).
pub trait MapSurface {
    /// Center the view on `center` at `zoom`
    fn set_view(&mut self, center: Coords, zoom: u8, animate: bool);

    /// Add a raster tile layer
    fn add_tile_layer(&mut self, url_template: &str, attribution: &str);

    /// Place a marker with an open popup and return its handle
    fn add_marker(&mut self, coords: Coords, popup: &Popup) -> MarkerHandle;

    /// Remove a previously placed marker
    fn remove_layer(&mut self, handle: MarkerHandle);

    /// Every marker layer currently on the map
    fn layers(&self) -> Vec<MarkerHandle>;
}

/// Geolocation collaborator
///
/// Resolves once with the current coordinate or fails; there is no retry.
pub trait Geolocator {
    fn current_position(&self) -> impl Future<Output = Result<Coords, GeolocationError>>;
}

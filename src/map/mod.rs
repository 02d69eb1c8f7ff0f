/// Map layer
///
/// - Host capabilities (map surface, geolocation)
/// - Workout id -> marker binding
/// - Headless hosts for the binary and tests

pub mod surface;

pub mod binding;

pub mod headless;

pub use binding::{MapBinding, MapView};
pub use headless::{DeniedLocation, FixedLocation, HeadlessMap};
pub use surface::{Geolocator, MapSurface, MarkerHandle, Popup};

/// Configuration management for the workout tracker
///
/// Handles map presentation, the persistence slot location, and the fallback
/// home coordinate used when the host has no real geolocation.

use crate::workout::Coords;
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Map view configuration
    pub map: MapConfig,
    /// Persistence slot configuration
    pub storage: StorageConfig,
    /// Fixed location configuration
    pub location: LocationConfig,
}

/// Map view and tile layer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// Zoom level for the initial view and for recentering on a workout
    pub zoom: u8,
    /// Tile URL template (e.g., "https://tile.openstreetmap.org/{z}/{x}/{y}.png")
    pub tile_url: String,
    /// Attribution shown with the tile layer
    pub attribution: String,
}

/// Persistence slot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite database file holding the slot table (default: "data/mapty.db")
    pub database_path: String,
    /// Name of the slot the workouts blob is stored under
    pub slot_key: String,
}

/// Home coordinate reported by the fixed geolocator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
}

impl LocationConfig {
    pub fn coords(&self) -> Coords {
        Coords::new(self.latitude, self.longitude)
    }
}

const DEFAULT_TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
const DEFAULT_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    /// Default configuration with ENV_VAR overrides
    fn default() -> Self {
        Self {
            map: MapConfig {
                zoom: env_or("MAPTY_ZOOM", 13),
                tile_url: std::env::var("MAPTY_TILE_URL")
                    .unwrap_or_else(|_| DEFAULT_TILE_URL.to_string()),
                attribution: DEFAULT_ATTRIBUTION.to_string(),
            },
            storage: StorageConfig {
                database_path: std::env::var("MAPTY_DB_PATH")
                    .unwrap_or_else(|_| "data/mapty.db".to_string()),
                slot_key: std::env::var("MAPTY_SLOT_KEY")
                    .unwrap_or_else(|_| "workouts".to_string()),
            },
            location: LocationConfig {
                latitude: env_or("MAPTY_HOME_LAT", 51.5),
                longitude: env_or("MAPTY_HOME_LNG", -0.12),
            },
        }
    }
}

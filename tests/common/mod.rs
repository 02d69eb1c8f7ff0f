//! Shared helpers for integration tests.

#![allow(dead_code)]

use mapty::config::MapConfig;
use mapty::map::{FixedLocation, HeadlessMap};
use mapty::ui::{HeadlessForm, HeadlessList, HeadlessNotifier};
use mapty::workout::storage::{open_in_memory_pool, WorkoutStorage};
use mapty::{App, Coords, HeadlessApp};

pub const ZOOM: u8 = 13;

pub fn home() -> Coords {
    Coords::new(51.5, -0.12)
}

pub fn map_config() -> MapConfig {
    MapConfig {
        zoom: ZOOM,
        tile_url: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
        attribution: "OpenStreetMap contributors".to_string(),
    }
}

/// Storage over a fresh in-memory database with the slot table created.
pub async fn memory_storage() -> WorkoutStorage {
    let pool = open_in_memory_pool()
        .await
        .expect("Failed to open in-memory database");
    let storage = WorkoutStorage::new(pool, "workouts");
    storage.init_schema().await.expect("Failed to create slot table");
    storage
}

/// App over `storage` with headless hosts, not yet started.
pub fn app_with(storage: WorkoutStorage) -> HeadlessApp {
    App::new(
        map_config(),
        storage,
        HeadlessMap::default(),
        HeadlessForm::default(),
        HeadlessList::default(),
        HeadlessNotifier::default(),
    )
}

/// Started app on a fresh database, map centered on `home()`.
pub async fn started_app() -> HeadlessApp {
    let mut app = app_with(memory_storage().await);
    app.start(&FixedLocation(home()))
        .await
        .expect("Fixed location should always start the map");
    app
}

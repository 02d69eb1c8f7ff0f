//! Persistence slot behaviour: round trips, absent or corrupted blobs, and
//! write failures.

mod common;

use common::{app_with, home, memory_storage, started_app};
use mapty::map::FixedLocation;
use mapty::ui::RawFields;
use mapty::{ActivityKind, Coords, UiEvent, Workout};

fn sample_workouts() -> Vec<Workout> {
    vec![
        Workout::running(Coords::new(51.5, -0.12), 5.0, 25.0, 150.0).unwrap(),
        Workout::cycling(Coords::new(51.52, -0.09), 27.0, 95.0, 523.0).unwrap(),
        Workout::running(Coords::new(51.48, -0.15), 10.0, 52.5, 172.0).unwrap(),
    ]
}

#[tokio::test]
async fn test_save_then_load_round_trips() {
    let storage = memory_storage().await;
    let workouts = sample_workouts();

    storage.save(&workouts).await.unwrap();
    let loaded = storage.load().await;

    assert_eq!(loaded, workouts);
    assert_eq!(loaded[1].kind(), ActivityKind::Cycling);
    assert_eq!(loaded[1].elevation_gain(), Some(523.0));
}

#[tokio::test]
async fn test_save_overwrites_previous_snapshot() {
    let storage = memory_storage().await;
    let workouts = sample_workouts();

    storage.save(&workouts).await.unwrap();
    storage.save(&workouts[..1]).await.unwrap();

    assert_eq!(storage.load().await, workouts[..1].to_vec());
}

#[tokio::test]
async fn test_persisted_record_layout() {
    let storage = memory_storage().await;
    storage.save(&sample_workouts()[..2]).await.unwrap();

    let blob = storage.read_slot().await.unwrap().unwrap();
    let records: serde_json::Value = serde_json::from_str(&blob).unwrap();

    let run = &records[0];
    assert_eq!(run["type"], "running");
    assert_eq!(run["coords"], serde_json::json!([51.5, -0.12]));
    for key in ["id", "distance", "duration", "date", "description", "cadence", "pace", "clicks"] {
        assert!(run.get(key).is_some(), "running record missing {}", key);
    }

    let ride = &records[1];
    assert_eq!(ride["type"], "cycling");
    assert!(ride.get("elevationGain").is_some());
    assert!(ride.get("speed").is_some());
    assert!(ride.get("cadence").is_none());
}

#[tokio::test]
async fn test_load_empty_slot_is_empty() {
    let storage = memory_storage().await;
    assert!(storage.load().await.is_empty());
}

#[tokio::test]
async fn test_load_corrupted_slot_is_empty() {
    let storage = memory_storage().await;

    for blob in ["", "not json", "{\"type\":\"running\"}", "[{\"type\":\"swimming\"}]"] {
        storage.write_slot(blob).await.unwrap();
        assert!(storage.load().await.is_empty(), "blob {:?} should load as empty", blob);
    }
}

#[tokio::test]
async fn test_load_without_schema_is_empty() {
    let pool = mapty::workout::storage::open_in_memory_pool().await.unwrap();
    let storage = mapty::workout::WorkoutStorage::new(pool, "workouts");
    assert!(storage.load().await.is_empty());
}

#[tokio::test]
async fn test_load_skips_invalid_records_and_recomputes_metrics() {
    let storage = memory_storage().await;
    let blob = r#"[
        {"type":"running","id":"1700000001","coords":[51.5,-0.12],"distance":5,"duration":25,
         "date":"2024-04-14T09:30:00Z","description":"Running on April 14","cadence":150,"pace":99,"clicks":2},
        {"type":"running","id":"1700000002","coords":[51.5,-0.12],"distance":-1,"duration":25,
         "date":"2024-04-14T09:30:00Z","description":"Running on April 14","cadence":150,"pace":1,"clicks":0},
        {"type":"cycling","id":"1700000001","coords":[51.5,-0.12],"distance":20,"duration":60,
         "date":"2024-04-15T09:30:00Z","description":"Cycling on April 15","elevationGain":300,"speed":20,"clicks":0}
    ]"#;
    storage.write_slot(blob).await.unwrap();

    let loaded = storage.load().await;
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id().as_str(), "1700000001");
    assert_eq!(loaded[0].clicks(), 2);
    assert!((loaded[0].pace().unwrap() - 5.0).abs() < 1e-9);
    assert_eq!(loaded[0].description(), "Running on April 14");
}

#[tokio::test]
async fn test_load_skips_unreadable_records() {
    let storage = memory_storage().await;
    let blob = r#"[
        {"type":"running","id":"good","coords":[51.5,-0.12],"distance":5,"duration":25,
         "date":"2024-04-14T09:30:00Z","description":"Running on April 14","cadence":150,"pace":5},
        {"type":"running","id":"no-date","coords":[51.5,-0.12],"distance":5,"duration":25,
         "description":"Running on April 14","cadence":150,"pace":5},
        {"type":"swimming","id":"unknown-type","coords":[51.5,-0.12],"distance":1,"duration":30,
         "date":"2024-04-14T09:30:00Z","description":"Swimming on April 14"},
        {"type":"running","id":"null-pace","coords":[51.5,-0.12],"distance":5,"duration":25,
         "date":"2024-04-14T09:30:00Z","description":"Running on April 14","cadence":150,"pace":null}
    ]"#;
    storage.write_slot(blob).await.unwrap();

    let loaded = storage.load().await;
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id().as_str(), "good");
}

#[tokio::test]
async fn test_load_skips_records_whose_metric_overflows() {
    let storage = memory_storage().await;
    let blob = r#"[
        {"type":"running","id":"ok","coords":[51.5,-0.12],"distance":5,"duration":25,
         "date":"2024-04-14T09:30:00Z","description":"Running on April 14","cadence":150,"pace":5},
        {"type":"running","id":"huge","coords":[51.5,-0.12],"distance":1e-300,"duration":1e10,
         "date":"2024-04-14T09:30:00Z","description":"Running on April 14","cadence":150,"pace":1}
    ]"#;
    storage.write_slot(blob).await.unwrap();

    let loaded = storage.load().await;
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id().as_str(), "ok");
}

#[tokio::test]
async fn test_overflowing_submit_keeps_saved_workouts() {
    let storage = memory_storage().await;

    let mut first = app_with(storage.clone());
    first.start(&FixedLocation(home())).await.unwrap();
    first.handle_event(UiEvent::MapClicked(home())).await;
    first
        .handle_event(UiEvent::FormSubmitted(RawFields::running("5", "25", "150")))
        .await;
    first.handle_event(UiEvent::MapClicked(home())).await;
    first
        .handle_event(UiEvent::FormSubmitted(RawFields::running("1e-300", "1e10", "150")))
        .await;

    assert_eq!(first.workouts().len(), 1);
    assert_eq!(first.notifier().alerts().len(), 1);
    assert!(first.notifier().alerts()[0].contains("Pace is out of range"));

    let mut second = app_with(storage);
    assert_eq!(second.restore().await, 1);
    assert_eq!(second.workouts(), first.workouts());
}

#[tokio::test]
async fn test_restore_replays_rows_and_markers() {
    let storage = memory_storage().await;
    let workouts = sample_workouts();
    storage.save(&workouts).await.unwrap();

    let mut app = app_with(storage);
    assert_eq!(app.restore().await, workouts.len());
    assert_eq!(app.list().row_count(), workouts.len());
    assert_eq!(app.map().marker_count(), 0);

    app.start(&FixedLocation(home())).await.unwrap();
    assert_eq!(app.map().marker_count(), workouts.len());
    for workout in &workouts {
        assert!(app.map().marker_for(workout.id()).is_some());
    }

    // Restoring again does not duplicate rows or markers
    app.restore().await;
    assert_eq!(app.list().row_count(), workouts.len());
    assert_eq!(app.map().surface().markers().len(), workouts.len());
}

#[tokio::test]
async fn test_session_survives_into_next_session() {
    let storage = memory_storage().await;

    let mut first = app_with(storage.clone());
    first.start(&FixedLocation(home())).await.unwrap();
    first.handle_event(UiEvent::MapClicked(home())).await;
    first
        .handle_event(UiEvent::FormSubmitted(RawFields::running("5", "25", "150")))
        .await;
    let created = first.workouts()[0].clone();

    let mut second = app_with(storage);
    second.restore().await;
    assert_eq!(second.workouts(), &[created]);
}

#[tokio::test]
async fn test_write_failure_degrades_to_memory() {
    let mut app = started_app().await;
    app.storage().pool().close().await;

    app.handle_event(UiEvent::MapClicked(home())).await;
    app.handle_event(UiEvent::FormSubmitted(RawFields::running("5", "25", "150")))
        .await;

    assert_eq!(app.workouts().len(), 1);
    assert_eq!(app.list().row_count(), 1);
    assert!(app.persistence_degraded());
    assert!(app.notifier().alerts().is_empty());
}

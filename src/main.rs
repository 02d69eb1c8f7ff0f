/// Mapty: map-based running and cycling workout tracker
///
/// Entry point for a headless session. Restores the saved workouts, centers
/// the map on the configured home location and logs what would be shown.

use mapty::{config::Config, start_app};

/// Application entry point
///
/// Configuration comes from MAPTY_* environment variables (see `Config`).
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();

    start_app(config).await?;

    Ok(())
}

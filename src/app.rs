/// Application wiring and event dispatch
///
/// Owns the registry and drives every collaborator: the form controller, the
/// list renderer, the map binding and the persistence slot. Every mutation of
/// the registry is followed by a full snapshot save.

use crate::{
    config::{Config, MapConfig},
    error::{AppError, Result},
    map::{FixedLocation, Geolocator, HeadlessMap, MapBinding, MapSurface, MapView},
    ui::{
        FormController, FormOutcome, FormState, FormTarget, FormView, HeadlessForm, HeadlessList,
        HeadlessNotifier, ListClick, ListView, Notifier, RawFields, RowAction, SortKey,
        ViewRenderer,
    },
    workout::{
        storage::{open_pool, WorkoutStorage},
        Coords, Workout, WorkoutId, WorkoutRegistry,
    },
};

/// Event delivered by the host UI
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    MapClicked(Coords),
    ActivityTypeToggled,
    FormSubmitted(RawFields),
    FormCancelled,
    ListClicked(ListClick),
    SortRequested(SortKey),
    ResetRequested,
}

/// The workout tracker
#[derive(Debug)]
pub struct App<M: MapSurface, F: FormView, L: ListView, N: Notifier> {
    map_config: MapConfig,
    registry: WorkoutRegistry,
    storage: WorkoutStorage,
    map: MapBinding<M>,
    form: FormController<F>,
    list: ViewRenderer<L>,
    notifier: N,
    /// Set after a failed save; the session continues in memory
    persistence_degraded: bool,
}

/// App driven entirely by headless hosts
pub type HeadlessApp = App<HeadlessMap, HeadlessForm, HeadlessList, HeadlessNotifier>;

impl<M: MapSurface, F: FormView, L: ListView, N: Notifier> App<M, F, L, N> {
    pub fn new(
        map_config: MapConfig,
        storage: WorkoutStorage,
        map_surface: M,
        form_view: F,
        list_view: L,
        notifier: N,
    ) -> Self {
        Self {
            map_config,
            registry: WorkoutRegistry::new(),
            storage,
            map: MapBinding::new(map_surface),
            form: FormController::new(form_view),
            list: ViewRenderer::new(list_view),
            notifier,
            persistence_degraded: false,
        }
    }

    /// Load the persisted snapshot and redraw the list (and markers, if the map is up)
    pub async fn restore(&mut self) -> usize {
        let workouts = self.storage.load().await;
        self.registry.replace_all(workouts);
        self.list.render_all(self.registry.all());

        if self.map.is_ready() {
            self.map.clear_markers();
            if let Err(e) = self.map.replay(self.registry.all()) {
                tracing::error!("Failed to replay markers: {}", e);
            }
        }

        self.registry.len()
    }

    /// Acquire the current position and bring up the map
    ///
    /// A failed or denied request is terminal for the session: the user is
    /// alerted and the map-dependent features stay inert.
    pub async fn start<G: Geolocator>(&mut self, geolocator: &G) -> Result<MapView> {
        let center = match geolocator.current_position().await {
            Ok(center) => center,
            Err(e) => {
                tracing::warn!("Geolocation failed: {}", e);
                self.notifier.alert("Couldn't get your location");
                return Err(e.into());
            }
        };

        let view = self.map.initialize(
            center,
            self.map_config.zoom,
            &self.map_config.tile_url,
            &self.map_config.attribution,
        );
        let count = self.map.replay(self.registry.all())?;
        tracing::info!("📍 Rendered {} workout markers", count);

        Ok(view)
    }

    /// Dispatch one host event
    ///
    /// Failures are absorbed here: validation errors are shown to the user,
    /// everything else is logged.
    pub async fn handle_event(&mut self, event: UiEvent) {
        let result = match event {
            UiEvent::MapClicked(coords) => self.map_clicked(coords),
            UiEvent::ActivityTypeToggled => {
                self.form.toggle_activity_type();
                Ok(())
            }
            UiEvent::FormSubmitted(raw) => self.submit_form(&raw).await.map(|_| ()),
            UiEvent::FormCancelled => {
                self.form.close();
                Ok(())
            }
            UiEvent::ListClicked(click) => self.list_clicked(&click).await,
            UiEvent::SortRequested(key) => {
                self.sort_list(key);
                Ok(())
            }
            UiEvent::ResetRequested => {
                self.reset().await;
                Ok(())
            }
        };

        if let Err(e) = result {
            self.report(e);
        }
    }

    /// Open the form for a new workout at the clicked coordinate
    pub fn map_clicked(&mut self, coords: Coords) -> Result<()> {
        let coords = self.map.map_clicked(coords)?;
        self.form.open_for_create(coords);
        Ok(())
    }

    /// Toggle between the cadence and elevation inputs
    pub fn toggle_activity_type(&mut self) {
        self.form.toggle_activity_type();
    }

    /// Validate the form and commit the new or edited workout
    pub async fn submit_form(&mut self, raw: &RawFields) -> Result<WorkoutId> {
        let id = match self.form.submit(raw)? {
            FormOutcome::Created(workout) => self.commit_new(workout)?,
            FormOutcome::Edited { id, patch } => {
                let workout = self.registry.update(&id, &patch)?;
                self.list.replace_one(workout);
                id
            }
        };

        self.persist().await;
        Ok(id)
    }

    /// Resolve and run a click on the workout list
    pub async fn list_clicked(&mut self, click: &ListClick) -> Result<()> {
        match self.list.resolve_click(click) {
            Some(RowAction::Edit(id)) => self.edit(&id),
            Some(RowAction::Delete(id)) => self.delete(&id).await.map(|_| ()),
            Some(RowAction::Select(id)) => self.select(&id).await,
            None => Ok(()),
        }
    }

    /// Open the form pre-populated with a workout's values
    pub fn edit(&mut self, id: &WorkoutId) -> Result<()> {
        let workout = self
            .registry
            .find_by_id(id)
            .ok_or_else(|| AppError::NotFound(id.clone()))?;
        self.form.open_for_edit(workout);
        Ok(())
    }

    /// Remove a workout along with its row and marker
    pub async fn delete(&mut self, id: &WorkoutId) -> Result<Workout> {
        let removed = self.registry.remove(id)?;
        self.list.remove_one(id);
        self.map.remove_marker(id);

        let editing_removed = matches!(
            self.form.state(),
            FormState::Armed(FormTarget::Edit { id: editing, .. }) if editing == id
        );
        if editing_removed {
            self.form.close();
        }

        self.persist().await;
        Ok(removed)
    }

    /// Count a re-selection and move the map to the workout
    pub async fn select(&mut self, id: &WorkoutId) -> Result<()> {
        let coords = self.registry.record_click(id)?.coords();

        if let Err(e) = self.map.recenter(coords, self.map_config.zoom, true) {
            tracing::debug!("Not recentering on {}: {}", id, e);
        }

        self.persist().await;
        Ok(())
    }

    /// Redraw the list ordered by `key`
    pub fn sort_list(&mut self, key: SortKey) {
        self.list.render_sorted(self.registry.all(), key);
    }

    /// Forget every workout: slot, registry, rows and markers
    pub async fn reset(&mut self) {
        if let Err(e) = self.storage.clear().await {
            tracing::warn!("{}", e);
            self.persistence_degraded = true;
        }

        self.registry.replace_all(Vec::new());
        self.list.render_all(&[]);
        self.map.clear_markers();
        self.form.close();

        tracing::info!("🧹 Workouts reset");
    }

    pub fn workouts(&self) -> &[Workout] {
        self.registry.all()
    }

    pub fn registry(&self) -> &WorkoutRegistry {
        &self.registry
    }

    pub fn map(&self) -> &MapBinding<M> {
        &self.map
    }

    pub fn form(&self) -> &FormController<F> {
        &self.form
    }

    pub fn list(&self) -> &ViewRenderer<L> {
        &self.list
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn storage(&self) -> &WorkoutStorage {
        &self.storage
    }

    /// Whether a save has failed and the session is running in memory only
    pub fn persistence_degraded(&self) -> bool {
        self.persistence_degraded
    }

    fn commit_new(&mut self, workout: Workout) -> Result<WorkoutId> {
        let workout = self.registry.add(workout)?;
        self.list.append_one(workout);
        if let Err(e) = self.map.render_marker(workout) {
            tracing::debug!("No marker for {}: {}", workout.id(), e);
        }
        Ok(workout.id().clone())
    }

    /// Best-effort snapshot save after a registry mutation
    async fn persist(&mut self) {
        match self.storage.save(self.registry.all()).await {
            Ok(()) => self.persistence_degraded = false,
            Err(e) => {
                tracing::warn!("{}; continuing in memory", e);
                self.persistence_degraded = true;
            }
        }
    }

    fn report(&mut self, error: AppError) {
        match &error {
            AppError::Validation(e) => {
                self.notifier
                    .alert(&format!("Inputs have to be positive numbers! {}", e));
            }
            AppError::MapNotReady => tracing::debug!("{}", error),
            AppError::NotFound(_) | AppError::DuplicateId(_) => {
                tracing::error!("Workout integrity error: {}", error)
            }
            other => tracing::error!("{}", other),
        }
    }
}

/// Build a headless app over the configured database and restore saved workouts
pub async fn create_app(config: &Config) -> anyhow::Result<HeadlessApp> {
    let pool = open_pool(&config.storage)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to open workout database: {}", e))?;

    let storage = WorkoutStorage::new(pool, config.storage.slot_key.clone());
    storage.init_schema().await?;

    let mut app = App::new(
        config.map.clone(),
        storage,
        HeadlessMap::default(),
        HeadlessForm::default(),
        HeadlessList::default(),
        HeadlessNotifier::default(),
    );

    let restored = app.restore().await;
    tracing::info!("📥 Restored {} workouts", restored);

    Ok(app)
}

/// Run a headless session: restore, locate, render
pub async fn start_app(config: Config) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Starting mapty...");

    let mut app = create_app(&config).await?;
    let geolocator = FixedLocation(config.location.coords());

    match app.start(&geolocator).await {
        Ok(view) => tracing::info!("Map centered on {} (zoom {})", view.center, view.zoom),
        Err(e) => tracing::warn!("Map unavailable: {}", e),
    }

    for workout in app.workouts() {
        tracing::info!(
            "{} {} at {} ({} km, {} min)",
            workout.kind().icon(),
            workout.description(),
            workout.coords(),
            workout.distance(),
            workout.duration()
        );
    }

    Ok(())
}

/// Workout form controller
///
/// Modal-like state machine: Hidden -> Armed -> Submitting -> Hidden. The
/// form is armed either with the clicked coordinate (create) or with the
/// workout being edited; coordinates are fixed at creation so edit needs none.

use crate::error::{AppError, Field, Result, ValidationError};
use crate::workout::types::{derived_metric, validate_metric};
use crate::workout::{ActivityKind, Coords, Workout, WorkoutId, WorkoutPatch};

/// Raw text of the form inputs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFields {
    pub kind: ActivityKind,
    pub distance: String,
    pub duration: String,
    pub cadence: String,
    pub elevation: String,
}

impl RawFields {
    pub fn running(distance: &str, duration: &str, cadence: &str) -> Self {
        Self {
            kind: ActivityKind::Running,
            distance: distance.to_string(),
            duration: duration.to_string(),
            cadence: cadence.to_string(),
            elevation: String::new(),
        }
    }

    pub fn cycling(distance: &str, duration: &str, elevation: &str) -> Self {
        Self {
            kind: ActivityKind::Cycling,
            distance: distance.to_string(),
            duration: duration.to_string(),
            cadence: String::new(),
            elevation: elevation.to_string(),
        }
    }

    /// Fields pre-populated from an existing workout
    pub fn from_workout(workout: &Workout) -> Self {
        Self {
            kind: workout.kind(),
            distance: workout.distance().to_string(),
            duration: workout.duration().to_string(),
            cadence: workout.cadence().map(|v| v.to_string()).unwrap_or_default(),
            elevation: workout
                .elevation_gain()
                .map(|v| v.to_string())
                .unwrap_or_default(),
        }
    }
}

/// Host form collaborator
pub trait FormView {
    fn show(&mut self);
    fn hide(&mut self);
    fn clear(&mut self);
    fn fill(&mut self, fields: &RawFields);
    fn focus_distance(&mut self);
    /// Show the cadence row (running) or the elevation row (cycling)
    fn show_metric_for(&mut self, kind: ActivityKind);
}

/// What the armed form will produce
#[derive(Debug, Clone, PartialEq)]
pub enum FormTarget {
    Create(Coords),
    Edit { id: WorkoutId, kind: ActivityKind },
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormState {
    Hidden,
    Armed(FormTarget),
    Submitting(FormTarget),
}

/// Result of a successful submit, for the app to commit
#[derive(Debug, Clone, PartialEq)]
pub enum FormOutcome {
    Created(Workout),
    Edited { id: WorkoutId, patch: WorkoutPatch },
}

/// Form state machine over a host form view
#[derive(Debug)]
pub struct FormController<F: FormView> {
    view: F,
    state: FormState,
    /// Activity type currently selected in the type input
    kind: ActivityKind,
}

fn parse_field(field: Field, raw: &str) -> std::result::Result<f64, ValidationError> {
    let trimmed = raw.trim();
    let value: f64 = trimmed.parse().map_err(|_| ValidationError::NotANumber {
        field,
        raw: trimmed.to_string(),
    })?;
    validate_metric(field, value)
}

impl<F: FormView> FormController<F> {
    pub fn new(view: F) -> Self {
        Self {
            view,
            state: FormState::Hidden,
            kind: ActivityKind::default(),
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn selected_kind(&self) -> ActivityKind {
        self.kind
    }

    pub fn view(&self) -> &F {
        &self.view
    }

    /// Arm the form with a clicked coordinate
    ///
    /// A click while already armed re-arms with the new coordinate.
    pub fn open_for_create(&mut self, coords: Coords) {
        self.state = FormState::Armed(FormTarget::Create(coords));
        self.view.clear();
        self.view.show_metric_for(self.kind);
        self.view.show();
        self.view.focus_distance();
    }

    /// Arm the form with an existing workout's values
    pub fn open_for_edit(&mut self, workout: &Workout) {
        self.kind = workout.kind();
        self.state = FormState::Armed(FormTarget::Edit {
            id: workout.id().clone(),
            kind: workout.kind(),
        });
        self.view.fill(&RawFields::from_workout(workout));
        self.view.show_metric_for(self.kind);
        self.view.show();
        self.view.focus_distance();
    }

    /// Swap the visible cadence/elevation input
    ///
    /// The type of a workout under edit is fixed, so this does nothing then.
    pub fn toggle_activity_type(&mut self) {
        if let FormState::Armed(FormTarget::Edit { .. }) = self.state {
            tracing::debug!("Ignoring type toggle while editing");
            return;
        }
        self.kind = self.kind.toggled();
        self.view.show_metric_for(self.kind);
    }

    /// Validate the raw fields and produce a new workout or an edit patch
    ///
    /// On a validation failure the form stays armed with its target.
    pub fn submit(&mut self, raw: &RawFields) -> Result<FormOutcome> {
        let target = match &self.state {
            FormState::Armed(target) => target.clone(),
            FormState::Hidden | FormState::Submitting(_) => return Err(AppError::FormNotArmed),
        };
        self.state = FormState::Submitting(target.clone());

        match Self::build_outcome(&target, raw) {
            Ok(outcome) => {
                self.close();
                Ok(outcome)
            }
            Err(e) => {
                self.state = FormState::Armed(target);
                Err(e.into())
            }
        }
    }

    /// Hide the form without submitting
    pub fn close(&mut self) {
        self.state = FormState::Hidden;
        self.view.clear();
        self.view.hide();
    }

    fn build_outcome(
        target: &FormTarget,
        raw: &RawFields,
    ) -> std::result::Result<FormOutcome, ValidationError> {
        let kind = match target {
            FormTarget::Create(_) => raw.kind,
            FormTarget::Edit { kind, .. } => *kind,
        };

        let distance = parse_field(Field::Distance, &raw.distance)?;
        let duration = parse_field(Field::Duration, &raw.duration)?;

        match target {
            FormTarget::Create(coords) => {
                let workout = match kind {
                    ActivityKind::Running => {
                        let cadence = parse_field(Field::Cadence, &raw.cadence)?;
                        Workout::running(*coords, distance, duration, cadence)?
                    }
                    ActivityKind::Cycling => {
                        let elevation = parse_field(Field::ElevationGain, &raw.elevation)?;
                        Workout::cycling(*coords, distance, duration, elevation)?
                    }
                };
                Ok(FormOutcome::Created(workout))
            }
            FormTarget::Edit { id, .. } => {
                derived_metric(kind, distance, duration)?;
                let mut patch = WorkoutPatch {
                    distance: Some(distance),
                    duration: Some(duration),
                    ..Default::default()
                };
                match kind {
                    ActivityKind::Running => {
                        patch.cadence = Some(parse_field(Field::Cadence, &raw.cadence)?)
                    }
                    ActivityKind::Cycling => {
                        patch.elevation_gain =
                            Some(parse_field(Field::ElevationGain, &raw.elevation)?)
                    }
                }
                Ok(FormOutcome::Edited {
                    id: id.clone(),
                    patch,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::headless::HeadlessForm;

    fn controller() -> FormController<HeadlessForm> {
        FormController::new(HeadlessForm::default())
    }

    fn here() -> Coords {
        Coords::new(51.5, -0.12)
    }

    #[test]
    fn test_submit_while_hidden_is_rejected() {
        let mut form = controller();
        let result = form.submit(&RawFields::running("5", "25", "150"));
        assert!(matches!(result, Err(AppError::FormNotArmed)));
    }

    #[test]
    fn test_open_for_create_arms_and_focuses() {
        let mut form = controller();
        form.open_for_create(here());

        assert_eq!(form.state(), &FormState::Armed(FormTarget::Create(here())));
        assert!(form.view().is_visible());
        assert!(form.view().is_distance_focused());
        assert_eq!(form.view().fields(), &RawFields::default());
    }

    #[test]
    fn test_second_click_rearms_with_new_coordinate() {
        let mut form = controller();
        form.open_for_create(here());
        let other = Coords::new(48.85, 2.35);
        form.open_for_create(other);
        assert_eq!(form.state(), &FormState::Armed(FormTarget::Create(other)));
    }

    #[test]
    fn test_valid_create_hides_form() {
        let mut form = controller();
        form.open_for_create(here());

        let outcome = form.submit(&RawFields::running(" 5 ", "25", "150")).unwrap();
        match outcome {
            FormOutcome::Created(workout) => {
                assert_eq!(workout.coords(), here());
                assert!((workout.pace().unwrap() - 5.0).abs() < 1e-9);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(form.state(), &FormState::Hidden);
        assert!(!form.view().is_visible());
    }

    #[test]
    fn test_invalid_input_keeps_form_armed() {
        let mut form = controller();
        form.open_for_create(here());

        let cases = [
            (RawFields::running("abc", "25", "150"), Field::Distance),
            (RawFields::running("5", "-25", "150"), Field::Duration),
            (RawFields::running("5", "25", ""), Field::Cadence),
            (RawFields::cycling("5", "25", "inf"), Field::ElevationGain),
        ];

        for (raw, field) in cases {
            match form.submit(&raw) {
                Err(AppError::Validation(e)) => assert_eq!(e.field(), Some(field)),
                other => panic!("expected validation error for {:?}, got {:?}", field, other),
            }
            assert_eq!(form.state(), &FormState::Armed(FormTarget::Create(here())));
            assert!(form.view().is_visible());
        }
    }

    #[test]
    fn test_cycling_ignores_cadence_field() {
        let mut form = controller();
        form.open_for_create(here());
        let mut raw = RawFields::cycling("20", "60", "300");
        raw.cadence = "not used".to_string();

        let outcome = form.submit(&raw).unwrap();
        assert!(matches!(outcome, FormOutcome::Created(w) if w.kind() == ActivityKind::Cycling));
    }

    #[test]
    fn test_toggle_switches_visible_metric() {
        let mut form = controller();
        form.open_for_create(here());
        assert_eq!(form.view().metric_kind(), ActivityKind::Running);

        form.toggle_activity_type();
        assert_eq!(form.selected_kind(), ActivityKind::Cycling);
        assert_eq!(form.view().metric_kind(), ActivityKind::Cycling);
    }

    #[test]
    fn test_edit_prefills_and_locks_type() {
        let run = Workout::running(here(), 5.0, 25.0, 150.0).unwrap();
        let mut form = controller();
        form.open_for_edit(&run);

        assert_eq!(form.view().fields().distance, "5");
        assert_eq!(form.view().fields().cadence, "150");

        form.toggle_activity_type();
        assert_eq!(form.selected_kind(), ActivityKind::Running);

        // Even if the host reports the other type, the patch stays running-shaped
        let mut raw = RawFields::running("10", "25", "150");
        raw.kind = ActivityKind::Cycling;
        raw.elevation = "500".to_string();

        let outcome = form.submit(&raw).unwrap();
        assert_eq!(
            outcome,
            FormOutcome::Edited {
                id: run.id().clone(),
                patch: WorkoutPatch {
                    distance: Some(10.0),
                    duration: Some(25.0),
                    cadence: Some(150.0),
                    elevation_gain: None,
                },
            }
        );
    }

    #[test]
    fn test_edit_with_overflowing_speed_keeps_form_armed() {
        let ride = Workout::cycling(here(), 20.0, 60.0, 300.0).unwrap();
        let mut form = controller();
        form.open_for_edit(&ride);
        let armed = form.state().clone();

        match form.submit(&RawFields::cycling("1e300", "1e-10", "300")) {
            Err(AppError::Validation(e)) => {
                assert_eq!(e, ValidationError::MetricOverflow(ActivityKind::Cycling));
                assert_eq!(e.field(), None);
            }
            other => panic!("expected overflow error, got {:?}", other),
        }
        assert_eq!(form.state(), &armed);
        assert!(form.view().is_visible());
    }
}

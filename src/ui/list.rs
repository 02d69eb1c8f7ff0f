/// Workout list renderer
///
/// Renders registry entries as list rows and resolves clicks on the list
/// container into row actions. One delegate serves every row; rows are
/// addressed by workout id.

use crate::workout::{Activity, Workout, WorkoutId};

/// Host list container
pub trait ListView {
    fn clear_rows(&mut self);
    fn append_row(&mut self, id: &WorkoutId, html: &str);
    fn replace_row(&mut self, id: &WorkoutId, html: &str);
    fn remove_row(&mut self, id: &WorkoutId);
}

/// Which part of the list was clicked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    EditButton,
    DeleteButton,
    Body,
}

/// Click delivered to the list container
///
/// `row` is the `data-id` of the closest row element, if the click landed
/// inside one.
#[derive(Debug, Clone, PartialEq)]
pub struct ListClick {
    pub row: Option<WorkoutId>,
    pub target: ClickTarget,
}

impl ListClick {
    pub fn edit(id: &WorkoutId) -> Self {
        Self { row: Some(id.clone()), target: ClickTarget::EditButton }
    }

    pub fn delete(id: &WorkoutId) -> Self {
        Self { row: Some(id.clone()), target: ClickTarget::DeleteButton }
    }

    pub fn select(id: &WorkoutId) -> Self {
        Self { row: Some(id.clone()), target: ClickTarget::Body }
    }
}

/// Action resolved from a list click
#[derive(Debug, Clone, PartialEq)]
pub enum RowAction {
    Edit(WorkoutId),
    Delete(WorkoutId),
    Select(WorkoutId),
}

/// Ordering for the list view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Distance,
    Duration,
    Date,
}

/// Escape text for an HTML attribute value or element body
pub fn escape_html(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#x27;"),
            _ => output.push(ch),
        }
    }
    output
}

/// Row markup for one workout
pub fn render_row(workout: &Workout) -> String {
    let kind = workout.kind();
    let mut html = format!(
        r#"<li class="workout workout--{kind}" data-id="{id}">
  <h2 class="workout__title">{title}</h2>
  <div class="workout__details">
    <span class="workout__icon">{icon}</span>
    <span class="workout__value">{distance}</span>
    <span class="workout__unit">km</span>
  </div>
  <div class="workout__details">
    <span class="workout__icon">⏱</span>
    <span class="workout__value">{duration}</span>
    <span class="workout__unit">min</span>
  </div>
"#,
        kind = kind.as_str(),
        id = escape_html(workout.id().as_str()),
        title = escape_html(workout.description()),
        icon = kind.icon(),
        distance = workout.distance(),
        duration = workout.duration(),
    );

    let (rate_value, rate_unit, metric_icon, metric_value, metric_unit) = match workout.activity() {
        Activity::Running { cadence, pace } => (*pace, "min/km", "🦶🏼", *cadence, "spm"),
        Activity::Cycling { elevation_gain, speed } => (*speed, "km/h", "⛰", *elevation_gain, "m"),
    };

    html.push_str(&format!(
        r#"  <div class="workout__details">
    <span class="workout__icon">⚡️</span>
    <span class="workout__value">{rate_value:.1}</span>
    <span class="workout__unit">{rate_unit}</span>
  </div>
  <div class="workout__details">
    <span class="workout__icon">{metric_icon}</span>
    <span class="workout__value">{metric_value}</span>
    <span class="workout__unit">{metric_unit}</span>
  </div>
  <div class="workout__actions">
    <button class="workout__btn workout__btn--edit">Edit</button>
    <button class="workout__btn workout__btn--delete">Delete</button>
  </div>
</li>"#
    ));

    html
}

/// Keeps the host list in step with the registry
#[derive(Debug)]
pub struct ViewRenderer<L: ListView> {
    view: L,
    /// Ids of the rows currently shown, in display order
    rows: Vec<WorkoutId>,
}

impl<L: ListView> ViewRenderer<L> {
    pub fn new(view: L) -> Self {
        Self { view, rows: Vec::new() }
    }

    /// Clear the list and redraw every workout
    pub fn render_all(&mut self, workouts: &[Workout]) {
        self.view.clear_rows();
        self.rows.clear();
        for workout in workouts {
            self.append_one(workout);
        }
    }

    /// Redraw the list ordered by `key` (ascending); registry order is untouched
    pub fn render_sorted(&mut self, workouts: &[Workout], key: SortKey) {
        let mut sorted: Vec<&Workout> = workouts.iter().collect();
        match key {
            SortKey::Distance => sorted.sort_by(|a, b| a.distance().total_cmp(&b.distance())),
            SortKey::Duration => sorted.sort_by(|a, b| a.duration().total_cmp(&b.duration())),
            SortKey::Date => sorted.sort_by_key(|w| w.date()),
        }

        self.view.clear_rows();
        self.rows.clear();
        for workout in sorted {
            self.append_one(workout);
        }
    }

    /// Add a single row; a workout already shown is redrawn in place
    pub fn append_one(&mut self, workout: &Workout) {
        if self.rows.contains(workout.id()) {
            self.replace_one(workout);
            return;
        }
        self.view.append_row(workout.id(), &render_row(workout));
        self.rows.push(workout.id().clone());
    }

    /// Redraw the row of an edited workout
    pub fn replace_one(&mut self, workout: &Workout) {
        if !self.rows.contains(workout.id()) {
            self.append_one(workout);
            return;
        }
        self.view.replace_row(workout.id(), &render_row(workout));
    }

    /// Remove the row for `id`; returns whether one was shown
    pub fn remove_one(&mut self, id: &WorkoutId) -> bool {
        match self.rows.iter().position(|row| row == id) {
            Some(index) => {
                self.rows.remove(index);
                self.view.remove_row(id);
                true
            }
            None => false,
        }
    }

    /// Resolve a click on the list container into a row action
    ///
    /// Clicks outside any row, or on a row this renderer did not draw, yield
    /// nothing.
    pub fn resolve_click(&self, click: &ListClick) -> Option<RowAction> {
        let id = click.row.as_ref()?;
        if !self.rows.contains(id) {
            tracing::debug!("Click on unknown row {}", id);
            return None;
        }

        let action = match click.target {
            ClickTarget::EditButton => RowAction::Edit(id.clone()),
            ClickTarget::DeleteButton => RowAction::Delete(id.clone()),
            ClickTarget::Body => RowAction::Select(id.clone()),
        };
        Some(action)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row_ids(&self) -> &[WorkoutId] {
        &self.rows
    }

    pub fn view(&self) -> &L {
        &self.view
    }
}

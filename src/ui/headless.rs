/// Headless form, list and alert hosts
///
/// Keep the state a browser would show so the binary and tests can look at it.

use crate::ui::form::{FormView, RawFields};
use crate::ui::list::ListView;
use crate::ui::Notifier;
use crate::workout::{ActivityKind, WorkoutId};

/// Form host that remembers visibility, values and focus
#[derive(Debug, Default)]
pub struct HeadlessForm {
    visible: bool,
    fields: RawFields,
    distance_focused: bool,
    metric_kind: ActivityKind,
}

impl HeadlessForm {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn fields(&self) -> &RawFields {
        &self.fields
    }

    pub fn is_distance_focused(&self) -> bool {
        self.distance_focused
    }

    /// Kind whose metric row (cadence or elevation) is shown
    pub fn metric_kind(&self) -> ActivityKind {
        self.metric_kind
    }
}

impl FormView for HeadlessForm {
    fn show(&mut self) {
        self.visible = true;
    }

    fn hide(&mut self) {
        self.visible = false;
        self.distance_focused = false;
    }

    fn clear(&mut self) {
        self.fields = RawFields {
            kind: self.fields.kind,
            ..RawFields::default()
        };
    }

    fn fill(&mut self, fields: &RawFields) {
        self.fields = fields.clone();
    }

    fn focus_distance(&mut self) {
        self.distance_focused = true;
    }

    fn show_metric_for(&mut self, kind: ActivityKind) {
        self.metric_kind = kind;
        self.fields.kind = kind;
    }
}

/// List host holding rendered rows in display order
#[derive(Debug, Default)]
pub struct HeadlessList {
    rows: Vec<(WorkoutId, String)>,
}

impl HeadlessList {
    pub fn rows(&self) -> &[(WorkoutId, String)] {
        &self.rows
    }

    pub fn row_html(&self, id: &WorkoutId) -> Option<&str> {
        self.rows
            .iter()
            .find(|(row, _)| row == id)
            .map(|(_, html)| html.as_str())
    }
}

impl ListView for HeadlessList {
    fn clear_rows(&mut self) {
        self.rows.clear();
    }

    fn append_row(&mut self, id: &WorkoutId, html: &str) {
        self.rows.push((id.clone(), html.to_string()));
    }

    fn replace_row(&mut self, id: &WorkoutId, html: &str) {
        if let Some(row) = self.rows.iter_mut().find(|(row, _)| row == id) {
            row.1 = html.to_string();
        }
    }

    fn remove_row(&mut self, id: &WorkoutId) {
        self.rows.retain(|(row, _)| row != id);
    }
}

/// Alert host that logs and records every message
#[derive(Debug, Default)]
pub struct HeadlessNotifier {
    alerts: Vec<String>,
}

impl HeadlessNotifier {
    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }
}

impl Notifier for HeadlessNotifier {
    fn alert(&mut self, message: &str) {
        tracing::warn!("⚠️ {}", message);
        self.alerts.push(message.to_string());
    }
}

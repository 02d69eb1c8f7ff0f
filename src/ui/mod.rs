/// UI layer
///
/// Form state machine, list renderer with delegated row actions, and the
/// host traits they drive. Hosts are passed in at construction.

// Form controller (Hidden -> Armed -> Submitting -> Hidden)
pub mod form;

// List rows and click delegation
pub mod list;

// Headless hosts for the binary and tests
pub mod headless;

pub use form::{FormController, FormOutcome, FormState, FormTarget, FormView, RawFields};
pub use headless::{HeadlessForm, HeadlessList, HeadlessNotifier};
pub use list::{ClickTarget, ListClick, ListView, RowAction, SortKey, ViewRenderer};

/// User-visible alert collaborator
pub trait Notifier {
    fn alert(&mut self, message: &str);
}

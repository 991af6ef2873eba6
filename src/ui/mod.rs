//! Headless widgets the dashboard components read and mutate.
//!
//! These model just enough of a page for the dashboard logic: selects with
//! option lists, text inputs, a toast, a scoped loading indicator and a
//! focus tracker. Painting them is the shell's job.

pub mod widgets;

pub use widgets::{LoadingIndicator, Select, SelectOption, TextInput, Toast};

use crate::sort::SortKey;

/// Every focusable or clickable element on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementId {
    StartSelect,
    EndSelect,
    IncludeInput,
    ExcludeInput,
    RunButton,
    ReindexButton,
    Header(SortKey),
    /// A result row, by position in the rendered table.
    Row(usize),
    /// The dimmed area around the dialog.
    ModalBackdrop,
    /// The dialog body (title + chart).
    ModalContent,
    ModalClose,
}

impl ElementId {
    /// Whether the element lives inside the modal dialog.
    pub fn in_modal(self) -> bool {
        matches!(self, Self::ModalContent | Self::ModalClose)
    }
}

/// Tracks which element currently holds keyboard focus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusModel {
    active: Option<ElementId>,
}

impl FocusModel {
    pub fn active(&self) -> Option<ElementId> {
        self.active
    }

    pub fn focus(&mut self, element: ElementId) {
        self.active = Some(element);
    }

    pub fn blur(&mut self) {
        self.active = None;
    }
}

/// The four filter controls.
#[derive(Debug, Clone, Default)]
pub struct FilterControls {
    pub start: Select,
    pub end: Select,
    pub include: TextInput,
    pub exclude: TextInput,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_dialog_parts_count_as_inside_modal() {
        assert!(ElementId::ModalClose.in_modal());
        assert!(ElementId::ModalContent.in_modal());
        assert!(!ElementId::ModalBackdrop.in_modal());
        assert!(!ElementId::Row(0).in_modal());
    }

    #[test]
    fn focus_model_tracks_last_focused_element() {
        let mut focus = FocusModel::default();
        assert_eq!(focus.active(), None);
        focus.focus(ElementId::RunButton);
        focus.focus(ElementId::Row(2));
        assert_eq!(focus.active(), Some(ElementId::Row(2)));
        focus.blur();
        assert_eq!(focus.active(), None);
    }
}

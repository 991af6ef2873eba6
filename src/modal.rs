/// Accessible modal dialog controller.
///
/// While open, the dialog owns keyboard focus: focus that lands outside
/// it is sent back to the close control, and Escape closes it. Closing
/// returns focus to whatever held it when the dialog opened.
use crate::ui::{ElementId, FocusModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalState {
    Closed,
    Open,
}

/// Dialog content plus the listener bookkeeping of an open dialog.
#[derive(Debug, Clone)]
pub struct Modal {
    state: ModalState,
    return_focus: Option<ElementId>,
    escape_listener: bool,
    focus_trap: bool,
    pub title: String,
    /// Rendered chart markup.
    pub body: String,
}

impl Default for Modal {
    fn default() -> Self {
        Self {
            state: ModalState::Closed,
            return_focus: None,
            escape_listener: false,
            focus_trap: false,
            title: String::new(),
            body: String::new(),
        }
    }
}

impl Modal {
    pub fn state(&self) -> ModalState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == ModalState::Open
    }

    /// Whether the Escape and focus-trap listeners are installed.
    pub fn listeners_installed(&self) -> bool {
        self.escape_listener && self.focus_trap
    }

    pub fn open(&mut self, focus: &mut FocusModel) {
        if !self.is_open() {
            self.return_focus = focus.active();
        }
        self.state = ModalState::Open;
        focus.focus(ElementId::ModalClose);
        self.escape_listener = true;
        self.focus_trap = true;
    }

    pub fn close(&mut self, focus: &mut FocusModel) {
        if !self.is_open() {
            return;
        }
        self.state = ModalState::Closed;
        self.escape_listener = false;
        self.focus_trap = false;
        match self.return_focus.take() {
            Some(previous) => focus.focus(previous),
            // Focus cannot stay on a hidden control.
            None => focus.blur(),
        }
    }

    /// Key press anywhere on the page. Returns whether the modal consumed it.
    pub fn on_key(&mut self, key: &str, focus: &mut FocusModel) -> bool {
        if self.escape_listener && key == "Escape" {
            self.close(focus);
            return true;
        }
        false
    }

    /// Focus moving to `target`. Returns whether the move was redirected.
    pub fn on_focus(&mut self, target: ElementId, focus: &mut FocusModel) -> bool {
        if self.focus_trap && self.is_open() && !target.in_modal() {
            focus.focus(ElementId::ModalClose);
            return true;
        }
        false
    }

    /// Click on `target`. Returns whether the modal consumed it.
    pub fn on_click(&mut self, target: ElementId, focus: &mut FocusModel) -> bool {
        if !self.is_open() {
            return false;
        }
        match target {
            ElementId::ModalBackdrop | ElementId::ModalClose => {
                self.close(focus);
                true
            }
            ElementId::ModalContent => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opened_from(element: ElementId) -> (Modal, FocusModel) {
        let mut focus = FocusModel::default();
        focus.focus(element);
        let mut modal = Modal::default();
        modal.open(&mut focus);
        (modal, focus)
    }

    #[test]
    fn open_moves_focus_to_close_control() {
        let (modal, focus) = opened_from(ElementId::Row(3));
        assert!(modal.is_open());
        assert!(modal.listeners_installed());
        assert_eq!(focus.active(), Some(ElementId::ModalClose));
    }

    #[test]
    fn escape_closes_and_restores_focus() {
        let (mut modal, mut focus) = opened_from(ElementId::Row(3));
        assert!(!modal.on_key("Enter", &mut focus));
        assert!(modal.on_key("Escape", &mut focus));
        assert_eq!(modal.state(), ModalState::Closed);
        assert!(!modal.listeners_installed());
        assert_eq!(focus.active(), Some(ElementId::Row(3)));
        // Listener removed: a second Escape is not handled.
        assert!(!modal.on_key("Escape", &mut focus));
    }

    #[test]
    fn focus_outside_is_redirected() {
        let (mut modal, mut focus) = opened_from(ElementId::RunButton);
        focus.focus(ElementId::IncludeInput);
        assert!(modal.on_focus(ElementId::IncludeInput, &mut focus));
        assert_eq!(focus.active(), Some(ElementId::ModalClose));

        focus.focus(ElementId::ModalContent);
        assert!(!modal.on_focus(ElementId::ModalContent, &mut focus));
        assert_eq!(focus.active(), Some(ElementId::ModalContent));
    }

    #[test]
    fn backdrop_click_closes_but_content_click_does_not() {
        let (mut modal, mut focus) = opened_from(ElementId::Row(0));
        assert!(modal.on_click(ElementId::ModalContent, &mut focus));
        assert!(modal.is_open());
        assert!(modal.on_click(ElementId::ModalBackdrop, &mut focus));
        assert!(!modal.is_open());
        assert_eq!(focus.active(), Some(ElementId::Row(0)));
    }

    #[test]
    fn close_without_prior_focus_blurs() {
        let mut focus = FocusModel::default();
        let mut modal = Modal::default();
        modal.open(&mut focus);
        modal.close(&mut focus);
        assert_eq!(focus.active(), None);
    }

    #[test]
    fn reopening_keeps_original_return_target() {
        let (mut modal, mut focus) = opened_from(ElementId::Row(1));
        modal.open(&mut focus);
        modal.close(&mut focus);
        assert_eq!(focus.active(), Some(ElementId::Row(1)));
    }

    #[test]
    fn closed_modal_ignores_events() {
        let mut focus = FocusModel::default();
        let mut modal = Modal::default();
        assert!(!modal.on_click(ElementId::ModalBackdrop, &mut focus));
        assert!(!modal.on_focus(ElementId::Row(0), &mut focus));
        assert!(!modal.on_key("Escape", &mut focus));
    }
}

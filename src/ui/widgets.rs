/// Individual widget models.
use chrono::{DateTime, Duration, Utc};

// ---------------------------------------------------------------------------
// Select
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// A drop-down with browser `<select>` semantics: the value always names
/// an existing option, or is empty when there is none to name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Select {
    options: Vec<SelectOption>,
    value: String,
    pub disabled: bool,
}

impl Select {
    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Label of the selected option, if any.
    pub fn selected_label(&self) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.value == self.value)
            .map(|o| o.label.as_str())
    }

    /// Remove every option.
    pub fn clear(&mut self) {
        self.options.clear();
        self.value.clear();
    }

    /// Append an option. The first option added becomes the selection.
    pub fn push(&mut self, option: SelectOption) {
        if self.options.is_empty() {
            self.value = option.value.clone();
        }
        self.options.push(option);
    }

    /// Select the option whose value is `value`. An unknown value leaves
    /// the select with no selection.
    pub fn set_value(&mut self, value: &str) {
        if self.options.iter().any(|o| o.value == value) {
            self.value = value.to_string();
        } else {
            self.value.clear();
        }
    }

    /// Drop the oldest options so at most `keep` remain. If the selected
    /// option is dropped, the first remaining option takes over.
    pub fn keep_last(&mut self, keep: usize) {
        let excess = self.options.len().saturating_sub(keep);
        if excess == 0 {
            return;
        }
        self.options.drain(..excess);
        if !self.options.iter().any(|o| o.value == self.value) {
            self.value = self
                .options
                .first()
                .map(|o| o.value.clone())
                .unwrap_or_default();
        }
    }
}

// ---------------------------------------------------------------------------
// Text input
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    pub value: String,
    pub placeholder: String,
    pub disabled: bool,
}

// ---------------------------------------------------------------------------
// Toast
// ---------------------------------------------------------------------------

/// A transient notification that hides itself after a deadline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Toast {
    message: Option<String>,
    hide_at: Option<DateTime<Utc>>,
}

impl Toast {
    /// Show `message` until `now + duration`. Replaces any visible toast.
    /// A deadline past the representable range leaves the toast up until
    /// the next one replaces it.
    pub fn show(&mut self, message: impl Into<String>, now: DateTime<Utc>, duration: Duration) {
        self.message = Some(message.into());
        self.hide_at = now.checked_add_signed(duration);
    }

    /// Hide the toast if its deadline has passed.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        if matches!(self.hide_at, Some(deadline) if now >= deadline) {
            self.message = None;
            self.hide_at = None;
        }
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_visible(&self) -> bool {
        self.message.is_some()
    }
}

// ---------------------------------------------------------------------------
// Loading indicator
// ---------------------------------------------------------------------------

/// Scoped busy indicator. Nested scopes keep it active until the
/// outermost one ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadingIndicator {
    depth: u32,
}

impl LoadingIndicator {
    pub fn begin(&mut self) {
        self.depth += 1;
    }

    pub fn end(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn is_active(&self) -> bool {
        self.depth > 0
    }
}

/// Persistence of the filter selection.
///
/// The four filter fields are stored as one JSON object under
/// [`STORAGE_KEY`]. Restoring is forgiving: unreadable data is ignored,
/// and each field is applied only when it carries a usable value.
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DashError;
use crate::storage::Storage;
use crate::ui::FilterControls;

pub const STORAGE_KEY: &str = "atf.filters";

/// Snapshot of the filter controls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub start: String,
    pub end: String,
    pub include: String,
    pub exclude: String,
}

impl FilterState {
    pub fn from_controls(controls: &FilterControls) -> Self {
        Self {
            start: controls.start.value().to_string(),
            end: controls.end.value().to_string(),
            include: controls.include.value.clone(),
            exclude: controls.exclude.value.clone(),
        }
    }
}

/// Write the current filter values to storage.
pub fn persist(storage: &mut dyn Storage, controls: &FilterControls) {
    let state = FilterState::from_controls(controls);
    if let Ok(json) = serde_json::to_string(&state) {
        storage.set_item(STORAGE_KEY, &json);
    }
}

/// Apply saved filter values to `controls`.
///
/// Missing or malformed data is a silent no-op. `start`/`end` are applied
/// only when truthy; `include`/`exclude` whenever they are not null, so a
/// saved empty string clears the input.
pub fn restore(storage: &dyn Storage, controls: &mut FilterControls) {
    let Some(raw) = storage.get_item(STORAGE_KEY) else {
        return;
    };
    let Ok(saved) = parse_saved(&raw) else {
        return;
    };

    if let Some(start) = truthy_string(saved.get("start")) {
        controls.start.set_value(&start);
    }
    if let Some(end) = truthy_string(saved.get("end")) {
        controls.end.set_value(&end);
    }
    if let Some(include) = present_string(saved.get("include")) {
        controls.include.value = include;
    }
    if let Some(exclude) = present_string(saved.get("exclude")) {
        controls.exclude.value = exclude;
    }
}

fn parse_saved(raw: &str) -> Result<serde_json::Map<String, Value>, DashError> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(DashError::Parse(format!("expected object, got {other}"))),
        Err(e) => Err(DashError::Parse(e.to_string())),
    }
}

/// A value worth applying to a select: non-empty text or a non-zero number.
fn truthy_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// Any non-null value, stringified.
fn present_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

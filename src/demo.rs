/// Demo-mode restrictions.
///
/// In demo mode the term filters are locked and only the newest weeks stay
/// selectable. Input locking happens immediately; the week trimming is
/// queued as a deferred task so it runs after the selects are populated.
use crate::ui::FilterControls;

/// Placeholder shown in the locked term inputs.
pub const LOCKED_PLACEHOLDER: &str = "Available in Pro";

/// Disable the include/exclude inputs.
pub fn lock_term_filters(controls: &mut FilterControls) {
    for input in [&mut controls.include, &mut controls.exclude] {
        input.disabled = true;
        input.placeholder = LOCKED_PLACEHOLDER.to_string();
    }
}

/// Keep only the newest `keep` options in both week selects.
pub fn trim_weeks(controls: &mut FilterControls, keep: usize) {
    controls.start.keep_last(keep);
    controls.end.keep_last(keep);
}

/// Week catalog → select population.
use crate::model::Week;
use crate::ui::{FilterControls, SelectOption};

/// Replace both week selects with one option per week and pick the
/// default trailing window of `window` weeks ending at the newest week.
///
/// With fewer than two weeks no default is chosen; each select keeps its
/// first option.
pub fn populate(controls: &mut FilterControls, weeks: &[Week], window: usize) {
    controls.start.clear();
    controls.end.clear();
    for week in weeks {
        let value = week.week_id.to_string();
        controls
            .start
            .push(SelectOption::new(value.clone(), week.option_label()));
        controls
            .end
            .push(SelectOption::new(value, week.option_label()));
    }

    if let Some((start, end)) = default_window(weeks, window) {
        controls.start.set_value(&start.week_id.to_string());
        controls.end.set_value(&end.week_id.to_string());
    }
}

/// The default `(start, end)` weeks: `end` is the newest week and `start`
/// sits `window` positions from the end, clamped to the oldest week.
pub fn default_window(weeks: &[Week], window: usize) -> Option<(&Week, &Week)> {
    if weeks.len() < 2 {
        return None;
    }
    let start = weeks.len().saturating_sub(window.max(1));
    Some((&weeks[start], &weeks[weeks.len() - 1]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weeks(n: i64) -> Vec<Week> {
        (1..=n).map(|i| Week::new(i, format!("W{i}"))).collect()
    }

    #[test]
    fn ten_weeks_default_to_trailing_six() {
        let catalog = weeks(10);
        let (start, end) = default_window(&catalog, 6).unwrap();
        assert_eq!(start, &catalog[4]);
        assert_eq!(end, &catalog[9]);

        let mut controls = FilterControls::default();
        populate(&mut controls, &catalog, 6);
        assert_eq!(controls.start.value(), "5");
        assert_eq!(controls.end.value(), "10");
        assert_eq!(controls.start.options().len(), 10);
        assert_eq!(controls.end.options()[0].label, "Week W1");
    }

    #[test]
    fn short_catalog_clamps_to_first_week() {
        let catalog = weeks(3);
        let (start, end) = default_window(&catalog, 6).unwrap();
        assert_eq!(start.week_id, 1);
        assert_eq!(end.week_id, 3);
    }

    #[test]
    fn single_week_has_no_default_window() {
        let catalog = weeks(1);
        assert!(default_window(&catalog, 6).is_none());

        let mut controls = FilterControls::default();
        populate(&mut controls, &catalog, 6);
        assert_eq!(controls.start.value(), "1");
        assert_eq!(controls.end.value(), "1");
    }

    #[test]
    fn repopulating_replaces_old_options() {
        let mut controls = FilterControls::default();
        populate(&mut controls, &weeks(10), 6);
        populate(&mut controls, &weeks(4), 6);
        assert_eq!(controls.start.options().len(), 4);
        assert_eq!(controls.start.value(), "1");
        assert_eq!(controls.end.value(), "4");
    }
}

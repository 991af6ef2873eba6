/// Week range validation.
///
/// Turns the raw start/end select values into a normalized, inclusive
/// [`QueryRange`] with `start <= end` spanning at least two weeks.
use crate::error::{DashError, DashResult};
use crate::model::{Week, label_for};

/// Smallest inclusive span a query may cover.
pub const MIN_WEEKS: i64 = 2;

/// A validated, inclusive week range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRange {
    pub start: i64,
    pub end: i64,
    pub start_label: String,
    pub end_label: String,
    pub week_count: i64,
}

impl QueryRange {
    /// Text for the range badge, e.g. `6 weeks • W5 → W10`.
    pub fn badge(&self) -> String {
        format!(
            "{} weeks • {} → {}",
            self.week_count, self.start_label, self.end_label
        )
    }
}

/// Parse and normalize a start/end pair read from the selects.
pub fn parse_range(start_value: &str, end_value: &str, weeks: &[Week]) -> DashResult<QueryRange> {
    let (Some(mut start), Some(mut end)) = (parse_week_id(start_value), parse_week_id(end_value))
    else {
        return Err(DashError::validation("Please select start and end week."));
    };

    if end < start {
        std::mem::swap(&mut start, &mut end);
    }

    let Some(week_count) = end.checked_sub(start).and_then(|span| span.checked_add(1)) else {
        return Err(DashError::validation("Range is too wide."));
    };
    if week_count < MIN_WEEKS {
        return Err(DashError::validation("Range must be at least 2 weeks."));
    }

    Ok(QueryRange {
        start,
        end,
        start_label: label_for(weeks, start),
        end_label: label_for(weeks, end),
        week_count,
    })
}

fn parse_week_id(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}

/// Query parameter builders for `/uptrends` and `/series`.
use std::sync::LazyLock;

use regex::Regex;

use crate::range::QueryRange;

/// Runs of commas and whitespace between filter tokens.
static TOKEN_SEPARATORS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[,\s]+").expect("separator pattern is valid")
});

/// Normalize an include/exclude filter to space-separated tokens.
///
/// `"a, b"` and `" a ,b "` both become `"a b"`.
pub fn normalize_terms(raw: &str) -> String {
    TOKEN_SEPARATORS.replace_all(raw, " ").trim().to_string()
}

/// Parameters for `GET /uptrends`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UptrendQuery {
    pub start_week_id: i64,
    pub end_week_id: i64,
    pub include: String,
    pub exclude: String,
}

impl UptrendQuery {
    /// Build a query over `range`, normalizing both term filters.
    pub fn new(range: &QueryRange, include: &str, exclude: &str) -> Self {
        Self {
            start_week_id: range.start,
            end_week_id: range.end,
            include: normalize_terms(include),
            exclude: normalize_terms(exclude),
        }
    }

    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("startWeekId", self.start_week_id.to_string()),
            ("endWeekId", self.end_week_id.to_string()),
            ("include", self.include.clone()),
            ("exclude", self.exclude.clone()),
        ]
    }
}

/// Parameters for `GET /series`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesQuery {
    pub term: String,
    pub start_week_id: i64,
    pub end_week_id: i64,
}

impl SeriesQuery {
    pub fn new(term: impl Into<String>, start_week_id: i64, end_week_id: i64) -> Self {
        Self {
            term: term.into(),
            start_week_id,
            end_week_id,
        }
    }

    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("term", self.term.clone()),
            ("startWeekId", self.start_week_id.to_string()),
            ("endWeekId", self.end_week_id.to_string()),
        ]
    }
}

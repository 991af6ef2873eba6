/// Wire types returned by the trends backend.
///
/// Field names follow the backend's JSON exactly (`weekId`, `weekLabel`,
/// snake_case row columns). Decoding is lenient where the backend is known
/// to be loose: row columns may come back as numbers, strings or null, and
/// series ranks are null (or missing) for weeks where the term was absent.
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Week
// ---------------------------------------------------------------------------

/// One reporting period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Week {
    #[serde(rename = "weekId")]
    pub week_id: i64,
    pub label: String,
}

impl Week {
    pub fn new(week_id: i64, label: impl Into<String>) -> Self {
        Self {
            week_id,
            label: label.into(),
        }
    }

    /// Text shown for this week in the start/end selects.
    pub fn option_label(&self) -> String {
        format!("Week {}", self.label)
    }
}

/// Look up a week's label, falling back to the numeric id.
pub fn label_for(weeks: &[Week], week_id: i64) -> String {
    weeks
        .iter()
        .find(|w| w.week_id == week_id)
        .map(|w| w.label.clone())
        .unwrap_or_else(|| week_id.to_string())
}

// ---------------------------------------------------------------------------
// Cell values
// ---------------------------------------------------------------------------

/// A single table cell as delivered by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    #[default]
    Null,
}

impl CellValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // f64 Display already prints 3.0 as "3", matching how the
            // backend's integers read in the table.
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Null => write!(f, "null"),
        }
    }
}

// ---------------------------------------------------------------------------
// Uptrend rows
// ---------------------------------------------------------------------------

/// One term's rank-improvement summary across a week range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UptrendRow {
    pub term: String,
    #[serde(default)]
    pub start_rank: CellValue,
    #[serde(default)]
    pub end_rank: CellValue,
    #[serde(default)]
    pub total_improvement: CellValue,
    #[serde(default)]
    pub weeks: CellValue,
}

// ---------------------------------------------------------------------------
// Series points
// ---------------------------------------------------------------------------

/// One week of a term's rank history. `rank` is `None` when the term did
/// not appear that week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    #[serde(rename = "weekLabel")]
    pub week_label: String,
    #[serde(default, deserialize_with = "lenient_rank")]
    pub rank: Option<f64>,
}

impl SeriesPoint {
    pub fn new(week_label: impl Into<String>, rank: Option<f64>) -> Self {
        Self {
            week_label: week_label.into(),
            rank,
        }
    }

    /// The rank if it can be plotted.
    pub fn finite_rank(&self) -> Option<f64> {
        self.rank.filter(|r| r.is_finite())
    }
}

fn lenient_rank<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64().filter(|r| r.is_finite()))
}

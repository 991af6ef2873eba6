/// Client-side ordering of uptrend rows.
///
/// A column whose values are all numbers compares numerically; a column
/// holding any non-numeric value compares every pair by string form.
/// Deciding per column keeps the comparator a total order. Sorting never
/// mutates its input and is stable, so re-sorting an already sorted list
/// is a no-op.
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::model::{CellValue, UptrendRow};

// ---------------------------------------------------------------------------
// Keys and direction
// ---------------------------------------------------------------------------

/// A sortable result column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Term,
    StartRank,
    EndRank,
    TotalImprovement,
    Weeks,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        Self::Term,
        Self::StartRank,
        Self::EndRank,
        Self::TotalImprovement,
        Self::Weeks,
    ];

    /// Column name as the backend spells it.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Term => "term",
            Self::StartRank => "start_rank",
            Self::EndRank => "end_rank",
            Self::TotalImprovement => "total_improvement",
            Self::Weeks => "weeks",
        }
    }

    /// Header caption in the results table.
    pub fn header(self) -> &'static str {
        match self {
            Self::Term => "Term",
            Self::StartRank => "Start",
            Self::EndRank => "End",
            Self::TotalImprovement => "Improvement",
            Self::Weeks => "Weeks",
        }
    }

    fn cell(self, row: &UptrendRow) -> CellValue {
        match self {
            Self::Term => CellValue::Text(row.term.clone()),
            Self::StartRank => row.start_rank.clone(),
            Self::EndRank => row.end_rank.clone(),
            Self::TotalImprovement => row.total_improvement.clone(),
            Self::Weeks => row.weeks.clone(),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "term" => Ok(Self::Term),
            "start_rank" | "start" => Ok(Self::StartRank),
            "end_rank" | "end" => Ok(Self::EndRank),
            "total_improvement" | "improvement" => Ok(Self::TotalImprovement),
            "weeks" => Ok(Self::Weeks),
            other => Err(format!("unknown column '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

impl FromStr for SortDir {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("unknown direction '{other}'")),
        }
    }
}

impl fmt::Display for SortDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

/// Current table ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub key: SortKey,
    pub dir: SortDir,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            key: SortKey::TotalImprovement,
            dir: SortDir::Desc,
        }
    }
}

impl SortState {
    /// State after clicking the header for `key`: the same column while
    /// ascending flips to descending, anything else sorts ascending.
    pub fn toggled(self, key: SortKey) -> Self {
        let dir = if self.key == key && self.dir == SortDir::Asc {
            SortDir::Desc
        } else {
            SortDir::Asc
        };
        Self { key, dir }
    }
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Return `rows` ordered by `key` in direction `dir`.
pub fn sort_rows(rows: &[UptrendRow], key: SortKey, dir: SortDir) -> Vec<UptrendRow> {
    let numeric = rows.iter().all(|row| key.cell(row).as_number().is_some());
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| {
        let (a, b) = (key.cell(a), key.cell(b));
        let ord = if numeric {
            compare_cells(&a, &b)
        } else {
            compare_text(&a.to_string(), &b.to_string())
        };
        match dir {
            SortDir::Asc => ord,
            SortDir::Desc => ord.reverse(),
        }
    });
    sorted
}

/// Compare two cells: numerically when both are numbers, otherwise by
/// their string forms.
pub fn compare_cells(a: &CellValue, b: &CellValue) -> Ordering {
    match (a.as_number(), b.as_number()) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        _ => compare_text(&a.to_string(), &b.to_string()),
    }
}

/// Case-insensitive comparison with an exact-text tiebreak, so `apple`
/// sorts next to `Apple` rather than after every uppercase word.
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

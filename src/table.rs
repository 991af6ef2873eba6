/// Result table model.
///
/// Building the table is pure: rows in, display model out. The shell
/// paints it and the app wires row activation.
use crate::model::UptrendRow;
use crate::range::QueryRange;
use crate::sort::SortKey;

/// Keys that activate a focused row.
pub fn is_activation_key(key: &str) -> bool {
    matches!(key, "Enter" | " " | "Space")
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub term: String,
    /// Display text in [`SortKey::ALL`] column order.
    pub cells: [String; 5],
}

/// What the results area shows after a query.
#[derive(Debug, Clone, PartialEq)]
pub struct TableModel {
    pub rows: Vec<TableRow>,
    /// Range the rows were queried over; row activation charts this range.
    pub range: Option<QueryRange>,
}

impl Default for TableModel {
    fn default() -> Self {
        Self::build(&[], None)
    }
}

impl TableModel {
    pub fn build(rows: &[UptrendRow], range: Option<QueryRange>) -> Self {
        let rows = rows
            .iter()
            .map(|row| TableRow {
                term: row.term.clone(),
                cells: [
                    row.term.clone(),
                    row.start_rank.to_string(),
                    row.end_rank.to_string(),
                    row.total_improvement.to_string(),
                    row.weeks.to_string(),
                ],
            })
            .collect();
        Self { rows, range }
    }

    /// The result-count label.
    pub fn found_label(&self) -> String {
        format!("Found: {}", self.rows.len())
    }

    /// Whether the "no results" placeholder should be visible.
    pub fn shows_empty_state(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn headers() -> [&'static str; 5] {
        SortKey::ALL.map(SortKey::header)
    }
}

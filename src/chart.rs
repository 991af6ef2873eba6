/// Rank-history chart.
///
/// [`ChartGeometry::compute`] maps a series onto a fixed 740×260 plotting
/// area; [`render_svg`] and [`render_preview`] paint that geometry. The y
/// axis is inverted so better (smaller) ranks sit higher. Weeks without a
/// finite rank keep their x slot but are left out of the line and dots.
use std::fmt::Write as _;

use crate::model::SeriesPoint;

pub const WIDTH: f64 = 740.0;
pub const HEIGHT: f64 = 260.0;
pub const PAD: f64 = 24.0;

/// One series point in screen coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub x: f64,
    /// `None` when the term was absent that week.
    pub y: Option<f64>,
    pub week_label: String,
    pub rank: Option<f64>,
}

impl ChartPoint {
    /// Hover text for the point's marker.
    pub fn tooltip(&self) -> Option<String> {
        self.rank
            .map(|rank| format!("{} • rank {}", self.week_label, num(rank)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartGeometry {
    pub min_rank: f64,
    pub max_rank: f64,
    pub points: Vec<ChartPoint>,
}

impl ChartGeometry {
    pub fn compute(series: &[SeriesPoint]) -> Self {
        let ranks: Vec<f64> = series.iter().filter_map(SeriesPoint::finite_rank).collect();
        let (min_rank, max_rank) = if ranks.is_empty() {
            (0.0, 1.0)
        } else {
            (
                ranks.iter().copied().fold(f64::INFINITY, f64::min),
                ranks.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            )
        };

        let span = (max_rank - min_rank).max(1.0);
        let last_index = series.len().saturating_sub(1).max(1) as f64;

        let points = series
            .iter()
            .enumerate()
            .map(|(i, point)| {
                let rank = point.finite_rank();
                ChartPoint {
                    x: PAD + (WIDTH - 2.0 * PAD) * (i as f64 / last_index),
                    y: rank.map(|r| PAD + (HEIGHT - 2.0 * PAD) * ((r - min_rank) / span)),
                    week_label: point.week_label.clone(),
                    rank,
                }
            })
            .collect();

        Self {
            min_rank,
            max_rank,
            points,
        }
    }

    /// Points that take part in the line, in order.
    pub fn plotted(&self) -> impl Iterator<Item = (f64, f64, &ChartPoint)> {
        self.points
            .iter()
            .filter_map(|p| p.y.map(|y| (p.x, y, p)))
    }

    /// SVG path data: a move to the first plotted point, then a line to
    /// each following plotted point.
    pub fn path(&self) -> String {
        let mut path = String::new();
        for (x, y, _) in self.plotted() {
            let command = if path.is_empty() { "M" } else { " L" };
            let _ = write!(path, "{command} {} {}", num(x), num(y));
        }
        path
    }

    /// Number of line segments drawn.
    pub fn segment_count(&self) -> usize {
        self.plotted().count().saturating_sub(1)
    }

    pub fn first_label(&self) -> &str {
        self.points.first().map(|p| p.week_label.as_str()).unwrap_or("")
    }

    pub fn last_label(&self) -> &str {
        self.points.last().map(|p| p.week_label.as_str()).unwrap_or("")
    }
}

// ---------------------------------------------------------------------------
// SVG
// ---------------------------------------------------------------------------

/// Render the chart as a standalone SVG document. All text is escaped.
pub fn render_svg(title: &str, geometry: &ChartGeometry) -> String {
    let title = escape_xml(title);
    let bottom = HEIGHT - PAD;
    let right = WIDTH - PAD;

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" role="img" aria-label="{title} rank chart">"#,
        w = num(WIDTH),
        h = num(HEIGHT),
    );
    let _ = writeln!(svg, r#"  <g class="axis">"#);
    let _ = writeln!(
        svg,
        r#"    <line x1="{p}" y1="{p}" x2="{p}" y2="{b}" />"#,
        p = num(PAD),
        b = num(bottom)
    );
    let _ = writeln!(
        svg,
        r#"    <line x1="{p}" y1="{b}" x2="{r}" y2="{b}" />"#,
        p = num(PAD),
        b = num(bottom),
        r = num(right)
    );
    let _ = writeln!(
        svg,
        r#"    <text x="{}" y="{}">{}</text>"#,
        num(PAD),
        num(PAD - 6.0),
        num(geometry.min_rank)
    );
    let _ = writeln!(
        svg,
        r#"    <text x="{}" y="{}">{}</text>"#,
        num(PAD + 4.0),
        num(bottom - 4.0),
        num(geometry.max_rank)
    );
    let _ = writeln!(
        svg,
        r#"    <text x="{}" y="{}">{}</text>"#,
        num(PAD),
        num(bottom + 16.0),
        escape_xml(geometry.first_label())
    );
    let _ = writeln!(
        svg,
        r#"    <text x="{}" y="{}">{}</text>"#,
        num(right - 80.0),
        num(bottom + 16.0),
        escape_xml(geometry.last_label())
    );
    let _ = writeln!(
        svg,
        r##"    <text x="{}" y="{}" fill="#0f172a">{title}</text>"##,
        num(PAD),
        num(bottom + 30.0)
    );
    let _ = writeln!(svg, "  </g>");
    let _ = writeln!(svg, r#"  <path class="line" d="{}"/>"#, geometry.path());
    for (x, y, point) in geometry.plotted() {
        let tooltip = point.tooltip().unwrap_or_default();
        let _ = writeln!(
            svg,
            r#"  <circle class="dot" cx="{}" cy="{}" r="3"><title>{}</title></circle>"#,
            num(x),
            num(y),
            escape_xml(&tooltip)
        );
    }
    svg.push_str("</svg>\n");
    svg
}

/// Escape text for use in XML content and attribute values.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Shortest round-trip form: `24` rather than `24.0`.
fn num(value: f64) -> String {
    format!("{value}")
}

// ---------------------------------------------------------------------------
// Terminal preview
// ---------------------------------------------------------------------------

/// Plot the geometry onto a `cols`×`rows` character grid, framed with the
/// rank extremes and the first/last week labels.
pub fn render_preview(geometry: &ChartGeometry, cols: usize, rows: usize) -> Vec<String> {
    let cols = cols.max(2);
    let rows = rows.max(2);
    let mut grid = vec![vec![' '; cols]; rows];

    let scale = |value: f64, lo: f64, hi: f64, cells: usize| -> usize {
        let t = ((value - lo) / (hi - lo)).clamp(0.0, 1.0);
        (t * (cells - 1) as f64).round() as usize
    };

    for (x, y, _) in geometry.plotted() {
        let col = scale(x, PAD, WIDTH - PAD, cols);
        let row = scale(y, PAD, HEIGHT - PAD, rows);
        grid[row][col] = '●';
    }

    let top = num(geometry.min_rank);
    let bottom = num(geometry.max_rank);
    let gutter = top.len().max(bottom.len());

    let mut lines = Vec::with_capacity(rows + 2);
    for (i, row) in grid.into_iter().enumerate() {
        let label = match i {
            0 => top.as_str(),
            _ if i == rows - 1 => bottom.as_str(),
            _ => "",
        };
        let body: String = row.into_iter().collect();
        lines.push(format!("{label:>gutter$} │{body}"));
    }
    lines.push(format!("{:>gutter$} └{}", "", "─".repeat(cols)));

    let first = geometry.first_label();
    let last = geometry.last_label();
    let fill = cols.saturating_sub(first.chars().count() + last.chars().count());
    lines.push(format!("{:>gutter$}  {first}{}{last}", "", " ".repeat(fill)));
    lines
}

//! End-to-end dashboard behaviour against a scripted in-process backend.

use std::cell::{Cell, RefCell};

use trendlens::app::{App, Completion, Event};
use trendlens::client::{Backend, SeriesQuery, UptrendQuery};
use trendlens::config::schema::{DashboardConfig, Mode};
use trendlens::error::{DashError, DashResult};
use trendlens::filters::STORAGE_KEY;
use trendlens::logging;
use trendlens::model::{CellValue, SeriesPoint, UptrendRow, Week};
use trendlens::sort::{SortDir, SortKey};
use trendlens::storage::{MemoryStorage, Storage};
use trendlens::ui::ElementId;

// ---------------------------------------------------------------------------
// Scripted backend
// ---------------------------------------------------------------------------

#[derive(Default)]
struct ScriptedBackend {
    weeks: RefCell<Vec<Week>>,
    /// Catalog served after a successful reindex.
    reindexed_weeks: Option<Vec<Week>>,
    rows: Vec<UptrendRow>,
    series: Vec<SeriesPoint>,
    fail_weeks: Cell<bool>,
    fail_reindex: bool,
    /// Reindex succeeds but the following catalog fetch fails.
    fail_weeks_after_reindex: bool,
    uptrend_queries: RefCell<Vec<UptrendQuery>>,
    series_queries: RefCell<Vec<SeriesQuery>>,
}

fn unavailable() -> DashError {
    DashError::Request {
        status: 503,
        status_text: "Service Unavailable".into(),
        body: "index rebuilding".into(),
    }
}

impl Backend for ScriptedBackend {
    fn weeks(&self) -> DashResult<Vec<Week>> {
        if self.fail_weeks.get() {
            return Err(unavailable());
        }
        Ok(self.weeks.borrow().clone())
    }

    fn uptrends(&self, query: &UptrendQuery) -> DashResult<Vec<UptrendRow>> {
        self.uptrend_queries.borrow_mut().push(query.clone());
        Ok(self.rows.clone())
    }

    fn series(&self, query: &SeriesQuery) -> DashResult<Vec<SeriesPoint>> {
        self.series_queries.borrow_mut().push(query.clone());
        Ok(self.series.clone())
    }

    fn reindex(&self) -> DashResult<()> {
        if self.fail_reindex {
            return Err(unavailable());
        }
        if self.fail_weeks_after_reindex {
            self.fail_weeks.set(true);
        }
        if let Some(weeks) = &self.reindexed_weeks {
            *self.weeks.borrow_mut() = weeks.clone();
        }
        Ok(())
    }
}

fn catalog(n: i64) -> Vec<Week> {
    (1..=n).map(|i| Week::new(i, format!("W{i}"))).collect()
}

fn row(term: &str, start: f64, end: f64) -> UptrendRow {
    UptrendRow {
        term: term.to_string(),
        start_rank: start.into(),
        end_rank: end.into(),
        total_improvement: (start - end).into(),
        weeks: 6.0.into(),
    }
}

fn backend() -> ScriptedBackend {
    ScriptedBackend {
        weeks: RefCell::new(catalog(12)),
        rows: vec![
            row("solar", 50.0, 10.0),
            row("heat pump", 120.0, 14.0),
            row("ebike", 30.0, 25.0),
        ],
        series: vec![
            SeriesPoint::new("W7", Some(40.0)),
            SeriesPoint::new("W8", None),
            SeriesPoint::new("W9", Some(12.0)),
        ],
        ..ScriptedBackend::default()
    }
}

fn app_with(
    backend: ScriptedBackend,
    storage: MemoryStorage,
    mode: Mode,
) -> App<ScriptedBackend, MemoryStorage> {
    logging::set_enabled(false);
    let settings = DashboardConfig {
        mode,
        ..DashboardConfig::default()
    };
    App::new(backend, storage, settings)
}

fn started(mode: Mode) -> App<ScriptedBackend, MemoryStorage> {
    let mut app = app_with(backend(), MemoryStorage::default(), mode);
    app.start();
    app
}

fn last_query(app: &App<ScriptedBackend, MemoryStorage>) -> UptrendQuery {
    app.backend()
        .uptrend_queries
        .borrow()
        .last()
        .cloned()
        .expect("an uptrends request was sent")
}

fn query_count(app: &App<ScriptedBackend, MemoryStorage>) -> usize {
    app.backend().uptrend_queries.borrow().len()
}

// ---------------------------------------------------------------------------
// Startup and query runner
// ---------------------------------------------------------------------------

#[test]
fn startup_queries_trailing_window_sorted_by_improvement() {
    let app = started(Mode::Pro);
    let query = last_query(&app);
    assert_eq!((query.start_week_id, query.end_week_id), (7, 12));
    assert_eq!(app.range_badge(), "6 weeks • W7 → W12");

    let terms: Vec<&str> = app.table().rows.iter().map(|r| r.term.as_str()).collect();
    assert_eq!(terms, ["heat pump", "solar", "ebike"]);
    assert_eq!(app.table().found_label(), "Found: 3");
    assert!(!app.is_loading());
    assert!(!app.preloader_visible());
}

#[test]
fn reversed_range_is_swapped_before_querying() {
    let mut app = started(Mode::Pro);
    app.handle(Event::Input(ElementId::StartSelect, "10".into()));
    app.handle(Event::Input(ElementId::EndSelect, "5".into()));
    app.handle(Event::Click(ElementId::RunButton));

    let query = last_query(&app);
    assert_eq!((query.start_week_id, query.end_week_id), (5, 10));
    assert_eq!(app.range_badge(), "6 weeks • W5 → W10");
}

#[test]
fn single_week_range_is_rejected_without_a_request() {
    let mut app = started(Mode::Pro);
    let before = query_count(&app);
    app.handle(Event::Input(ElementId::StartSelect, "7".into()));
    app.handle(Event::Input(ElementId::EndSelect, "7".into()));
    app.handle(Event::Click(ElementId::RunButton));

    assert_eq!(query_count(&app), before);
    assert_eq!(app.toast().message(), Some("Range must be at least 2 weeks."));
    assert!(!app.is_loading());
    assert!(!app.take_console().is_empty());
}

#[test]
fn extreme_week_ids_fail_validation_at_startup() {
    let backend = ScriptedBackend {
        weeks: RefCell::new(vec![Week::new(i64::MIN, "a"), Week::new(i64::MAX, "b")]),
        ..backend()
    };
    let mut app = app_with(backend, MemoryStorage::default(), Mode::Pro);
    app.start();

    assert_eq!(query_count(&app), 0);
    assert_eq!(app.toast().message(), Some("Range is too wide."));
    assert!(!app.is_loading());
}

#[test]
fn term_filters_are_normalized_on_the_wire() {
    let mut app = started(Mode::Pro);
    app.handle(Event::Input(ElementId::IncludeInput, "a, b".into()));
    app.handle(Event::Input(ElementId::ExcludeInput, " c ,d ".into()));
    app.handle(Event::Key {
        key: "Enter".into(),
        ctrl: true,
    });

    let query = last_query(&app);
    assert_eq!(query.include, "a b");
    assert_eq!(query.exclude, "c d");
    // The input keeps what was typed.
    assert_eq!(app.controls().include.value, "a, b");
}

#[test]
fn header_clicks_toggle_direction() {
    let mut app = started(Mode::Pro);
    app.handle(Event::Click(ElementId::Header(SortKey::Term)));
    assert_eq!(app.sort_state().dir, SortDir::Asc);
    assert_eq!(app.table().rows[0].term, "ebike");

    app.handle(Event::Click(ElementId::Header(SortKey::Term)));
    assert_eq!(app.sort_state().dir, SortDir::Desc);
    assert_eq!(app.table().rows[0].term, "solar");
    assert_eq!(query_count(&app), 1);
}

#[test]
fn mixed_cells_sort_without_panicking() {
    let mut backend = backend();
    backend.rows[1].weeks = CellValue::Text("n/a".into());
    backend.rows[2].weeks = CellValue::Null;
    let mut app = app_with(backend, MemoryStorage::default(), Mode::Pro);
    app.start();
    app.handle(Event::Click(ElementId::Header(SortKey::Weeks)));
    assert_eq!(app.table().rows.len(), 3);
    assert!(!app.is_loading());
}

// ---------------------------------------------------------------------------
// Series viewer and modal
// ---------------------------------------------------------------------------

#[test]
fn row_activation_opens_chart_and_escape_restores_focus() {
    let mut app = started(Mode::Pro);
    app.handle(Event::Focus(ElementId::Row(1)));
    app.handle(Event::key("Enter"));

    assert!(app.modal().is_open());
    assert_eq!(app.modal().title, "solar");
    assert_eq!(app.focused(), Some(ElementId::ModalClose));
    let series = app.backend().series_queries.borrow().last().cloned().unwrap();
    assert_eq!(series.term, "solar");
    assert_eq!((series.start_week_id, series.end_week_id), (7, 12));
    assert!(app.modal().body.contains("<svg"));
    assert_eq!(app.chart().unwrap().segment_count(), 1);

    app.handle(Event::key("Escape"));
    assert!(!app.modal().is_open());
    assert_eq!(app.focused(), Some(ElementId::Row(1)));
}

#[test]
fn clicking_a_row_and_the_backdrop() {
    let mut app = started(Mode::Pro);
    app.handle(Event::Click(ElementId::Row(0)));
    assert_eq!(app.modal().title, "heat pump");

    app.handle(Event::Click(ElementId::ModalContent));
    assert!(app.modal().is_open());

    // The backdrop covers the page, so this click never reaches the button.
    let before = query_count(&app);
    app.handle(Event::Click(ElementId::RunButton));
    assert!(!app.modal().is_open());
    assert_eq!(query_count(&app), before);
    assert_eq!(app.focused(), Some(ElementId::Row(0)));
}

#[test]
fn space_activates_focused_row_and_focus_is_trapped() {
    let mut app = started(Mode::Pro);
    app.handle(Event::Focus(ElementId::Row(2)));
    app.handle(Event::key(" "));
    assert_eq!(app.modal().title, "ebike");

    app.handle(Event::Focus(ElementId::IncludeInput));
    assert_eq!(app.focused(), Some(ElementId::ModalClose));
}

#[test]
fn stale_series_response_is_discarded() {
    let mut app = started(Mode::Pro);
    let range = app.table().range.clone().unwrap();
    let first = app.begin_series("solar", &range);
    let second = app.begin_series("ebike", &range);

    let points = vec![SeriesPoint::new("W7", Some(3.0))];
    assert_eq!(app.complete_series(second, Ok(points.clone())), Completion::Applied);
    assert_eq!(app.complete_series(first, Ok(points)), Completion::Stale);
    assert_eq!(app.modal().title, "ebike");
}

// ---------------------------------------------------------------------------
// Reindex
// ---------------------------------------------------------------------------

#[test]
fn reindex_failure_keeps_catalog() {
    let backend = ScriptedBackend {
        fail_reindex: true,
        reindexed_weeks: Some(catalog(3)),
        ..backend()
    };
    let mut app = app_with(backend, MemoryStorage::default(), Mode::Pro);
    app.start();
    app.handle(Event::Click(ElementId::ReindexButton));

    assert_eq!(app.toast().message(), Some("Reindex failed."));
    assert_eq!(app.weeks().len(), 12);
    assert_eq!(app.controls().start.options().len(), 12);
    assert!(!app.is_loading());
}

#[test]
fn reindex_success_reloads_catalog() {
    let backend = ScriptedBackend {
        reindexed_weeks: Some(catalog(14)),
        ..backend()
    };
    let mut app = app_with(backend, MemoryStorage::default(), Mode::Pro);
    app.start();
    app.handle(Event::Click(ElementId::ReindexButton));

    assert_eq!(app.toast().message(), Some("Reindex completed."));
    assert_eq!(app.weeks().len(), 14);
    assert_eq!(app.controls().end.options().len(), 14);
    assert!(!app.is_loading());
}

#[test]
fn reindex_with_failed_reload_reports_the_reload() {
    let backend = ScriptedBackend {
        fail_weeks_after_reindex: true,
        reindexed_weeks: Some(catalog(3)),
        ..backend()
    };
    let mut app = app_with(backend, MemoryStorage::default(), Mode::Pro);
    app.start();
    app.take_console();
    app.handle(Event::Click(ElementId::ReindexButton));

    // The reload failure replaces the success toast.
    assert_eq!(app.toast().message(), Some("Failed to load weeks."));
    assert_eq!(app.weeks().len(), 12);
    assert_eq!(app.controls().start.options().len(), 12);
    assert!(!app.is_loading());
    let console = app.take_console();
    assert_eq!(console.len(), 1);
    assert!(console[0].starts_with("load_weeks:"));
}

// ---------------------------------------------------------------------------
// Persistence and failures
// ---------------------------------------------------------------------------

#[test]
fn filters_survive_a_restart() {
    let mut app = started(Mode::Pro);
    app.handle(Event::Input(ElementId::StartSelect, "3".into()));
    app.handle(Event::Input(ElementId::EndSelect, "9".into()));
    app.handle(Event::Input(ElementId::IncludeInput, "solar".into()));
    app.handle(Event::Input(ElementId::IncludeInput, String::new()));
    app.handle(Event::Click(ElementId::RunButton));
    let storage = app.storage().clone();
    assert!(storage.get_item(STORAGE_KEY).is_some());

    let mut restarted = app_with(backend(), storage, Mode::Pro);
    restarted.start();
    let query = last_query(&restarted);
    assert_eq!((query.start_week_id, query.end_week_id), (3, 9));
    assert_eq!(restarted.controls().include.value, "");
}

#[test]
fn corrupt_saved_filters_fall_back_to_defaults() {
    let mut storage = MemoryStorage::default();
    storage.set_item(STORAGE_KEY, "{not json");
    let mut app = app_with(backend(), storage, Mode::Pro);
    app.start();
    let query = last_query(&app);
    assert_eq!((query.start_week_id, query.end_week_id), (7, 12));
}

#[test]
fn failed_catalog_load_is_reported_and_clears_loading() {
    let backend = backend();
    backend.fail_weeks.set(true);
    let mut app = app_with(backend, MemoryStorage::default(), Mode::Pro);
    app.start();

    assert!(!app.is_loading());
    assert!(!app.preloader_visible());
    assert!(app.weeks().is_empty());
    assert_eq!(query_count(&app), 0);
    let console = app.take_console();
    assert!(console.iter().any(|line| line.contains("503 Service Unavailable - index rebuilding")));
}

// ---------------------------------------------------------------------------
// Demo mode
// ---------------------------------------------------------------------------

#[test]
fn demo_mode_locks_terms_and_trims_weeks() {
    let mut app = started(Mode::Demo);
    assert!(app.controls().include.disabled);
    assert_eq!(app.controls().exclude.placeholder, "Available in Pro");
    assert_eq!(app.controls().start.options().len(), 8);
    assert_eq!(app.controls().end.options().len(), 8);

    app.handle(Event::Input(ElementId::IncludeInput, "solar".into()));
    app.handle(Event::Click(ElementId::RunButton));
    assert_eq!(last_query(&app).include, "");
}

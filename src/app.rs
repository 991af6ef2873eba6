/// Dashboard application state and event dispatch.
///
/// [`App`] owns everything the dashboard touches: the backend client, the
/// filter storage, the cached week catalog, the sort state, the widgets
/// and the modal. It is constructed once and driven by [`Event`]s; the
/// shell paints whatever state results.
///
/// # Failure handling
///
/// Every user-triggered operation catches its own failure, shows it as a
/// toast and writes it to the diagnostics log. The loading indicator is
/// entered and left around each operation on every exit path, so no
/// failure leaves the UI busy.
///
/// # Overlapping requests
///
/// Queries and series loads are split into `begin_*` (validate, stamp a
/// generation) and `complete_*` (apply the response). A response whose
/// generation is older than the latest `begin_*` is discarded, so the most
/// recently issued request always wins the render.
use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};

use crate::chart::{self, ChartGeometry};
use crate::client::{Backend, SeriesQuery, UptrendQuery};
use crate::config::schema::{DashboardConfig, Mode};
use crate::demo;
use crate::error::{DashError, DashResult};
use crate::filters;
use crate::logging;
use crate::modal::Modal;
use crate::model::{SeriesPoint, UptrendRow, Week};
use crate::range::{self, QueryRange};
use crate::sort::{self, SortKey, SortState};
use crate::storage::Storage;
use crate::table::{self, TableModel};
use crate::ui::{ElementId, FilterControls, FocusModel, LoadingIndicator, Toast};

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// A user interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Pointer click on an element.
    Click(ElementId),
    /// Key press, delivered to the focused element and then the page.
    Key { key: String, ctrl: bool },
    /// Keyboard focus moving to an element.
    Focus(ElementId),
    /// New value typed into an input or picked in a select.
    Input(ElementId, String),
}

impl Event {
    pub fn key(key: &str) -> Self {
        Self::Key {
            key: key.to_string(),
            ctrl: false,
        }
    }
}

/// Work queued for the next scheduler tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deferred {
    TrimWeeks(usize),
}

/// What happened to a response handed to `complete_*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// A newer request was issued; the response was dropped.
    Stale,
    Failed,
}

/// A validated `/uptrends` request awaiting its response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingQuery {
    pub generation: u64,
    pub query: UptrendQuery,
    pub range: QueryRange,
}

/// A `/series` request awaiting its response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSeries {
    pub generation: u64,
    pub query: SeriesQuery,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

pub struct App<B: Backend, S: Storage> {
    backend: B,
    storage: S,
    settings: DashboardConfig,

    weeks: Vec<Week>,
    sort: SortState,
    /// Result rows in displayed order.
    rows: Vec<UptrendRow>,

    controls: FilterControls,
    table: TableModel,
    range_badge: String,
    chart: Option<ChartGeometry>,
    modal: Modal,
    focus: FocusModel,
    toast: Toast,
    loading: LoadingIndicator,
    preloader: bool,

    query_generation: u64,
    series_generation: u64,
    deferred: VecDeque<Deferred>,
    console: Vec<String>,
}

impl<B: Backend, S: Storage> App<B, S> {
    pub fn new(backend: B, storage: S, settings: DashboardConfig) -> Self {
        Self {
            backend,
            storage,
            settings,
            weeks: Vec::new(),
            sort: SortState::default(),
            rows: Vec::new(),
            controls: FilterControls::default(),
            table: TableModel::default(),
            range_badge: String::new(),
            chart: None,
            modal: Modal::default(),
            focus: FocusModel::default(),
            toast: Toast::default(),
            loading: LoadingIndicator::default(),
            preloader: true,
            query_generation: 0,
            series_generation: 0,
            deferred: VecDeque::new(),
            console: Vec::new(),
        }
    }

    // -- Accessors --

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn mode(&self) -> Mode {
        self.settings.mode
    }

    pub fn weeks(&self) -> &[Week] {
        &self.weeks
    }

    pub fn sort_state(&self) -> SortState {
        self.sort
    }

    pub fn rows(&self) -> &[UptrendRow] {
        &self.rows
    }

    pub fn controls(&self) -> &FilterControls {
        &self.controls
    }

    pub fn table(&self) -> &TableModel {
        &self.table
    }

    pub fn range_badge(&self) -> &str {
        &self.range_badge
    }

    pub fn chart(&self) -> Option<&ChartGeometry> {
        self.chart.as_ref()
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    pub fn focused(&self) -> Option<ElementId> {
        self.focus.active()
    }

    pub fn toast(&self) -> &Toast {
        &self.toast
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_active()
    }

    /// Whether the startup placeholder is still covering the dashboard.
    pub fn preloader_visible(&self) -> bool {
        self.preloader
    }

    /// Drain diagnostics produced since the last call.
    pub fn take_console(&mut self) -> Vec<String> {
        std::mem::take(&mut self.console)
    }

    // -- Startup --

    /// Load the catalog, apply demo limits, run the default query, then
    /// flush deferred work.
    pub fn start(&mut self) {
        // A failed load has already been reported; the session continues.
        let _ = self.load_weeks();
        self.apply_mode_limits();
        self.run_query();
        self.run_deferred();
    }

    // -- Week catalog --

    /// Fetch the week catalog and repopulate the selects.
    ///
    /// The catalog is only replaced once the fetch has succeeded, so a
    /// failure leaves the previous options untouched.
    pub fn load_weeks(&mut self) -> DashResult<()> {
        self.loading.begin();
        let result = self.backend.weeks();
        let outcome = match result {
            Ok(weeks) => {
                crate::weeks::populate(&mut self.controls, &weeks, self.settings.default_window);
                self.weeks = weeks;
                filters::restore(&self.storage, &mut self.controls);
                Ok(())
            }
            Err(err) => {
                self.report("load_weeks", "Failed to load weeks.", &err);
                Err(err)
            }
        };
        self.preloader = false;
        self.loading.end();
        outcome
    }

    /// Lock the term filters and queue week trimming when in demo mode.
    pub fn apply_mode_limits(&mut self) {
        if self.settings.mode != Mode::Demo {
            return;
        }
        demo::lock_term_filters(&mut self.controls);
        self.deferred
            .push_back(Deferred::TrimWeeks(self.settings.demo_week_limit));
    }

    /// Run all work queued for the next tick.
    pub fn run_deferred(&mut self) {
        while let Some(task) = self.deferred.pop_front() {
            match task {
                Deferred::TrimWeeks(keep) => demo::trim_weeks(&mut self.controls, keep),
            }
        }
    }

    // -- Uptrends query --

    /// Validate the range and stamp a new query generation.
    pub fn begin_query(&mut self) -> DashResult<PendingQuery> {
        let range = range::parse_range(
            self.controls.start.value(),
            self.controls.end.value(),
            &self.weeks,
        )?;
        self.range_badge = range.badge();
        let query = UptrendQuery::new(
            &range,
            &self.controls.include.value,
            &self.controls.exclude.value,
        );
        self.query_generation += 1;
        Ok(PendingQuery {
            generation: self.query_generation,
            query,
            range,
        })
    }

    /// Apply an `/uptrends` response unless a newer query was issued.
    pub fn complete_query(
        &mut self,
        pending: PendingQuery,
        result: DashResult<Vec<UptrendRow>>,
    ) -> Completion {
        if pending.generation != self.query_generation {
            logging::info("run_query", "discarded stale uptrends response");
            return Completion::Stale;
        }
        match result {
            Ok(rows) => {
                self.rows = sort::sort_rows(&rows, self.sort.key, self.sort.dir);
                self.table = TableModel::build(&self.rows, Some(pending.range));
                filters::persist(&mut self.storage, &self.controls);
                self.preloader = false;
                Completion::Applied
            }
            Err(err) => {
                let message = err.to_string();
                self.report("run_query", &message, &err);
                Completion::Failed
            }
        }
    }

    /// Validate, fetch, sort, render and persist.
    pub fn run_query(&mut self) -> Completion {
        self.loading.begin();
        let completion = match self.begin_query() {
            Ok(pending) => {
                let result = self.backend.uptrends(&pending.query);
                self.complete_query(pending, result)
            }
            Err(err) => {
                let message = err.to_string();
                self.report("run_query", &message, &err);
                Completion::Failed
            }
        };
        self.preloader = false;
        self.loading.end();
        completion
    }

    // -- Sorting --

    /// Replace the sort state without touching the displayed rows.
    pub fn set_sort(&mut self, state: SortState) {
        self.sort = state;
    }

    /// Header click: toggle the sort state and re-sort the displayed rows.
    pub fn sort_by(&mut self, key: SortKey) {
        self.sort = self.sort.toggled(key);
        self.rows = sort::sort_rows(&self.rows, self.sort.key, self.sort.dir);
        self.table = TableModel::build(&self.rows, self.table.range.clone());
    }

    // -- Series viewer --

    pub fn begin_series(&mut self, term: &str, range: &QueryRange) -> PendingSeries {
        self.series_generation += 1;
        PendingSeries {
            generation: self.series_generation,
            query: SeriesQuery::new(term, range.start, range.end),
        }
    }

    /// Draw the chart and open the modal unless a newer load was issued.
    pub fn complete_series(
        &mut self,
        pending: PendingSeries,
        result: DashResult<Vec<SeriesPoint>>,
    ) -> Completion {
        if pending.generation != self.series_generation {
            logging::info("show_series", "discarded stale series response");
            return Completion::Stale;
        }
        match result {
            Ok(points) => {
                let geometry = ChartGeometry::compute(&points);
                self.modal.title = pending.query.term.clone();
                self.modal.body = chart::render_svg(&pending.query.term, &geometry);
                self.chart = Some(geometry);
                self.modal.open(&mut self.focus);
                Completion::Applied
            }
            Err(err) => {
                self.report("show_series", "Failed to load series.", &err);
                Completion::Failed
            }
        }
    }

    /// Fetch a term's history over `range` and show it in the modal.
    pub fn show_series(&mut self, term: &str, range: &QueryRange) -> Completion {
        self.loading.begin();
        let pending = self.begin_series(term, range);
        let result = self.backend.series(&pending.query);
        let completion = self.complete_series(pending, result);
        self.loading.end();
        completion
    }

    /// Open the series viewer for the row at `index`.
    pub fn activate_row(&mut self, index: usize) -> Option<Completion> {
        let term = self.table.rows.get(index)?.term.clone();
        let range = self.table.range.clone()?;
        self.focus.focus(ElementId::Row(index));
        Some(self.show_series(&term, &range))
    }

    // -- Reindex --

    /// Ask the backend to reindex, then reload the week catalog.
    pub fn reindex(&mut self) {
        self.loading.begin();
        match self.backend.reindex() {
            Ok(()) => {
                if self.load_weeks().is_ok() {
                    self.notify("Reindex completed.");
                }
            }
            Err(err) => self.report("reindex", "Reindex failed.", &err),
        }
        self.loading.end();
    }

    // -- Modal --

    pub fn close_modal(&mut self) {
        self.modal.close(&mut self.focus);
    }

    // -- Event dispatch --

    pub fn handle(&mut self, event: Event) {
        match event {
            Event::Click(target) => self.on_click(target),
            Event::Key { key, ctrl } => self.on_key(&key, ctrl),
            Event::Focus(target) => {
                self.focus.focus(target);
                self.modal.on_focus(target, &mut self.focus);
            }
            Event::Input(target, value) => self.on_input(target, value),
        }
        self.run_deferred();
    }

    fn on_click(&mut self, target: ElementId) {
        if self.modal.is_open() {
            // The backdrop covers the page, so any click outside the
            // dialog lands on it.
            let target = if target.in_modal() {
                target
            } else {
                ElementId::ModalBackdrop
            };
            self.modal.on_click(target, &mut self.focus);
            return;
        }

        match target {
            ElementId::RunButton | ElementId::ReindexButton if self.loading.is_active() => {}
            ElementId::RunButton => {
                self.run_query();
            }
            ElementId::ReindexButton => self.reindex(),
            ElementId::Header(key) => self.sort_by(key),
            ElementId::Row(index) => {
                self.activate_row(index);
            }
            other => self.focus.focus(other),
        }
    }

    fn on_key(&mut self, key: &str, ctrl: bool) {
        if self.modal.on_key(key, &mut self.focus) {
            return;
        }
        if ctrl && key == "Enter" {
            self.run_query();
            return;
        }
        if let Some(ElementId::Row(index)) = self.focus.active()
            && table::is_activation_key(key)
        {
            self.activate_row(index);
        }
    }

    fn on_input(&mut self, target: ElementId, value: String) {
        match target {
            ElementId::StartSelect => self.controls.start.set_value(&value),
            ElementId::EndSelect => self.controls.end.set_value(&value),
            ElementId::IncludeInput if !self.controls.include.disabled => {
                self.controls.include.value = value;
            }
            ElementId::ExcludeInput if !self.controls.exclude.disabled => {
                self.controls.exclude.value = value;
            }
            _ => return,
        }
        filters::persist(&mut self.storage, &self.controls);
    }

    // -- Notifications --

    /// Hide the toast once its lifetime has passed.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        self.toast.tick(now);
    }

    fn notify(&mut self, message: &str) {
        let lifetime = i64::try_from(self.settings.toast_ms)
            .ok()
            .and_then(Duration::try_milliseconds)
            .unwrap_or(Duration::MAX);
        self.toast.show(message, Utc::now(), lifetime);
    }

    /// Toast `message` and record `err` in the log and console.
    fn report(&mut self, scope: &str, message: &str, err: &DashError) {
        self.notify(message);
        let detail = err.to_string();
        if err.is_validation() {
            logging::warn(scope, &detail);
        } else {
            logging::error(scope, &detail);
        }
        self.console.push(format!("{scope}: {detail}"));
    }
}

//! Filter and load coordination.
//!
//! [`Coordinator`] is the single writer for filter, pagination and the three
//! view states. It is a plain state machine: events go in through
//! [`Coordinator::handle`], commands for the outside world come out. Every
//! fetch carries a [`Ticket`]; a result whose ticket is no longer the newest
//! for its view is dropped, so a slow response for an old filter or page can
//! never overwrite newer state.
//!
//! Views are independent. A failure moves only the view that saw it to
//! [`LoadPhase::Failed`], keeping whatever it showed before. The exception is
//! [`ErrorKind::Unauthorized`], which clears the stored credential, abandons
//! every in-flight fetch and asks for a redirect to the login page.

pub mod pagination;
pub mod runner;
pub mod state;

pub use pagination::PaginationState;
pub use runner::Runner;
pub use state::{ChartView, LoadPhase, SummaryView, TableView, Ticket, ViewId, ViewState};

use tracing::{debug, info, warn};

use crate::charts::bucketing::bucket_rows;
use crate::charts::series::{
    borough_labels, borough_series, build_trend_series, distribution_series,
};
use crate::charts::types::SeriesSet;
use crate::config::DashboardConfig;
use crate::error::{DashboardError, ErrorKind};
use crate::export::aggregates_to_csv;
use crate::models::{DailyAggregatesPage, DateRangeFilter, SummaryStats, TripPage};
use crate::services::FetchRequest;
use crate::session::SessionStore;

/// Successful response body, by endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchPayload {
    Summary(SummaryStats),
    Aggregates(DailyAggregatesPage),
    Trips(TripPage),
}

/// Completion of one fetch, successful or not.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    pub ticket: Ticket,
    pub result: Result<FetchPayload, ErrorKind>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    FilterChanged(DateRangeFilter),
    PageChanged(u32),
    FetchResolved(FetchOutcome),
    LoggedOut,
}

/// Side effects requested by the coordinator.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Fetch(FetchRequest),
    RedirectToLogin,
}

pub struct Coordinator<S> {
    session: S,
    filter: Option<DateRangeFilter>,
    pagination: PaginationState,
    /// Page asked for by the newest table fetch.
    table_page: u32,
    chart_page_size: u32,
    summary: ViewState<SummaryView>,
    chart: ViewState<ChartView>,
    table: ViewState<TableView>,
    login_required: bool,
}

impl<S: SessionStore> Coordinator<S> {
    pub fn new(session: S, page_size: u32, chart_page_size: u32) -> Result<Self, DashboardError> {
        // same bounds as the table page size
        PaginationState::new(chart_page_size)?;

        Ok(Self {
            session,
            filter: None,
            pagination: PaginationState::new(page_size)?,
            table_page: 1,
            chart_page_size,
            summary: ViewState::default(),
            chart: ViewState::default(),
            table: ViewState::default(),
            login_required: false,
        })
    }

    pub fn from_config(session: S, config: &DashboardConfig) -> Result<Self, DashboardError> {
        Self::new(session, config.page_size, config.chart_page_size)
    }

    pub fn handle(&mut self, event: DashboardEvent) -> Vec<Command> {
        match event {
            DashboardEvent::FilterChanged(filter) => self.apply_filter(filter),
            DashboardEvent::PageChanged(page) => self.change_page(page),
            DashboardEvent::FetchResolved(outcome) => self.resolve(outcome),
            DashboardEvent::LoggedOut => self.logout(),
        }
    }

    /// Replaces the filter, goes back to page 1 and reloads all three views.
    pub fn apply_filter(&mut self, filter: DateRangeFilter) -> Vec<Command> {
        info!(
            start = %filter.start(),
            end = %filter.end(),
            service_type = filter.service_type().unwrap_or("all"),
            "Applying filter"
        );

        self.filter = Some(filter.clone());
        self.pagination.reset();

        let Some(credential) = self.session.credential() else {
            return self.terminate_session("no stored credential");
        };
        self.login_required = false;

        [ViewId::Summary, ViewId::Chart, ViewId::Table]
            .into_iter()
            .map(|view| {
                let req = self.start_fetch(view, filter.clone(), credential.clone());
                Command::Fetch(req)
            })
            .collect()
    }

    /// Reloads only the table at `page`.
    ///
    /// Out-of-range pages are ignored, and so is every page change between a
    /// filter change and the first table result for it.
    pub fn change_page(&mut self, page: u32) -> Vec<Command> {
        if !self.pagination.set_page(page) {
            debug!(
                page,
                total_pages = self.pagination.total_pages(),
                "Ignoring out-of-range page"
            );
            return Vec::new();
        }
        self.reload_table()
    }

    /// Applies a fetch result if its ticket is still current.
    pub fn resolve(&mut self, outcome: FetchOutcome) -> Vec<Command> {
        let FetchOutcome { ticket, result } = outcome;

        if !self.is_current(ticket) {
            debug!(
                view = ?ticket.view,
                generation = ticket.generation,
                "Discarding stale fetch result"
            );
            return Vec::new();
        }

        match result {
            Ok(payload) => self.store(ticket.view, payload),
            Err(kind) => {
                warn!(view = ?ticket.view, error = %kind, "Fetch failed");
                let unauthorized = kind.is_unauthorized();
                self.fail_view(ticket.view, kind);
                if unauthorized {
                    self.terminate_session("backend rejected the credential")
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// Stores a fresh credential after a successful login.
    pub fn sign_in(&mut self, token: String) {
        self.session.set_credential(token);
        self.login_required = self.session.credential().is_none();
    }

    pub fn logout(&mut self) -> Vec<Command> {
        self.terminate_session("logged out")
    }

    pub fn filter(&self) -> Option<&DateRangeFilter> {
        self.filter.as_ref()
    }

    pub fn pagination(&self) -> &PaginationState {
        &self.pagination
    }

    pub fn summary(&self) -> &ViewState<SummaryView> {
        &self.summary
    }

    pub fn chart(&self) -> &ViewState<ChartView> {
        &self.chart
    }

    pub fn table(&self) -> &ViewState<TableView> {
        &self.table
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    /// Set once the session ends; cleared by the next successful load start.
    pub fn login_required(&self) -> bool {
        self.login_required
    }

    /// True when no view has a fetch in flight.
    pub fn is_settled(&self) -> bool {
        !(self.summary.is_loading() || self.chart.is_loading() || self.table.is_loading())
    }

    /// Current chart series for the renderer. Views without data give empty series.
    pub fn series(&self) -> SeriesSet {
        let (line, bar) = match self.chart.data() {
            Some(chart) => (chart.line.clone(), chart.bar.clone()),
            None => build_trend_series(&Default::default()),
        };
        let (pie, boroughs) = match self.summary.data() {
            Some(summary) => (summary.distribution.clone(), summary.boroughs.clone()),
            None => (distribution_series(None), borough_series(None)),
        };
        SeriesSet {
            line,
            bar,
            pie,
            boroughs,
        }
    }

    /// CSV of the aggregate rows currently behind the chart, if any are loaded.
    pub fn export_csv(&self) -> Result<Option<String>, DashboardError> {
        self.chart
            .data()
            .map(|chart| aggregates_to_csv(&chart.rows))
            .transpose()
    }

    fn reload_table(&mut self) -> Vec<Command> {
        let Some(filter) = self.filter.clone() else {
            return Vec::new();
        };
        let Some(credential) = self.session.credential() else {
            return self.terminate_session("no stored credential");
        };
        vec![Command::Fetch(self.start_fetch(ViewId::Table, filter, credential))]
    }

    fn start_fetch(
        &mut self,
        view: ViewId,
        filter: DateRangeFilter,
        credential: String,
    ) -> FetchRequest {
        let (generation, page, page_size) = match view {
            ViewId::Summary => (self.summary.begin(), 1, self.chart_page_size),
            ViewId::Chart => (self.chart.begin(), 1, self.chart_page_size),
            ViewId::Table => {
                self.table_page = self.pagination.page();
                (
                    self.table.begin(),
                    self.table_page,
                    self.pagination.page_size(),
                )
            }
        };

        debug!(?view, generation, page, "Starting fetch");

        FetchRequest {
            ticket: Ticket { view, generation },
            filter,
            page,
            page_size,
            credential,
        }
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        match ticket.view {
            ViewId::Summary => self.summary.is_current(ticket.generation),
            ViewId::Chart => self.chart.is_current(ticket.generation),
            ViewId::Table => self.table.is_current(ticket.generation),
        }
    }

    fn fail_view(&mut self, view: ViewId, kind: ErrorKind) {
        match view {
            ViewId::Summary => self.summary.fail(kind),
            ViewId::Chart => self.chart.fail(kind),
            ViewId::Table => {
                self.table.fail(kind);
                // the page indicator follows the rows still on screen
                let shown = self.table.data().map_or(1, |t| t.page);
                self.pagination.restore(shown);
            }
        }
    }

    fn store(&mut self, view: ViewId, payload: FetchPayload) -> Vec<Command> {
        match (view, payload) {
            (ViewId::Summary, FetchPayload::Summary(stats)) => {
                let summary = SummaryView {
                    distribution: distribution_series(Some(&stats)),
                    boroughs: borough_series(Some(&stats)),
                    borough_labels: borough_labels(Some(&stats)),
                    stats,
                };
                debug!(total_trips = summary.stats.total_trips, "Summary loaded");
                self.summary.resolve(summary);
                Vec::new()
            }
            (ViewId::Chart, FetchPayload::Aggregates(page)) => {
                let Some(filter) = self.filter.as_ref() else {
                    self.chart.fail(ErrorKind::ServerError("no active filter".to_string()));
                    return Vec::new();
                };
                let truncated = page.pagination.total_pages > 1;
                if truncated {
                    warn!(
                        loaded = page.data.len(),
                        total_records = page.pagination.total_records,
                        "Chart range does not fit in one page; showing the first page only"
                    );
                }

                let buckets = bucket_rows(&page.data, filter);
                let (line, bar) = build_trend_series(&buckets);
                debug!(rows = page.data.len(), buckets = buckets.len(), "Chart loaded");
                self.chart.resolve(ChartView {
                    rows: page.data,
                    buckets,
                    line,
                    bar,
                    truncated,
                });
                Vec::new()
            }
            (ViewId::Table, FetchPayload::Trips(page)) => {
                let requested = self.table_page;
                self.pagination.update_totals(page.pagination.total_records);
                debug!(
                    rows = page.data.len(),
                    page = requested,
                    total_pages = self.pagination.total_pages(),
                    "Trip page loaded"
                );
                self.table.resolve(TableView {
                    page: requested,
                    rows: page.data,
                });

                if self.pagination.page() == requested {
                    return Vec::new();
                }
                info!(
                    requested,
                    last_page = self.pagination.page(),
                    "Requested page no longer exists, loading the last page"
                );
                self.reload_table()
            }
            (view, _) => {
                warn!(?view, "Fetch returned a payload for a different view");
                self.fail_view(
                    view,
                    ErrorKind::ServerError(format!("unexpected payload for {view:?} view")),
                );
                Vec::new()
            }
        }
    }

    fn terminate_session(&mut self, reason: &str) -> Vec<Command> {
        warn!(reason, "Ending session, login required");
        self.session.clear_credential();
        self.login_required = true;
        self.summary.abandon();
        self.chart.abandon();
        self.table.abandon();
        self.pagination.restore(self.table.data().map_or(1, |t| t.page));
        vec![Command::RedirectToLogin]
    }
}

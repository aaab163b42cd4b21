use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{Instrument, debug, info};

use crate::coordinator::state::ViewId;
use crate::coordinator::{Command, Coordinator, DashboardEvent, FetchOutcome, FetchPayload};
use crate::services::{DashboardApi, FetchRequest};
use crate::session::SessionStore;

/// Drives a [`Coordinator`] against a [`DashboardApi`].
///
/// Fetches run as concurrent tokio tasks. Their outcomes come back over a
/// channel and are applied one at a time, so the coordinator stays the only
/// writer of dashboard state.
pub struct Runner<A, S> {
    api: Arc<A>,
    coordinator: Coordinator<S>,
    tx: mpsc::UnboundedSender<FetchOutcome>,
    rx: mpsc::UnboundedReceiver<FetchOutcome>,
    in_flight: usize,
    redirected: bool,
}

impl<A, S> Runner<A, S>
where
    A: DashboardApi + 'static,
    S: SessionStore,
{
    pub fn new(api: Arc<A>, coordinator: Coordinator<S>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            api,
            coordinator,
            tx,
            rx,
            in_flight: 0,
            redirected: false,
        }
    }

    pub fn coordinator(&self) -> &Coordinator<S> {
        &self.coordinator
    }

    pub fn coordinator_mut(&mut self) -> &mut Coordinator<S> {
        &mut self.coordinator
    }

    /// Whether a redirect to login was requested since the last dispatch.
    pub fn redirected(&self) -> bool {
        self.redirected
    }

    /// Feeds an event to the coordinator and starts whatever fetches it asks for.
    pub fn dispatch(&mut self, event: DashboardEvent) {
        if !matches!(event, DashboardEvent::FetchResolved(_)) {
            self.redirected = false;
        }
        let commands = self.coordinator.handle(event);
        self.execute(commands);
    }

    /// Applies outcomes as they arrive until no fetch is outstanding.
    ///
    /// Outcomes of abandoned or superseded fetches are still drained; the
    /// coordinator discards them.
    #[tracing::instrument(skip(self))]
    pub async fn run_until_settled(&mut self) {
        while self.in_flight > 0 {
            let Some(outcome) = self.rx.recv().await else {
                break;
            };
            self.in_flight -= 1;
            self.dispatch(DashboardEvent::FetchResolved(outcome));
        }
        debug!("All fetches settled");
    }

    fn execute(&mut self, commands: Vec<Command>) {
        for command in commands {
            match command {
                Command::Fetch(req) => self.spawn_fetch(req),
                Command::RedirectToLogin => {
                    info!("Redirect to login requested");
                    self.redirected = true;
                }
            }
        }
    }

    fn spawn_fetch(&mut self, req: FetchRequest) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let span = tracing::info_span!(
            "fetch",
            view = ?req.ticket.view,
            generation = req.ticket.generation,
            page = req.page,
        );

        self.in_flight += 1;
        tokio::spawn(
            async move {
                let ticket = req.ticket;
                let result = match ticket.view {
                    ViewId::Summary => api.fetch_summary(&req).await.map(FetchPayload::Summary),
                    ViewId::Chart => api
                        .fetch_daily_aggregates(&req)
                        .await
                        .map(FetchPayload::Aggregates),
                    ViewId::Table => api.fetch_trip_page(&req).await.map(FetchPayload::Trips),
                };
                debug!(ok = result.is_ok(), "Fetch finished");

                // receiver only goes away with the runner
                let _ = tx.send(FetchOutcome { ticket, result });
            }
            .instrument(span),
        );
    }
}

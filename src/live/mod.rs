use std::sync::Arc;

use chrono_tz::Tz;
use tokio::sync::mpsc;
use tracing::debug;

mod cancel;
mod controller;
mod scheduler;
pub use cancel::*;
pub use controller::*;
pub use scheduler::*;

use crate::{
    arrivals::{Arrivals, get_arrivals},
    config::Config,
    error::QueryError,
    query::RouteFilter,
    trimet::UpstreamClient,
};

type Completion = (Generation, Result<Arrivals, QueryError>);

/// A live query running on the tokio runtime.
///
/// Submitting stops starts a fetch; every delivered result re-arms a
/// refresh after the configured interval. Results are pulled with
/// [`Session::next`].
pub struct Session<C> {
    client: Arc<C>,
    controller: QueryController<TokioScheduler>,
    routes: Option<RouteFilter>,
    timezone: Tz,
    ticks: mpsc::UnboundedReceiver<Generation>,
    completed: mpsc::UnboundedSender<Completion>,
    completions: mpsc::UnboundedReceiver<Completion>,
}

impl<C> Session<C>
where
    C: UpstreamClient + 'static,
{
    pub fn new(client: C, config: &Config) -> Self {
        let (tick_sender, ticks) = mpsc::unbounded_channel();
        let (completed, completions) = mpsc::unbounded_channel();
        Self {
            client: Arc::new(client),
            controller: QueryController::new(
                TokioScheduler::new(tick_sender),
                config.refresh_interval,
            ),
            routes: None,
            timezone: config.timezone,
            ticks,
            completed,
            completions,
        }
    }

    /// Restricts every result to these routes.
    pub fn with_routes(mut self, routes: RouteFilter) -> Self {
        self.routes = Some(routes).filter(|routes| !routes.is_empty());
        self
    }

    pub fn submit(&mut self, term: &str) -> Result<Submission, QueryError> {
        let submission = self.controller.submit(term)?;
        self.start(&submission);
        Ok(submission)
    }

    pub fn toggle(&mut self, term: &str) -> Result<Submission, QueryError> {
        let submission = self.controller.toggle(term)?;
        self.start(&submission);
        Ok(submission)
    }

    pub fn clear(&mut self) {
        self.controller.clear();
    }

    pub fn controller(&self) -> &QueryController<TokioScheduler> {
        &self.controller
    }

    /// Waits for the next result of the live query.
    ///
    /// Refresh ticks are handled while waiting. Pending forever while no
    /// query is live; the future is cancel safe.
    pub async fn next(&mut self) -> Delivery {
        loop {
            tokio::select! {
                Some(generation) = self.ticks.recv() => {
                    if let Some(ticket) = self.controller.on_tick(generation) {
                        self.dispatch(ticket);
                    }
                }
                Some((generation, outcome)) = self.completions.recv() => {
                    if let Some(delivery) = self.controller.on_complete(generation, outcome) {
                        return delivery;
                    }
                }
            }
        }
    }

    fn start(&self, submission: &Submission) {
        if let Submission::Issued(ticket) = submission {
            self.dispatch(ticket.clone());
        }
    }

    fn dispatch(&self, ticket: Ticket) {
        let client = Arc::clone(&self.client);
        let routes = self.routes.clone();
        let timezone = self.timezone;
        let completed = self.completed.clone();
        tokio::spawn(async move {
            let Ticket {
                generation,
                stops,
                token,
            } = ticket;
            if token.is_cancelled() {
                return;
            }
            tokio::select! {
                _ = token.cancelled() => {
                    debug!("Query {generation} canceled before completion");
                }
                outcome = get_arrivals(client.as_ref(), &stops, routes.as_ref(), &timezone) => {
                    if !token.is_cancelled() {
                        let _ = completed.send((generation, outcome));
                    }
                }
            }
        });
    }
}

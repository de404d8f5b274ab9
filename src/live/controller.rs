use std::time::Duration;

use tracing::debug;

use crate::{
    arrivals::Arrivals,
    error::QueryError,
    live::{CancelHandle, CancelToken, Scheduler, cancel_pair},
    query::StopQuery,
};

/// Increases with every fetch the controller issues.
pub type Generation = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing in flight and no refresh pending.
    Idle,
    Fetching,
    /// A result was delivered and the refresh timer is armed.
    Delivered,
}

/// Everything needed to perform one fetch.
#[derive(Debug, Clone)]
pub struct Ticket {
    pub generation: Generation,
    pub stops: StopQuery,
    pub token: CancelToken,
}

#[derive(Debug, Clone)]
pub enum Submission {
    /// A new fetch must be performed.
    Issued(Ticket),
    /// Same stops as the live query, nothing to do.
    Unchanged,
    /// Blank input; the live query was dropped.
    Cleared,
}

/// What the caller gets to see from a completed fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    Arrivals(Arrivals),
    /// Valid query with nothing arriving. Refreshing continues.
    NoMatch(QueryError),
    /// Refreshing has stopped; submit again to resume.
    Failed(QueryError),
}

/// Lifecycle of a single live query.
///
/// The controller never performs I/O itself. It hands out [`Ticket`]s for
/// fetches, accepts their outcomes through [`QueryController::on_complete`]
/// and arms its [`Scheduler`] for the next refresh. Outcomes and ticks that
/// belong to an older generation are ignored, so a superseded query can
/// never overwrite a newer one.
#[derive(Debug)]
pub struct QueryController<S> {
    scheduler: S,
    interval: Duration,
    generation: Generation,
    phase: Phase,
    active: Option<StopQuery>,
    in_flight: Option<CancelHandle>,
}

impl<S: Scheduler> QueryController<S> {
    pub fn new(scheduler: S, interval: Duration) -> Self {
        Self {
            scheduler,
            interval,
            generation: 0,
            phase: Phase::Idle,
            active: None,
            in_flight: None,
        }
    }

    /// Parses `term` and makes it the live query.
    ///
    /// A term that fails to parse leaves the current query untouched.
    pub fn submit(&mut self, term: &str) -> Result<Submission, QueryError> {
        let stops = StopQuery::parse(term)?;
        Ok(self.submit_query(stops))
    }

    /// Toggles the stops in `term` in or out of the live query.
    pub fn toggle(&mut self, term: &str) -> Result<Submission, QueryError> {
        let stops = StopQuery::parse(term)?;
        let current = self.active.clone().unwrap_or_default();
        Ok(self.submit_query(stops.merge(&current, true)))
    }

    pub fn submit_query(&mut self, stops: StopQuery) -> Submission {
        if stops.is_empty() {
            self.clear();
            return Submission::Cleared;
        }
        if self.phase != Phase::Idle && self.active.as_ref() == Some(&stops) {
            debug!("Query for stops {stops} is already live");
            return Submission::Unchanged;
        }
        Submission::Issued(self.issue(stops))
    }

    /// Called when a refresh timer fires.
    pub fn on_tick(&mut self, generation: Generation) -> Option<Ticket> {
        if generation != self.generation || self.phase != Phase::Delivered {
            debug!("Ignoring stale refresh tick {generation}");
            return None;
        }
        let stops = self.active.clone()?;
        Some(self.issue(stops))
    }

    /// Called when the fetch for `generation` finishes.
    ///
    /// Returns `None` when the fetch was superseded or cleared meanwhile.
    pub fn on_complete(
        &mut self,
        generation: Generation,
        outcome: Result<Arrivals, QueryError>,
    ) -> Option<Delivery> {
        if generation != self.generation || self.phase != Phase::Fetching {
            debug!("Discarding result of superseded query {generation}");
            return None;
        }
        self.in_flight = None;
        match outcome {
            Ok(arrivals) => {
                self.phase = Phase::Delivered;
                self.scheduler.arm(self.interval, generation);
                if arrivals.is_empty() {
                    let stops = self.active.as_ref().map(StopQuery::to_vec).unwrap_or_default();
                    Some(Delivery::NoMatch(QueryError::NoMatch { stops }))
                } else {
                    Some(Delivery::Arrivals(arrivals))
                }
            }
            Err(error) => {
                debug!("Query {generation} failed, refresh stopped: {error}");
                self.phase = Phase::Idle;
                self.scheduler.disarm();
                Some(Delivery::Failed(error))
            }
        }
    }

    /// Drops the live query, its in-flight fetch and its timer.
    pub fn clear(&mut self) {
        self.cancel_pending();
        self.generation += 1;
        self.phase = Phase::Idle;
        self.active = None;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn active(&self) -> Option<&StopQuery> {
        self.active.as_ref()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    fn issue(&mut self, stops: StopQuery) -> Ticket {
        self.cancel_pending();
        self.generation += 1;
        let (handle, token) = cancel_pair();
        self.in_flight = Some(handle);
        self.phase = Phase::Fetching;
        self.active = Some(stops.clone());
        debug!("Issuing query {} for stops {stops}", self.generation);
        Ticket {
            generation: self.generation,
            stops,
            token,
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.cancel();
        }
        self.scheduler.disarm();
    }
}

mod common;

use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use common::*;
use mystops::{
    config::Config,
    error::QueryError,
    live::{Delivery, Session, Submission},
    query::{RouteFilter, StopQuery},
    trimet::{RawResponse, UpstreamClient},
};
use tokio::time::{Instant, sleep, timeout};

/// Answers with one arrival per requested stop. Stop 1 is slow.
#[derive(Default, Clone)]
struct FakeClient {
    calls: Arc<AtomicUsize>,
    fail: bool,
}

impl FakeClient {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl UpstreamClient for FakeClient {
    async fn fetch(&self, stops: &StopQuery) -> Result<RawResponse, QueryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let latency = if stops.contains(1) { 5 } else { 1 };
        sleep(Duration::from_secs(latency)).await;
        if self.fail {
            return Err(QueryError::Transport {
                message: "connection reset".into(),
            });
        }
        let locations = stops
            .ids()
            .map(|id| location(id, &format!("Stop {id}")))
            .collect();
        let arrivals = stops
            .ids()
            .flat_map(|id| {
                [
                    estimated(id, 4, "4 Division", 2 * MINUTE),
                    estimated(id, 9, "9 Powell", 4 * MINUTE),
                ]
            })
            .collect();
        Ok(response(locations, arrivals))
    }
}

fn stop_ids(delivery: &Delivery) -> Vec<u64> {
    match delivery {
        Delivery::Arrivals(arrivals) => arrivals.stop_ids(),
        other => panic!("expected arrivals, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn delivers_arrivals_for_submitted_stops() {
    let client = FakeClient::default();
    let mut session = Session::new(client.clone(), &Config::default());
    assert!(matches!(
        session.submit("8989, 2").unwrap(),
        Submission::Issued(_)
    ));
    let delivery = session.next().await;
    assert_eq!(stop_ids(&delivery), vec![2, 8989]);
    assert_eq!(client.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn superseded_query_is_never_delivered() {
    let client = FakeClient::default();
    let mut session = Session::new(client.clone(), &Config::default());
    session.submit("1").unwrap();
    session.submit("2").unwrap();

    let delivery = session.next().await;
    assert_eq!(stop_ids(&delivery), vec![2]);

    // Stop 1 would have answered by now; only the refresh of stop 2 follows.
    let delivery = session.next().await;
    assert_eq!(stop_ids(&delivery), vec![2]);
}

#[tokio::test(start_paused = true)]
async fn refreshes_after_interval() {
    let client = FakeClient::default();
    let mut session = Session::new(client.clone(), &Config::default());
    session.submit("2").unwrap();
    session.next().await;

    let delivered = Instant::now();
    let delivery = session.next().await;
    assert_eq!(stop_ids(&delivery), vec![2]);
    assert!(delivered.elapsed() >= Duration::from_secs(30));
    assert_eq!(client.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn resubmitting_live_query_does_not_refetch() {
    let client = FakeClient::default();
    let mut session = Session::new(client.clone(), &Config::default());
    session.submit("2, 3").unwrap();
    session.next().await;
    assert!(matches!(
        session.submit("3,2").unwrap(),
        Submission::Unchanged
    ));
    assert_eq!(client.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn failure_stops_polling() {
    let client = FakeClient {
        fail: true,
        ..Default::default()
    };
    let mut session = Session::new(client.clone(), &Config::default());
    session.submit("2").unwrap();
    assert!(matches!(session.next().await, Delivery::Failed(_)));

    assert!(timeout(Duration::from_secs(120), session.next()).await.is_err());
    assert_eq!(client.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn clear_stops_delivery() {
    let client = FakeClient::default();
    let mut session = Session::new(client.clone(), &Config::default());
    session.submit("2").unwrap();
    session.clear();
    assert!(timeout(Duration::from_secs(120), session.next()).await.is_err());
}

#[tokio::test(start_paused = true)]
async fn route_filter_applies_to_every_result() {
    let client = FakeClient::default();
    let mut session = Session::new(client.clone(), &Config::default())
        .with_routes(RouteFilter::parse("9").unwrap());
    session.submit("2").unwrap();
    let Delivery::Arrivals(arrivals) = session.next().await else {
        panic!("expected arrivals");
    };
    assert_eq!(arrivals.count, 1);
    assert_eq!(arrivals.stops[0].routes[0].id, 9);
}

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::shared::geo::{Coordinate, DistanceAway};

/// How urgently an arrival should be highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Designation {
    Red,
    Orange,
    Yellow,
}

impl Designation {
    /// Picks a tag from the time left until an estimated arrival.
    pub fn for_delta(delta_millis: i64) -> Option<Self> {
        if delta_millis <= 60_000 {
            Some(Designation::Red)
        } else if delta_millis <= 180_000 {
            Some(Designation::Orange)
        } else if delta_millis <= 300_000 {
            Some(Designation::Yellow)
        } else {
            None
        }
    }
}

/// Prediction state as reported by the agency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Estimated,
    Scheduled,
    Delayed,
    Canceled,
    Other(String),
}

impl From<&str> for Status {
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "estimated" => Status::Estimated,
            "scheduled" => Status::Scheduled,
            "delayed" => Status::Delayed,
            "canceled" | "cancelled" => Status::Canceled,
            other => Status::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Arrival {
    pub estimated: Option<DateTime<FixedOffset>>,
    pub scheduled: Option<DateTime<FixedOffset>>,
    pub status: String,
    pub distance_away: DistanceAway,
    pub designation: Option<Designation>,
}

impl Arrival {
    /// Sort key: the estimate, else the schedule, else the epoch.
    pub fn effective_millis(&self) -> i64 {
        self.estimated
            .or(self.scheduled)
            .map(|time| time.timestamp_millis())
            .unwrap_or(0)
    }
}

/// A normalized arrival still tagged with where it belongs.
#[derive(Debug, Clone, PartialEq)]
pub struct StopArrival {
    pub stop_id: u64,
    pub route_id: u64,
    pub sign: String,
    pub arrival: Arrival,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub id: u64,
    pub name: String,
    pub arrivals: Vec<Arrival>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: u64,
    pub name: String,
    pub coordinates: Coordinate,
    pub routes: Vec<Route>,
}

/// One query's complete answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Arrivals {
    pub count: usize,
    pub update_time: String,
    pub stops: Vec<Stop>,
}

impl Arrivals {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn stop_ids(&self) -> Vec<u64> {
        self.stops.iter().map(|stop| stop.id).collect()
    }
}

#[test]
fn designation_thresholds() {
    assert_eq!(Designation::for_delta(-10_000), Some(Designation::Red));
    assert_eq!(Designation::for_delta(60_000), Some(Designation::Red));
    assert_eq!(Designation::for_delta(120_000), Some(Designation::Orange));
    assert_eq!(Designation::for_delta(300_000), Some(Designation::Yellow));
    assert_eq!(Designation::for_delta(300_001), None);
}

#[test]
fn status_parsing_is_lenient() {
    assert_eq!(Status::from(" Estimated "), Status::Estimated);
    assert_eq!(Status::from("cancelled"), Status::Canceled);
    assert_eq!(Status::from("drifting"), Status::Other("drifting".into()));
}

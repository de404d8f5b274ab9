#![allow(dead_code)]

use chrono::{DateTime, Utc};
use mystops::trimet::{RawArrival, RawLocation, RawResponse};

/// 2023-11-14 14:13:20 in Portland.
pub const NOW: i64 = 1_700_000_000_000;
pub const SECOND: i64 = 1000;
pub const MINUTE: i64 = 60 * SECOND;

pub fn now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(NOW).unwrap()
}

pub fn arrival(stop_id: u64, route_id: u64, sign: &str) -> RawArrival {
    RawArrival {
        stop_id,
        route_id,
        sign: sign.into(),
        ..Default::default()
    }
}

pub fn estimated(stop_id: u64, route_id: u64, sign: &str, in_millis: i64) -> RawArrival {
    RawArrival {
        estimated: Some(NOW + in_millis),
        status: Some("estimated".into()),
        ..arrival(stop_id, route_id, sign)
    }
}

pub fn location(id: u64, desc: &str) -> RawLocation {
    RawLocation {
        id,
        desc: desc.into(),
        lat: Some(45.5),
        lng: Some(-122.6),
    }
}

pub fn response(locations: Vec<RawLocation>, arrivals: Vec<RawArrival>) -> RawResponse {
    RawResponse {
        query_time: now(),
        arrivals,
        locations,
    }
}

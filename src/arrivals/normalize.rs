use chrono::{DateTime, TimeZone, Utc};
use tracing::{error, warn};

use crate::{
    arrivals::{Arrival, Designation, Status, StopArrival},
    query::RouteFilter,
    shared::{
        geo::Distance,
        time::{from_millis, nice_delta, nice_time},
    },
    trimet::RawArrival,
};

/// Estimates further than this from the schedule get an early/late suffix.
pub const ON_TIME_TOLERANCE: i64 = 60_000;

const UNKNOWN_REASON: &str = "???";

/// Turns one raw record into a display-ready arrival.
///
/// Returns `None` when no status can be derived, in which case the record
/// is dropped from the result.
pub fn normalize<Tz: TimeZone>(raw: &RawArrival, now: DateTime<Utc>, tz: &Tz) -> Option<Arrival> {
    let status = infer_status(raw)?;
    let now_millis = now.timestamp_millis();
    let designation = raw
        .estimated
        .and_then(|estimated| Designation::for_delta(estimated.saturating_sub(now_millis)));

    Some(Arrival {
        estimated: raw
            .estimated
            .and_then(|millis| from_millis(millis, tz))
            .map(|time| time.fixed_offset()),
        scheduled: raw
            .scheduled
            .and_then(|millis| from_millis(millis, tz))
            .map(|time| time.fixed_offset()),
        status: status_text(&status, raw, now_millis, tz),
        distance_away: Distance::from_feet(raw.feet.unwrap_or_default()).into(),
        designation,
    })
}

/// Normalizes every record that passes `routes`, keeping its stop and route.
pub fn normalize_all<Tz: TimeZone>(
    raws: &[RawArrival],
    routes: Option<&RouteFilter>,
    now: DateTime<Utc>,
    tz: &Tz,
) -> Vec<StopArrival> {
    raws.iter()
        .filter(|raw| routes.is_none_or(|filter| filter.allows(raw.route_id)))
        .filter_map(|raw| {
            let arrival = normalize(raw, now, tz)?;
            Some(StopArrival {
                stop_id: raw.stop_id,
                route_id: raw.route_id,
                sign: raw.sign.clone(),
                arrival,
            })
        })
        .collect()
}

/// The agency status, or a guess from which timestamps are present.
pub fn infer_status(raw: &RawArrival) -> Option<Status> {
    if let Some(status) = raw.status.as_deref().filter(|s| !s.trim().is_empty()) {
        return Some(Status::from(status));
    }
    warn!(
        "Status not set for arrival at stop {} for route {}",
        raw.stop_id, raw.route_id
    );
    if raw.estimated.is_some() {
        Some(Status::Estimated)
    } else if raw.scheduled.is_some() {
        Some(Status::Scheduled)
    } else {
        error!(
            "Could not guess status for arrival at stop {} for route {}",
            raw.stop_id, raw.route_id
        );
        None
    }
}

pub fn status_text<Tz: TimeZone>(
    status: &Status,
    raw: &RawArrival,
    now_millis: i64,
    tz: &Tz,
) -> String {
    match status {
        Status::Estimated => match raw.estimated {
            Some(estimated) => {
                let text = nice_delta(estimated.saturating_sub(now_millis), false);
                match raw.scheduled {
                    Some(scheduled) if estimated.saturating_sub(scheduled) > ON_TIME_TOLERANCE => {
                        format!("{text} (late)")
                    }
                    Some(scheduled) if scheduled.saturating_sub(estimated) > ON_TIME_TOLERANCE => {
                        format!("{text} (early)")
                    }
                    _ => text,
                }
            }
            None => scheduled_text(raw, tz),
        },
        Status::Scheduled => scheduled_text(raw, tz),
        Status::Delayed => format!("Delayed: {}", reason(raw)),
        Status::Canceled => format!("Canceled: {}", reason(raw)),
        Status::Other(_) => "N/A".to_string(),
    }
}

fn scheduled_text<Tz: TimeZone>(raw: &RawArrival, tz: &Tz) -> String {
    raw.scheduled
        .and_then(|millis| from_millis(millis, tz))
        .map(|time| format!("Scheduled: {}", nice_time(&time, false)))
        .unwrap_or_else(|| "N/A".to_string())
}

fn reason(raw: &RawArrival) -> &str {
    raw.reason
        .as_deref()
        .map(str::trim)
        .filter(|reason| !reason.is_empty())
        .unwrap_or(UNKNOWN_REASON)
}

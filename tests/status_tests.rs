mod common;

use chrono_tz::America::Los_Angeles;
use common::*;
use mystops::{
    arrivals::{Designation, Status, infer_status, normalize},
    trimet::RawArrival,
};

fn status_of(raw: &RawArrival) -> String {
    normalize(raw, now(), &Los_Angeles).unwrap().status
}

#[test]
fn twenty_seconds_out_is_due() {
    assert_eq!(status_of(&estimated(1, 4, "4", 20 * SECOND)), "Due");
}

#[test]
fn forty_five_seconds_out_is_less_than_a_minute() {
    assert_eq!(
        status_of(&estimated(1, 4, "4", 45 * SECOND)),
        "Less than a minute"
    );
}

#[test]
fn two_minutes_without_schedule() {
    assert_eq!(status_of(&estimated(1, 4, "4", 125 * SECOND)), "2 minutes");
}

#[test]
fn ten_minutes_after_schedule_is_late() {
    let raw = RawArrival {
        scheduled: Some(NOW + 5 * MINUTE),
        ..estimated(1, 4, "4", 15 * MINUTE)
    };
    assert_eq!(status_of(&raw), "15 minutes (late)");
}

#[test]
fn ten_minutes_before_schedule_is_early() {
    let raw = RawArrival {
        scheduled: Some(NOW + 15 * MINUTE),
        ..estimated(1, 4, "4", 5 * MINUTE)
    };
    assert!(status_of(&raw).ends_with(" (early)"));
}

#[test]
fn within_a_minute_of_schedule_has_no_suffix() {
    let raw = RawArrival {
        scheduled: Some(NOW + 5 * MINUTE - 50 * SECOND),
        ..estimated(1, 4, "4", 5 * MINUTE)
    };
    assert_eq!(status_of(&raw), "5 minutes");
}

#[test]
fn scheduled_shows_clock_time() {
    let raw = RawArrival {
        scheduled: Some(NOW + 20 * MINUTE),
        status: Some("scheduled".into()),
        ..arrival(1, 4, "4")
    };
    assert_eq!(status_of(&raw), "Scheduled: 2:33 p.m.");
}

#[test]
fn delayed_and_canceled_carry_reason() {
    let delayed = RawArrival {
        status: Some("delayed".into()),
        reason: Some("Police activity".into()),
        ..arrival(1, 4, "4")
    };
    let canceled = RawArrival {
        status: Some("canceled".into()),
        ..arrival(1, 4, "4")
    };
    assert_eq!(status_of(&delayed), "Delayed: Police activity");
    assert_eq!(status_of(&canceled), "Canceled: ???");
}

#[test]
fn unknown_status_is_not_available() {
    let raw = RawArrival {
        status: Some("teleporting".into()),
        ..arrival(1, 4, "4")
    };
    assert_eq!(status_of(&raw), "N/A");
}

#[test]
fn missing_status_is_inferred() {
    let raw = RawArrival {
        status: None,
        ..estimated(1, 4, "4", 3 * MINUTE)
    };
    assert_eq!(infer_status(&raw), Some(Status::Estimated));
    assert_eq!(status_of(&raw), "3 minutes");

    let raw = RawArrival {
        scheduled: Some(NOW),
        ..arrival(1, 4, "4")
    };
    assert_eq!(infer_status(&raw), Some(Status::Scheduled));
}

#[test]
fn record_without_any_time_is_skipped() {
    assert!(normalize(&arrival(1, 4, "4"), now(), &Los_Angeles).is_none());
}

#[test]
fn distance_is_converted_from_feet() {
    let raw = RawArrival {
        feet: Some(5280.0),
        ..estimated(1, 4, "4", 10 * MINUTE)
    };
    let arrival = normalize(&raw, now(), &Los_Angeles).unwrap();
    assert_eq!(arrival.distance_away.feet, 5280.0);
    assert_eq!(arrival.distance_away.miles, 1.0);
    assert!((arrival.distance_away.meters - 1609.344).abs() < 1e-9);
    assert!((arrival.distance_away.kilometers - 1.609344).abs() < 1e-9);
}

#[test]
fn missing_distance_is_zero() {
    let arrival = normalize(&estimated(1, 4, "4", MINUTE), now(), &Los_Angeles).unwrap();
    assert_eq!(arrival.distance_away.feet, 0.0);
    assert_eq!(arrival.distance_away.kilometers, 0.0);
}

#[test]
fn designation_follows_time_left() {
    let soon = normalize(&estimated(1, 4, "4", 50 * SECOND), now(), &Los_Angeles).unwrap();
    let later = normalize(&estimated(1, 4, "4", 4 * MINUTE), now(), &Los_Angeles).unwrap();
    let far = normalize(&estimated(1, 4, "4", 20 * MINUTE), now(), &Los_Angeles).unwrap();
    assert_eq!(soon.designation, Some(Designation::Red));
    assert_eq!(later.designation, Some(Designation::Yellow));
    assert_eq!(far.designation, None);
}

#[test]
fn times_are_in_agency_zone() {
    let arrival = normalize(&estimated(1, 4, "4", 2 * MINUTE), now(), &Los_Angeles).unwrap();
    let estimated = arrival.estimated.unwrap();
    assert_eq!(estimated.to_rfc3339(), "2023-11-14T14:15:20-08:00");
    assert_eq!(arrival.scheduled, None);
}

#[test]
fn extreme_timestamps_do_not_overflow() {
    let raw = RawArrival {
        estimated: Some(i64::MIN),
        scheduled: Some(i64::MAX),
        ..estimated(1, 4, "4", 0)
    };
    let arrival = normalize(&raw, now(), &Los_Angeles).unwrap();
    assert_eq!(arrival.status, "Due (early)");
    assert_eq!(arrival.designation, Some(Designation::Red));
    assert_eq!(arrival.estimated, None);

    let raw = RawArrival {
        estimated: Some(i64::MAX),
        scheduled: Some(i64::MIN),
        ..estimated(1, 4, "4", 0)
    };
    let arrival = normalize(&raw, now(), &Los_Angeles).unwrap();
    assert!(arrival.status.ends_with(" (late)"));
    assert_eq!(arrival.designation, None);
}

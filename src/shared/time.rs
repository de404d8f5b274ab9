use chrono::{DateTime, TimeZone, Timelike, Utc};

const SECOND: i64 = 1000;
const MINUTE: i64 = 60 * SECOND;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

/// Arrivals at most this far out read as "Due".
pub const DUE_THRESHOLD: i64 = 30 * SECOND;
/// Leftover seconds above this round the minute count up.
pub const ROUND_UP_THRESHOLD: i64 = 45 * SECOND;

/// TriMet reports timestamps as milliseconds since the epoch.
pub fn from_millis<Tz: TimeZone>(millis: i64, tz: &Tz) -> Option<DateTime<Tz>> {
    DateTime::<Utc>::from_timestamp_millis(millis).map(|time| time.with_timezone(tz))
}

/// Formats a time on a 12 hour clock, e.g. `3:07 p.m.` or `3:07:09 p.m.`.
pub fn nice_time<Tz: TimeZone>(time: &DateTime<Tz>, with_seconds: bool) -> String {
    let (is_pm, hour) = time.hour12();
    let am_pm = if is_pm { "p.m." } else { "a.m." };
    if with_seconds {
        format!(
            "{}:{:02}:{:02} {}",
            hour,
            time.minute(),
            time.second(),
            am_pm
        )
    } else {
        format!("{}:{:02} {}", hour, time.minute(), am_pm)
    }
}

/// Renders how far away something is, e.g. `1 hour, 5 minutes`.
///
/// Without seconds, a remainder over 45 seconds rounds the minutes up so a
/// rider never sees more time than they actually have.
pub fn nice_delta(delta_millis: i64, with_seconds: bool) -> String {
    if delta_millis <= DUE_THRESHOLD {
        return "Due".to_string();
    }
    if delta_millis < MINUTE {
        return "Less than a minute".to_string();
    }

    let mut days = delta_millis / DAY;
    let mut hours = (delta_millis % DAY) / HOUR;
    let mut minutes = (delta_millis % HOUR) / MINUTE;
    let remainder = delta_millis % MINUTE;

    let mut seconds = 0;
    if with_seconds {
        seconds = (remainder + SECOND / 2) / SECOND;
        if seconds == 60 {
            seconds = 0;
            minutes += 1;
        }
    } else if remainder > ROUND_UP_THRESHOLD {
        minutes += 1;
    }
    if minutes == 60 {
        minutes = 0;
        hours += 1;
    }
    if hours == 24 {
        hours = 0;
        days += 1;
    }

    let mut parts = Vec::with_capacity(4);
    push_part(&mut parts, days, "day");
    push_part(&mut parts, hours, "hour");
    push_part(&mut parts, minutes, "minute");
    if with_seconds {
        push_part(&mut parts, seconds, "second");
    }
    parts.join(", ")
}

fn push_part(parts: &mut Vec<String>, value: i64, unit: &str) {
    match value {
        0 => {}
        1 => parts.push(format!("1 {unit}")),
        n => parts.push(format!("{n} {unit}s")),
    }
}

#[cfg(test)]
fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
    use chrono::NaiveDate;
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .and_then(|date| date.and_hms_opt(h, m, s))
        .unwrap()
        .and_utc()
}

#[test]
fn nice_time_morning() {
    assert_eq!(nice_time(&at(9, 5, 0), false), "9:05 a.m.");
}

#[test]
fn nice_time_noon_and_midnight() {
    assert_eq!(nice_time(&at(12, 0, 0), false), "12:00 p.m.");
    assert_eq!(nice_time(&at(0, 30, 0), false), "12:30 a.m.");
}

#[test]
fn nice_time_with_seconds() {
    assert_eq!(nice_time(&at(15, 7, 9), true), "3:07:09 p.m.");
}

#[test]
fn nice_delta_due() {
    assert_eq!(nice_delta(20 * SECOND, false), "Due");
    assert_eq!(nice_delta(30 * SECOND, false), "Due");
    assert_eq!(nice_delta(-5 * MINUTE, false), "Due");
}

#[test]
fn nice_delta_less_than_a_minute() {
    assert_eq!(nice_delta(45 * SECOND, false), "Less than a minute");
}

#[test]
fn nice_delta_minutes() {
    assert_eq!(nice_delta(125 * SECOND, false), "2 minutes");
    assert_eq!(nice_delta(61 * SECOND, false), "1 minute");
}

#[test]
fn nice_delta_rounds_up_late_seconds() {
    assert_eq!(nice_delta(2 * MINUTE + 46 * SECOND, false), "3 minutes");
    assert_eq!(nice_delta(2 * MINUTE + 45 * SECOND, false), "2 minutes");
}

#[test]
fn nice_delta_carries_into_hours() {
    assert_eq!(nice_delta(59 * MINUTE + 50 * SECOND, false), "1 hour");
}

#[test]
fn nice_delta_days_hours_minutes() {
    let delta = DAY + 2 * HOUR + 3 * MINUTE;
    assert_eq!(nice_delta(delta, false), "1 day, 2 hours, 3 minutes");
}

#[test]
fn nice_delta_with_seconds() {
    assert_eq!(nice_delta(2 * MINUTE + 5 * SECOND, true), "2 minutes, 5 seconds");
    assert_eq!(nice_delta(HOUR + SECOND, true), "1 hour, 1 second");
}

#[test]
fn from_millis_converts_zone() {
    let time = from_millis(0, &chrono_tz::America::Los_Angeles).unwrap();
    assert_eq!(nice_time(&time, false), "4:00 p.m.");
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;
use tracing::warn;

use crate::error::QueryError;

/// Top level of a TriMet `arrivals` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Envelope {
    #[serde(rename = "resultSet", default)]
    pub result_set: ResultSet,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSet {
    #[serde(default, deserialize_with = "loose_millis")]
    pub query_time: Option<i64>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub arrival: Vec<RawArrival>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub location: Vec<RawLocation>,
    #[serde(default)]
    pub error: Option<RawError>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawError {
    #[serde(default)]
    pub content: Option<String>,
}

/// One prediction record exactly as TriMet sends it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawArrival {
    #[serde(rename = "locid", deserialize_with = "loose_id")]
    pub stop_id: u64,
    #[serde(rename = "route", deserialize_with = "loose_id")]
    pub route_id: u64,
    #[serde(rename = "fullSign", default)]
    pub sign: String,
    #[serde(default, deserialize_with = "loose_millis")]
    pub estimated: Option<i64>,
    #[serde(default, deserialize_with = "loose_millis")]
    pub scheduled: Option<i64>,
    #[serde(default, deserialize_with = "loose_number")]
    pub feet: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Stop metadata returned alongside the arrivals.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawLocation {
    #[serde(deserialize_with = "loose_id")]
    pub id: u64,
    #[serde(default)]
    pub desc: String,
    #[serde(default, deserialize_with = "loose_number")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "loose_number")]
    pub lng: Option<f64>,
}

/// A successful upstream answer with the agency error already ruled out.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub query_time: DateTime<Utc>,
    pub arrivals: Vec<RawArrival>,
    pub locations: Vec<RawLocation>,
}

impl TryFrom<ResultSet> for RawResponse {
    type Error = QueryError;

    fn try_from(value: ResultSet) -> Result<Self, Self::Error> {
        if let Some(error) = value.error {
            let message = error
                .content
                .filter(|content| !content.trim().is_empty())
                .unwrap_or_else(|| "Unknown error".to_string());
            return Err(QueryError::Upstream { message });
        }
        let query_time = value
            .query_time
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .unwrap_or_else(Utc::now);
        Ok(Self {
            query_time,
            arrivals: value.arrival,
            locations: value.location,
        })
    }
}

/// Skips elements that fail to decode instead of failing the whole list.
fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(values
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(item) => Some(item),
            Err(err) => {
                warn!("Skipping malformed record: {err}");
                None
            }
        })
        .collect())
}

fn loose_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(number) => number
            .as_u64()
            .ok_or_else(|| serde::de::Error::custom(format!("bad id {number}"))),
        Value::String(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("bad id {text:?}"))),
        other => Err(serde::de::Error::custom(format!("bad id {other}"))),
    }
}

fn loose_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse().ok(),
        _ => None,
    })
}

/// Accepts epoch milliseconds as a number or string, or an ISO 8601 string.
///
/// Zero and values outside the representable date range read as absent.
fn loose_millis<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let millis = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(number)) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|value| value as i64)),
        Some(Value::String(text)) => parse_millis(text.trim()),
        _ => None,
    };
    Ok(millis.filter(|value| {
        *value != 0 && DateTime::<Utc>::from_timestamp_millis(*value).is_some()
    }))
}

fn parse_millis(text: &str) -> Option<i64> {
    if let Ok(value) = text.parse::<i64>() {
        return Some(value);
    }
    DateTime::parse_from_rfc3339(text)
        .or_else(|_| DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .map(|time| time.timestamp_millis())
        .ok()
}

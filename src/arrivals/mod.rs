use chrono::{DateTime, TimeZone, Utc};

mod aggregate;
mod models;
mod normalize;
pub use aggregate::*;
pub use models::*;
pub use normalize::*;

use crate::{
    error::QueryError,
    query::{RouteFilter, StopQuery},
    trimet::{RawResponse, UpstreamClient},
};

/// Fetches arrivals for `stops` and shapes them into a result.
pub async fn get_arrivals<C, Tz>(
    client: &C,
    stops: &StopQuery,
    routes: Option<&RouteFilter>,
    tz: &Tz,
) -> Result<Arrivals, QueryError>
where
    C: UpstreamClient,
    Tz: TimeZone,
{
    let response = client.fetch(stops).await?;
    Ok(build(response, routes, Utc::now(), tz))
}

/// Normalizes and aggregates an upstream response as of `now`.
pub fn build<Tz: TimeZone>(
    response: RawResponse,
    routes: Option<&RouteFilter>,
    now: DateTime<Utc>,
    tz: &Tz,
) -> Arrivals {
    let arrivals = normalize_all(&response.arrivals, routes, now, tz);
    aggregate(&response.locations, arrivals, response.query_time, tz)
}

use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};
use tracing::warn;

use crate::{
    arrivals::{Arrivals, Route, Stop, StopArrival},
    shared::{Coordinate, collapse_whitespace, nice_time},
    trimet::RawLocation,
};

/// Groups arrivals by stop and route into a sorted result.
///
/// Stops come out ascending by id, routes by case-insensitive name and
/// arrivals by effective time. Every location appears even when nothing
/// is arriving there; arrivals for stops outside `locations` are dropped.
pub fn aggregate<Tz: TimeZone>(
    locations: &[RawLocation],
    arrivals: Vec<StopArrival>,
    query_time: DateTime<Utc>,
    tz: &Tz,
) -> Arrivals {
    let mut stops: BTreeMap<u64, Stop> = BTreeMap::new();
    for location in locations {
        stops.entry(location.id).or_insert_with(|| Stop {
            id: location.id,
            name: location.desc.clone(),
            coordinates: Coordinate {
                latitude: location.lat.unwrap_or_default(),
                longitude: location.lng.unwrap_or_default(),
            },
            routes: Vec::new(),
        });
    }

    let mut count = 0;
    for item in arrivals {
        let Some(stop) = stops.get_mut(&item.stop_id) else {
            warn!(
                "Dropping arrival for route {} at unknown stop {}",
                item.route_id, item.stop_id
            );
            continue;
        };
        let index = match stop.routes.iter().position(|route| route.id == item.route_id) {
            Some(index) => index,
            None => {
                stop.routes.push(Route {
                    id: item.route_id,
                    name: collapse_whitespace(&item.sign),
                    arrivals: Vec::new(),
                });
                stop.routes.len() - 1
            }
        };
        stop.routes[index].arrivals.push(item.arrival);
        count += 1;
    }

    let mut stops: Vec<Stop> = stops.into_values().collect();
    for stop in stops.iter_mut() {
        stop.routes.sort_by_cached_key(|route| route.name.to_lowercase());
        for route in stop.routes.iter_mut() {
            route.arrivals.sort_by_key(|arrival| arrival.effective_millis());
        }
    }

    Arrivals {
        count,
        update_time: nice_time(&query_time.with_timezone(tz), true),
        stops,
    }
}

use std::fmt::Display;

use serde::{Deserialize, Serialize, ser::SerializeTuple};

pub(crate) const FEET_PER_MILE: f64 = 5280.0;
pub(crate) const METERS_PER_FOOT: f64 = 0.3048;
pub(crate) const KILOMETERS_PER_FOOT: f64 = 0.0003048;

/// A distance measured in feet, which is the unit TriMet reports.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Distance(f64);

impl Distance {
    pub const fn from_feet(distance: f64) -> Self {
        Self(distance)
    }

    pub const fn as_feet(&self) -> f64 {
        self.0
    }

    pub const fn as_miles(&self) -> f64 {
        self.0 / FEET_PER_MILE
    }

    pub const fn as_meters(&self) -> f64 {
        self.0 * METERS_PER_FOOT
    }

    pub const fn as_kilometers(&self) -> f64 {
        self.0 * KILOMETERS_PER_FOOT
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }
}

impl Display for Distance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.as_miles() >= 0.1 {
            f.write_fmt(format_args!("{:.1} mi", self.as_miles()))
        } else {
            f.write_fmt(format_args!("{:.0} ft", self.as_feet()))
        }
    }
}

/// Same distance in every unit the result envelope exposes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DistanceAway {
    pub feet: f64,
    pub miles: f64,
    pub meters: f64,
    pub kilometers: f64,
}

impl From<Distance> for DistanceAway {
    fn from(value: Distance) -> Self {
        Self {
            feet: value.as_feet(),
            miles: value.as_miles(),
            meters: value.as_meters(),
            kilometers: value.as_kilometers(),
        }
    }
}

/// Serialized as `[longitude, latitude]` to match GeoJSON ordering.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Serialize for Coordinate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.longitude)?;
        tuple.serialize_element(&self.latitude)?;
        tuple.end()
    }
}

impl<'de> Deserialize<'de> for Coordinate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let (longitude, latitude) = <(f64, f64)>::deserialize(deserializer)?;
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

#[test]
fn distance_conversion_test() {
    let distance = Distance::from_feet(5280.0);
    assert_eq!(distance.as_miles(), 1.0);
    assert!((distance.as_meters() - 1609.344).abs() < 1e-9);
    assert!((distance.as_kilometers() - 1.609344).abs() < 1e-9);
}

#[test]
fn distance_display_test() {
    assert_eq!(Distance::from_feet(300.0).to_string(), "300 ft");
    assert_eq!(Distance::from_feet(6652.8).to_string(), "1.3 mi");
    assert!(Distance::from_feet(0.0).is_zero());
}

#[test]
fn coordinate_serializes_lng_first() {
    let coordinate = Coordinate {
        latitude: 45.5,
        longitude: -122.6,
    };
    let json = serde_json::to_string(&coordinate).unwrap();
    assert_eq!(json, "[-122.6,45.5]");
}

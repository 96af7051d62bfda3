use std::{error, fmt, ops::RangeInclusive};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_KM: f64 = 6371.0;

const LATITUDE_RANGE: RangeInclusive<f64> = -90.0..=90.0;
const LONGITUDE_RANGE: RangeInclusive<f64> = -180.0..=180.0;

/// A coordinate that is not finite or lies outside of ±90° latitude or
/// ±180° longitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidCoordinate {
    pub coordinate: Coordinate,
}

impl error::Error for InvalidCoordinate {}

impl fmt::Display for InvalidCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Coordinate ({}, {}) is out of range.",
            self.coordinate.latitude, self.coordinate.longitude
        )
    }
}

/// A point on the earth in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// NaN is never contained in a range, so this also rejects non-finite values.
    pub fn validate(&self) -> Result<(), InvalidCoordinate> {
        if LATITUDE_RANGE.contains(&self.latitude) && LONGITUDE_RANGE.contains(&self.longitude) {
            Ok(())
        } else {
            Err(InvalidCoordinate { coordinate: *self })
        }
    }

    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        haversine_distance(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }
}

/// The smallest latitude/longitude aligned box containing a path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub south_west: Coordinate,
    pub north_east: Coordinate,
}

fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

pub fn haversine_distance(
    latitude_1: f64,
    longitude_1: f64,
    latitude_2: f64,
    longitude_2: f64,
) -> f64 {
    let lat1_rad = to_radians(latitude_1);
    let lat2_rad = to_radians(latitude_2);

    let dlat = lat2_rad - lat1_rad;
    let dlon = to_radians(longitude_2) - to_radians(longitude_1);

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Length of a path following its points in order.
pub fn path_length_km(path: &[Coordinate]) -> f64 {
    path.windows(2)
        .map(|pair| pair[0].distance_km(&pair[1]))
        .sum()
}

pub fn bounding_box(path: &[Coordinate]) -> Option<BoundingBox> {
    let (first, rest) = path.split_first()?;
    let mut south_west = *first;
    let mut north_east = *first;
    for point in rest {
        south_west.latitude = south_west.latitude.min(point.latitude);
        south_west.longitude = south_west.longitude.min(point.longitude);
        north_east.latitude = north_east.latitude.max(point.latitude);
        north_east.longitude = north_east.longitude.max(point.longitude);
    }
    Some(BoundingBox {
        south_west,
        north_east,
    })
}

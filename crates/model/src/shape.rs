use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::{
    geo::{self, BoundingBox, Coordinate, InvalidCoordinate},
    polyline::{self, DecodeError},
};

use crate::ExampleData;

/// The path a bus travels, ready to be drawn as a line on a map.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    pub encoded_polyline: String,
    pub length_km: f64,
    pub bounds: Option<BoundingBox>,
    pub points: Vec<Coordinate>,
}

impl Shape {
    /// Encodes the given points, which all have to be valid coordinates.
    pub fn from_points(points: Vec<Coordinate>) -> Result<Self, InvalidCoordinate> {
        points.iter().try_for_each(Coordinate::validate)?;
        Ok(Self::encoded(points))
    }

    fn encoded(points: Vec<Coordinate>) -> Self {
        Self {
            encoded_polyline: polyline::encode(&points),
            length_km: geo::path_length_km(&points),
            bounds: geo::bounding_box(&points),
            points,
        }
    }

    /// Keeps the given polyline as is instead of re-encoding the decoded points.
    pub fn from_encoded(encoded_polyline: &str) -> Result<Self, DecodeError> {
        let points = polyline::decode(encoded_polyline)?;
        Ok(Self {
            encoded_polyline: encoded_polyline.to_owned(),
            length_km: geo::path_length_km(&points),
            bounds: geo::bounding_box(&points),
            points,
        })
    }
}

impl ExampleData for Shape {
    fn example_data() -> Self {
        Self::encoded(vec![
            Coordinate::new(54.31474, 10.13197),
            Coordinate::new(54.29918, 10.18512),
            Coordinate::new(54.27749, 10.24532),
        ])
    }
}

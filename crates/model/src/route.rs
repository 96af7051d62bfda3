use std::{error, fmt};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{shape::Shape, ExampleData};

/// Origin and destination as entered on the booking form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequest {
    pub origin: String,
    pub destination: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidRouteRequest {
    pub field: &'static str,
}

impl error::Error for InvalidRouteRequest {}

impl fmt::Display for InvalidRouteRequest {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "The {} must not be empty.", self.field)
    }
}

impl RouteRequest {
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
        }
    }

    pub fn validate(&self) -> Result<(), InvalidRouteRequest> {
        if self.origin.trim().is_empty() {
            return Err(InvalidRouteRequest { field: "origin" });
        }
        if self.destination.trim().is_empty() {
            return Err(InvalidRouteRequest {
                field: "destination",
            });
        }
        Ok(())
    }

    /// Copy with surrounding whitespace removed from both places.
    pub fn trimmed(&self) -> Self {
        Self::new(self.origin.trim(), self.destination.trim())
    }
}

impl ExampleData for RouteRequest {
    fn example_data() -> Self {
        Self::new("Kiel Hbf", "Raisdorf")
    }
}

/// Everything the booking page shows for a looked up route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    pub origin: String,
    pub destination: String,
    /// Distance label as delivered by the directions service, e.g. "12.3 km".
    pub distance_text: String,
    pub duration_seconds: u64,
    pub duration_text: String,
    pub shape: Shape,
}

impl ExampleData for RouteSummary {
    fn example_data() -> Self {
        Self {
            origin: "Kiel Hbf".to_owned(),
            destination: "Raisdorf".to_owned(),
            distance_text: "10.2 km".to_owned(),
            duration_seconds: 1080,
            duration_text: "18 mins".to_owned(),
            shape: Shape::example_data(),
        }
    }
}

use serde::{Deserialize, Serialize};

use crate::ApiError;

pub const STATUS_OK: &str = "OK";

/// Response of the directions service. Only the parts needed to show a route
/// are deserialized.
///
/// See <https://developers.google.com/maps/documentation/directions/get-directions#DirectionsResponse>
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectionsResponse {
    pub status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    #[serde(default)]
    pub routes: Vec<Route>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    pub overview_polyline: OverviewPolyline,

    #[serde(default)]
    pub legs: Vec<Leg>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverviewPolyline {
    pub points: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Leg {
    pub distance: TextValue,
    pub duration: TextValue,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_address: Option<String>,
}

/// A measured value together with the label the service renders for it.
/// Distances are in meters, durations in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextValue {
    pub text: String,
    pub value: u64,
}

impl DirectionsResponse {
    pub fn ok(routes: Vec<Route>) -> Self {
        Self {
            status: STATUS_OK.to_owned(),
            error_message: None,
            routes,
        }
    }

    /// Turns a status other than `OK` into an error.
    pub fn check_status(self) -> Result<Self, ApiError> {
        match self.status.as_str() {
            STATUS_OK => Ok(self),
            "ZERO_RESULTS" | "NOT_FOUND" => Err(ApiError::NoRoute),
            _ => Err(ApiError::Status {
                status: self.status,
                message: self.error_message,
            }),
        }
    }
}

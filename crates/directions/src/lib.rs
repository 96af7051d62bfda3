use std::error;
use std::fmt;
use std::sync::Arc;

use model::route::InvalidRouteRequest;
use utility::polyline::DecodeError;

pub mod client;
pub mod lookup;
pub mod response;

pub use client::{DirectionsClient, DirectionsCredentials};
pub use lookup::{lookup_route, DirectionsProvider};

#[derive(Debug, Clone)]
pub enum ApiError {
    RequestError(Arc<reqwest::Error>),
    JsonError(Arc<serde_json::Error>),
    InvalidResponse {
        status_code: reqwest::StatusCode,
        url: String,
        response: Option<String>,
    },
    /// The service answered, but with a status other than `OK`.
    Status {
        status: String,
        message: Option<String>,
    },
    InvalidRequest(InvalidRouteRequest),
    Decode(DecodeError),
    RateLimitReached,
    NoRoute,
}

impl error::Error for ApiError {}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApiError::RequestError(e) => write!(f, "HTTP request error: {}", e),
            ApiError::JsonError(e) => write!(f, "JSON parse error: {}", e),
            ApiError::InvalidResponse {
                status_code,
                url,
                response,
            } => match response {
                Some(text) => {
                    write!(f, "Invalid Response ({}) {}: {}", status_code, text, url)
                }
                None => write!(f, "Invalid Response ({}) {}", status_code, url),
            },
            ApiError::Status { status, message } => match message {
                Some(message) => {
                    write!(f, "Directions service status {}: {}", status, message)
                }
                None => write!(f, "Directions service status {}", status),
            },
            ApiError::InvalidRequest(e) => write!(f, "{}", e),
            ApiError::Decode(e) => write!(f, "Route shape could not be decoded: {}", e),
            ApiError::RateLimitReached => write!(f, "Rate limit reached."),
            ApiError::NoRoute => write!(f, "No route found."),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::RequestError(Arc::new(e))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::JsonError(Arc::new(e))
    }
}

impl From<InvalidRouteRequest> for ApiError {
    fn from(e: InvalidRouteRequest) -> Self {
        ApiError::InvalidRequest(e)
    }
}

impl From<DecodeError> for ApiError {
    fn from(e: DecodeError) -> Self {
        ApiError::Decode(e)
    }
}

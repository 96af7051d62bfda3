use axum::{
    extract::{OriginalUri, Query, Request},
    http::{Method, StatusCode},
    response::IntoResponse,
    routing::MethodFilter,
    Json,
};
use directions::ApiError;
use model::ExampleData;
use schemars::{schema_for, schema_for_value, JsonSchema};
use serde::{Deserialize, Serialize};
use utility::{duration::InvalidArgument, geo::InvalidCoordinate, polyline::DecodeError};

use crate::hateoas;

pub type RouteResult<O> = Result<O, RouteErrorResponse>;
pub type HateoasResult<O> = RouteResult<Json<hateoas::Response<O>>>;

/// A `MethodFilter` that matches all http methods.
pub(crate) const METHOD_FILTER_ALL: MethodFilter = MethodFilter::GET
    .or(MethodFilter::POST)
    .or(MethodFilter::PATCH)
    .or(MethodFilter::PUT)
    .or(MethodFilter::DELETE);

// - Services returning commonly used responses -

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SchemaParams {
    #[serde(default = "Default::default")]
    example_data: bool,
}

pub(crate) async fn schema<T: ExampleData + JsonSchema + Serialize>(
    Query(params): Query<SchemaParams>,
) -> impl IntoResponse {
    if params.example_data {
        Json(schema_for_value!(T::example_data()))
    } else {
        Json(schema_for!(T))
    }
}

pub(crate) async fn route_not_implemented(
    OriginalUri(original_uri): OriginalUri,
    req: Request,
) -> impl IntoResponse {
    RouteErrorResponse::not_implemented(req.method(), original_uri.path())
}

pub(crate) async fn route_not_found(
    OriginalUri(original_uri): OriginalUri,
    req: Request,
) -> impl IntoResponse {
    RouteErrorResponse::not_found(req.method(), original_uri.path())
}

// - Commonly used responeses -

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteErrorResponse {
    #[serde(skip)]
    pub status_code: StatusCode,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_method: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_uri: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub detailed_information: Option<String>,
}

impl RouteErrorResponse {
    pub fn new(status_code: StatusCode) -> Self {
        Self {
            status_code,
            http_method: None,
            requested_uri: None,
            message: None,
            detailed_information: None,
        }
    }

    pub fn not_implemented(method: &Method, uri: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_IMPLEMENTED)
            .with_method(method)
            .with_uri(uri)
            .with_default_message()
    }

    pub fn not_found(method: &Method, uri: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND)
            .with_method(method)
            .with_uri(uri)
            .with_default_message()
    }

    pub fn with_method(mut self, method: &Method) -> Self {
        self.http_method = Some(method.to_string());
        self
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.requested_uri = Some(uri.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_default_message(self) -> Self {
        let message = self
            .status_code
            .canonical_reason()
            .unwrap_or("i dunno what happened here :/");
        self.with_message(message)
    }

    pub fn with_detailed_information(mut self, message: impl Into<String>) -> Self {
        self.detailed_information = Some(message.into());
        self
    }
}

impl From<ApiError> for RouteErrorResponse {
    fn from(value: ApiError) -> Self {
        let detail = value.to_string();
        match value {
            ApiError::InvalidRequest(why) => {
                Self::new(StatusCode::BAD_REQUEST).with_message(why.to_string())
            }
            ApiError::NoRoute => Self::new(StatusCode::NOT_FOUND)
                .with_message("No route between origin and destination."),
            ApiError::RateLimitReached => Self::new(StatusCode::TOO_MANY_REQUESTS)
                .with_message("Too many route lookups, try again in a minute."),
            ApiError::Decode(_) => Self::new(StatusCode::BAD_GATEWAY)
                .with_message("The directions service returned a malformed route.")
                .with_detailed_information(detail),
            ApiError::Status { .. }
            | ApiError::InvalidResponse { .. }
            | ApiError::RequestError(_)
            | ApiError::JsonError(_) => {
                log::error!("Directions service failed: {}", detail);
                Self::new(StatusCode::BAD_GATEWAY)
                    .with_message("The directions service is not available.")
                    .with_detailed_information(detail)
            }
        }
    }
}

impl From<DecodeError> for RouteErrorResponse {
    fn from(value: DecodeError) -> Self {
        Self::new(StatusCode::BAD_REQUEST)
            .with_message("Malformed polyline.")
            .with_detailed_information(value.to_string())
    }
}

impl From<InvalidCoordinate> for RouteErrorResponse {
    fn from(value: InvalidCoordinate) -> Self {
        Self::new(StatusCode::BAD_REQUEST)
            .with_message("Invalid coordinate.")
            .with_detailed_information(value.to_string())
    }
}

impl From<InvalidArgument> for RouteErrorResponse {
    fn from(value: InvalidArgument) -> Self {
        Self::new(StatusCode::BAD_REQUEST).with_message(value.to_string())
    }
}

impl IntoResponse for RouteErrorResponse {
    fn into_response(self) -> axum::response::Response {
        (self.status_code, Json(self)).into_response()
    }
}

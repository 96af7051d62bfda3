use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Query},
    http::Method,
    routing::{get, on},
    Extension, Router,
};
use model::ExampleData;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::duration::{format_duration, format_duration_secs};

use crate::{
    common::{route_not_found, schema, HateoasResult, RouteErrorResponse, METHOD_FILTER_ALL},
    hateoas,
    middleware::base_url::{base_url_middleware, BaseUrl},
};

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::v1::resource!("/duration{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes() -> Router {
    Router::new()
        .route("/schema", get(schema::<DurationDto>))
        .route("/format", get(format))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Deserialize)]
struct FormatQuery {
    seconds: f64,
}

#[derive(Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct DurationDto {
    seconds: f64,
    text: String,
}

impl ExampleData for DurationDto {
    fn example_data() -> Self {
        Self {
            seconds: 3660.0,
            text: format_duration_secs(3660),
        }
    }
}

async fn format(
    OriginalUri(original_uri): OriginalUri,
    Extension(base_url): Extension<Arc<BaseUrl>>,
    Query(FormatQuery { seconds }): Query<FormatQuery>,
) -> HateoasResult<DurationDto> {
    format_duration(seconds)
        .map(|text| {
            hateoas::Response::builder(DurationDto { seconds, text }, base_url)
                .link("self", resource!("/format?seconds={}", seconds))
                .link("schema", resource!("/schema"))
                .build()
                .json()
        })
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}

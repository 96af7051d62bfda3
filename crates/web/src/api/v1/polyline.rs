use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Query},
    http::Method,
    routing::{get, on, post},
    Extension, Json, Router,
};
use model::shape::Shape;
use serde::Deserialize;
use utility::geo::Coordinate;

use crate::{
    common::{route_not_found, schema, HateoasResult, RouteErrorResponse, METHOD_FILTER_ALL},
    hateoas::{self, query_string},
    middleware::base_url::{base_url_middleware, BaseUrl},
};

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::v1::resource!("/polyline{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes() -> Router {
    Router::new()
        .route("/schema", get(schema::<Shape>))
        .route("/decode", get(decode))
        .route("/encode", post(encode))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Deserialize)]
struct DecodeQuery {
    encoded: String,
}

#[derive(Deserialize)]
struct EncodeBody {
    points: Vec<Coordinate>,
}

async fn decode(
    OriginalUri(original_uri): OriginalUri,
    Extension(base_url): Extension<Arc<BaseUrl>>,
    Query(query): Query<DecodeQuery>,
) -> HateoasResult<Shape> {
    Shape::from_encoded(&query.encoded)
        .map(|shape| shape_hateoas(shape, base_url).json())
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}

async fn encode(
    OriginalUri(original_uri): OriginalUri,
    Extension(base_url): Extension<Arc<BaseUrl>>,
    Json(body): Json<EncodeBody>,
) -> HateoasResult<Shape> {
    Shape::from_points(body.points)
        .map(|shape| shape_hateoas(shape, base_url).json())
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::POST)
                .with_uri(original_uri.path())
        })
}

fn shape_hateoas(shape: Shape, base_url: Arc<BaseUrl>) -> hateoas::Response<Shape> {
    let query = query_string([("encoded", shape.encoded_polyline.as_str())]);
    hateoas::Response::builder(shape, base_url)
        .link("self", resource!("/decode?{}", query))
        .link("schema", resource!("/schema"))
        .build()
}

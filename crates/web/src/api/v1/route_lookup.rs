use std::{sync::Arc, time::Instant};

use axum::{
    extract::{OriginalUri, Query, State},
    http::Method,
    routing::{get, on},
    Extension, Json, Router,
};
use directions::{lookup_route, DirectionsProvider};
use model::route::{RouteRequest, RouteSummary};

use crate::{
    common::{route_not_found, schema, HateoasResult, RouteErrorResponse, METHOD_FILTER_ALL},
    hateoas::{self, query_string},
    middleware::base_url::{base_url_middleware, BaseUrl},
    WebState,
};

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::v1::resource!("/routes{}", format_args!($($arg)*))
    };
}

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/schema", get(schema::<RouteSummary>))
        .route("/", get(get_route).post(post_route))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

async fn get_route(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { directions }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
    Query(request): Query<RouteRequest>,
) -> HateoasResult<RouteSummary> {
    lookup(&*directions, &request, base_url)
        .await
        .map_err(|why| why.with_method(&Method::GET).with_uri(original_uri.path()))
}

async fn post_route(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { directions }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
    Json(request): Json<RouteRequest>,
) -> HateoasResult<RouteSummary> {
    lookup(&*directions, &request, base_url)
        .await
        .map_err(|why| why.with_method(&Method::POST).with_uri(original_uri.path()))
}

async fn lookup(
    directions: &dyn DirectionsProvider,
    request: &RouteRequest,
    base_url: Arc<BaseUrl>,
) -> HateoasResult<RouteSummary> {
    let now = Instant::now();
    let summary = lookup_route(directions, request)
        .await
        .map_err(RouteErrorResponse::from)?;
    let lookup_elapsed = now.elapsed();

    Ok(route_hateoas(summary, base_url)
        .debug_info("lookupSecs", lookup_elapsed.as_secs_f64())
        .build()
        .json())
}

fn route_hateoas(
    summary: RouteSummary,
    base_url: Arc<BaseUrl>,
) -> hateoas::ResponseBuilder<RouteSummary> {
    let self_query = query_string([
        ("origin", summary.origin.as_str()),
        ("destination", summary.destination.as_str()),
    ]);
    let shape_query = query_string([("encoded", summary.shape.encoded_polyline.as_str())]);
    let duration_seconds = summary.duration_seconds;

    hateoas::Response::builder(summary, base_url)
        .link("self", resource!("?{}", self_query))
        .link("shape", super::polyline::resource!("/decode?{}", shape_query))
        .link(
            "duration",
            super::duration::resource!("/format?seconds={}", duration_seconds),
        )
        .link("schema", resource!("/schema"))
}

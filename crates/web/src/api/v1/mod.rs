use axum::{
    routing::{get, on},
    Router,
};

use crate::{
    common::{route_not_found, route_not_implemented, METHOD_FILTER_ALL},
    WebState,
};

mod duration;
mod polyline;
mod route_lookup;

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::resource!("/v1{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/", get(route_not_implemented))
        .nest_service("/routes", route_lookup::routes(state))
        .nest_service("/polyline", polyline::routes())
        .nest_service("/duration", duration::routes())
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

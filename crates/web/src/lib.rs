pub use crate::common::RouteResult;

use std::{env, net::SocketAddr, sync::Arc};

use axum::{extract::FromRef, routing::on, Router};
use common::{route_not_found, METHOD_FILTER_ALL};
use directions::DirectionsProvider;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod common;
pub mod hateoas;
pub mod middleware;


pub const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0:8080";

#[derive(Clone, FromRef)]
pub struct WebState {
    pub directions: Arc<dyn DirectionsProvider>,
}

pub struct WebConfig {
    pub listen_address: SocketAddr,
}

impl WebConfig {
    /// Reads `WEB_LISTEN_ADDRESS`, falling back to [`DEFAULT_LISTEN_ADDRESS`].
    /// Returns `None` if the variable is set but not a socket address.
    pub fn from_env() -> Option<Self> {
        let listen_address = env::var("WEB_LISTEN_ADDRESS")
            .unwrap_or_else(|_| DEFAULT_LISTEN_ADDRESS.to_owned())
            .parse()
            .ok()?;
        Some(Self { listen_address })
    }
}

pub fn app(state: WebState) -> Router {
    Router::new()
        .nest_service("/api", api::routes(state))
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
        .layer(TraceLayer::new_for_http())
}

pub async fn start_web_server(config: WebConfig, state: WebState) -> std::io::Result<()> {
    let listener = TcpListener::bind(config.listen_address).await?;
    log::info!("Listening on {}.", config.listen_address);
    axum::serve(listener, app(state).into_make_service()).await?;

    Ok(())
}

use std::env;

use async_trait::async_trait;
use chrono::Local;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::{lookup::DirectionsProvider, response::DirectionsResponse, ApiError};

pub const DIRECTIONS_API_URL: &str =
    "https://maps.googleapis.com/maps/api/directions/json";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionsCredentials {
    pub api_key: String,
    pub base_url: String,
    pub rate_limit_per_minute: Option<u64>,
    pub proxy: Option<String>,
}

impl DirectionsCredentials {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DIRECTIONS_API_URL.to_owned(),
            rate_limit_per_minute: None,
            proxy: None,
        }
    }

    /// Reads `DIRECTIONS_API_KEY` and the optional `DIRECTIONS_BASE_URL`,
    /// `DIRECTIONS_RATE_LIMIT_PER_MINUTE` and `DIRECTIONS_PROXY`.
    ///
    /// Returns `None` if the api key is missing or the rate limit is not a
    /// number.
    pub fn from_env() -> Option<Self> {
        let Ok(api_key) = env::var("DIRECTIONS_API_KEY") else {
            log::warn!("DIRECTIONS_API_KEY is not set.");
            return None;
        };
        let base_url = env::var("DIRECTIONS_BASE_URL")
            .unwrap_or_else(|_| DIRECTIONS_API_URL.to_owned());
        let rate_limit_per_minute = match env::var("DIRECTIONS_RATE_LIMIT_PER_MINUTE") {
            Ok(limit) => match limit.parse() {
                Ok(limit) => Some(limit),
                Err(why) => {
                    log::warn!("DIRECTIONS_RATE_LIMIT_PER_MINUTE '{limit}' is invalid: {why}");
                    return None;
                }
            },
            Err(_) => None,
        };
        let proxy = env::var("DIRECTIONS_PROXY").ok();
        Some(Self {
            api_key,
            base_url,
            rate_limit_per_minute,
            proxy,
        })
    }
}

struct DirectionsClientState {
    pub available_requests: u64,
    pub last_refill: chrono::DateTime<Local>,
}

pub struct DirectionsClient {
    pub credentials: DirectionsCredentials,
    http: reqwest::Client,
    state: RwLock<DirectionsClientState>,
}

impl DirectionsClient {
    pub fn new(credentials: &DirectionsCredentials) -> Result<Self, ApiError> {
        let http = match &credentials.proxy {
            Some(proxy_url) => reqwest::Client::builder()
                .proxy(reqwest::Proxy::all(proxy_url)?)
                .build()?,
            None => reqwest::Client::new(),
        };

        Ok(Self {
            credentials: credentials.clone(),
            http,
            state: RwLock::new(DirectionsClientState {
                available_requests: credentials.rate_limit_per_minute.unwrap_or(0),
                last_refill: Local::now(),
            }),
        })
    }

    pub async fn available_requests(&self) -> u64 {
        self.state.read().await.available_requests
    }

    async fn try_decrement_available_requests(&self) -> Result<(), ApiError> {
        if let Some(rate_limit_minutes) = self.credentials.rate_limit_per_minute {
            let mut state = self.state.write().await;

            let minutes_since_last_refill = (Local::now() - state.last_refill).num_minutes();
            if minutes_since_last_refill >= 1 {
                state.available_requests = rate_limit_minutes;
                state.last_refill = Local::now();
            }

            if state.available_requests != 0 {
                state.available_requests -= 1;
            } else {
                return Err(ApiError::RateLimitReached);
            }
        }
        Ok(())
    }

    /// Asks the directions service for driving directions between two places.
    pub async fn fetch(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<DirectionsResponse, ApiError> {
        self.try_decrement_available_requests().await?;

        log::debug!("Requesting directions from '{origin}' to '{destination}'.");

        let url = &self.credentials.base_url;
        let response = self
            .http
            .get(url)
            .query(&[
                ("origin", origin),
                ("destination", destination),
                ("mode", "driving"),
                ("key", self.credentials.api_key.as_str()),
            ])
            .header("accept", "application/json")
            .send()
            .await?;

        match response.status() {
            reqwest::StatusCode::OK => Ok(serde_json::from_str(&response.text().await?)?),
            other => {
                let text = response.text().await.ok();
                log::warn!("Directions service answered with {other}.");
                Err(ApiError::InvalidResponse {
                    status_code: other,
                    url: url.clone(),
                    response: text,
                })
            }
        }
    }
}

#[async_trait]
impl DirectionsProvider for DirectionsClient {
    async fn get_directions(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<DirectionsResponse, ApiError> {
        self.fetch(origin, destination).await
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::{Arc, Mutex},
    };

    use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
    use serde_json::json;
    use tokio::net::TcpListener;

    use super::*;

    const DIRECTIONS_PATH: &str = "/maps/api/directions/json";

    /// Serves `router` on a random local port and returns the directions url.
    async fn serve(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        format!("http://{address}{DIRECTIONS_PATH}")
    }

    fn local_client(base_url: String) -> DirectionsClient {
        let credentials = DirectionsCredentials {
            base_url,
            ..DirectionsCredentials::new("test-key")
        };
        DirectionsClient::new(&credentials).unwrap()
    }

    #[tokio::test]
    async fn fetch_sends_query_and_parses_response() {
        let received = Arc::new(Mutex::new(Vec::new()));
        let router = Router::new().route(
            DIRECTIONS_PATH,
            get({
                let received = received.clone();
                move |Query(params): Query<HashMap<String, String>>| async move {
                    received.lock().unwrap().push(params);
                    Json(json!({
                        "status": "OK",
                        "routes": [{
                            "summary": "B76",
                            "overview_polyline": { "points": "_p~iF~ps|U" },
                            "legs": [{
                                "distance": { "text": "10.2 km", "value": 10212 },
                                "duration": { "text": "18 mins", "value": 1080 }
                            }]
                        }]
                    }))
                }
            }),
        );
        let client = local_client(serve(router).await);

        let response = client.fetch("Kiel Hbf", "Raisdorf").await.unwrap();

        assert_eq!(response.status, "OK");
        assert_eq!(response.routes[0].overview_polyline.points, "_p~iF~ps|U");
        assert_eq!(response.routes[0].legs[0].distance.text, "10.2 km");
        assert_eq!(response.routes[0].legs[0].duration.value, 1080);

        let received = received.lock().unwrap();
        assert_eq!(received.len(), 1);
        let params = &received[0];
        assert_eq!(params["origin"], "Kiel Hbf");
        assert_eq!(params["destination"], "Raisdorf");
        assert_eq!(params["mode"], "driving");
        assert_eq!(params["key"], "test-key");
    }

    #[tokio::test]
    async fn fetch_maps_error_status_to_invalid_response() {
        let router = Router::new().route(
            DIRECTIONS_PATH,
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "backend down") }),
        );
        let base_url = serve(router).await;
        let client = local_client(base_url.clone());

        match client.fetch("Kiel", "Raisdorf").await {
            Err(ApiError::InvalidResponse {
                status_code,
                url,
                response,
            }) => {
                assert_eq!(status_code, reqwest::StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(url, base_url);
                assert_eq!(response.as_deref(), Some("backend down"));
            }
            other => panic!("expected an invalid response, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn fetch_rejects_malformed_json() {
        let router = Router::new().route(DIRECTIONS_PATH, get(|| async { "{ not json" }));
        let client = local_client(serve(router).await);

        assert!(matches!(
            client.fetch("Kiel", "Raisdorf").await,
            Err(ApiError::JsonError(_))
        ));
    }

    #[tokio::test]
    async fn fetch_respects_rate_limit_before_sending() {
        let router = Router::new().route(DIRECTIONS_PATH, get(|| async { "{ not json" }));
        let credentials = DirectionsCredentials {
            base_url: serve(router).await,
            rate_limit_per_minute: Some(0),
            ..DirectionsCredentials::new("test-key")
        };
        let client = DirectionsClient::new(&credentials).unwrap();

        assert!(matches!(
            client.fetch("Kiel", "Raisdorf").await,
            Err(ApiError::RateLimitReached)
        ));
    }

    #[test]
    fn credentials_from_env() {
        // the only test touching these variables
        env::remove_var("DIRECTIONS_BASE_URL");
        env::remove_var("DIRECTIONS_PROXY");
        env::remove_var("DIRECTIONS_API_KEY");
        env::remove_var("DIRECTIONS_RATE_LIMIT_PER_MINUTE");
        assert!(DirectionsCredentials::from_env().is_none());

        env::set_var("DIRECTIONS_API_KEY", "env-key");
        let credentials = DirectionsCredentials::from_env().unwrap();
        assert_eq!(credentials.api_key, "env-key");
        assert_eq!(credentials.base_url, DIRECTIONS_API_URL);
        assert_eq!(credentials.rate_limit_per_minute, None);

        env::set_var("DIRECTIONS_RATE_LIMIT_PER_MINUTE", "many");
        assert!(DirectionsCredentials::from_env().is_none());

        env::set_var("DIRECTIONS_RATE_LIMIT_PER_MINUTE", "50");
        let credentials = DirectionsCredentials::from_env().unwrap();
        assert_eq!(credentials.rate_limit_per_minute, Some(50));

        env::remove_var("DIRECTIONS_API_KEY");
        env::remove_var("DIRECTIONS_RATE_LIMIT_PER_MINUTE");
    }

    #[tokio::test]
    async fn rate_limit_is_enforced() {
        let credentials = DirectionsCredentials {
            rate_limit_per_minute: Some(2),
            ..DirectionsCredentials::new("test-key")
        };
        let client = DirectionsClient::new(&credentials).unwrap();

        assert_eq!(client.available_requests().await, 2);
        client.try_decrement_available_requests().await.unwrap();
        client.try_decrement_available_requests().await.unwrap();
        assert_eq!(client.available_requests().await, 0);
        assert!(matches!(
            client.try_decrement_available_requests().await,
            Err(ApiError::RateLimitReached)
        ));
    }

    #[tokio::test]
    async fn no_rate_limit_without_configuration() {
        let client = DirectionsClient::new(&DirectionsCredentials::new("test-key")).unwrap();
        for _ in 0..10 {
            client.try_decrement_available_requests().await.unwrap();
        }
    }

    #[test]
    fn default_credentials_target_google() {
        let credentials = DirectionsCredentials::new("test-key");
        assert_eq!(credentials.base_url, DIRECTIONS_API_URL);
        assert_eq!(credentials.proxy, None);
    }
}

use std::sync::Arc;

use directions::{DirectionsClient, DirectionsCredentials};
use web::{start_web_server, WebConfig, WebState};

#[tokio::main]
async fn main() {
    env_logger::init();

    // directions service
    let credentials = DirectionsCredentials::from_env()
        .expect("expected DIRECTIONS_API_KEY and a numeric DIRECTIONS_RATE_LIMIT_PER_MINUTE (if set) in env.");
    let client =
        DirectionsClient::new(&credentials).expect("could not build directions client.");

    // web server
    let config = WebConfig::from_env().expect("expected a valid WEB_LISTEN_ADDRESS.");
    let result = start_web_server(
        config,
        WebState {
            directions: Arc::new(client),
        },
    )
    .await;

    if let Err(why) = result {
        log::error!("Web server stopped: {}", why);
    }
}

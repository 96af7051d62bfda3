use async_trait::async_trait;
use model::{
    route::{RouteRequest, RouteSummary},
    shape::Shape,
};
use utility::duration::format_duration_secs;

use crate::{response::DirectionsResponse, ApiError};

/// Source of driving directions. Implemented by [`crate::DirectionsClient`].
#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    async fn get_directions(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<DirectionsResponse, ApiError>;
}

/// Looks up the route for a booking and prepares it for display: the shape
/// is decoded and the duration is turned into a label.
pub async fn lookup_route<P>(
    provider: &P,
    request: &RouteRequest,
) -> Result<RouteSummary, ApiError>
where
    P: DirectionsProvider + ?Sized,
{
    request.validate()?;
    let request = request.trimmed();

    let response = provider
        .get_directions(&request.origin, &request.destination)
        .await?
        .check_status()?;

    let route = response.routes.into_iter().next().ok_or(ApiError::NoRoute)?;
    let leg = route.legs.into_iter().next().ok_or(ApiError::NoRoute)?;

    let shape = Shape::from_encoded(&route.overview_polyline.points).map_err(|why| {
        log::warn!(
            "Could not decode route shape from '{}' to '{}': {}",
            request.origin,
            request.destination,
            why
        );
        ApiError::from(why)
    })?;

    log::info!(
        "Route from '{}' to '{}': {} ({} points).",
        request.origin,
        request.destination,
        leg.distance.text,
        shape.points.len()
    );

    Ok(RouteSummary {
        origin: request.origin,
        destination: request.destination,
        distance_text: leg.distance.text,
        duration_seconds: leg.duration.value,
        duration_text: format_duration_secs(leg.duration.value),
        shape,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::response::{Leg, OverviewPolyline, Route, TextValue};

    /// Answers every request with the same response and remembers the queries.
    struct StubProvider {
        response: Result<DirectionsResponse, ApiError>,
        queries: Mutex<Vec<(String, String)>>,
    }

    impl StubProvider {
        fn new(response: Result<DirectionsResponse, ApiError>) -> Self {
            Self {
                response,
                queries: Mutex::new(vec![]),
            }
        }
    }

    #[async_trait]
    impl DirectionsProvider for StubProvider {
        async fn get_directions(
            &self,
            origin: &str,
            destination: &str,
        ) -> Result<DirectionsResponse, ApiError> {
            self.queries
                .lock()
                .unwrap()
                .push((origin.to_owned(), destination.to_owned()));
            self.response.clone()
        }
    }

    fn route(points: &str, distance: &str, seconds: u64) -> Route {
        Route {
            summary: None,
            overview_polyline: OverviewPolyline {
                points: points.to_owned(),
            },
            legs: vec![Leg {
                distance: TextValue {
                    text: distance.to_owned(),
                    value: 10212,
                },
                duration: TextValue {
                    text: "unused".to_owned(),
                    value: seconds,
                },
                start_address: None,
                end_address: None,
            }],
        }
    }

    #[tokio::test]
    async fn lookup_decodes_shape_and_formats_duration() {
        let provider = StubProvider::new(Ok(DirectionsResponse::ok(vec![route(
            "_p~iF~ps|U_ulLnnqC_mqNvxq`@",
            "612 km",
            3660,
        )])));

        let summary = lookup_route(&provider, &RouteRequest::new(" Kiel ", "Raisdorf"))
            .await
            .unwrap();

        assert_eq!(summary.origin, "Kiel");
        assert_eq!(summary.distance_text, "612 km");
        assert_eq!(summary.duration_seconds, 3660);
        assert_eq!(summary.duration_text, "1 hour 1 mins");
        assert_eq!(summary.shape.points.len(), 3);
        assert_eq!(
            *provider.queries.lock().unwrap(),
            vec![("Kiel".to_owned(), "Raisdorf".to_owned())]
        );
    }

    #[tokio::test]
    async fn lookup_rejects_blank_request_without_asking() {
        let provider = StubProvider::new(Ok(DirectionsResponse::ok(vec![])));
        let result = lookup_route(&provider, &RouteRequest::new("Kiel", " ")).await;
        assert!(matches!(result, Err(ApiError::InvalidRequest(_))));
        assert!(provider.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn lookup_without_routes() {
        let provider = StubProvider::new(Ok(DirectionsResponse::ok(vec![])));
        let result = lookup_route(&provider, &RouteRequest::new("Kiel", "Mars")).await;
        assert!(matches!(result, Err(ApiError::NoRoute)));
    }

    #[tokio::test]
    async fn lookup_without_legs() {
        let mut without_legs = route("_p~iF~ps|U", "0 km", 0);
        without_legs.legs.clear();
        let provider = StubProvider::new(Ok(DirectionsResponse::ok(vec![without_legs])));
        let result = lookup_route(&provider, &RouteRequest::new("Kiel", "Kiel")).await;
        assert!(matches!(result, Err(ApiError::NoRoute)));
    }

    #[tokio::test]
    async fn lookup_with_truncated_polyline() {
        let provider = StubProvider::new(Ok(DirectionsResponse::ok(vec![route(
            "_p~iF~ps|U_",
            "1 km",
            60,
        )])));
        let result = lookup_route(&provider, &RouteRequest::new("Kiel", "Raisdorf")).await;
        assert!(matches!(result, Err(ApiError::Decode(_))));
    }

    #[tokio::test]
    async fn lookup_passes_provider_errors() {
        let provider = StubProvider::new(Err(ApiError::RateLimitReached));
        let result = lookup_route(&provider, &RouteRequest::new("Kiel", "Raisdorf")).await;
        assert!(matches!(result, Err(ApiError::RateLimitReached)));
    }
}

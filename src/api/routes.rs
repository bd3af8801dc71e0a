use axum::{
    routing::{get, post},
    Router,
};

use crate::api::handlers::{self, AppState};
use crate::store::traits::Store;

pub fn create_router<S: Store + 'static>() -> Router<AppState<S>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Movies (update and delete are keyed by title)
        .route("/movies/all", get(handlers::list_movies::<S>))
        .route("/movies", post(handlers::create_movie::<S>))
        .route(
            "/movies/update/:title",
            post(handlers::update_movie::<S>),
        )
        .route(
            "/movies/:movie",
            get(handlers::get_movie::<S>).delete(handlers::delete_movie::<S>),
        )
        // Showtimes
        .route(
            "/showtimes",
            get(handlers::list_showtimes::<S>).post(handlers::create_showtime::<S>),
        )
        .route(
            "/showtimes/update/:id",
            post(handlers::update_showtime::<S>),
        )
        .route(
            "/showtimes/:id",
            get(handlers::get_showtime::<S>).delete(handlers::delete_showtime::<S>),
        )
        // Bookings
        .route(
            "/bookings",
            get(handlers::list_bookings::<S>).post(handlers::create_booking::<S>),
        )
        .route(
            "/bookings/showtime/:showtime_id",
            get(handlers::list_showtime_bookings::<S>),
        )
        .route(
            "/bookings/:id",
            get(handlers::get_booking::<S>).delete(handlers::delete_booking::<S>),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::BoxOffice;
    use crate::store::MemoryStore;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        create_router::<MemoryStore>().with_state(Arc::new(BoxOffice::new(Arc::new(MemoryStore::new()))))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn movie_routes_key_update_and_delete_by_title() {
        let app = app();
        let (status, created) = send(
            &app,
            "POST",
            "/movies",
            Some(json!({"title": "Test Movie", "genre": "Action", "duration": 120, "rating": "PG-13", "releaseYear": 2023})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["id"], 1);

        let (status, movie) = send(&app, "GET", "/movies/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(movie["title"], "Test Movie");

        let (status, _) = send(
            &app,
            "POST",
            "/movies/update/Test%20Movie",
            Some(json!({"title": "Updated Movie", "genre": "Sci-Fi", "duration": 130, "rating": "PG-13", "releaseYear": 2025})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, "DELETE", "/movies/Test%20Movie", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, "DELETE", "/movies/Updated%20Movie", None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, all) = send(&app, "GET", "/movies/all", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(all, json!([]));
    }

    #[tokio::test]
    async fn invalid_movie_is_bad_request() {
        let app = app();
        let (status, body) = send(
            &app,
            "POST",
            "/movies",
            Some(json!({"title": "", "genre": "", "duration": -10, "rating": "", "releaseYear": -2000})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("title"));
    }

    #[tokio::test]
    async fn showtime_for_unknown_movie_is_bad_request() {
        let app = app();
        let (status, body) = send(
            &app,
            "POST",
            "/showtimes",
            Some(json!({
                "movieId": 999,
                "theater": "T1",
                "startTime": "2025-04-01T10:00:00Z",
                "endTime": "2025-04-01T12:30:00Z",
                "price": 12.5
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Movie with ID 999 does not exist");

        let (_, showtimes) = send(&app, "GET", "/showtimes", None).await;
        assert_eq!(showtimes, json!([]));
    }

    #[tokio::test]
    async fn missing_booking_is_not_found() {
        let app = app();
        let (status, _) = send(&app, "GET", "/bookings/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, "DELETE", "/bookings/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn health_reports_healthy() {
        let (status, body) = send(&app(), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }
}

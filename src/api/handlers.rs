use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Json as RequestJson,
};
use serde::Serialize;
use std::sync::Arc;

use crate::logic::{BoxOffice, SchedulingError};
use crate::model::{
    Booking, BookingId, Movie, MovieId, NewBooking, NewMovie, NewShowtime, Showtime, ShowtimeId,
};
use crate::store::traits::Store;

pub type AppState<S> = Arc<BoxOffice<S>>;

pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingCreated {
    pub booking_id: BookingId,
}

/// Map an engine failure onto a status code. Missing targets are 404,
/// duplicates 409, rule violations 400.
pub fn api_error(err: SchedulingError) -> ApiError {
    let status = match &err {
        SchedulingError::NotFound { .. } => StatusCode::NOT_FOUND,
        SchedulingError::AlreadyExists { .. } => StatusCode::CONFLICT,
        SchedulingError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ if err.is_rejected_input() => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        log::error!("request failed: {}", err);
    } else {
        log::debug!("request rejected ({}): {}", status, err);
    }

    (status, Json(ErrorResponse::new(&err.to_string())))
}

// Movie handlers

pub async fn list_movies<S: Store>(
    State(office): State<AppState<S>>,
) -> Result<Json<Vec<Movie>>, ApiError> {
    office.movies.list().await.map(Json).map_err(api_error)
}

pub async fn get_movie<S: Store>(
    State(office): State<AppState<S>>,
    Path(id): Path<MovieId>,
) -> Result<Json<Movie>, ApiError> {
    office.movies.get(id).await.map(Json).map_err(api_error)
}

pub async fn create_movie<S: Store>(
    State(office): State<AppState<S>>,
    RequestJson(movie): RequestJson<NewMovie>,
) -> Result<Json<Movie>, ApiError> {
    office.movies.create(movie).await.map(Json).map_err(api_error)
}

pub async fn update_movie<S: Store>(
    State(office): State<AppState<S>>,
    Path(title): Path<String>,
    RequestJson(details): RequestJson<NewMovie>,
) -> Result<StatusCode, ApiError> {
    match office.movies.update_by_title(&title, details).await {
        Ok(_) => Ok(StatusCode::OK),
        Err(e) => Err(api_error(e)),
    }
}

pub async fn delete_movie<S: Store>(
    State(office): State<AppState<S>>,
    Path(title): Path<String>,
) -> Result<StatusCode, ApiError> {
    match office.movies.delete_by_title(&title).await {
        Ok(()) => Ok(StatusCode::OK),
        Err(e) => Err(api_error(e)),
    }
}

// Showtime handlers

pub async fn list_showtimes<S: Store>(
    State(office): State<AppState<S>>,
) -> Result<Json<Vec<Showtime>>, ApiError> {
    office.showtimes.list().await.map(Json).map_err(api_error)
}

pub async fn get_showtime<S: Store>(
    State(office): State<AppState<S>>,
    Path(id): Path<ShowtimeId>,
) -> Result<Json<Showtime>, ApiError> {
    office.showtimes.get(id).await.map(Json).map_err(api_error)
}

pub async fn create_showtime<S: Store>(
    State(office): State<AppState<S>>,
    RequestJson(showtime): RequestJson<NewShowtime>,
) -> Result<Json<Showtime>, ApiError> {
    office.showtimes.create(showtime).await.map(Json).map_err(api_error)
}

pub async fn update_showtime<S: Store>(
    State(office): State<AppState<S>>,
    Path(id): Path<ShowtimeId>,
    RequestJson(details): RequestJson<NewShowtime>,
) -> Result<Json<Showtime>, ApiError> {
    office
        .showtimes
        .update(id, details)
        .await
        .map(Json)
        .map_err(api_error)
}

pub async fn delete_showtime<S: Store>(
    State(office): State<AppState<S>>,
    Path(id): Path<ShowtimeId>,
) -> Result<StatusCode, ApiError> {
    match office.showtimes.delete(id).await {
        Ok(()) => Ok(StatusCode::OK),
        Err(e) => Err(api_error(e)),
    }
}

// Booking handlers

pub async fn list_bookings<S: Store>(
    State(office): State<AppState<S>>,
) -> Result<Json<Vec<Booking>>, ApiError> {
    office.bookings.list().await.map(Json).map_err(api_error)
}

pub async fn get_booking<S: Store>(
    State(office): State<AppState<S>>,
    Path(id): Path<BookingId>,
) -> Result<Json<Booking>, ApiError> {
    office.bookings.get(&id).await.map(Json).map_err(api_error)
}

pub async fn list_showtime_bookings<S: Store>(
    State(office): State<AppState<S>>,
    Path(showtime_id): Path<ShowtimeId>,
) -> Result<Json<Vec<Booking>>, ApiError> {
    office
        .bookings
        .list_for_showtime(showtime_id)
        .await
        .map(Json)
        .map_err(api_error)
}

pub async fn create_booking<S: Store>(
    State(office): State<AppState<S>>,
    RequestJson(request): RequestJson<NewBooking>,
) -> Result<Json<BookingCreated>, ApiError> {
    let booking = office.bookings.create(request).await.map_err(api_error)?;
    Ok(Json(BookingCreated {
        booking_id: booking.id,
    }))
}

pub async fn delete_booking<S: Store>(
    State(office): State<AppState<S>>,
    Path(id): Path<BookingId>,
) -> Result<StatusCode, ApiError> {
    match office.bookings.delete(&id).await {
        Ok(()) => Ok(StatusCode::OK),
        Err(e) => Err(api_error(e)),
    }
}

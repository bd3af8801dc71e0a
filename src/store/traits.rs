use crate::model::{
    Booking, BookingId, Movie, MovieId, NewMovie, NewShowtime, Showtime, ShowtimeId,
};
use anyhow::Result;
use chrono::{DateTime, Utc};

#[async_trait::async_trait]
pub trait MovieStore: Send + Sync {
    async fn list_movies(&self) -> Result<Vec<Movie>>;
    async fn get_movie(&self, id: MovieId) -> Result<Option<Movie>>;
    /// First movie carrying `title`, if any.
    async fn get_movie_by_title(&self, title: &str) -> Result<Option<Movie>>;
    /// Persist a new movie under a freshly assigned identity.
    async fn create_movie(&self, movie: NewMovie) -> Result<Movie>;
    /// Replace all fields of an existing movie. Returns false if the id does not exist.
    async fn update_movie(&self, movie: Movie) -> Result<bool>;
    async fn delete_movie(&self, id: MovieId) -> Result<bool>;
    async fn movie_exists(&self, id: MovieId) -> Result<bool>;
}

#[async_trait::async_trait]
pub trait ShowtimeStore: Send + Sync {
    async fn list_showtimes(&self) -> Result<Vec<Showtime>>;
    async fn get_showtime(&self, id: ShowtimeId) -> Result<Option<Showtime>>;
    async fn create_showtime(&self, showtime: NewShowtime) -> Result<Showtime>;
    async fn update_showtime(&self, showtime: Showtime) -> Result<bool>;
    async fn delete_showtime(&self, id: ShowtimeId) -> Result<bool>;
    async fn showtime_exists(&self, id: ShowtimeId) -> Result<bool>;
    /// Showtimes in `theater` whose window touches or intersects `[start, end]`,
    /// leaving out `exclude` when given.
    async fn find_overlapping_showtimes(
        &self,
        theater: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude: Option<ShowtimeId>,
    ) -> Result<Vec<Showtime>>;
}

/// Uniqueness rule that refused a booking insert. Stores return it as the
/// root of the `anyhow::Error` so callers can downcast it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingConflict {
    #[error("booking {0} already exists")]
    DuplicateId(BookingId),
    #[error("seat {seat} already booked for showtime {showtime_id}")]
    SeatTaken { showtime_id: ShowtimeId, seat: i32 },
}

#[async_trait::async_trait]
pub trait BookingStore: Send + Sync {
    async fn list_bookings(&self) -> Result<Vec<Booking>>;
    async fn get_booking(&self, id: &str) -> Result<Option<Booking>>;
    async fn list_bookings_for_showtime(&self, showtime_id: ShowtimeId) -> Result<Vec<Booking>>;
    /// Persist a booking whose identity has already been decided. A duplicate id
    /// or seat fails with a [`BookingConflict`].
    async fn insert_booking(&self, booking: Booking) -> Result<()>;
    async fn delete_booking(&self, id: &str) -> Result<bool>;
    async fn booking_exists(&self, id: &str) -> Result<bool>;
    async fn seat_taken(&self, showtime_id: ShowtimeId, seat_number: i32) -> Result<bool>;
}

pub trait Store: MovieStore + ShowtimeStore + BookingStore + Send + Sync {}
impl<T: MovieStore + ShowtimeStore + BookingStore + Send + Sync> Store for T {}


use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::BTreeMap;

use crate::model::{
    Booking, BookingId, Interval, Movie, MovieId, NewMovie, NewShowtime, Showtime, ShowtimeId,
};
use crate::store::traits::{BookingConflict, BookingStore, MovieStore, ShowtimeStore};

#[derive(Debug, Default)]
struct Tables {
    movies: BTreeMap<MovieId, Movie>,
    showtimes: BTreeMap<ShowtimeId, Showtime>,
    bookings: BTreeMap<BookingId, Booking>,
    last_movie_id: MovieId,
    last_showtime_id: ShowtimeId,
}

/// Process-local store. Numeric identities start at 1 and are never reused.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl MovieStore for MemoryStore {
    async fn list_movies(&self) -> Result<Vec<Movie>> {
        Ok(self.tables.read().movies.values().cloned().collect())
    }

    async fn get_movie(&self, id: MovieId) -> Result<Option<Movie>> {
        Ok(self.tables.read().movies.get(&id).cloned())
    }

    async fn get_movie_by_title(&self, title: &str) -> Result<Option<Movie>> {
        Ok(self
            .tables
            .read()
            .movies
            .values()
            .find(|m| m.title == title)
            .cloned())
    }

    async fn create_movie(&self, movie: NewMovie) -> Result<Movie> {
        let mut tables = self.tables.write();
        tables.last_movie_id += 1;
        let movie = movie.into_movie(tables.last_movie_id);
        tables.movies.insert(movie.id, movie.clone());
        Ok(movie)
    }

    async fn update_movie(&self, movie: Movie) -> Result<bool> {
        let mut tables = self.tables.write();
        match tables.movies.get_mut(&movie.id) {
            Some(existing) => {
                *existing = movie;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_movie(&self, id: MovieId) -> Result<bool> {
        Ok(self.tables.write().movies.remove(&id).is_some())
    }

    async fn movie_exists(&self, id: MovieId) -> Result<bool> {
        Ok(self.tables.read().movies.contains_key(&id))
    }
}

#[async_trait::async_trait]
impl ShowtimeStore for MemoryStore {
    async fn list_showtimes(&self) -> Result<Vec<Showtime>> {
        Ok(self.tables.read().showtimes.values().cloned().collect())
    }

    async fn get_showtime(&self, id: ShowtimeId) -> Result<Option<Showtime>> {
        Ok(self.tables.read().showtimes.get(&id).cloned())
    }

    async fn create_showtime(&self, showtime: NewShowtime) -> Result<Showtime> {
        let mut tables = self.tables.write();
        tables.last_showtime_id += 1;
        let showtime = showtime.into_showtime(tables.last_showtime_id);
        tables.showtimes.insert(showtime.id, showtime.clone());
        Ok(showtime)
    }

    async fn update_showtime(&self, showtime: Showtime) -> Result<bool> {
        let mut tables = self.tables.write();
        match tables.showtimes.get_mut(&showtime.id) {
            Some(existing) => {
                *existing = showtime;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_showtime(&self, id: ShowtimeId) -> Result<bool> {
        Ok(self.tables.write().showtimes.remove(&id).is_some())
    }

    async fn showtime_exists(&self, id: ShowtimeId) -> Result<bool> {
        Ok(self.tables.read().showtimes.contains_key(&id))
    }

    async fn find_overlapping_showtimes(
        &self,
        theater: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude: Option<ShowtimeId>,
    ) -> Result<Vec<Showtime>> {
        let window = Interval { start, end };
        Ok(self
            .tables
            .read()
            .showtimes
            .values()
            .filter(|s| s.theater == theater)
            .filter(|s| Some(s.id) != exclude)
            .filter(|s| s.interval().overlaps(&window))
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl BookingStore for MemoryStore {
    async fn list_bookings(&self) -> Result<Vec<Booking>> {
        Ok(self.tables.read().bookings.values().cloned().collect())
    }

    async fn get_booking(&self, id: &str) -> Result<Option<Booking>> {
        Ok(self.tables.read().bookings.get(id).cloned())
    }

    async fn list_bookings_for_showtime(&self, showtime_id: ShowtimeId) -> Result<Vec<Booking>> {
        Ok(self
            .tables
            .read()
            .bookings
            .values()
            .filter(|b| b.showtime_id == showtime_id)
            .cloned()
            .collect())
    }

    async fn insert_booking(&self, booking: Booking) -> Result<()> {
        let mut tables = self.tables.write();
        if tables.bookings.contains_key(&booking.id) {
            bail!(BookingConflict::DuplicateId(booking.id));
        }
        if tables
            .bookings
            .values()
            .any(|b| b.showtime_id == booking.showtime_id && b.seat_number == booking.seat_number)
        {
            bail!(BookingConflict::SeatTaken {
                showtime_id: booking.showtime_id,
                seat: booking.seat_number,
            });
        }
        tables.bookings.insert(booking.id.clone(), booking);
        Ok(())
    }

    async fn delete_booking(&self, id: &str) -> Result<bool> {
        Ok(self.tables.write().bookings.remove(id).is_some())
    }

    async fn booking_exists(&self, id: &str) -> Result<bool> {
        Ok(self.tables.read().bookings.contains_key(id))
    }

    async fn seat_taken(&self, showtime_id: ShowtimeId, seat_number: i32) -> Result<bool> {
        Ok(self
            .tables
            .read()
            .bookings
            .values()
            .any(|b| b.showtime_id == showtime_id && b.seat_number == seat_number))
    }
}

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, postgres::PgRow, PgPool, Row};

use crate::model::{Booking, Movie, MovieId, NewMovie, NewShowtime, Showtime, ShowtimeId};
use crate::store::traits::{BookingConflict, BookingStore, MovieStore, ShowtimeStore};

const MOVIE_COLUMNS: &str = "id, title, genre, duration, rating, release_year";
const SHOWTIME_COLUMNS: &str = "id, movie_id, theater, start_time, end_time, price";
const BOOKING_COLUMNS: &str = "id, showtime_id, user_id, seat_number, booking_time";
const BOOKING_SEAT_CONSTRAINT: &str = "bookings_seat_unique";

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given database URL
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self { pool })
    }

    /// Apply the embedded schema migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }
}

fn movie_from_row(row: &PgRow) -> Movie {
    Movie {
        id: row.get("id"),
        title: row.get("title"),
        genre: row.get("genre"),
        duration: row.get("duration"),
        rating: row.get("rating"),
        release_year: row.get("release_year"),
    }
}

fn showtime_from_row(row: &PgRow) -> Showtime {
    Showtime {
        id: row.get("id"),
        movie_id: row.get("movie_id"),
        theater: row.get("theater"),
        start_time: row.get("start_time"),
        end_time: row.get("end_time"),
        price: row.get("price"),
    }
}

/// Turn a unique violation on `bookings` into the matching [`BookingConflict`].
fn booking_insert_error(err: sqlx::Error, booking: &Booking) -> anyhow::Error {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return if db_err.constraint() == Some(BOOKING_SEAT_CONSTRAINT) {
                BookingConflict::SeatTaken {
                    showtime_id: booking.showtime_id,
                    seat: booking.seat_number,
                }
                .into()
            } else {
                BookingConflict::DuplicateId(booking.id.clone()).into()
            };
        }
    }
    anyhow::Error::new(err).context("Failed to insert booking")
}

fn booking_from_row(row: &PgRow) -> Booking {
    Booking {
        id: row.get("id"),
        showtime_id: row.get("showtime_id"),
        user_id: row.get("user_id"),
        seat_number: row.get("seat_number"),
        booking_time: row.get("booking_time"),
    }
}

#[async_trait::async_trait]
impl MovieStore for PostgresStore {
    async fn list_movies(&self) -> Result<Vec<Movie>> {
        let rows = sqlx::query(&format!("SELECT {MOVIE_COLUMNS} FROM movies ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .context("Failed to list movies")?;

        Ok(rows.iter().map(movie_from_row).collect())
    }

    async fn get_movie(&self, id: MovieId) -> Result<Option<Movie>> {
        let row = sqlx::query(&format!("SELECT {MOVIE_COLUMNS} FROM movies WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch movie")?;

        Ok(row.as_ref().map(movie_from_row))
    }

    async fn get_movie_by_title(&self, title: &str) -> Result<Option<Movie>> {
        let row = sqlx::query(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies WHERE title = $1 ORDER BY id LIMIT 1"
        ))
        .bind(title)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch movie by title")?;

        Ok(row.as_ref().map(movie_from_row))
    }

    async fn create_movie(&self, movie: NewMovie) -> Result<Movie> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO movies (title, genre, duration, rating, release_year)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {MOVIE_COLUMNS}
            "#
        ))
        .bind(&movie.title)
        .bind(&movie.genre)
        .bind(movie.duration)
        .bind(&movie.rating)
        .bind(movie.release_year)
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert movie")?;

        Ok(movie_from_row(&row))
    }

    async fn update_movie(&self, movie: Movie) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE movies
            SET title = $2, genre = $3, duration = $4, rating = $5, release_year = $6
            WHERE id = $1
            "#,
        )
        .bind(movie.id)
        .bind(&movie.title)
        .bind(&movie.genre)
        .bind(movie.duration)
        .bind(&movie.rating)
        .bind(movie.release_year)
        .execute(&self.pool)
        .await
        .context("Failed to update movie")?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_movie(&self, id: MovieId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete movie")?;

        Ok(result.rows_affected() > 0)
    }

    async fn movie_exists(&self, id: MovieId) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM movies WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .context("Failed to check movie existence")?;

        Ok(exists)
    }
}

#[async_trait::async_trait]
impl ShowtimeStore for PostgresStore {
    async fn list_showtimes(&self) -> Result<Vec<Showtime>> {
        let rows = sqlx::query(&format!("SELECT {SHOWTIME_COLUMNS} FROM showtimes ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .context("Failed to list showtimes")?;

        Ok(rows.iter().map(showtime_from_row).collect())
    }

    async fn get_showtime(&self, id: ShowtimeId) -> Result<Option<Showtime>> {
        let row = sqlx::query(&format!("SELECT {SHOWTIME_COLUMNS} FROM showtimes WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch showtime")?;

        Ok(row.as_ref().map(showtime_from_row))
    }

    async fn create_showtime(&self, showtime: NewShowtime) -> Result<Showtime> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO showtimes (movie_id, theater, start_time, end_time, price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {SHOWTIME_COLUMNS}
            "#
        ))
        .bind(showtime.movie_id)
        .bind(&showtime.theater)
        .bind(showtime.start_time)
        .bind(showtime.end_time)
        .bind(showtime.price)
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert showtime")?;

        Ok(showtime_from_row(&row))
    }

    async fn update_showtime(&self, showtime: Showtime) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE showtimes
            SET movie_id = $2, theater = $3, start_time = $4, end_time = $5, price = $6
            WHERE id = $1
            "#,
        )
        .bind(showtime.id)
        .bind(showtime.movie_id)
        .bind(&showtime.theater)
        .bind(showtime.start_time)
        .bind(showtime.end_time)
        .bind(showtime.price)
        .execute(&self.pool)
        .await
        .context("Failed to update showtime")?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_showtime(&self, id: ShowtimeId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM showtimes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete showtime")?;

        Ok(result.rows_affected() > 0)
    }

    async fn showtime_exists(&self, id: ShowtimeId) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM showtimes WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .context("Failed to check showtime existence")?;

        Ok(exists)
    }

    async fn find_overlapping_showtimes(
        &self,
        theater: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude: Option<ShowtimeId>,
    ) -> Result<Vec<Showtime>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {SHOWTIME_COLUMNS}
            FROM showtimes
            WHERE theater = $1
              AND start_time <= $3
              AND end_time >= $2
              AND ($4::BIGINT IS NULL OR id <> $4)
            ORDER BY start_time
            "#
        ))
        .bind(theater)
        .bind(start)
        .bind(end)
        .bind(exclude)
        .fetch_all(&self.pool)
        .await
        .context("Failed to query overlapping showtimes")?;

        Ok(rows.iter().map(showtime_from_row).collect())
    }
}

#[async_trait::async_trait]
impl BookingStore for PostgresStore {
    async fn list_bookings(&self) -> Result<Vec<Booking>> {
        let rows = sqlx::query(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY booking_time"
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list bookings")?;

        Ok(rows.iter().map(booking_from_row).collect())
    }

    async fn get_booking(&self, id: &str) -> Result<Option<Booking>> {
        let row = sqlx::query(&format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch booking")?;

        Ok(row.as_ref().map(booking_from_row))
    }

    async fn list_bookings_for_showtime(&self, showtime_id: ShowtimeId) -> Result<Vec<Booking>> {
        let rows = sqlx::query(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE showtime_id = $1 ORDER BY seat_number"
        ))
        .bind(showtime_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list bookings for showtime")?;

        Ok(rows.iter().map(booking_from_row).collect())
    }

    async fn insert_booking(&self, booking: Booking) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO bookings (id, showtime_id, user_id, seat_number, booking_time)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&booking.id)
        .bind(booking.showtime_id)
        .bind(&booking.user_id)
        .bind(booking.seat_number)
        .bind(booking.booking_time)
        .execute(&self.pool)
        .await
        .map_err(|e| booking_insert_error(e, &booking))?;

        Ok(())
    }

    async fn delete_booking(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete booking")?;

        Ok(result.rows_affected() > 0)
    }

    async fn booking_exists(&self, id: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM bookings WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .context("Failed to check booking existence")?;

        Ok(exists)
    }

    async fn seat_taken(&self, showtime_id: ShowtimeId, seat_number: i32) -> Result<bool> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM bookings WHERE showtime_id = $1 AND seat_number = $2)",
        )
        .bind(showtime_id)
        .bind(seat_number)
        .fetch_one(&self.pool)
        .await
        .context("Failed to check seat availability")?;

        Ok(taken)
    }
}

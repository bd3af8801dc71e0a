use crate::logic::{BoxOffice, SchedulingError};
use crate::model::{NewMovie, NewShowtime};
use crate::store::traits::Store;
use anyhow::Result;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;

struct SeedMovie {
    title: &'static str,
    genre: &'static str,
    duration: i32,
    rating: &'static str,
    release_year: i32,
}

struct SeedShowtime {
    title: &'static str,
    theater: &'static str,
    /// Minutes after the first screening of the seeded day.
    offset: i64,
    price_cents: i64,
}

const MOVIES: &[SeedMovie] = &[
    SeedMovie {
        title: "The Matrix",
        genre: "Sci-Fi",
        duration: 136,
        rating: "R",
        release_year: 1999,
    },
    SeedMovie {
        title: "Spirited Away",
        genre: "Animation",
        duration: 125,
        rating: "PG",
        release_year: 2001,
    },
    SeedMovie {
        title: "Inception",
        genre: "Sci-Fi",
        duration: 148,
        rating: "PG-13",
        release_year: 2010,
    },
];

const SHOWTIMES: &[SeedShowtime] = &[
    SeedShowtime {
        title: "The Matrix",
        theater: "Theater 1",
        offset: 0,
        price_cents: 1250,
    },
    SeedShowtime {
        title: "Inception",
        theater: "Theater 1",
        offset: 180,
        price_cents: 1400,
    },
    SeedShowtime {
        title: "Spirited Away",
        theater: "Theater 2",
        offset: 30,
        price_cents: 1000,
    },
    SeedShowtime {
        title: "The Matrix",
        theater: "Theater 2",
        offset: 210,
        price_cents: 1250,
    },
];

fn first_screening() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 1, 12, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// Populate a demo catalog. Everything goes through the box office, so the
/// same rules apply to seeded rows as to API traffic. Rows that clash with
/// existing data are skipped.
pub async fn load_seed_data<S: Store + ?Sized>(office: &BoxOffice<S>) -> Result<()> {
    for movie in MOVIES {
        let request = NewMovie {
            title: movie.title.to_string(),
            genre: movie.genre.to_string(),
            duration: movie.duration,
            rating: movie.rating.to_string(),
            release_year: movie.release_year,
        };
        match office.movies.create(request).await {
            Ok(created) => log::info!("Seeded movie {} ({})", created.title, created.id),
            Err(SchedulingError::AlreadyExists { .. }) => {
                log::info!("Movie {} already present, skipping", movie.title)
            }
            Err(e) => return Err(e.into()),
        }
    }

    let day = first_screening();
    for showtime in SHOWTIMES {
        let movie = office.movies.get_by_title(showtime.title).await?;
        let start = day + Duration::minutes(showtime.offset);
        let request = NewShowtime {
            movie_id: movie.id,
            theater: showtime.theater.to_string(),
            start_time: start,
            end_time: start + Duration::minutes(i64::from(movie.duration)),
            price: Decimal::new(showtime.price_cents, 2),
        };
        match office.showtimes.create(request).await {
            Ok(created) => log::info!(
                "Seeded showtime {} for {} in {}",
                created.id,
                movie.title,
                created.theater
            ),
            Err(SchedulingError::ScheduleConflict { .. }) => log::info!(
                "Showtime for {} in {} already scheduled, skipping",
                movie.title,
                showtime.theater
            ),
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

use crate::model::{require_text, Interval, MovieId, ShowtimeId, ValidationError};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const MAX_THEATER_LEN: usize = 100;
/// Prices are whole cents.
pub const PRICE_SCALE: u32 = 2;
/// Exclusive upper bound on a price, matching `NUMERIC(10, 2)`.
pub const PRICE_LIMIT: i64 = 100_000_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Showtime {
    pub id: ShowtimeId,
    pub movie_id: MovieId,
    pub theater: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub price: Decimal,
}

/// Request body for scheduling or rescheduling a showtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewShowtime {
    pub movie_id: MovieId,
    pub theater: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub price: Decimal,
}

impl NewShowtime {
    /// Field-level checks only. The interval ordering is a scheduling rule and is
    /// checked by the scheduler after the movie reference resolves.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("theater", &self.theater, Some(MAX_THEATER_LEN))?;
        if self.price <= Decimal::ZERO {
            return Err(ValidationError::new("price", "must be greater than 0"));
        }
        if self.price.normalize().scale() > PRICE_SCALE {
            return Err(ValidationError::new(
                "price",
                format!("cannot have more than {} decimal places", PRICE_SCALE),
            ));
        }
        if self.price >= Decimal::from(PRICE_LIMIT) {
            return Err(ValidationError::new(
                "price",
                format!("must be less than {}", PRICE_LIMIT),
            ));
        }
        Ok(())
    }

    pub fn interval(&self) -> Option<Interval> {
        Interval::new(self.start_time, self.end_time)
    }

    pub fn into_showtime(self, id: ShowtimeId) -> Showtime {
        Showtime {
            id,
            movie_id: self.movie_id,
            theater: self.theater,
            start_time: self.start_time,
            end_time: self.end_time,
            price: self.price,
        }
    }
}

impl Showtime {
    pub fn interval(&self) -> Interval {
        Interval {
            start: self.start_time,
            end: self.end_time,
        }
    }

    /// Replace every mutable field, keeping the identity.
    pub fn replace_with(&mut self, details: NewShowtime) {
        self.movie_id = details.movie_id;
        self.theater = details.theater;
        self.start_time = details.start_time;
        self.end_time = details.end_time;
        self.price = details.price;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn matinee() -> NewShowtime {
        serde_json::from_str(
            r#"{
                "movieId": 1,
                "theater": "Theater 1",
                "startTime": "2025-04-01T10:00:00Z",
                "endTime": "2025-04-01T12:30:00Z",
                "price": 12.5
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn parses_instants_and_decimal_price() {
        let showtime = matinee();
        assert_eq!(showtime.price, Decimal::from_str("12.5").unwrap());
        assert_eq!(showtime.interval().unwrap().duration().num_minutes(), 150);
    }

    #[test]
    fn rejects_non_positive_price_and_bad_theater() {
        let mut showtime = matinee();
        showtime.price = Decimal::ZERO;
        assert_eq!(showtime.validate().unwrap_err().field, "price");

        let mut showtime = matinee();
        showtime.theater = "T".repeat(MAX_THEATER_LEN + 1);
        assert_eq!(showtime.validate().unwrap_err().field, "theater");

        let mut showtime = matinee();
        showtime.theater = String::new();
        assert_eq!(showtime.validate().unwrap_err().field, "theater");
    }

    #[test]
    fn price_must_be_whole_cents_below_limit() {
        let mut showtime = matinee();
        showtime.price = Decimal::from_str("0.001").unwrap();
        assert_eq!(showtime.validate().unwrap_err().field, "price");

        showtime.price = Decimal::from_str("12.345").unwrap();
        assert_eq!(
            showtime.validate().unwrap_err().to_string(),
            "price cannot have more than 2 decimal places"
        );

        // Trailing zeros do not count.
        showtime.price = Decimal::from_str("12.500").unwrap();
        assert!(showtime.validate().is_ok());

        showtime.price = Decimal::from_str("99999999.99").unwrap();
        assert!(showtime.validate().is_ok());

        showtime.price = Decimal::from(PRICE_LIMIT);
        assert_eq!(
            showtime.validate().unwrap_err().to_string(),
            "price must be less than 100000000"
        );
    }

    #[test]
    fn inverted_window_has_no_interval() {
        let mut showtime = matinee();
        showtime.end_time = showtime.start_time;
        assert!(showtime.validate().is_ok());
        assert!(showtime.interval().is_none());
    }

    #[test]
    fn serializes_price_as_number() {
        let value = serde_json::to_value(matinee().into_showtime(4)).unwrap();
        assert_eq!(value["id"], 4);
        assert_eq!(value["movieId"], 1);
        assert_eq!(value["price"], serde_json::json!(12.5));
    }
}

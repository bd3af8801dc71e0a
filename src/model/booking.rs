use crate::model::{generate_id, require_text, BookingId, ShowtimeId, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MAX_USER_ID_LEN: usize = 36;
pub const MAX_BOOKING_ID_LEN: usize = 36;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: BookingId,
    pub showtime_id: ShowtimeId,
    pub user_id: String,
    pub seat_number: i32,
    /// Set once when the booking is accepted.
    pub booking_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    #[serde(default, alias = "bookingId", skip_serializing_if = "Option::is_none")]
    pub id: Option<BookingId>,
    pub showtime_id: ShowtimeId,
    pub user_id: String,
    pub seat_number: i32,
}

impl NewBooking {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("userId", &self.user_id, Some(MAX_USER_ID_LEN))?;
        if self.seat_number < 1 {
            return Err(ValidationError::new("seatNumber", "must be at least 1"));
        }
        if let Some(id) = self.requested_id() {
            require_text("id", id, Some(MAX_BOOKING_ID_LEN))?;
        }
        Ok(())
    }

    /// The client-chosen identity, if one was supplied. Blank ids count as absent.
    pub fn requested_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.trim().is_empty())
    }

    /// Materialise the booking, generating a fresh identity when none was requested.
    pub fn into_booking(self, booking_time: DateTime<Utc>) -> Booking {
        let id = match self.requested_id() {
            Some(id) => id.to_string(),
            None => generate_id(),
        };
        Booking {
            id,
            showtime_id: self.showtime_id,
            user_id: self.user_id,
            seat_number: self.seat_number,
            booking_time,
        }
    }
}

use chrono::Utc;
use std::sync::Arc;

use crate::logic::{KeyedLocks, ReferenceValidator, SchedulingError, SchedulingResult};
use crate::model::{generate_id, Booking, NewBooking, ShowtimeId};
use crate::store::traits::{BookingConflict, BookingStore, ShowtimeStore};

/// Hands out seats, at most one booking per (showtime, seat).
///
/// Seat checks and inserts for one showtime are serialised; there is no seat
/// ceiling, any positive seat number is accepted.
pub struct BookingAllocator<S: ?Sized> {
    store: Arc<S>,
    showtimes: KeyedLocks<ShowtimeId>,
}

impl<S: ShowtimeStore + BookingStore + ?Sized> BookingAllocator<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            showtimes: KeyedLocks::new(),
        }
    }

    pub async fn list(&self) -> SchedulingResult<Vec<Booking>> {
        Ok(self.store.list_bookings().await?)
    }

    pub async fn get(&self, id: &str) -> SchedulingResult<Booking> {
        self.store
            .get_booking(id)
            .await?
            .ok_or_else(|| SchedulingError::not_found("booking", id))
    }

    /// Bookings held against `showtime_id`. Unknown showtimes simply have none.
    pub async fn list_for_showtime(&self, showtime_id: ShowtimeId) -> SchedulingResult<Vec<Booking>> {
        Ok(self.store.list_bookings_for_showtime(showtime_id).await?)
    }

    pub async fn create(&self, request: NewBooking) -> SchedulingResult<Booking> {
        request.validate()?;
        let _showtime = self.showtimes.lock(&request.showtime_id).await;

        ReferenceValidator::require_showtime(&*self.store, request.showtime_id).await?;

        if self
            .store
            .seat_taken(request.showtime_id, request.seat_number)
            .await?
        {
            log::debug!(
                "seat {} on showtime {} already taken",
                request.seat_number,
                request.showtime_id
            );
            return Err(SchedulingError::SeatTaken {
                showtime_id: request.showtime_id,
                seat: request.seat_number,
            });
        }

        let requested = request.requested_id().is_some();
        let mut booking = request.into_booking(Utc::now());
        if requested {
            if self.store.booking_exists(&booking.id).await? {
                return Err(SchedulingError::AlreadyExists {
                    entity: "booking",
                    key: booking.id,
                });
            }
        } else {
            while self.store.booking_exists(&booking.id).await? {
                booking.id = generate_id();
            }
        }

        if let Err(err) = self.store.insert_booking(booking.clone()).await {
            // Another process, or a request on another showtime reusing the id.
            return Err(match err.downcast::<BookingConflict>() {
                Ok(BookingConflict::DuplicateId(id)) => SchedulingError::AlreadyExists {
                    entity: "booking",
                    key: id,
                },
                Ok(BookingConflict::SeatTaken { showtime_id, seat }) => {
                    SchedulingError::SeatTaken { showtime_id, seat }
                }
                Err(err) => SchedulingError::Store(err),
            });
        }
        log::info!(
            "booking {} holds seat {} on showtime {}",
            booking.id,
            booking.seat_number,
            booking.showtime_id
        );
        Ok(booking)
    }

    /// Removes the booking unconditionally; any caller may cancel any booking.
    pub async fn delete(&self, id: &str) -> SchedulingResult<()> {
        if !self.store.delete_booking(id).await? {
            return Err(SchedulingError::not_found("booking", id));
        }
        log::info!("booking {} cancelled", id);
        Ok(())
    }
}

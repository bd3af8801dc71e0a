use std::sync::Arc;

use crate::logic::{BookingAllocator, MovieCatalog, ShowtimeScheduler};
use crate::store::traits::Store;

/// The consistency layer in front of a [`Store`]: every mutation that has a
/// rule attached goes through one of these three components.
pub struct BoxOffice<S: ?Sized> {
    store: Arc<S>,
    pub movies: MovieCatalog<S>,
    pub showtimes: ShowtimeScheduler<S>,
    pub bookings: BookingAllocator<S>,
}

impl<S: Store + ?Sized> BoxOffice<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            movies: MovieCatalog::new(store.clone()),
            showtimes: ShowtimeScheduler::new(store.clone()),
            bookings: BookingAllocator::new(store.clone()),
            store,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }
}

use std::sync::Arc;

use crate::logic::{KeyedLocks, ReferenceValidator, SchedulingError, SchedulingResult};
use crate::model::{Interval, NewShowtime, Showtime, ShowtimeId};
use crate::store::traits::{MovieStore, ShowtimeStore};

/// Keeps showtimes within one theater from overlapping.
///
/// Every create and update runs reference check, interval check, overlap query
/// and write inside a critical section keyed by the target theater, so two
/// requests for the same theater cannot both pass against stale state.
pub struct ShowtimeScheduler<S: ?Sized> {
    store: Arc<S>,
    theaters: KeyedLocks<String>,
}

impl<S: MovieStore + ShowtimeStore + ?Sized> ShowtimeScheduler<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            theaters: KeyedLocks::new(),
        }
    }

    pub async fn list(&self) -> SchedulingResult<Vec<Showtime>> {
        Ok(self.store.list_showtimes().await?)
    }

    pub async fn get(&self, id: ShowtimeId) -> SchedulingResult<Showtime> {
        self.store
            .get_showtime(id)
            .await?
            .ok_or_else(|| SchedulingError::not_found("showtime", id))
    }

    pub async fn create(&self, showtime: NewShowtime) -> SchedulingResult<Showtime> {
        showtime.validate()?;
        let _theater = self.theaters.lock(&showtime.theater).await;

        ReferenceValidator::require_movie(&*self.store, showtime.movie_id).await?;
        let window = Self::window_of(&showtime)?;
        self.ensure_free(&showtime.theater, window, None).await?;

        let created = self.store.create_showtime(showtime).await?;
        log::info!(
            "showtime {} scheduled in '{}' from {} to {}",
            created.id,
            created.theater,
            created.start_time,
            created.end_time
        );
        Ok(created)
    }

    /// Replace every mutable field of showtime `id`. The record itself is left
    /// out of the overlap check, so an unchanged window always passes.
    pub async fn update(&self, id: ShowtimeId, details: NewShowtime) -> SchedulingResult<Showtime> {
        details.validate()?;
        let _theater = self.theaters.lock(&details.theater).await;

        let mut existing = self.get(id).await?;
        ReferenceValidator::require_movie(&*self.store, details.movie_id).await?;
        let window = Self::window_of(&details)?;
        self.ensure_free(&details.theater, window, Some(id)).await?;

        existing.replace_with(details);
        if !self.store.update_showtime(existing.clone()).await? {
            return Err(SchedulingError::not_found("showtime", id));
        }
        log::info!("showtime {} rescheduled in '{}'", id, existing.theater);
        Ok(existing)
    }

    /// Bookings for the showtime are left in place.
    pub async fn delete(&self, id: ShowtimeId) -> SchedulingResult<()> {
        if !self.store.delete_showtime(id).await? {
            return Err(SchedulingError::not_found("showtime", id));
        }
        log::info!("showtime {} cancelled", id);
        Ok(())
    }

    fn window_of(showtime: &NewShowtime) -> SchedulingResult<Interval> {
        showtime
            .interval()
            .ok_or(SchedulingError::InvalidInterval {
                start: showtime.start_time,
                end: showtime.end_time,
            })
    }

    async fn ensure_free(
        &self,
        theater: &str,
        window: Interval,
        exclude: Option<ShowtimeId>,
    ) -> SchedulingResult<()> {
        let clashes = self
            .store
            .find_overlapping_showtimes(theater, window.start, window.end, exclude)
            .await?;
        if clashes.is_empty() {
            return Ok(());
        }

        let conflicting: Vec<ShowtimeId> = clashes.iter().map(|s| s.id).collect();
        log::warn!(
            "rejected showtime in '{}' [{}, {}]: overlaps {:?}",
            theater,
            window.start,
            window.end,
            conflicting
        );
        Err(SchedulingError::ScheduleConflict {
            theater: theater.to_string(),
            conflicting,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MovieId, NewMovie};
    use crate::store::MemoryStore;
    use chrono::{DateTime, TimeZone, Utc};
    use rust_decimal::Decimal;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 1, hour, minute, 0).unwrap()
    }

    fn showing(movie_id: MovieId, theater: &str, from: (u32, u32), to: (u32, u32)) -> NewShowtime {
        NewShowtime {
            movie_id,
            theater: theater.to_string(),
            start_time: at(from.0, from.1),
            end_time: at(to.0, to.1),
            price: Decimal::new(1250, 2),
        }
    }

    async fn setup() -> (Arc<MemoryStore>, ShowtimeScheduler<MemoryStore>, MovieId) {
        let store = Arc::new(MemoryStore::new());
        let movie = store
            .create_movie(NewMovie {
                title: "Test Movie".to_string(),
                genre: "Action".to_string(),
                duration: 150,
                rating: "PG-13".to_string(),
                release_year: 2023,
            })
            .await
            .unwrap();
        (store.clone(), ShowtimeScheduler::new(store), movie.id)
    }

    #[tokio::test]
    async fn touching_boundary_conflicts_but_gap_succeeds() {
        let (_, scheduler, movie) = setup().await;
        let first = scheduler.create(showing(movie, "T1", (10, 0), (12, 30))).await.unwrap();

        let err = scheduler
            .create(showing(movie, "T1", (12, 30), (13, 0)))
            .await
            .unwrap_err();
        match err {
            SchedulingError::ScheduleConflict { theater, conflicting } => {
                assert_eq!(theater, "T1");
                assert_eq!(conflicting, vec![first.id]);
            }
            other => panic!("expected conflict, got {other:?}"),
        }

        assert!(scheduler.create(showing(movie, "T1", (12, 31), (13, 0))).await.is_ok());
    }

    #[tokio::test]
    async fn same_window_in_other_theater_is_allowed() {
        let (_, scheduler, movie) = setup().await;
        scheduler.create(showing(movie, "T1", (10, 0), (12, 30))).await.unwrap();
        assert!(scheduler.create(showing(movie, "T2", (10, 0), (12, 30))).await.is_ok());
    }

    #[tokio::test]
    async fn unknown_movie_is_rejected_before_anything_is_stored() {
        let (store, scheduler, _) = setup().await;
        let err = scheduler
            .create(showing(999, "T1", (10, 0), (12, 0)))
            .await
            .unwrap_err();
        assert!(matches!(err, SchedulingError::ReferenceNotFound { .. }));
        assert!(store.list_showtimes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn reference_check_runs_before_interval_check() {
        let (_, scheduler, _) = setup().await;
        let err = scheduler
            .create(showing(999, "T1", (12, 0), (10, 0)))
            .await
            .unwrap_err();
        assert!(matches!(err, SchedulingError::ReferenceNotFound { .. }));
    }

    #[tokio::test]
    async fn equal_or_inverted_window_is_invalid() {
        let (_, scheduler, movie) = setup().await;
        let err = scheduler
            .create(showing(movie, "T1", (10, 0), (10, 0)))
            .await
            .unwrap_err();
        assert!(matches!(err, SchedulingError::InvalidInterval { .. }));

        let err = scheduler
            .create(showing(movie, "T1", (12, 0), (10, 0)))
            .await
            .unwrap_err();
        assert!(matches!(err, SchedulingError::InvalidInterval { .. }));
    }

    #[tokio::test]
    async fn update_with_same_window_excludes_itself() {
        let (_, scheduler, movie) = setup().await;
        let created = scheduler.create(showing(movie, "T1", (10, 0), (12, 30))).await.unwrap();

        let mut details = showing(movie, "T1", (10, 0), (12, 30));
        details.price = Decimal::new(1500, 2);
        let updated = scheduler.update(created.id, details).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.price, Decimal::new(1500, 2));
        assert_eq!(scheduler.get(created.id).await.unwrap().price, Decimal::new(1500, 2));
    }

    #[tokio::test]
    async fn sub_cent_price_is_rejected_on_create_and_update() {
        let (store, scheduler, movie) = setup().await;
        let mut details = showing(movie, "T1", (10, 0), (12, 30));
        details.price = Decimal::new(1, 3);
        let err = scheduler.create(details).await.unwrap_err();
        assert!(matches!(err, SchedulingError::Validation(ref e) if e.field == "price"));
        assert!(store.list_showtimes().await.unwrap().is_empty());

        let created = scheduler.create(showing(movie, "T1", (10, 0), (12, 30))).await.unwrap();
        let mut details = showing(movie, "T1", (10, 0), (12, 30));
        details.price = Decimal::new(12345, 3);
        let err = scheduler.update(created.id, details).await.unwrap_err();
        assert!(matches!(err, SchedulingError::Validation(_)));
        assert_eq!(scheduler.get(created.id).await.unwrap().price, Decimal::new(1250, 2));
    }

    #[tokio::test]
    async fn update_into_neighbour_conflicts() {
        let (_, scheduler, movie) = setup().await;
        let morning = scheduler.create(showing(movie, "T1", (10, 0), (12, 0))).await.unwrap();
        let afternoon = scheduler.create(showing(movie, "T1", (14, 0), (16, 0))).await.unwrap();

        let err = scheduler
            .update(afternoon.id, showing(movie, "T1", (11, 0), (13, 0)))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SchedulingError::ScheduleConflict { ref conflicting, .. } if conflicting == &vec![morning.id]
        ));
        assert_eq!(scheduler.get(afternoon.id).await.unwrap().start_time, at(14, 0));
    }

    #[tokio::test]
    async fn update_unknown_showtime_is_not_found() {
        let (_, scheduler, movie) = setup().await;
        let err = scheduler
            .update(42, showing(movie, "T1", (10, 0), (12, 0)))
            .await
            .unwrap_err();
        assert!(matches!(err, SchedulingError::NotFound { .. }));
    }

    #[tokio::test]
    async fn update_can_move_to_another_theater() {
        let (_, scheduler, movie) = setup().await;
        let created = scheduler.create(showing(movie, "T1", (10, 0), (12, 0))).await.unwrap();
        scheduler.create(showing(movie, "T2", (18, 0), (20, 0))).await.unwrap();

        let moved = scheduler
            .update(created.id, showing(movie, "T2", (10, 0), (12, 0)))
            .await
            .unwrap();
        assert_eq!(moved.theater, "T2");
        // T1 is free again.
        assert!(scheduler.create(showing(movie, "T1", (10, 0), (12, 0))).await.is_ok());
    }

    #[tokio::test]
    async fn delete_twice_reports_not_found() {
        let (_, scheduler, movie) = setup().await;
        let created = scheduler.create(showing(movie, "T1", (10, 0), (12, 0))).await.unwrap();
        scheduler.delete(created.id).await.unwrap();
        assert!(matches!(
            scheduler.delete(created.id).await.unwrap_err(),
            SchedulingError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn concurrent_conflicting_creates_admit_exactly_one() {
        let (store, scheduler, movie) = setup().await;
        let scheduler = Arc::new(scheduler);

        let attempts: Vec<_> = (0..16)
            .map(|i| {
                let scheduler = scheduler.clone();
                // Every window contains 12:00 in the same theater.
                let from = (11, i as u32);
                tokio::spawn(async move {
                    scheduler.create(showing(movie, "T1", from, (13, 0))).await
                })
            })
            .collect();

        let mut admitted = 0;
        for attempt in attempts {
            if attempt.await.unwrap().is_ok() {
                admitted += 1;
            }
        }
        assert_eq!(admitted, 1);
        assert_eq!(store.list_showtimes().await.unwrap().len(), 1);
    }
}

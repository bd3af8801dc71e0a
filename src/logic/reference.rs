use crate::logic::{SchedulingError, SchedulingResult};
use crate::model::{MovieId, ShowtimeId};
use crate::store::traits::{MovieStore, ShowtimeStore};

/// Foreign-key checks run before any scheduling rule. Read-only.
pub struct ReferenceValidator;

impl ReferenceValidator {
    pub async fn require_movie<S: MovieStore + ?Sized>(
        store: &S,
        movie_id: MovieId,
    ) -> SchedulingResult<()> {
        if store.movie_exists(movie_id).await? {
            Ok(())
        } else {
            Err(SchedulingError::reference_not_found("Movie", movie_id))
        }
    }

    pub async fn require_showtime<S: ShowtimeStore + ?Sized>(
        store: &S,
        showtime_id: ShowtimeId,
    ) -> SchedulingResult<()> {
        if store.showtime_exists(showtime_id).await? {
            Ok(())
        } else {
            Err(SchedulingError::reference_not_found("Showtime", showtime_id))
        }
    }
}

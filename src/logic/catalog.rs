use std::sync::Arc;
use tokio::sync::Mutex;

use crate::logic::{SchedulingError, SchedulingResult};
use crate::model::{Movie, MovieId, NewMovie};
use crate::store::traits::MovieStore;

/// Movie catalog. Titles double as the natural key at the API boundary, so
/// they are kept unique here even though the store only keys by id.
pub struct MovieCatalog<S: ?Sized> {
    store: Arc<S>,
    titles: Mutex<()>,
}

impl<S: MovieStore + ?Sized> MovieCatalog<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            titles: Mutex::new(()),
        }
    }

    pub async fn list(&self) -> SchedulingResult<Vec<Movie>> {
        Ok(self.store.list_movies().await?)
    }

    pub async fn get(&self, id: MovieId) -> SchedulingResult<Movie> {
        self.store
            .get_movie(id)
            .await?
            .ok_or_else(|| SchedulingError::not_found("movie", id))
    }

    pub async fn get_by_title(&self, title: &str) -> SchedulingResult<Movie> {
        self.store
            .get_movie_by_title(title)
            .await?
            .ok_or_else(|| SchedulingError::not_found("movie", title))
    }

    pub async fn create(&self, movie: NewMovie) -> SchedulingResult<Movie> {
        movie.validate()?;
        let _titles = self.titles.lock().await;

        if self.store.get_movie_by_title(&movie.title).await?.is_some() {
            return Err(SchedulingError::AlreadyExists {
                entity: "movie",
                key: movie.title,
            });
        }

        let created = self.store.create_movie(movie).await?;
        log::info!("movie {} '{}' added to catalog", created.id, created.title);
        Ok(created)
    }

    /// Replace every field of the movie currently titled `title`.
    pub async fn update_by_title(&self, title: &str, details: NewMovie) -> SchedulingResult<Movie> {
        details.validate()?;
        let _titles = self.titles.lock().await;
        let existing = self.get_by_title(title).await?;
        self.replace(existing, details).await
    }

    pub async fn update(&self, id: MovieId, details: NewMovie) -> SchedulingResult<Movie> {
        details.validate()?;
        let _titles = self.titles.lock().await;
        let existing = self.get(id).await?;
        self.replace(existing, details).await
    }

    pub async fn delete_by_title(&self, title: &str) -> SchedulingResult<()> {
        let existing = self.get_by_title(title).await?;
        self.delete(existing.id).await
    }

    /// Showtimes that still reference the movie are left in place.
    pub async fn delete(&self, id: MovieId) -> SchedulingResult<()> {
        if !self.store.delete_movie(id).await? {
            return Err(SchedulingError::not_found("movie", id));
        }
        log::info!("movie {} removed from catalog", id);
        Ok(())
    }

    // Caller holds the title lock.
    async fn replace(&self, mut existing: Movie, details: NewMovie) -> SchedulingResult<Movie> {
        if details.title != existing.title {
            if let Some(other) = self.store.get_movie_by_title(&details.title).await? {
                if other.id != existing.id {
                    return Err(SchedulingError::AlreadyExists {
                        entity: "movie",
                        key: details.title,
                    });
                }
            }
        }

        existing.replace_with(details);
        if !self.store.update_movie(existing.clone()).await? {
            return Err(SchedulingError::not_found("movie", existing.id));
        }
        log::info!("movie {} updated", existing.id);
        Ok(existing)
    }
}

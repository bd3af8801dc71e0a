use crate::model::{require_text, MovieId, ValidationError};
use serde::{Deserialize, Serialize};

pub const MIN_RELEASE_YEAR: i32 = 1888;
pub const MAX_RELEASE_YEAR: i32 = 2100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub genre: String,
    /// Running time in minutes.
    pub duration: i32,
    pub rating: String,
    pub release_year: i32,
}

/// Request body for creating or replacing a movie. Any `id` sent by the client is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMovie {
    pub title: String,
    pub genre: String,
    pub duration: i32,
    pub rating: String,
    pub release_year: i32,
}

impl NewMovie {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title, None)?;
        require_text("genre", &self.genre, None)?;
        require_text("rating", &self.rating, None)?;
        if self.duration <= 0 {
            return Err(ValidationError::new("duration", "must be a positive number of minutes"));
        }
        if !(MIN_RELEASE_YEAR..=MAX_RELEASE_YEAR).contains(&self.release_year) {
            return Err(ValidationError::new(
                "releaseYear",
                format!("must be between {} and {}", MIN_RELEASE_YEAR, MAX_RELEASE_YEAR),
            ));
        }
        Ok(())
    }

    pub fn into_movie(self, id: MovieId) -> Movie {
        Movie {
            id,
            title: self.title,
            genre: self.genre,
            duration: self.duration,
            rating: self.rating,
            release_year: self.release_year,
        }
    }
}

impl Movie {
    /// Replace every mutable field, keeping the identity.
    pub fn replace_with(&mut self, details: NewMovie) {
        self.title = details.title;
        self.genre = details.genre;
        self.duration = details.duration;
        self.rating = details.rating;
        self.release_year = details.release_year;
    }
}

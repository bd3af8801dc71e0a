use chrono::{DateTime, Utc};
use itertools::Itertools;

use crate::model::{ShowtimeId, ValidationError};

/// Every way a scheduling operation can be refused. All variants are scoped to
/// the single request that produced them; none is retried.
#[derive(Debug, thiserror::Error)]
pub enum SchedulingError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("{entity} with ID {id} does not exist")]
    ReferenceNotFound { entity: &'static str, id: String },

    #[error("start time {start} must be before end time {end}")]
    InvalidInterval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error(
        "theater '{theater}' already has a showtime scheduled during the requested time (conflicts with showtime {})",
        .conflicting.iter().join(", ")
    )]
    ScheduleConflict {
        theater: String,
        conflicting: Vec<ShowtimeId>,
    },

    #[error("seat {seat} is already booked for showtime {showtime_id}")]
    SeatTaken { showtime_id: ShowtimeId, seat: i32 },

    #[error("{entity} '{key}' not found")]
    NotFound { entity: &'static str, key: String },

    #[error("{entity} '{key}' already exists")]
    AlreadyExists { entity: &'static str, key: String },

    #[error("storage failure: {0:#}")]
    Store(#[from] anyhow::Error),
}

impl SchedulingError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn reference_not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::ReferenceNotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// True for failures caused by the request contents rather than missing targets or storage.
    pub fn is_rejected_input(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::ReferenceNotFound { .. }
                | Self::InvalidInterval { .. }
                | Self::ScheduleConflict { .. }
                | Self::SeatTaken { .. }
        )
    }
}

pub type SchedulingResult<T> = Result<T, SchedulingError>;

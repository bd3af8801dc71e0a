use uuid::Uuid;

/// Store-assigned movie identity.
pub type MovieId = i64;

/// Store-assigned showtime identity.
pub type ShowtimeId = i64;

/// Opaque booking token, client-assignable.
pub type BookingId = String;

pub fn generate_id() -> BookingId {
    Uuid::new_v4().to_string()
}

/// A single field-level rule that a payload failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field} {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Fails when a required string field is blank or longer than `max_len` characters.
pub(crate) fn require_text(
    field: &'static str,
    value: &str,
    max_len: Option<usize>,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "is required"));
    }
    if let Some(max_len) = max_len {
        if value.chars().count() > max_len {
            return Err(ValidationError::new(
                field,
                format!("cannot exceed {} characters", max_len),
            ));
        }
    }
    Ok(())
}
